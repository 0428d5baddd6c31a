//! Parameter types and the registry that indexes them.

mod builtin;
mod registry;

pub use registry::ParameterTypeRegistry;

use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::errors::CucumberExpressionError;
use crate::transformer::{KindTransformer, TransformError, Transformer, Value, ValueKind};

const ILLEGAL_NAME_CHARACTERS: [char; 6] = ['{', '}', '(', ')', '\\', '/'];

/// A named binding of one or more regular expressions to a transformer.
///
/// The name is what appears between braces in an expression. A parameter
/// type with several regexps matches any of them, and its transformer
/// receives the captures of whichever one matched.
///
/// # Examples
/// ```
/// use cucumber_expressions::{ParameterType, TransformError, Value};
///
/// let colour = ParameterType::new(
///     "colour",
///     ["red|blue|yellow"],
///     Some("Colour"),
///     |captures: &[Option<&str>]| -> Result<Value, TransformError> {
///         Ok(Value::from(captures.first().copied().flatten().unwrap_or_default()))
///     },
/// )
/// .expect("valid parameter type")
/// .with_use_for_snippets(false);
/// assert_eq!(colour.name(), "colour");
/// assert!(!colour.use_for_snippets());
/// ```
#[derive(Clone)]
pub struct ParameterType {
    name: String,
    regexps: Vec<String>,
    type_name: Option<String>,
    transformer: Arc<dyn Transformer>,
    use_for_snippets: bool,
    prefer_for_regexp_match: bool,
    anonymous: bool,
}

impl ParameterType {
    /// Create a parameter type that is used for snippets and is not
    /// preferential.
    ///
    /// # Errors
    /// Returns [`CucumberExpressionError::InvalidParameterTypeName`] when the
    /// name contains `{`, `}`, `(`, `)`, `\` or `/`,
    /// [`CucumberExpressionError::MissingRegexps`] when no regexp is given,
    /// and [`CucumberExpressionError::Regex`] when a regexp does not compile.
    pub fn new<I, S>(
        name: impl Into<String>,
        regexps: I,
        type_name: Option<&str>,
        transformer: impl Transformer + 'static,
    ) -> Result<Self, CucumberExpressionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        if name.contains(ILLEGAL_NAME_CHARACTERS) {
            return Err(CucumberExpressionError::InvalidParameterTypeName(name));
        }
        let regexps: Vec<String> = regexps.into_iter().map(Into::into).collect();
        if regexps.is_empty() {
            return Err(CucumberExpressionError::MissingRegexps(name));
        }
        for regexp in &regexps {
            Regex::new(regexp)?;
        }
        Ok(Self::from_parts(
            name,
            regexps,
            type_name,
            Arc::new(transformer),
        ))
    }

    pub(crate) fn from_parts(
        name: String,
        regexps: Vec<String>,
        type_name: Option<&str>,
        transformer: Arc<dyn Transformer>,
    ) -> Self {
        Self {
            name,
            regexps,
            type_name: type_name.map(str::to_string),
            transformer,
            use_for_snippets: true,
            prefer_for_regexp_match: false,
            anonymous: false,
        }
    }

    /// The catch-all type bound to `{}`, or to an unrecognised capture
    /// group of a regular expression.
    pub(crate) fn anonymous(regexp: &str) -> Self {
        Self {
            name: String::new(),
            regexps: vec![regexp.to_string()],
            type_name: None,
            transformer: Arc::new(KindTransformer(ValueKind::String)),
            use_for_snippets: false,
            prefer_for_regexp_match: true,
            anonymous: true,
        }
    }

    /// Whether the generator may suggest this type.
    #[must_use]
    pub fn with_use_for_snippets(mut self, use_for_snippets: bool) -> Self {
        self.use_for_snippets = use_for_snippets;
        self
    }

    /// Whether this type wins over others sharing one of its regexps.
    #[must_use]
    pub fn with_prefer_for_regexp_match(mut self, prefer: bool) -> Self {
        self.prefer_for_regexp_match = prefer;
        self
    }

    /// The name used between braces; empty for the anonymous type.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The regexps in declaration order.
    #[must_use]
    pub fn regexps(&self) -> &[String] {
        &self.regexps
    }

    /// The name of the type the transformer produces, if declared.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Whether the generator may suggest this type.
    #[must_use]
    pub const fn use_for_snippets(&self) -> bool {
        self.use_for_snippets
    }

    /// Whether this type wins over others sharing one of its regexps.
    #[must_use]
    pub const fn prefer_for_regexp_match(&self) -> bool {
        self.prefer_for_regexp_match
    }

    /// Whether this is the anonymous type.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    /// Run the transformer over the captures of one match.
    ///
    /// # Errors
    /// Propagates the transformer's [`TransformError`].
    pub fn transform(&self, captures: &[Option<&str>]) -> Result<Value, TransformError> {
        self.transformer.transform(captures)
    }

    /// Ordering used within a regexp bucket: preferential types first.
    ///
    /// Types of equal preference compare equal, so a stable sort keeps them
    /// in registration order.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        other
            .prefer_for_regexp_match
            .cmp(&self.prefer_for_regexp_match)
    }
}

impl fmt::Debug for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterType")
            .field("name", &self.name)
            .field("regexps", &self.regexps)
            .field("type_name", &self.type_name)
            .field("use_for_snippets", &self.use_for_snippets)
            .field("prefer_for_regexp_match", &self.prefer_for_regexp_match)
            .field("anonymous", &self.anonymous)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn identity(captures: &[Option<&str>]) -> Result<Value, TransformError> {
        Ok(Value::from(captures.first().copied().flatten().unwrap_or_default()))
    }

    #[rstest]
    #[case("[string]", false)]
    #[case("colour", false)]
    #[case("{colour}", true)]
    #[case("a(b", true)]
    #[case("a/b", true)]
    #[case(r"a\b", true)]
    fn validates_names(#[case] name: &str, #[case] rejected: bool) {
        let result = ParameterType::new(name, ["x"], None, identity);
        assert_eq!(
            matches!(result, Err(CucumberExpressionError::InvalidParameterTypeName(_))),
            rejected
        );
    }

    #[test]
    fn requires_a_regexp() {
        let result = ParameterType::new("empty", Vec::<String>::new(), None, identity);
        assert!(matches!(result, Err(CucumberExpressionError::MissingRegexps(name)) if name == "empty"));
    }

    #[test]
    fn rejects_invalid_regexps() {
        let result = ParameterType::new("broken", ["("], None, identity);
        assert!(matches!(result, Err(CucumberExpressionError::Regex(_))));
    }

    #[test]
    fn orders_preferential_types_first() {
        let plain = ParameterType::anonymous("x").with_prefer_for_regexp_match(false);
        let preferred = ParameterType::anonymous("x");
        assert_eq!(preferred.compare(&plain), Ordering::Less);
        assert_eq!(plain.compare(&preferred), Ordering::Greater);
        assert_eq!(plain.compare(&plain), Ordering::Equal);
    }

    #[test]
    fn anonymous_type_passes_text_through() {
        let anonymous = ParameterType::anonymous(".*");
        assert!(anonymous.is_anonymous());
        assert_eq!(anonymous.name(), "");
        assert_eq!(
            anonymous.transform(&[Some("anything")]),
            Ok(Value::from("anything"))
        );
        assert_eq!(anonymous.transform(&[None]), Ok(Value::Absent));
    }
}
