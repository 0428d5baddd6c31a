//! Expressions written as raw regular expressions.

use regex::Regex;
use std::sync::{Arc, LazyLock};

use crate::argument::Argument;
use crate::errors::CucumberExpressionError;
use crate::expression::Expression;
use crate::parameter::{ParameterType, ParameterTypeRegistry};
use crate::tree_regexp::TreeRegexp;

static NAMED_GROUP_PREFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\?P?<[^>]+>").ok());

/// A regular expression whose capture groups are typed through the
/// registry.
///
/// Each top-level capture group is looked up by its source; a group whose
/// source no parameter type uses becomes an anonymous parameter.
///
/// # Examples
/// ```
/// use cucumber_expressions::{Expression, ParameterTypeRegistry, RegularExpression, Value};
///
/// let registry = ParameterTypeRegistry::new();
/// let expression = RegularExpression::new(r"^I have (-?\d+) cukes? in my (\w+)$", &registry)
///     .expect("valid regex");
/// let arguments = expression
///     .match_text("I have 7 cukes in my belly")
///     .expect("no lookup errors")
///     .expect("text matches");
/// assert_eq!(arguments[0].value(), Ok(Value::I32(7)));
/// assert_eq!(arguments[1].value(), Ok(Value::from("belly")));
/// ```
#[derive(Debug, Clone)]
pub struct RegularExpression {
    source: String,
    tree_regexp: TreeRegexp,
    registry: ParameterTypeRegistry,
}

impl RegularExpression {
    /// Compile `source` against a snapshot of `registry`.
    ///
    /// # Errors
    /// Returns [`CucumberExpressionError::Regex`] when `source` is not a
    /// valid regular expression.
    pub fn new(source: &str, registry: &ParameterTypeRegistry) -> Result<Self, CucumberExpressionError> {
        Ok(Self {
            source: source.to_string(),
            tree_regexp: TreeRegexp::new(source)?,
            registry: registry.clone(),
        })
    }

    fn parameter_types(&self, text: &str) -> Result<Vec<Arc<ParameterType>>, CucumberExpressionError> {
        self.tree_regexp
            .group_builder()
            .children()
            .iter()
            .map(|group| {
                let regexp = strip_group_name(group.source());
                Ok(self
                    .registry
                    .lookup_by_regexp(regexp, &self.source, text)?
                    .unwrap_or_else(|| Arc::new(ParameterType::anonymous(regexp))))
            })
            .collect()
    }
}

/// Drop a leading `?P<name>` or `?<name>` from a group's source.
fn strip_group_name(source: &str) -> &str {
    NAMED_GROUP_PREFIX
        .as_ref()
        .and_then(|prefix| prefix.find(source))
        .and_then(|found| source.get(found.end()..))
        .unwrap_or(source)
}

impl Expression for RegularExpression {
    fn source(&self) -> &str {
        &self.source
    }

    fn pattern(&self) -> &str {
        self.tree_regexp.source()
    }

    fn regex(&self) -> &Regex {
        self.tree_regexp.regex()
    }

    fn match_with_hints(
        &self,
        text: &str,
        hints: &[&str],
    ) -> Result<Option<Vec<Argument>>, CucumberExpressionError> {
        let parameter_types = self.parameter_types(text)?;
        Argument::build(&self.tree_regexp, text, &parameter_types, hints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformer::{TransformError, Value};
    use rstest::{fixture, rstest};

    #[fixture]
    fn registry() -> ParameterTypeRegistry {
        ParameterTypeRegistry::new()
    }

    fn values(expression: &RegularExpression, text: &str) -> Option<Vec<Value>> {
        expression
            .match_text(text)
            .unwrap_or_else(|e| panic!("{e}"))
            .map(|arguments| {
                arguments
                    .iter()
                    .map(|a| a.value().unwrap_or_else(|e| panic!("{e}")))
                    .collect()
            })
    }

    fn regular(source: &str, registry: &ParameterTypeRegistry) -> RegularExpression {
        RegularExpression::new(source, registry).unwrap_or_else(|e| panic!("{e}"))
    }

    #[rstest]
    #[case("?P<n>-?\\d+", "-?\\d+")]
    #[case("?<n>\\w+", "\\w+")]
    #[case("a(b)", "a(b)")]
    fn strips_group_names(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(strip_group_name(source), expected);
    }

    #[rstest]
    fn unknown_groups_are_strings(registry: ParameterTypeRegistry) {
        let expression = regular(r"^I have (\d+) (.+)$", &registry);
        assert_eq!(
            values(&expression, "I have 22 apples"),
            Some(vec![Value::I32(22), Value::from("apples")])
        );
    }

    #[rstest]
    fn named_groups_resolve_by_body(registry: ParameterTypeRegistry) {
        let expression = regular(r"^(?P<count>-?\d+) left$", &registry);
        assert_eq!(values(&expression, "-3 left"), Some(vec![Value::I32(-3)]));
    }

    #[rstest]
    fn absent_optional_group(registry: ParameterTypeRegistry) {
        let expression = regular(r"^a(?: (\d+))?$", &registry);
        assert_eq!(values(&expression, "a"), Some(vec![Value::Absent]));
    }

    #[rstest]
    fn no_match_is_none(registry: ParameterTypeRegistry) {
        assert_eq!(values(&regular(r"^(\d+)$", &registry), "x"), None);
    }

    #[rstest]
    fn hints_convert_anonymous_groups(registry: ParameterTypeRegistry) {
        let expression = regular(r"^(\d{2}) is (\w+)$", &registry);
        let arguments = expression
            .match_with_hints("42 is true", &["u16", "bool"])
            .unwrap_or_else(|e| panic!("{e}"))
            .unwrap_or_else(|| panic!("text matches"));
        let values: Vec<_> = arguments.iter().map(Argument::value).collect();
        assert_eq!(values, [Ok(Value::U16(42)), Ok(Value::Bool(true))]);
    }

    #[rstest]
    fn nested_groups_give_the_same_text_with_or_without_a_hint(registry: ParameterTypeRegistry) {
        let expression = regular(r"^((\d+)-(\d+))$", &registry);
        let plain = expression
            .match_text("1-2")
            .unwrap_or_else(|e| panic!("{e}"))
            .unwrap_or_else(|| panic!("text matches"));
        let hinted = expression
            .match_with_hints("1-2", &["String"])
            .unwrap_or_else(|e| panic!("{e}"))
            .unwrap_or_else(|| panic!("text matches"));
        let plain: Vec<_> = plain.iter().map(Argument::value).collect();
        let hinted: Vec<_> = hinted.iter().map(Argument::value).collect();
        assert_eq!(plain, [Ok(Value::from("1-2"))]);
        assert_eq!(hinted, plain);
    }

    #[rstest]
    fn ambiguous_groups_fail_at_match_time(mut registry: ParameterTypeRegistry) {
        for name in ["upper", "shout"] {
            let parameter_type = ParameterType::new(
                name,
                ["[A-Z]+"],
                None,
                |captures: &[Option<&str>]| -> Result<Value, TransformError> {
                    Ok(Value::from(captures.first().copied().flatten().unwrap_or_default()))
                },
            )
            .unwrap_or_else(|e| panic!("{e}"));
            registry.define(parameter_type).unwrap_or_else(|e| panic!("{e}"));
        }
        let expression = regular("^([A-Z]+)$", &registry);
        let err = expression
            .match_text("HELLO")
            .err()
            .unwrap_or_else(|| panic!("two types share [A-Z]+"));
        let CucumberExpressionError::AmbiguousParameterType(ambiguity) = err else {
            panic!("expected an ambiguity error");
        };
        assert_eq!(ambiguity.parameter_type_names, ["upper", "shout"]);
        assert_eq!(ambiguity.expression_regexp, "^([A-Z]+)$");
        assert_eq!(ambiguity.generated_expressions, ["{upper}", "{shout}"]);
    }
}
