//! Cucumber expressions and the trait shared with regular expressions.
//!
//! Source text flows through the tokenizer, the parser and the compiler to
//! produce an anchored regular expression whose capture groups line up
//! with the expression's parameters.

pub(crate) mod compiler;
pub(crate) mod parser;
pub(crate) mod tokenizer;

use regex::Regex;
use std::fmt;
use std::sync::Arc;

use crate::argument::Argument;
use crate::ast::Node;
use crate::errors::CucumberExpressionError;
use crate::parameter::{ParameterType, ParameterTypeRegistry};
use crate::tree_regexp::TreeRegexp;

/// Anything that can match step text and extract typed arguments.
pub trait Expression: fmt::Debug + Send + Sync {
    /// The text the expression was created from.
    fn source(&self) -> &str;

    /// The regular expression source, as written or as compiled from a
    /// Cucumber expression.
    fn pattern(&self) -> &str;

    /// The compiled regular expression.
    ///
    /// `\d` and `\D` are narrowed to ASCII digits here, so its source can
    /// differ from [`Expression::pattern`].
    fn regex(&self) -> &Regex;

    /// Match `text` without type hints.
    ///
    /// # Errors
    /// See [`Expression::match_with_hints`].
    fn match_text(&self, text: &str) -> Result<Option<Vec<Argument>>, CucumberExpressionError> {
        self.match_with_hints(text, &[])
    }

    /// Match `text`, returning one [`Argument`] per parameter or `None` when
    /// the text does not match.
    ///
    /// `hints` name a [`ValueKind`](crate::ValueKind) per argument position
    /// and only affect anonymous parameters.
    ///
    /// # Errors
    /// Returns [`CucumberExpressionError::AmbiguousParameterType`] when a
    /// regular expression group cannot be resolved to a single parameter
    /// type, and [`CucumberExpressionError::GroupCountMismatch`] when the
    /// groups do not line up with the parameter types.
    fn match_with_hints(
        &self,
        text: &str,
        hints: &[&str],
    ) -> Result<Option<Vec<Argument>>, CucumberExpressionError>;
}

/// A compiled Cucumber expression such as `I have {int} cuke(s)`.
///
/// # Examples
/// ```
/// use cucumber_expressions::{CucumberExpression, Expression, ParameterTypeRegistry, Value};
///
/// let registry = ParameterTypeRegistry::new();
/// let expression = CucumberExpression::new("I have {int} cuke(s)", &registry)
///     .expect("expression compiles");
/// assert_eq!(expression.pattern(), r"^I have ((?:-?\d+)|(?:\d+)) cuke(?:s)?$");
///
/// let arguments = expression
///     .match_text("I have 7 cukes")
///     .expect("no lookup errors")
///     .expect("text matches");
/// assert_eq!(arguments[0].value(), Ok(Value::I32(7)));
/// ```
#[derive(Debug, Clone)]
pub struct CucumberExpression {
    source: String,
    ast: Node,
    tree_regexp: TreeRegexp,
    parameter_types: Vec<Arc<ParameterType>>,
}

impl CucumberExpression {
    /// Parse and compile `source`, resolving parameters in `registry`.
    ///
    /// # Errors
    /// Returns [`CucumberExpressionError::Syntax`] for malformed expressions
    /// and [`CucumberExpressionError::UndefinedParameterType`] for
    /// parameters the registry does not know.
    pub fn new(source: &str, registry: &ParameterTypeRegistry) -> Result<Self, CucumberExpressionError> {
        let ast = parser::parse(source)?;
        let compiled = compiler::compile(&ast, source, registry)?;
        log::trace!("compiled {source:?} to {:?}", compiled.pattern);
        let tree_regexp = TreeRegexp::new(&compiled.pattern)?;
        Ok(Self {
            source: source.to_string(),
            ast,
            tree_regexp,
            parameter_types: compiled.parameter_types,
        })
    }

    /// The parsed syntax tree.
    #[must_use]
    pub const fn ast(&self) -> &Node {
        &self.ast
    }

    /// Parameter types in the order their parameters appear.
    #[must_use]
    pub fn parameter_types(&self) -> &[Arc<ParameterType>] {
        &self.parameter_types
    }
}

impl Expression for CucumberExpression {
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
        Argument::build(&self.tree_regexp, text, &self.parameter_types, hints)
    }
}
