//! Error types shared by the tokenizer, parser, compiler, registry and
//! transformers.
//!
//! Message texts are shared with every other Cucumber Expressions port and
//! are compared verbatim by the acceptance corpus, so the wording (quirks
//! included) must not drift.

use std::fmt;
use thiserror::Error;

use crate::ast::{Located, TokenType};
use crate::transformer::TransformError;

/// The syntax problem behind a [`SyntaxError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// A backslash precedes a character that cannot be escaped.
    CantEscape,
    /// The expression ends with a lone backslash.
    TheEndOfLineCannotBeEscaped,
    /// An opening `{` or `(` is never closed.
    MissingEndToken {
        /// The opening token.
        begin: TokenType,
        /// The token that was expected to close it.
        end: TokenType,
    },
    /// A `/` appears inside `( ... )`.
    AlternationNotAllowedInOptional,
    /// A parameter name contains a reserved character.
    InvalidParameterTypeName,
    /// An alternation has an empty branch.
    AlternativeMayNotBeEmpty,
    /// An alternation branch contains only optionals.
    AlternativeMayNotExclusivelyContainOptionals,
    /// `()` or an optional without text.
    OptionalMayNotBeEmpty,
    /// `({int})`
    ParameterIsNotAllowedInOptional,
    /// `((a))`
    OptionalIsNotAllowedInOptional,
}

impl SyntaxErrorKind {
    fn problem(self) -> String {
        match self {
            Self::CantEscape => {
                r"Only the characters '{', '}', '(', ')', '\', '/' and whitespace can be escaped"
                    .to_string()
            }
            Self::TheEndOfLineCannotBeEscaped => "The end of line can not be escaped".to_string(),
            Self::MissingEndToken { begin, end } => format!(
                "The '{}' does not have a matching '{}'",
                begin.symbol(),
                end.symbol()
            ),
            Self::AlternationNotAllowedInOptional => {
                "An alternation can not be used inside an optional".to_string()
            }
            Self::InvalidParameterTypeName => {
                r"Parameter names may not contain '{', '}', '(', ')', '\' or '/'".to_string()
            }
            Self::AlternativeMayNotBeEmpty => "Alternative may not be empty".to_string(),
            Self::AlternativeMayNotExclusivelyContainOptionals => {
                "An alternative may not exclusively contain optionals".to_string()
            }
            Self::OptionalMayNotBeEmpty => "An optional must contain some text".to_string(),
            Self::ParameterIsNotAllowedInOptional => {
                "An optional may not contain a parameter type".to_string()
            }
            Self::OptionalIsNotAllowedInOptional => {
                "An optional may not contain an other optional".to_string()
            }
        }
    }

    fn solution(self) -> String {
        match self {
            Self::CantEscape => r"If you did mean to use an '\' you can use '\\' to escape it".to_string(),
            Self::TheEndOfLineCannotBeEscaped => r"You can use '\\' to escape the '\'".to_string(),
            Self::MissingEndToken { begin, .. } => format!(
                r"If you did not intend to use {purpose} you can use '\{symbol}' to escape the {purpose}",
                purpose = begin.purpose(),
                symbol = begin.symbol()
            ),
            Self::AlternationNotAllowedInOptional => concat!(
                r"If you did not mean to use an alternation you can use '\/' to escape the '/'. ",
                "Otherwise rephrase your expression or consider using a regular expression instead."
            )
            .to_string(),
            Self::InvalidParameterTypeName => "Did you mean to use a regular expression?".to_string(),
            Self::AlternativeMayNotBeEmpty => {
                r"If you did not mean to use an alternative you can use '\/' to escape the '/'"
                    .to_string()
            }
            Self::AlternativeMayNotExclusivelyContainOptionals | Self::OptionalMayNotBeEmpty => {
                r"If you did not mean to use an optional you can use '\(' to escape the '('"
                    .to_string()
            }
            Self::ParameterIsNotAllowedInOptional => {
                r"If you did not mean to use an parameter type you can use '\{' to escape the '{'"
                    .to_string()
            }
            Self::OptionalIsNotAllowedInOptional => concat!(
                r"If you did not mean to use an optional type you can use '\(' to escape the '('. ",
                "For more complicated expressions consider using a regular expression instead."
            )
            .to_string(),
        }
    }
}

/// A tokenizer, parser or compiler failure with its location.
///
/// # Examples
/// ```
/// use cucumber_expressions::tokenize;
///
/// let err = tokenize(r"\q").expect_err("q cannot be escaped");
/// assert_eq!(err.start, 1);
/// assert!(err.to_string().starts_with("This Cucumber Expression has a problem at column 2:"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// What went wrong.
    pub kind: SyntaxErrorKind,
    /// The offending expression.
    pub expression: String,
    /// Inclusive start offset of the offending span.
    pub start: usize,
    /// Exclusive end offset of the offending span.
    pub end: usize,
}

impl SyntaxError {
    pub(crate) fn at(kind: SyntaxErrorKind, expression: &str, index: usize) -> Self {
        Self {
            kind,
            expression: expression.to_string(),
            start: index,
            end: index,
        }
    }

    pub(crate) fn spanning(
        kind: SyntaxErrorKind,
        expression: &str,
        located: &impl Located,
    ) -> Self {
        Self {
            kind,
            expression: expression.to_string(),
            start: located.start(),
            end: located.end(),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&problem_message(
            self.start,
            &self.expression,
            &point_at_span(self.start, self.end),
            &self.kind.problem(),
            &self.kind.solution(),
        ))
    }
}

impl std::error::Error for SyntaxError {}

fn problem_message(
    index: usize,
    expression: &str,
    pointer: &str,
    problem: &str,
    solution: &str,
) -> String {
    format!(
        "This Cucumber Expression has a problem at column {column}:\n\n{expression}\n{pointer}\n{problem}.\n{solution}",
        column = index + 1
    )
}

fn point_at(index: usize) -> String {
    format!("{}^", " ".repeat(index))
}

fn point_at_span(start: usize, end: usize) -> String {
    let mut pointer = point_at(start);
    if start + 1 < end {
        pointer.push_str(&"-".repeat(end - start - 2));
        pointer.push('^');
    }
    pointer
}

/// A `{name}` in an expression has no registered parameter type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndefinedParameterTypeError {
    /// The unknown type name.
    pub name: String,
    /// The expression it appeared in.
    pub expression: String,
    /// Inclusive start of the parameter node.
    pub start: usize,
    /// Exclusive end of the parameter node.
    pub end: usize,
}

impl UndefinedParameterTypeError {
    pub(crate) fn new(name: &str, expression: &str, located: &impl Located) -> Self {
        Self {
            name: name.to_string(),
            expression: expression.to_string(),
            start: located.start(),
            end: located.end(),
        }
    }
}

impl fmt::Display for UndefinedParameterTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&problem_message(
            self.start,
            &self.expression,
            &point_at_span(self.start, self.end),
            &format!("Undefined parameter type '{}'", self.name),
            &format!("Please register a ParameterType for '{}'", self.name),
        ))
    }
}

impl std::error::Error for UndefinedParameterTypeError {}

/// Several non-preferential parameter types share a capture group's regexp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousParameterTypeError {
    /// The shared capture-group regexp.
    pub parameter_type_regexp: String,
    /// The whole regular expression being matched.
    pub expression_regexp: String,
    /// Names of the competing parameter types, in registry order.
    pub parameter_type_names: Vec<String>,
    /// Cucumber expressions suggested for the sample text.
    pub generated_expressions: Vec<String>,
}

impl fmt::Display for AmbiguousParameterTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self
            .parameter_type_names
            .iter()
            .map(|name| format!("{{{name}}}"))
            .collect::<Vec<_>>()
            .join("\n   ");
        write!(
            f,
            "Your Regular Expression /{}/\n\
             matches multiple parameter types with regexp /{}/:\n   {names}\n\n\
             I couldn't decide which one to use. You have two options:\n\n\
             1) Use a Cucumber Expression instead of a Regular Expression. Try one of these:\n   {}\n\n\
             2) Make one of the parameter types preferential and continue to use a Regular Expression.",
            self.expression_regexp,
            self.parameter_type_regexp,
            self.generated_expressions.join("\n   ")
        )
    }
}

impl std::error::Error for AmbiguousParameterTypeError {}

/// Errors surfaced while compiling expressions, registering parameter types
/// or transforming matched arguments.
#[derive(Debug, Error)]
pub enum CucumberExpressionError {
    /// The expression is malformed.
    #[error("{0}")]
    Syntax(#[from] SyntaxError),
    /// A `{name}` refers to a parameter type that is not registered.
    #[error("{0}")]
    UndefinedParameterType(#[from] UndefinedParameterTypeError),
    /// A regular expression capture group matches several parameter types.
    #[error("{0}")]
    AmbiguousParameterType(#[from] AmbiguousParameterTypeError),
    /// A captured value could not be converted.
    #[error("{0}")]
    Transform(#[from] TransformError),
    /// A parameter type with the same name is already registered.
    #[error("There is already a parameter type with name {0}")]
    DuplicateParameterTypeName(String),
    /// The anonymous parameter type is registered twice.
    #[error("The anonymous parameter type has already been defined")]
    AnonymousParameterTypeAlreadyDefined,
    /// Two preferential parameter types share a regexp.
    #[error(
        "There can only be one preferential parameter type per regexp. The regexp /{regexp}/ is used for two preferential parameter types, {{{existing}}} and {{{added}}}"
    )]
    PreferentialParameterTypeConflict {
        /// The shared regexp.
        regexp: String,
        /// The preferential type already registered.
        existing: String,
        /// The preferential type being registered.
        added: String,
    },
    /// A parameter type name contains a reserved character.
    #[error(
        r"Illegal character in parameter name {{{0}}}. Parameter names may not contain '{{', '}}', '(', ')', '\' or '/'"
    )]
    InvalidParameterTypeName(String),
    /// A parameter type was declared without any regexp.
    #[error("Parameter type {{{0}}} must have at least one regexp")]
    MissingRegexps(String),
    /// The capture groups of a match do not line up with the parameter types.
    #[error("Group has {groups} capture groups, but there were {parameter_types} parameter types")]
    GroupCountMismatch {
        /// Top-level capture groups in the match.
        groups: usize,
        /// Parameter types expected by the expression.
        parameter_types: usize,
    },
    /// The synthesised or supplied pattern is not a valid regular expression.
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 1, "^")]
    #[case(2, 3, "  ^")]
    #[case(0, 2, "^^")]
    #[case(1, 5, " ^--^")]
    #[case(3, 3, "   ^")]
    fn draws_pointers(#[case] start: usize, #[case] end: usize, #[case] expected: &str) {
        assert_eq!(point_at_span(start, end), expected);
    }

    #[test]
    fn formats_cant_escape() {
        let err = SyntaxError::at(SyntaxErrorKind::CantEscape, r"\[", 1);
        assert_eq!(
            err.to_string(),
            concat!(
                "This Cucumber Expression has a problem at column 2:\n",
                "\n",
                "\\[\n",
                " ^\n",
                "Only the characters '{', '}', '(', ')', '\\', '/' and whitespace can be escaped.\n",
                "If you did mean to use an '\\' you can use '\\\\' to escape it"
            )
        );
    }

    #[test]
    fn formats_missing_end_token() {
        let err = SyntaxError {
            kind: SyntaxErrorKind::MissingEndToken {
                begin: TokenType::BeginParameter,
                end: TokenType::EndParameter,
            },
            expression: "{".into(),
            start: 0,
            end: 1,
        };
        assert_eq!(
            err.to_string(),
            concat!(
                "This Cucumber Expression has a problem at column 1:\n",
                "\n",
                "{\n",
                "^\n",
                "The '{' does not have a matching '}'.\n",
                "If you did not intend to use a parameter you can use '\\{' to escape the a parameter"
            )
        );
    }

    #[test]
    fn formats_undefined_parameter_type() {
        let err = UndefinedParameterTypeError {
            name: "unknown".into(),
            expression: "{unknown}".into(),
            start: 0,
            end: 9,
        };
        assert_eq!(
            err.to_string(),
            concat!(
                "This Cucumber Expression has a problem at column 1:\n",
                "\n",
                "{unknown}\n",
                "^-------^\n",
                "Undefined parameter type 'unknown'.\n",
                "Please register a ParameterType for 'unknown'"
            )
        );
    }

    #[test]
    fn formats_preferential_conflict() {
        let err = CucumberExpressionError::PreferentialParameterTypeConflict {
            regexp: "[a-z]+".into(),
            existing: "name".into(),
            added: "person".into(),
        };
        assert_eq!(
            err.to_string(),
            "There can only be one preferential parameter type per regexp. The regexp /[a-z]+/ is used for two preferential parameter types, {name} and {person}"
        );
    }

    #[test]
    fn formats_invalid_parameter_type_name() {
        let err = CucumberExpressionError::InvalidParameterTypeName("[string]".into());
        assert_eq!(
            err.to_string(),
            r"Illegal character in parameter name {[string]}. Parameter names may not contain '{', '}', '(', ')', '\' or '/'"
        );
    }

    #[test]
    fn formats_ambiguity() {
        let err = AmbiguousParameterTypeError {
            parameter_type_regexp: "[A-Z]+".into(),
            expression_regexp: "^([A-Z]+)$".into(),
            parameter_type_names: vec!["upper".into(), "shout".into()],
            generated_expressions: vec!["HELLO".into()],
        };
        assert_eq!(
            err.to_string(),
            concat!(
                "Your Regular Expression /^([A-Z]+)$/\n",
                "matches multiple parameter types with regexp /[A-Z]+/:\n",
                "   {upper}\n",
                "   {shout}\n",
                "\n",
                "I couldn't decide which one to use. You have two options:\n",
                "\n",
                "1) Use a Cucumber Expression instead of a Regular Expression. Try one of these:\n",
                "   HELLO\n",
                "\n",
                "2) Make one of the parameter types preferential and continue to use a Regular Expression."
            )
        );
    }
}
