//! Cucumber Expressions for Rust.
//!
//! A Cucumber expression such as `I have {int} cuke(s)` is tokenized,
//! parsed into a syntax tree and compiled into an anchored regular
//! expression. Parameters resolve through a [`ParameterTypeRegistry`] and
//! matching step text yields typed [`Argument`]s. The crate also generates
//! candidate expressions from sample text and accepts raw regular
//! expressions through the same [`Expression`] trait.
//!
//! ```
//! use cucumber_expressions::{CucumberExpression, Expression, ParameterTypeRegistry, Value};
//!
//! let registry = ParameterTypeRegistry::new();
//! let expression = CucumberExpression::new("{word} has {float} apples", &registry)
//!     .expect("expression compiles");
//! let arguments = expression
//!     .match_text("Alice has 2.5 apples")
//!     .expect("no lookup errors")
//!     .expect("text matches");
//! assert_eq!(arguments[0].value(), Ok(Value::from("Alice")));
//! assert_eq!(arguments[1].value(), Ok(Value::F32(2.5)));
//! ```

mod argument;
mod ast;
pub mod config;
mod errors;
mod expression;
mod expression_factory;
mod generator;
mod parameter;
mod regular_expression;
mod transformer;
mod tree_regexp;

pub use argument::Argument;
pub use ast::{Located, Node, NodeKind, NodeType, Token, TokenType};
pub use errors::{
    AmbiguousParameterTypeError, CucumberExpressionError, SyntaxError, SyntaxErrorKind,
    UndefinedParameterTypeError,
};
pub use expression::parser::parse;
pub use expression::tokenizer::tokenize;
pub use expression::{CucumberExpression, Expression};
pub use expression_factory::ExpressionFactory;
pub use generator::{
    CucumberExpressionGenerator, GeneratedExpression, ParameterInfo, generate_expressions,
};
pub use parameter::{ParameterType, ParameterTypeRegistry};
pub use regular_expression::RegularExpression;
pub use transformer::{
    KindTransformer, TransformError, Transformer, UnsupportedValueKind, Value, ValueKind,
    transform_to_kind, transform_with_hint,
};
pub use tree_regexp::{Group, TreeRegexp};
