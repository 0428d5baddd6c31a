//! Typed values produced from captured text, and the transformers that
//! produce them.
//!
//! A [`Transformer`] turns the captures of one parameter into a [`Value`].
//! The built-in transformer covers a closed set of [`ValueKind`]s and backs
//! both the built-in parameter types and type hints for anonymous
//! parameters.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while converting captured text into a [`Value`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// The text does not parse as the requested kind.
    #[error("Can't transform '{value}' to {kind}: {reason}")]
    Parse {
        /// The captured text.
        value: String,
        /// The requested kind.
        kind: ValueKind,
        /// The parser's explanation.
        reason: String,
    },
    /// The requested type is not one the built-in transformer knows.
    #[error(
        "Can't transform '{value}' to {target}. BuiltInParameterTransformer only supports a limited number of types. Consider using a different object mapper or register a parameter type for {target}"
    )]
    Unsupported {
        /// The captured text.
        value: String,
        /// The requested type name.
        target: String,
    },
    /// A transformer received fewer captures than it needs.
    #[error("Expected at least {expected} capture(s) but received {actual}")]
    MissingCapture {
        /// Captures the transformer requires.
        expected: usize,
        /// Captures actually supplied.
        actual: usize,
    },
    /// A user-supplied transformer failed.
    #[error("{0}")]
    Custom(String),
}

impl TransformError {
    /// Build an error for a user-supplied transformer.
    #[must_use]
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

/// The closed set of target kinds understood by the built-in transformer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Raw captured text.
    String,
    /// `true`/`false` and their short forms.
    Bool,
    /// Signed 8-bit integer.
    I8,
    /// Signed 16-bit integer.
    I16,
    /// Signed 32-bit integer.
    I32,
    /// Signed 64-bit integer.
    I64,
    /// Unsigned 8-bit integer.
    U8,
    /// Unsigned 16-bit integer.
    U16,
    /// Unsigned 32-bit integer.
    U32,
    /// Unsigned 64-bit integer.
    U64,
    /// Single-precision float.
    F32,
    /// Double-precision float.
    F64,
    /// Arbitrary-precision integer.
    BigInteger,
    /// Arbitrary-precision decimal.
    BigDecimal,
}

impl ValueKind {
    /// Canonical name, accepted back by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::BigInteger => "BigInt",
            Self::BigDecimal => "BigDecimal",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a type-hint name does not denote a [`ValueKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported value kind: {0}")]
pub struct UnsupportedValueKind(pub String);

impl FromStr for ValueKind {
    type Err = UnsupportedValueKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "String" | "string" | "str" => Ok(Self::String),
            "bool" | "boolean" => Ok(Self::Bool),
            "i8" | "byte" => Ok(Self::I8),
            "i16" | "short" => Ok(Self::I16),
            "i32" | "int" => Ok(Self::I32),
            "i64" | "long" => Ok(Self::I64),
            "u8" => Ok(Self::U8),
            "u16" => Ok(Self::U16),
            "u32" => Ok(Self::U32),
            "u64" => Ok(Self::U64),
            "f32" | "float" => Ok(Self::F32),
            "f64" | "double" => Ok(Self::F64),
            "BigInt" | "biginteger" => Ok(Self::BigInteger),
            "BigDecimal" | "bigdecimal" => Ok(Self::BigDecimal),
            other => Err(UnsupportedValueKind(other.to_string())),
        }
    }
}

/// A value produced by transforming captured text.
#[derive(Clone)]
pub enum Value {
    /// None of the parameter's capture groups participated in the match.
    Absent,
    /// Text.
    String(String),
    /// Boolean.
    Bool(bool),
    /// Signed 8-bit integer.
    I8(i8),
    /// Signed 16-bit integer.
    I16(i16),
    /// Signed 32-bit integer.
    I32(i32),
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 8-bit integer.
    U8(u8),
    /// Unsigned 16-bit integer.
    U16(u16),
    /// Unsigned 32-bit integer.
    U32(u32),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// Single-precision float.
    F32(f32),
    /// Double-precision float.
    F64(f64),
    /// Arbitrary-precision integer.
    BigInteger(BigInt),
    /// Arbitrary-precision decimal.
    BigDecimal(BigDecimal),
    /// A value of a user-defined type produced by a custom transformer.
    Custom(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Wrap a user-defined value.
    ///
    /// # Examples
    /// ```
    /// use cucumber_expressions::Value;
    ///
    /// #[derive(Debug, PartialEq)]
    /// struct Colour(&'static str);
    ///
    /// let value = Value::custom(Colour("red"));
    /// assert_eq!(value.downcast_ref::<Colour>(), Some(&Colour("red")));
    /// ```
    #[must_use]
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        Self::Custom(Arc::new(value))
    }

    /// Borrow a user-defined value of type `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Custom(inner) => inner.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// The text of a [`Value::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Any signed or unsigned integer that fits in an `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I8(v) => Some(i64::from(*v)),
            Self::I16(v) => Some(i64::from(*v)),
            Self::I32(v) => Some(i64::from(*v)),
            Self::I64(v) => Some(*v),
            Self::U8(v) => Some(i64::from(*v)),
            Self::U16(v) => Some(i64::from(*v)),
            Self::U32(v) => Some(i64::from(*v)),
            Self::U64(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Either float width, widened to `f64`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F32(v) => Some(f64::from(*v)),
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Whether no capture participated in the match.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("Absent"),
            Self::String(v) => f.debug_tuple("String").field(v).finish(),
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::I8(v) => f.debug_tuple("I8").field(v).finish(),
            Self::I16(v) => f.debug_tuple("I16").field(v).finish(),
            Self::I32(v) => f.debug_tuple("I32").field(v).finish(),
            Self::I64(v) => f.debug_tuple("I64").field(v).finish(),
            Self::U8(v) => f.debug_tuple("U8").field(v).finish(),
            Self::U16(v) => f.debug_tuple("U16").field(v).finish(),
            Self::U32(v) => f.debug_tuple("U32").field(v).finish(),
            Self::U64(v) => f.debug_tuple("U64").field(v).finish(),
            Self::F32(v) => f.debug_tuple("F32").field(v).finish(),
            Self::F64(v) => f.debug_tuple("F64").field(v).finish(),
            Self::BigInteger(v) => f.debug_tuple("BigInteger").field(v).finish(),
            Self::BigDecimal(v) => f.debug_tuple("BigDecimal").field(v).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

// Custom values compare by identity; everything else by value.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Absent, Self::Absent) => true,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::U8(a), Self::U8(b)) => a == b,
            (Self::U16(a), Self::U16(b)) => a == b,
            (Self::U32(a), Self::U32(b)) => a == b,
            (Self::U64(a), Self::U64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a == b,
            (Self::F64(a), Self::F64(b)) => a == b,
            (Self::BigInteger(a), Self::BigInteger(b)) => a == b,
            (Self::BigDecimal(a), Self::BigDecimal(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Converts the captures of one parameter into a [`Value`].
///
/// Captures are positional; `None` marks a group that did not participate
/// in the match. Any `Fn(&[Option<&str>]) -> Result<Value, TransformError>`
/// closure that is `Send + Sync` implements this trait.
pub trait Transformer: Send + Sync {
    /// Transform the captures.
    ///
    /// # Errors
    /// Returns [`TransformError`] when the captures cannot be converted.
    fn transform(&self, captures: &[Option<&str>]) -> Result<Value, TransformError>;
}

impl<F> Transformer for F
where
    F: Fn(&[Option<&str>]) -> Result<Value, TransformError> + Send + Sync,
{
    fn transform(&self, captures: &[Option<&str>]) -> Result<Value, TransformError> {
        self(captures)
    }
}

/// Transformer converting the first capture into a fixed [`ValueKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindTransformer(pub ValueKind);

impl Transformer for KindTransformer {
    fn transform(&self, captures: &[Option<&str>]) -> Result<Value, TransformError> {
        transform_to_kind(captures.first().copied().flatten(), self.0)
    }
}

/// Convert a type-hint name and captured text into a [`Value`].
///
/// # Errors
/// Returns [`TransformError::Unsupported`] when `hint` names no
/// [`ValueKind`], and [`TransformError::Parse`] when the text does not
/// parse.
///
/// # Examples
/// ```
/// use cucumber_expressions::{transform_with_hint, Value};
///
/// assert_eq!(transform_with_hint(Some("42"), "u8"), Ok(Value::U8(42)));
/// assert!(transform_with_hint(Some("42"), "Duration").is_err());
/// ```
pub fn transform_with_hint(value: Option<&str>, hint: &str) -> Result<Value, TransformError> {
    let kind = hint.parse::<ValueKind>().map_err(|_| TransformError::Unsupported {
        value: value.unwrap_or_default().to_string(),
        target: hint.to_string(),
    })?;
    transform_to_kind(value, kind)
}

/// Convert captured text into a [`Value`] of the requested kind.
///
/// An absent capture yields [`Value::Absent`].
///
/// # Errors
/// Returns [`TransformError::Parse`] when the text does not parse.
pub fn transform_to_kind(value: Option<&str>, kind: ValueKind) -> Result<Value, TransformError> {
    let Some(text) = value else {
        return Ok(Value::Absent);
    };
    let parse_error = |reason: String| TransformError::Parse {
        value: text.to_string(),
        kind,
        reason,
    };
    match kind {
        ValueKind::String => Ok(Value::String(text.to_string())),
        ValueKind::Bool => parse_bool(text)
            .map(Value::Bool)
            .ok_or_else(|| parse_error("invalid syntax".to_string())),
        ValueKind::I8 => text.parse().map(Value::I8).map_err(|e| parse_error(e.to_string())),
        ValueKind::I16 => text.parse().map(Value::I16).map_err(|e| parse_error(e.to_string())),
        ValueKind::I32 => text.parse().map(Value::I32).map_err(|e| parse_error(e.to_string())),
        ValueKind::I64 => text.parse().map(Value::I64).map_err(|e| parse_error(e.to_string())),
        ValueKind::U8 => text.parse().map(Value::U8).map_err(|e| parse_error(e.to_string())),
        ValueKind::U16 => text.parse().map(Value::U16).map_err(|e| parse_error(e.to_string())),
        ValueKind::U32 => text.parse().map(Value::U32).map_err(|e| parse_error(e.to_string())),
        ValueKind::U64 => text.parse().map(Value::U64).map_err(|e| parse_error(e.to_string())),
        ValueKind::F32 => text.parse().map(Value::F32).map_err(|e| parse_error(e.to_string())),
        ValueKind::F64 => text.parse().map(Value::F64).map_err(|e| parse_error(e.to_string())),
        ValueKind::BigInteger => BigInt::from_str(text)
            .map(Value::BigInteger)
            .map_err(|e| parse_error(e.to_string())),
        ValueKind::BigDecimal => BigDecimal::from_str(text)
            .map(Value::BigDecimal)
            .map_err(|e| parse_error(e.to_string())),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
