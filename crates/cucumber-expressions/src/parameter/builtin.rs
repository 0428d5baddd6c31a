//! The parameter types every registry starts with.

use std::sync::Arc;

use super::ParameterType;
use crate::transformer::{KindTransformer, TransformError, Value, ValueKind};

pub(crate) const INTEGER_REGEXPS: [&str; 2] = [r"-?\d+", r"\d+"];
pub(crate) const FLOAT_REGEXP: &str = r"[-+]?\d*\.?\d+";
pub(crate) const WORD_REGEXP: &str = r"[^\s]+";
pub(crate) const STRING_REGEXP: &str = r#""([^"\\]*(\\.[^"\\]*)*)"|'([^'\\]*(\\.[^'\\]*)*)'"#;
pub(crate) const ANONYMOUS_REGEXP: &str = ".*";

struct Builtin {
    name: &'static str,
    regexps: &'static [&'static str],
    type_name: &'static str,
    kind: ValueKind,
    use_for_snippets: bool,
    prefer_for_regexp_match: bool,
}

// `long` keeps its 64-bit transform under the `i32` type name.
const BUILTINS: [Builtin; 9] = [
    Builtin {
        name: "int",
        regexps: &INTEGER_REGEXPS,
        type_name: "i32",
        kind: ValueKind::I32,
        use_for_snippets: true,
        prefer_for_regexp_match: true,
    },
    Builtin {
        name: "biginteger",
        regexps: &INTEGER_REGEXPS,
        type_name: "BigInt",
        kind: ValueKind::BigInteger,
        use_for_snippets: false,
        prefer_for_regexp_match: false,
    },
    Builtin {
        name: "float",
        regexps: &[FLOAT_REGEXP],
        type_name: "f32",
        kind: ValueKind::F32,
        use_for_snippets: true,
        prefer_for_regexp_match: false,
    },
    Builtin {
        name: "double",
        regexps: &[FLOAT_REGEXP],
        type_name: "f64",
        kind: ValueKind::F64,
        use_for_snippets: false,
        prefer_for_regexp_match: false,
    },
    Builtin {
        name: "byte",
        regexps: &[FLOAT_REGEXP],
        type_name: "i8",
        kind: ValueKind::I8,
        use_for_snippets: false,
        prefer_for_regexp_match: false,
    },
    Builtin {
        name: "short",
        regexps: &[FLOAT_REGEXP],
        type_name: "i16",
        kind: ValueKind::I16,
        use_for_snippets: false,
        prefer_for_regexp_match: false,
    },
    Builtin {
        name: "long",
        regexps: &[FLOAT_REGEXP],
        type_name: "i32",
        kind: ValueKind::I64,
        use_for_snippets: false,
        prefer_for_regexp_match: false,
    },
    Builtin {
        name: "bigdecimal",
        regexps: &[FLOAT_REGEXP],
        type_name: "BigDecimal",
        kind: ValueKind::BigDecimal,
        use_for_snippets: false,
        prefer_for_regexp_match: false,
    },
    Builtin {
        name: "word",
        regexps: &[WORD_REGEXP],
        type_name: "String",
        kind: ValueKind::String,
        use_for_snippets: false,
        prefer_for_regexp_match: false,
    },
];

/// Built-in parameter types in registration order.
pub(crate) fn builtin_parameter_types() -> Vec<ParameterType> {
    let mut types: Vec<ParameterType> = BUILTINS
        .iter()
        .map(|builtin| {
            ParameterType::from_parts(
                builtin.name.to_string(),
                builtin.regexps.iter().map(|r| (*r).to_string()).collect(),
                Some(builtin.type_name),
                Arc::new(KindTransformer(builtin.kind)),
            )
            .with_use_for_snippets(builtin.use_for_snippets)
            .with_prefer_for_regexp_match(builtin.prefer_for_regexp_match)
        })
        .collect();
    types.push(ParameterType::from_parts(
        "string".to_string(),
        vec![STRING_REGEXP.to_string()],
        Some("String"),
        Arc::new(transform_quoted_string),
    ));
    types.push(ParameterType::anonymous(ANONYMOUS_REGEXP));
    types
}

/// Pick whichever quote style matched and unescape its quotes.
fn transform_quoted_string(captures: &[Option<&str>]) -> Result<Value, TransformError> {
    let double = captures.first().copied().flatten();
    let single = captures.get(1).copied().flatten();
    let Some(text) = double.or(single) else {
        return Ok(Value::Absent);
    };
    Ok(Value::String(
        text.replace("\\\"", "\"").replace("\\'", "'"),
    ))
}
