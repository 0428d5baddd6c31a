//! Registry of parameter types, indexed by name and by regexp.

use hashbrown::HashMap;
use log::debug;
use std::sync::Arc;

use super::ParameterType;
use super::builtin::builtin_parameter_types;
use crate::errors::{AmbiguousParameterTypeError, CucumberExpressionError};
use crate::generator::CucumberExpressionGenerator;

/// Parameter types available to expressions.
///
/// A registry is built once, extended with custom types, and then read by
/// every expression compiled against it. Cloning takes a snapshot: later
/// definitions on either copy do not affect the other.
///
/// # Examples
/// ```
/// use cucumber_expressions::{ParameterType, ParameterTypeRegistry, TransformError, Value};
///
/// let mut registry = ParameterTypeRegistry::new();
/// let colour = ParameterType::new(
///     "colour",
///     ["red|blue"],
///     None,
///     |captures: &[Option<&str>]| -> Result<Value, TransformError> {
///         Ok(Value::from(captures.first().copied().flatten().unwrap_or_default()))
///     },
/// )
/// .expect("valid parameter type");
/// registry.define(colour).expect("colour is a new name");
/// assert!(registry.lookup_by_name("colour").is_some());
/// assert!(registry.define(ParameterType::new(
///     "int",
///     [r"\d+"],
///     None,
///     |_: &[Option<&str>]| -> Result<Value, TransformError> { Ok(Value::Absent) },
/// ).expect("valid parameter type")).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ParameterTypeRegistry {
    by_name: HashMap<String, Arc<ParameterType>>,
    by_regexp: HashMap<String, Vec<Arc<ParameterType>>>,
    defined: Vec<Arc<ParameterType>>,
}

impl Default for ParameterTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterTypeRegistry {
    /// A registry holding the built-in parameter types.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            by_name: HashMap::new(),
            by_regexp: HashMap::new(),
            defined: Vec::new(),
        };
        for parameter_type in builtin_parameter_types() {
            registry.insert(Arc::new(parameter_type));
        }
        registry
    }

    /// Register a parameter type.
    ///
    /// Nothing is modified when registration fails.
    ///
    /// # Errors
    /// Returns [`CucumberExpressionError::DuplicateParameterTypeName`] or
    /// [`CucumberExpressionError::AnonymousParameterTypeAlreadyDefined`] when
    /// the name is taken, and
    /// [`CucumberExpressionError::PreferentialParameterTypeConflict`] when the
    /// type is preferential and one of its regexps already has a
    /// preferential type.
    pub fn define(
        &mut self,
        parameter_type: ParameterType,
    ) -> Result<Arc<ParameterType>, CucumberExpressionError> {
        if self.by_name.contains_key(parameter_type.name()) {
            return Err(if parameter_type.name().is_empty() {
                CucumberExpressionError::AnonymousParameterTypeAlreadyDefined
            } else {
                CucumberExpressionError::DuplicateParameterTypeName(
                    parameter_type.name().to_string(),
                )
            });
        }
        if parameter_type.prefer_for_regexp_match() {
            for regexp in parameter_type.regexps() {
                let existing = self
                    .by_regexp
                    .get(regexp)
                    .and_then(|types| types.first())
                    .filter(|first| first.prefer_for_regexp_match());
                if let Some(existing) = existing {
                    return Err(CucumberExpressionError::PreferentialParameterTypeConflict {
                        regexp: regexp.clone(),
                        existing: existing.name().to_string(),
                        added: parameter_type.name().to_string(),
                    });
                }
            }
        }
        let parameter_type = Arc::new(parameter_type);
        self.insert(Arc::clone(&parameter_type));
        Ok(parameter_type)
    }

    fn insert(&mut self, parameter_type: Arc<ParameterType>) {
        debug!(
            "registering parameter type {{{}}} for {:?}",
            parameter_type.name(),
            parameter_type.regexps()
        );
        self.by_name
            .insert(parameter_type.name().to_string(), Arc::clone(&parameter_type));
        for regexp in parameter_type.regexps() {
            let bucket = self.by_regexp.entry(regexp.clone()).or_default();
            if bucket.iter().any(|t| Arc::ptr_eq(t, &parameter_type)) {
                continue;
            }
            bucket.push(Arc::clone(&parameter_type));
            bucket.sort_by(|a, b| a.compare(b));
        }
        self.defined.push(parameter_type);
    }

    /// The parameter type registered under `name`; `""` is the anonymous
    /// type.
    #[must_use]
    pub fn lookup_by_name(&self, name: &str) -> Option<&Arc<ParameterType>> {
        self.by_name.get(name)
    }

    /// The parameter type for a capture group of a regular expression.
    ///
    /// `expression_regexp` and `text` only feed the diagnostics of an
    /// ambiguity error. Returns `Ok(None)` when no type uses the regexp.
    ///
    /// # Errors
    /// Returns [`CucumberExpressionError::AmbiguousParameterType`] when
    /// several types share the regexp and none of them is preferential.
    pub fn lookup_by_regexp(
        &self,
        parameter_type_regexp: &str,
        expression_regexp: &str,
        text: &str,
    ) -> Result<Option<Arc<ParameterType>>, CucumberExpressionError> {
        let Some(candidates) = self.by_regexp.get(parameter_type_regexp) else {
            return Ok(None);
        };
        let Some(first) = candidates.first() else {
            return Ok(None);
        };
        if candidates.len() > 1 && !first.prefer_for_regexp_match() {
            debug!(
                "regexp /{parameter_type_regexp}/ is shared by {} parameter types",
                candidates.len()
            );
            let generated_expressions = CucumberExpressionGenerator::new(self)
                .generate_expressions(text)
                .iter()
                .map(|generated| generated.source())
                .collect();
            return Err(AmbiguousParameterTypeError {
                parameter_type_regexp: parameter_type_regexp.to_string(),
                expression_regexp: expression_regexp.to_string(),
                parameter_type_names: candidates.iter().map(|t| t.name().to_string()).collect(),
                generated_expressions,
            }
            .into());
        }
        Ok(Some(Arc::clone(first)))
    }

    /// Every registered parameter type in registration order.
    pub fn parameter_types(&self) -> impl Iterator<Item = &Arc<ParameterType>> {
        self.defined.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformer::{TransformError, Value};

    fn passthrough(captures: &[Option<&str>]) -> Result<Value, TransformError> {
        Ok(Value::from(captures.first().copied().flatten().unwrap_or_default()))
    }

    fn custom(name: &str, regexp: &str) -> ParameterType {
        ParameterType::new(name, [regexp], None, passthrough)
            .unwrap_or_else(|e| panic!("{name} should be valid: {e}"))
    }

    #[test]
    fn starts_with_builtins() {
        let registry = ParameterTypeRegistry::new();
        for name in ["int", "float", "word", "string", "biginteger", "bigdecimal", ""] {
            assert!(registry.lookup_by_name(name).is_some(), "missing {name:?}");
        }
        assert_eq!(registry.parameter_types().count(), 11);
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut registry = ParameterTypeRegistry::new();
        let err = registry
            .define(custom("word", "[a-z]+"))
            .err()
            .unwrap_or_else(|| panic!("word is taken"));
        assert_eq!(err.to_string(), "There is already a parameter type with name word");
    }

    #[test]
    fn rejects_second_anonymous_type() {
        let mut registry = ParameterTypeRegistry::new();
        let err = registry
            .define(custom("", "x"))
            .err()
            .unwrap_or_else(|| panic!("anonymous is taken"));
        assert!(matches!(
            err,
            CucumberExpressionError::AnonymousParameterTypeAlreadyDefined
        ));
    }

    #[test]
    fn rejects_second_preferential_type_without_side_effects() {
        let mut registry = ParameterTypeRegistry::new();
        registry
            .define(custom("name", "[A-Z]+\\w+").with_prefer_for_regexp_match(true))
            .unwrap_or_else(|e| panic!("first preferential type: {e}"));
        let err = registry
            .define(custom("person", "[A-Z]+\\w+").with_prefer_for_regexp_match(true))
            .err()
            .unwrap_or_else(|| panic!("second preferential type must fail"));
        assert_eq!(
            err.to_string(),
            "There can only be one preferential parameter type per regexp. The regexp /[A-Z]+\\w+/ is used for two preferential parameter types, {name} and {person}"
        );
        assert!(registry.lookup_by_name("person").is_none());
    }

    #[test]
    fn preferential_type_wins_regardless_of_order() {
        let mut registry = ParameterTypeRegistry::new();
        registry
            .define(custom("plain", "[a-z]+"))
            .unwrap_or_else(|e| panic!("{e}"));
        registry
            .define(custom("preferred", "[a-z]+").with_prefer_for_regexp_match(true))
            .unwrap_or_else(|e| panic!("{e}"));
        let found = registry
            .lookup_by_regexp("[a-z]+", "^([a-z]+)$", "abc")
            .unwrap_or_else(|e| panic!("{e}"))
            .unwrap_or_else(|| panic!("regexp is registered"));
        assert_eq!(found.name(), "preferred");
    }

    #[test]
    fn int_is_preferred_over_biginteger() {
        let registry = ParameterTypeRegistry::new();
        let found = registry
            .lookup_by_regexp(r"-?\d+", r"^(-?\d+)$", "12")
            .unwrap_or_else(|e| panic!("{e}"))
            .unwrap_or_else(|| panic!("integer regexp is registered"));
        assert_eq!(found.name(), "int");
    }

    #[test]
    fn unknown_regexp_is_none() {
        let registry = ParameterTypeRegistry::new();
        assert!(
            registry
                .lookup_by_regexp("[xyz]", "^([xyz])$", "x")
                .unwrap_or_else(|e| panic!("{e}"))
                .is_none()
        );
    }

    #[test]
    fn shared_float_regexp_is_ambiguous() {
        let registry = ParameterTypeRegistry::new();
        let err = registry
            .lookup_by_regexp(r"[-+]?\d*\.?\d+", r"^([-+]?\d*\.?\d+)$", "1.5")
            .err()
            .unwrap_or_else(|| panic!("float family shares one regexp"));
        let CucumberExpressionError::AmbiguousParameterType(ambiguity) = err else {
            panic!("expected an ambiguity error");
        };
        assert_eq!(
            ambiguity.parameter_type_names,
            ["float", "double", "byte", "short", "long", "bigdecimal"]
        );
        assert_eq!(ambiguity.generated_expressions, ["{float}"]);
    }

    #[test]
    fn clones_are_independent_snapshots() {
        let mut registry = ParameterTypeRegistry::new();
        let snapshot = registry.clone();
        registry
            .define(custom("colour", "red|blue"))
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(registry.lookup_by_name("colour").is_some());
        assert!(snapshot.lookup_by_name("colour").is_none());
    }
}
