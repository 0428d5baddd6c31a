//! Arguments extracted from a successful match.

use std::sync::{Arc, OnceLock};

use crate::errors::CucumberExpressionError;
use crate::parameter::ParameterType;
use crate::transformer::{TransformError, Value, transform_with_hint};
use crate::tree_regexp::{Group, TreeRegexp};

/// One matched parameter: its capture group and the type that converts it.
///
/// The value is computed on first access and cached.
#[derive(Debug)]
pub struct Argument {
    group: Group,
    parameter_type: Arc<ParameterType>,
    hint: Option<String>,
    value: OnceLock<Result<Value, TransformError>>,
}

impl Argument {
    /// Match `text` and pair each top-level group with its parameter type.
    ///
    /// `hints` are positional and only apply to anonymous parameter types.
    pub(crate) fn build(
        tree_regexp: &TreeRegexp,
        text: &str,
        parameter_types: &[Arc<ParameterType>],
        hints: &[&str],
    ) -> Result<Option<Vec<Self>>, CucumberExpressionError> {
        let Some(root) = tree_regexp.match_text(text) else {
            return Ok(None);
        };
        if root.children.len() != parameter_types.len() {
            return Err(CucumberExpressionError::GroupCountMismatch {
                groups: root.children.len(),
                parameter_types: parameter_types.len(),
            });
        }
        let arguments = root
            .children
            .into_iter()
            .zip(parameter_types)
            .enumerate()
            .map(|(index, (group, parameter_type))| Self {
                group,
                parameter_type: Arc::clone(parameter_type),
                hint: hints
                    .get(index)
                    .filter(|_| parameter_type.is_anonymous())
                    .map(|hint| (*hint).to_string()),
                value: OnceLock::new(),
            })
            .collect();
        Ok(Some(arguments))
    }

    /// The capture group backing this argument.
    #[must_use]
    pub const fn group(&self) -> &Group {
        &self.group
    }

    /// The parameter type bound to this argument.
    #[must_use]
    pub fn parameter_type(&self) -> &ParameterType {
        &self.parameter_type
    }

    /// The type hint applied to an anonymous parameter, if any.
    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// The transformed value.
    ///
    /// Anonymous parameters read the whole group's text, through the
    /// built-in transformer for their hint when one is given. Named types
    /// use their own transformer over [`Group::values`].
    ///
    /// # Errors
    /// Returns [`TransformError`] when the captured text cannot be
    /// converted.
    pub fn value(&self) -> Result<Value, TransformError> {
        self.value
            .get_or_init(|| {
                let text = self.group.value.as_deref();
                match self.hint.as_deref() {
                    Some(hint) => transform_with_hint(text, hint),
                    None if self.parameter_type.is_anonymous() => {
                        self.parameter_type.transform(&[text])
                    }
                    None => self.parameter_type.transform(&self.group.values()),
                }
            })
            .clone()
    }
}
