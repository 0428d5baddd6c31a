//! Suggests Cucumber expressions for sample step text.
//!
//! The generator walks the text left to right. At each step it finds the
//! earliest (then longest) whole-word match among the snippet-enabled
//! parameter types, records every type tied for that match, and continues
//! after it. The recorded choices are then expanded into one expression per
//! combination, up to [`max_generated_expressions`].

mod combinatorial;
mod matcher;

use hashbrown::HashMap;
use std::sync::Arc;

use crate::config::max_generated_expressions;
use crate::parameter::{ParameterType, ParameterTypeRegistry};
use matcher::ParameterTypeMatcher;

/// Generates candidate expressions from the types in a registry.
#[derive(Debug, Clone, Copy)]
pub struct CucumberExpressionGenerator<'r> {
    registry: &'r ParameterTypeRegistry,
}

impl<'r> CucumberExpressionGenerator<'r> {
    /// Generator reading `registry`.
    #[must_use]
    pub const fn new(registry: &'r ParameterTypeRegistry) -> Self {
        Self { registry }
    }

    /// Candidate expressions for `text`, most specific choices first.
    ///
    /// # Examples
    /// ```
    /// use cucumber_expressions::{CucumberExpressionGenerator, ParameterTypeRegistry};
    ///
    /// let registry = ParameterTypeRegistry::new();
    /// let generated = CucumberExpressionGenerator::new(&registry)
    ///     .generate_expressions("I have 3 cukes");
    /// let sources: Vec<_> = generated.iter().map(|g| g.source()).collect();
    /// assert_eq!(sources, ["I have {int} cukes", "I have {float} cukes"]);
    /// ```
    #[must_use]
    pub fn generate_expressions(&self, text: &str) -> Vec<GeneratedExpression> {
        let matchers: Vec<ParameterTypeMatcher<'_>> = self
            .registry
            .parameter_types()
            .filter(|parameter_type| parameter_type.use_for_snippets())
            .flat_map(|parameter_type| ParameterTypeMatcher::for_type(parameter_type, text))
            .collect();

        let mut texts = Vec::new();
        let mut choices = Vec::new();
        let mut position = 0;
        loop {
            let mut candidates: Vec<_> = matchers
                .iter()
                .map(|matcher| matcher.advance_to(position))
                .filter(|matcher| matcher.found().is_some())
                .collect();
            candidates.sort_by(ParameterTypeMatcher::compare);
            let Some(((start, end), best)) = candidates
                .first()
                .and_then(|best| best.found().map(|found| (found, best)))
            else {
                break;
            };

            let mut tied: Vec<Arc<ParameterType>> = Vec::new();
            for candidate in candidates.iter().filter(|c| c.compare(best).is_eq()) {
                if !tied.iter().any(|t| Arc::ptr_eq(t, candidate.parameter_type())) {
                    tied.push(Arc::clone(candidate.parameter_type()));
                }
            }
            tied.sort_by(|a, b| a.compare(b));
            choices.push(tied);

            texts.push(escape(text.get(position..start).unwrap_or_default()));
            position = end;
            if position >= text.len() {
                break;
            }
        }
        texts.push(escape(text.get(position..).unwrap_or_default()));

        let texts: Arc<[String]> = texts.into();
        combinatorial::generate(&texts, &choices, max_generated_expressions())
    }
}

/// Candidate expressions for `text` using the types in `registry`.
#[must_use]
pub fn generate_expressions(text: &str, registry: &ParameterTypeRegistry) -> Vec<GeneratedExpression> {
    CucumberExpressionGenerator::new(registry).generate_expressions(text)
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '(' | '{' | '/') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Summary of one parameter of a [`GeneratedExpression`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    /// Declared type name of the parameter type, if any.
    pub type_name: Option<String>,
    /// Parameter type name.
    pub name: String,
    /// How many times this name has appeared so far, starting at one.
    pub count: usize,
}

/// An expression suggested by the generator together with its parameter
/// types.
#[derive(Debug, Clone)]
pub struct GeneratedExpression {
    texts: Arc<[String]>,
    parameter_types: Vec<Arc<ParameterType>>,
}

impl GeneratedExpression {
    pub(crate) fn new(texts: Arc<[String]>, parameter_types: Vec<Arc<ParameterType>>) -> Self {
        Self {
            texts,
            parameter_types,
        }
    }

    /// The expression text.
    #[must_use]
    pub fn source(&self) -> String {
        let mut texts = self.texts.iter();
        let mut source = texts.next().cloned().unwrap_or_default();
        for (parameter_type, text) in self.parameter_types.iter().zip(texts) {
            source.push('{');
            source.push_str(parameter_type.name());
            source.push('}');
            source.push_str(text);
        }
        source
    }

    /// Parameter types in the order they appear.
    #[must_use]
    pub fn parameter_types(&self) -> &[Arc<ParameterType>] {
        &self.parameter_types
    }

    /// Argument names for a step definition: the type name, suffixed with
    /// its occurrence count from the second occurrence on.
    ///
    /// # Examples
    /// ```
    /// use cucumber_expressions::{generate_expressions, ParameterTypeRegistry};
    ///
    /// let registry = ParameterTypeRegistry::new();
    /// let generated = generate_expressions("1 and 2", &registry);
    /// let first = generated.first().expect("at least one suggestion");
    /// assert_eq!(first.parameter_names(), ["int", "int2"]);
    /// ```
    #[must_use]
    pub fn parameter_names(&self) -> Vec<String> {
        self.parameter_infos()
            .into_iter()
            .map(|info| {
                if info.count == 1 {
                    info.name
                } else {
                    format!("{}{}", info.name, info.count)
                }
            })
            .collect()
    }

    /// Type name, name and running count of each parameter.
    #[must_use]
    pub fn parameter_infos(&self) -> Vec<ParameterInfo> {
        let mut usage: HashMap<&str, usize> = HashMap::new();
        self.parameter_types
            .iter()
            .map(|parameter_type| {
                let count = usage.entry(parameter_type.name()).or_insert(0);
                *count += 1;
                ParameterInfo {
                    type_name: parameter_type.type_name().map(str::to_string),
                    name: parameter_type.name().to_string(),
                    count: *count,
                }
            })
            .collect()
    }
}
