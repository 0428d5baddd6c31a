//! Chooses between Cucumber and regular expressions from the source text.

use crate::errors::CucumberExpressionError;
use crate::expression::{CucumberExpression, Expression};
use crate::parameter::ParameterTypeRegistry;
use crate::regular_expression::RegularExpression;

/// Creates expressions against a shared registry.
///
/// Sources anchored with `^` or `$` are regular expressions, as are sources
/// wrapped in `/…/` (the slashes are dropped). Anything else is a Cucumber
/// expression.
///
/// # Examples
/// ```
/// use cucumber_expressions::{Expression, ExpressionFactory, ParameterTypeRegistry};
///
/// let registry = ParameterTypeRegistry::new();
/// let factory = ExpressionFactory::new(&registry);
/// let regular = factory.create_expression("/^a (\\d+)$/").expect("valid regex");
/// assert_eq!(regular.source(), "^a (\\d+)$");
/// let cucumber = factory.create_expression("a {int}").expect("valid expression");
/// assert_eq!(cucumber.pattern(), r"^a ((?:-?\d+)|(?:\d+))$");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ExpressionFactory<'r> {
    registry: &'r ParameterTypeRegistry,
}

impl<'r> ExpressionFactory<'r> {
    /// Factory resolving parameters in `registry`.
    #[must_use]
    pub const fn new(registry: &'r ParameterTypeRegistry) -> Self {
        Self { registry }
    }

    /// Build the expression `source` describes.
    ///
    /// # Errors
    /// Propagates the errors of [`CucumberExpression::new`] and
    /// [`RegularExpression::new`].
    pub fn create_expression(&self, source: &str) -> Result<Box<dyn Expression>, CucumberExpressionError> {
        if source.starts_with('^') || source.ends_with('$') {
            return Ok(Box::new(RegularExpression::new(source, self.registry)?));
        }
        if let Some(inner) = strip_slashes(source) {
            return Ok(Box::new(RegularExpression::new(inner, self.registry)?));
        }
        Ok(Box::new(CucumberExpression::new(source, self.registry)?))
    }
}

fn strip_slashes(source: &str) -> Option<&str> {
    source.strip_prefix('/')?.strip_suffix('/')
}
