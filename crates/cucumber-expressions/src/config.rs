//! Runtime configuration for expression generation.
//!
//! The only knob is the cap on how many expressions the generator emits
//! for one piece of text, since the combinations grow multiplicatively with
//! every ambiguous parameter position.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Cap used when neither an override nor the environment sets one.
pub const DEFAULT_MAX_GENERATED_EXPRESSIONS: usize = 256;

const ENV_MAX_GENERATED: &str = "CUCUMBER_EXPRESSIONS_MAX_GENERATED";
const OVERRIDE_UNSET: usize = 0;

static MAX_GENERATED_OVERRIDE: AtomicUsize = AtomicUsize::new(OVERRIDE_UNSET);

fn parse_env_limit(value: &str) -> Option<usize> {
    value.trim().parse().ok().filter(|limit| *limit > 0)
}

fn env_max_generated() -> Option<usize> {
    std::env::var(ENV_MAX_GENERATED)
        .ok()
        .as_deref()
        .and_then(parse_env_limit)
}

fn override_state() -> Option<usize> {
    match MAX_GENERATED_OVERRIDE.load(Ordering::Relaxed) {
        OVERRIDE_UNSET => None,
        limit => Some(limit),
    }
}

/// Maximum number of expressions the generator returns.
///
/// Resolution order: in-process override, then
/// `CUCUMBER_EXPRESSIONS_MAX_GENERATED`, then
/// [`DEFAULT_MAX_GENERATED_EXPRESSIONS`].
#[must_use]
pub fn max_generated_expressions() -> usize {
    override_state()
        .or_else(env_max_generated)
        .unwrap_or(DEFAULT_MAX_GENERATED_EXPRESSIONS)
}

/// Override the generator cap for the current process. Zero clears it.
pub fn set_max_generated_expressions(limit: usize) {
    MAX_GENERATED_OVERRIDE.store(limit, Ordering::Relaxed);
}

/// Remove any in-process override of the generator cap.
pub fn clear_max_generated_expressions_override() {
    MAX_GENERATED_OVERRIDE.store(OVERRIDE_UNSET, Ordering::Relaxed);
}
