//! Expands per-position parameter type choices into generated expressions.

use std::sync::Arc;

use super::GeneratedExpression;
use crate::parameter::ParameterType;

/// Depth-first cartesian product of `choices`, stopping at `limit` results.
pub(crate) fn generate(
    texts: &Arc<[String]>,
    choices: &[Vec<Arc<ParameterType>>],
    limit: usize,
) -> Vec<GeneratedExpression> {
    let mut generated = Vec::new();
    let mut current = Vec::with_capacity(choices.len());
    permute(texts, choices, limit, &mut current, &mut generated);
    generated
}

fn permute(
    texts: &Arc<[String]>,
    choices: &[Vec<Arc<ParameterType>>],
    limit: usize,
    current: &mut Vec<Arc<ParameterType>>,
    generated: &mut Vec<GeneratedExpression>,
) {
    if generated.len() >= limit {
        return;
    }
    let Some((position, rest)) = choices.split_first() else {
        generated.push(GeneratedExpression::new(Arc::clone(texts), current.clone()));
        return;
    };
    for parameter_type in position {
        if generated.len() >= limit {
            return;
        }
        current.push(Arc::clone(parameter_type));
        permute(texts, rest, limit, current, generated);
        current.pop();
    }
}
