//! Compilation of a syntax tree into an anchored regular expression.

use std::sync::Arc;

use crate::ast::{Node, NodeKind, NodeType};
use crate::errors::{CucumberExpressionError, SyntaxError, SyntaxErrorKind, UndefinedParameterTypeError};
use crate::parameter::{ParameterType, ParameterTypeRegistry};

/// Result of compiling an expression tree.
#[derive(Debug)]
pub(crate) struct Compiled {
    pub(crate) pattern: String,
    pub(crate) parameter_types: Vec<Arc<ParameterType>>,
}

/// Translate `ast` into regex source, binding each parameter by name.
///
/// Parameter types are collected left to right, matching the order of their
/// capture groups in the pattern.
pub(crate) fn compile(
    ast: &Node,
    expression: &str,
    registry: &ParameterTypeRegistry,
) -> Result<Compiled, CucumberExpressionError> {
    let mut compiler = Compiler {
        expression,
        registry,
        parameter_types: Vec::new(),
    };
    let pattern = compiler.rewrite(ast)?;
    Ok(Compiled {
        pattern,
        parameter_types: compiler.parameter_types,
    })
}

struct Compiler<'a> {
    expression: &'a str,
    registry: &'a ParameterTypeRegistry,
    parameter_types: Vec<Arc<ParameterType>>,
}

impl Compiler<'_> {
    fn rewrite(&mut self, node: &Node) -> Result<String, CucumberExpressionError> {
        match &node.kind {
            NodeKind::Text(text) => Ok(escape_regex(text)),
            NodeKind::Optional(children) => self.rewrite_optional(node, children),
            NodeKind::Alternation(alternatives) => self.rewrite_alternation(alternatives),
            NodeKind::Alternative(children) => self.rewrite_all(children, ""),
            NodeKind::Parameter(_) => self.rewrite_parameter(node),
            NodeKind::Expression(children) => Ok(format!("^{}$", self.rewrite_all(children, "")?)),
        }
    }

    fn rewrite_all(&mut self, nodes: &[Node], separator: &str) -> Result<String, CucumberExpressionError> {
        let parts = nodes
            .iter()
            .map(|node| self.rewrite(node))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parts.join(separator))
    }

    fn rewrite_optional(&mut self, node: &Node, children: &[Node]) -> Result<String, CucumberExpressionError> {
        if let Some(parameter) = first_of_type(children, NodeType::Parameter) {
            return Err(self.syntax_error(SyntaxErrorKind::ParameterIsNotAllowedInOptional, parameter));
        }
        if let Some(optional) = first_of_type(children, NodeType::Optional) {
            return Err(self.syntax_error(SyntaxErrorKind::OptionalIsNotAllowedInOptional, optional));
        }
        if first_of_type(children, NodeType::Text).is_none() {
            return Err(self.syntax_error(SyntaxErrorKind::OptionalMayNotBeEmpty, node));
        }
        Ok(format!("(?:{})?", self.rewrite_all(children, "")?))
    }

    fn rewrite_alternation(&mut self, alternatives: &[Node]) -> Result<String, CucumberExpressionError> {
        for alternative in alternatives {
            let children = alternative.children();
            if children.is_empty() {
                return Err(self.syntax_error(SyntaxErrorKind::AlternativeMayNotBeEmpty, alternative));
            }
            if first_of_type(children, NodeType::Text).is_none() {
                return Err(self.syntax_error(
                    SyntaxErrorKind::AlternativeMayNotExclusivelyContainOptionals,
                    alternative,
                ));
            }
        }
        Ok(format!("(?:{})", self.rewrite_all(alternatives, "|")?))
    }

    fn rewrite_parameter(&mut self, node: &Node) -> Result<String, CucumberExpressionError> {
        let name = node.text();
        let parameter_type = self
            .registry
            .lookup_by_name(&name)
            .ok_or_else(|| UndefinedParameterTypeError::new(&name, self.expression, node))?;
        let pattern = match parameter_type.regexps() {
            [single] => format!("({single})"),
            several => format!("((?:{}))", several.join(")|(?:")),
        };
        self.parameter_types.push(Arc::clone(parameter_type));
        Ok(pattern)
    }

    fn syntax_error(&self, kind: SyntaxErrorKind, node: &Node) -> CucumberExpressionError {
        SyntaxError::spanning(kind, self.expression, node).into()
    }
}

fn first_of_type(nodes: &[Node], node_type: NodeType) -> Option<&Node> {
    nodes.iter().find(|node| node.node_type() == node_type)
}

/// Escape the characters the regex syntax treats specially.
fn escape_regex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(
            ch,
            '\\' | '^' | '[' | '(' | '{' | '$' | '.' | '|' | '?' | '*' | '+' | '}' | ')' | ']'
        ) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
