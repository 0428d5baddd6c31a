//! Token and syntax-tree types shared by the tokenizer, parser and compiler.
//!
//! Offsets on both [`Token`] and [`Node`] are zero-based character (code
//! point) indices into the original expression, including any escape
//! characters. Error messages rely on them to draw column pointers.

use std::fmt;

pub(crate) const ESCAPE_CHARACTER: char = '\\';
pub(crate) const ALTERNATION_CHARACTER: char = '/';
pub(crate) const BEGIN_PARAMETER_CHARACTER: char = '{';
pub(crate) const END_PARAMETER_CHARACTER: char = '}';
pub(crate) const BEGIN_OPTIONAL_CHARACTER: char = '(';
pub(crate) const END_OPTIONAL_CHARACTER: char = ')';

/// Anything with a span in the source expression.
pub trait Located {
    /// Inclusive start offset.
    fn start(&self) -> usize;
    /// Exclusive end offset.
    fn end(&self) -> usize;
}

/// Lexical category of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// Synthetic token emitted before the first real token.
    StartOfLine,
    /// Synthetic token emitted after the last real token.
    EndOfLine,
    /// A run of whitespace.
    WhiteSpace,
    /// `(`
    BeginOptional,
    /// `)`
    EndOptional,
    /// `{`
    BeginParameter,
    /// `}`
    EndParameter,
    /// `/`
    Alternation,
    /// A run of literal characters, escapes already resolved.
    Text,
}

impl TokenType {
    /// Classify an unescaped character.
    #[must_use]
    pub fn of(ch: char) -> Self {
        match ch {
            ALTERNATION_CHARACTER => Self::Alternation,
            BEGIN_PARAMETER_CHARACTER => Self::BeginParameter,
            END_PARAMETER_CHARACTER => Self::EndParameter,
            BEGIN_OPTIONAL_CHARACTER => Self::BeginOptional,
            END_OPTIONAL_CHARACTER => Self::EndOptional,
            c if c.is_whitespace() => Self::WhiteSpace,
            _ => Self::Text,
        }
    }

    /// Whether `ch` may follow a backslash.
    #[must_use]
    pub fn can_escape(ch: char) -> bool {
        ch.is_whitespace()
            || matches!(
                ch,
                ESCAPE_CHARACTER
                    | ALTERNATION_CHARACTER
                    | BEGIN_PARAMETER_CHARACTER
                    | END_PARAMETER_CHARACTER
                    | BEGIN_OPTIONAL_CHARACTER
                    | END_OPTIONAL_CHARACTER
            )
    }

    /// The character a bracket-like token stands for, or `""`.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::BeginOptional => "(",
            Self::EndOptional => ")",
            Self::BeginParameter => "{",
            Self::EndParameter => "}",
            Self::Alternation => "/",
            Self::StartOfLine | Self::EndOfLine | Self::WhiteSpace | Self::Text => "",
        }
    }

    /// Human-readable purpose used in "missing end token" messages.
    #[must_use]
    pub const fn purpose(self) -> &'static str {
        match self {
            Self::BeginOptional | Self::EndOptional => "optional text",
            Self::BeginParameter | Self::EndParameter => "a parameter",
            Self::Alternation => "alternation",
            Self::StartOfLine | Self::EndOfLine | Self::WhiteSpace | Self::Text => "",
        }
    }

    /// Upper snake case name used by the shared acceptance corpus.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StartOfLine => "START_OF_LINE",
            Self::EndOfLine => "END_OF_LINE",
            Self::WhiteSpace => "WHITE_SPACE",
            Self::BeginOptional => "BEGIN_OPTIONAL",
            Self::EndOptional => "END_OPTIONAL",
            Self::BeginParameter => "BEGIN_PARAMETER",
            Self::EndParameter => "END_PARAMETER",
            Self::Alternation => "ALTERNATION",
            Self::Text => "TEXT",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lexical token produced by [`tokenize`](crate::tokenize).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Lexical category.
    pub token_type: TokenType,
    /// Token text with escapes resolved.
    pub text: String,
    /// Source text covered by the token, escapes included.
    pub escaped_text: String,
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl Located for Token {
    fn start(&self) -> usize {
        self.start
    }

    fn end(&self) -> usize {
        self.end
    }
}

/// Discriminant of a [`Node`], named as in the shared acceptance corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// Literal text.
    Text,
    /// `( ... )`
    Optional,
    /// `a/b/c`
    Alternation,
    /// One branch of an alternation.
    Alternative,
    /// `{name}`
    Parameter,
    /// The root node.
    Expression,
}

impl NodeType {
    /// Upper snake case name used by the shared acceptance corpus.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "TEXT_NODE",
            Self::Optional => "OPTIONAL_NODE",
            Self::Alternation => "ALTERNATION_NODE",
            Self::Alternative => "ALTERNATIVE_NODE",
            Self::Parameter => "PARAMETER_NODE",
            Self::Expression => "EXPRESSION_NODE",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a syntax tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Literal text.
    Text(String),
    /// Optional text; children are text nodes (nested optionals and
    /// parameters parse but are rejected by the compiler).
    Optional(Vec<Node>),
    /// Children are [`NodeKind::Alternative`] nodes.
    Alternation(Vec<Node>),
    /// One branch of an alternation.
    Alternative(Vec<Node>),
    /// The parameter type name as text children; empty for `{}`.
    Parameter(Vec<Node>),
    /// Root node.
    Expression(Vec<Node>),
}

/// A node of the parsed expression tree.
///
/// Parents own their children; `start`/`end` of a composite node span the
/// delimiters that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Node payload.
    pub kind: NodeKind,
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }

    /// The discriminant of this node.
    #[must_use]
    pub const fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::Text(_) => NodeType::Text,
            NodeKind::Optional(_) => NodeType::Optional,
            NodeKind::Alternation(_) => NodeType::Alternation,
            NodeKind::Alternative(_) => NodeType::Alternative,
            NodeKind::Parameter(_) => NodeType::Parameter,
            NodeKind::Expression(_) => NodeType::Expression,
        }
    }

    /// Child nodes; empty for text.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match &self.kind {
            NodeKind::Text(_) => &[],
            NodeKind::Optional(nodes)
            | NodeKind::Alternation(nodes)
            | NodeKind::Alternative(nodes)
            | NodeKind::Parameter(nodes)
            | NodeKind::Expression(nodes) => nodes,
        }
    }

    /// The literal of a text node.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Concatenated text of this node and its descendants.
    ///
    /// # Examples
    /// ```
    /// use cucumber_expressions::parse;
    ///
    /// let ast = parse("I have {int} cuke(s)").expect("expression parses");
    /// assert_eq!(ast.text(), "I have int cukes");
    /// ```
    #[must_use]
    pub fn text(&self) -> String {
        match &self.kind {
            NodeKind::Text(value) => value.clone(),
            _ => self.children().iter().map(Self::text).collect(),
        }
    }
}

impl Located for Node {
    fn start(&self) -> usize {
        self.start
    }

    fn end(&self) -> usize {
        self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case('/', TokenType::Alternation)]
    #[case('{', TokenType::BeginParameter)]
    #[case('}', TokenType::EndParameter)]
    #[case('(', TokenType::BeginOptional)]
    #[case(')', TokenType::EndOptional)]
    #[case(' ', TokenType::WhiteSpace)]
    #[case('\t', TokenType::WhiteSpace)]
    #[case('x', TokenType::Text)]
    #[case('\\', TokenType::Text)]
    fn classifies_characters(#[case] ch: char, #[case] expected: TokenType) {
        assert_eq!(TokenType::of(ch), expected);
    }

    #[rstest]
    #[case('{', true)]
    #[case('\\', true)]
    #[case(' ', true)]
    #[case('q', false)]
    #[case('$', false)]
    fn knows_which_characters_can_be_escaped(#[case] ch: char, #[case] expected: bool) {
        assert_eq!(TokenType::can_escape(ch), expected);
    }

    #[test]
    fn concatenates_descendant_text() {
        let node = Node::new(
            NodeKind::Expression(vec![
                Node::new(NodeKind::Text("cuke".into()), 0, 4),
                Node::new(
                    NodeKind::Optional(vec![Node::new(NodeKind::Text("s".into()), 5, 6)]),
                    4,
                    7,
                ),
            ]),
            0,
            7,
        );
        assert_eq!(node.text(), "cukes");
        assert_eq!(node.node_type(), NodeType::Expression);
        assert_eq!(node.children().len(), 2);
        assert_eq!(node.token(), None);
    }
}
