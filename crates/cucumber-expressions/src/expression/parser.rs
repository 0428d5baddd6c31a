//! Recursive-descent parser building the expression syntax tree.
//!
//! Grammar:
//!
//! ```text
//! expression  := ( alternation | optional | parameter | text )*
//! alternation := (?<=boundary) alternative* ( '/' alternative* )+ (?=boundary)
//! alternative := optional | parameter | text
//! optional    := '(' ( optional | parameter | text )* ')'
//! parameter   := '{' name* '}'
//! ```
//!
//! The left boundary of an alternation is start of line, whitespace or `}`;
//! the right boundary is whitespace, `{` or end of line.

use crate::ast::{Node, NodeKind, Token, TokenType};
use crate::errors::{SyntaxError, SyntaxErrorKind};
use crate::expression::tokenizer::tokenize;

/// Parse an expression into a tree rooted at a [`NodeKind::Expression`].
///
/// Parameters and nested optionals inside an optional are accepted here and
/// rejected when the tree is compiled.
///
/// # Errors
/// Returns [`SyntaxError`] for tokenizer failures, unclosed `{`/`(`,
/// alternations inside optionals, and reserved characters in parameter
/// names.
///
/// # Examples
/// ```
/// use cucumber_expressions::{parse, NodeType};
///
/// let ast = parse("three blind/cripple mice").expect("expression parses");
/// let kinds: Vec<_> = ast.children().iter().map(|n| n.node_type()).collect();
/// assert_eq!(
///     kinds,
///     [NodeType::Text, NodeType::Text, NodeType::Alternation, NodeType::Text, NodeType::Text]
/// );
/// ```
pub fn parse(expression: &str) -> Result<Node, SyntaxError> {
    let tokens = tokenize(expression)?;
    let parser = Parser {
        expression,
        tokens: &tokens,
    };
    match parser.parse_between(
        ExpressionPart::Expression,
        TokenType::StartOfLine,
        TokenType::EndOfLine,
        EXPRESSION_RULES,
        0,
    )? {
        Some((_, Fragment::Node(node))) => Ok(node),
        // The token stream always starts with start of line.
        _ => Ok(Node::new(NodeKind::Expression(Vec::new()), 0, 0)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Alternation,
    AlternativeSeparator,
    Optional,
    Parameter,
    Text,
    Name,
}

const EXPRESSION_RULES: &[Rule] = &[Rule::Alternation, Rule::Optional, Rule::Parameter, Rule::Text];
const OPTIONAL_RULES: &[Rule] = &[Rule::Optional, Rule::Parameter, Rule::Text];
const PARAMETER_RULES: &[Rule] = &[Rule::Name];
const ALTERNATIVE_RULES: &[Rule] = &[
    Rule::AlternativeSeparator,
    Rule::Optional,
    Rule::Parameter,
    Rule::Text,
];

#[derive(Debug, Clone, Copy)]
enum ExpressionPart {
    Expression,
    Optional,
    Parameter,
}

impl ExpressionPart {
    fn into_kind(self, children: Vec<Node>) -> NodeKind {
        match self {
            Self::Expression => NodeKind::Expression(children),
            Self::Optional => NodeKind::Optional(children),
            Self::Parameter => NodeKind::Parameter(children),
        }
    }
}

/// What a rule produced: a node, or the `/` between two alternatives.
#[derive(Debug)]
enum Fragment {
    Node(Node),
    Separator { start: usize, end: usize },
}

type Parsed = Option<(usize, Fragment)>;

struct Parser<'a> {
    expression: &'a str,
    tokens: &'a [Token],
}

impl Parser<'_> {
    fn apply(&self, rule: Rule, current: usize) -> Result<Parsed, SyntaxError> {
        match rule {
            Rule::Alternation => self.parse_alternation(current),
            Rule::AlternativeSeparator => Ok(self.parse_alternative_separator(current)),
            Rule::Optional => self.parse_between(
                ExpressionPart::Optional,
                TokenType::BeginOptional,
                TokenType::EndOptional,
                OPTIONAL_RULES,
                current,
            ),
            Rule::Parameter => self.parse_between(
                ExpressionPart::Parameter,
                TokenType::BeginParameter,
                TokenType::EndParameter,
                PARAMETER_RULES,
                current,
            ),
            Rule::Text => self.parse_text(current),
            Rule::Name => self.parse_name(current),
        }
    }

    fn token(&self, at: usize) -> Option<&Token> {
        self.tokens.get(at)
    }

    fn looking_at(&self, at: usize, token_type: TokenType) -> bool {
        self.token(at).map_or(token_type == TokenType::EndOfLine, |token| {
            token.token_type == token_type
        })
    }

    fn looking_at_any(&self, at: usize, token_types: &[TokenType]) -> bool {
        token_types.iter().any(|t| self.looking_at(at, *t))
    }

    fn looking_back_at_any(&self, current: usize, token_types: &[TokenType]) -> bool {
        current.checked_sub(1).map_or(
            token_types.contains(&TokenType::StartOfLine),
            |previous| self.looking_at_any(previous, token_types),
        )
    }

    fn text_node(token: &Token) -> Fragment {
        Fragment::Node(Node::new(
            NodeKind::Text(token.text.clone()),
            token.start,
            token.end,
        ))
    }

    // text := whitespace | ')' | '}' | .
    fn parse_text(&self, current: usize) -> Result<Parsed, SyntaxError> {
        let Some(token) = self.token(current) else {
            return Ok(None);
        };
        match token.token_type {
            TokenType::WhiteSpace
            | TokenType::Text
            | TokenType::EndParameter
            | TokenType::EndOptional => Ok(Some((1, Self::text_node(token)))),
            TokenType::Alternation => Err(SyntaxError::spanning(
                SyntaxErrorKind::AlternationNotAllowedInOptional,
                self.expression,
                token,
            )),
            _ => Ok(None),
        }
    }

    // name := whitespace | .
    fn parse_name(&self, current: usize) -> Result<Parsed, SyntaxError> {
        let Some(token) = self.token(current) else {
            return Ok(None);
        };
        match token.token_type {
            TokenType::WhiteSpace | TokenType::Text => Ok(Some((1, Self::text_node(token)))),
            TokenType::BeginParameter
            | TokenType::EndParameter
            | TokenType::BeginOptional
            | TokenType::EndOptional
            | TokenType::Alternation => Err(SyntaxError::spanning(
                SyntaxErrorKind::InvalidParameterTypeName,
                self.expression,
                token,
            )),
            TokenType::StartOfLine | TokenType::EndOfLine => Ok(None),
        }
    }

    fn parse_alternative_separator(&self, current: usize) -> Parsed {
        let token = self.token(current)?;
        (token.token_type == TokenType::Alternation).then(|| {
            (
                1,
                Fragment::Separator {
                    start: token.start,
                    end: token.end,
                },
            )
        })
    }

    fn parse_between(
        &self,
        part: ExpressionPart,
        begin: TokenType,
        end: TokenType,
        rules: &[Rule],
        current: usize,
    ) -> Result<Parsed, SyntaxError> {
        if !self.looking_at(current, begin) {
            return Ok(None);
        }
        let Some(begin_token) = self.token(current) else {
            return Ok(None);
        };
        let (consumed, fragments) =
            self.parse_tokens_until(rules, current + 1, &[end, TokenType::EndOfLine])?;
        let sub_current = current + 1 + consumed;
        let end_token = self
            .token(sub_current)
            .filter(|token| token.token_type == end)
            .ok_or_else(|| {
                SyntaxError::spanning(
                    SyntaxErrorKind::MissingEndToken { begin, end },
                    self.expression,
                    begin_token,
                )
            })?;
        let children = fragments
            .into_iter()
            .filter_map(|fragment| match fragment {
                Fragment::Node(node) => Some(node),
                Fragment::Separator { .. } => None,
            })
            .collect();
        let node = Node::new(part.into_kind(children), begin_token.start, end_token.end);
        Ok(Some((sub_current + 1 - current, Fragment::Node(node))))
    }

    fn parse_alternation(&self, current: usize) -> Result<Parsed, SyntaxError> {
        if !self.looking_back_at_any(
            current,
            &[
                TokenType::StartOfLine,
                TokenType::WhiteSpace,
                TokenType::EndParameter,
            ],
        ) {
            return Ok(None);
        }
        let (consumed, fragments) = self.parse_tokens_until(
            ALTERNATIVE_RULES,
            current,
            &[
                TokenType::WhiteSpace,
                TokenType::EndOfLine,
                TokenType::BeginParameter,
            ],
        )?;
        if !fragments
            .iter()
            .any(|fragment| matches!(fragment, Fragment::Separator { .. }))
        {
            return Ok(None);
        }
        let (Some(first), Some(boundary)) = (self.token(current), self.token(current + consumed))
        else {
            return Ok(None);
        };
        let (start, end) = (first.start, boundary.start);
        let alternatives = split_alternatives(start, end, fragments);
        Ok(Some((
            consumed,
            Fragment::Node(Node::new(NodeKind::Alternation(alternatives), start, end)),
        )))
    }

    fn parse_token(&self, rules: &[Rule], current: usize) -> Result<Parsed, SyntaxError> {
        for rule in rules {
            if let Some(parsed) = self.apply(*rule, current)? {
                return Ok(Some(parsed));
            }
        }
        Ok(None)
    }

    fn parse_tokens_until(
        &self,
        rules: &[Rule],
        start_at: usize,
        end_tokens: &[TokenType],
    ) -> Result<(usize, Vec<Fragment>), SyntaxError> {
        let mut current = start_at;
        let mut fragments = Vec::new();
        while current < self.tokens.len() {
            if self.looking_at_any(current, end_tokens) {
                break;
            }
            let Some((consumed, fragment)) = self.parse_token(rules, current)? else {
                break;
            };
            current += consumed;
            fragments.push(fragment);
        }
        Ok((current - start_at, fragments))
    }
}

fn split_alternatives(start: usize, end: usize, fragments: Vec<Fragment>) -> Vec<Node> {
    let mut separators = Vec::new();
    let mut groups = Vec::new();
    let mut alternative = Vec::new();
    for fragment in fragments {
        match fragment {
            Fragment::Separator { start, end } => {
                separators.push((start, end));
                groups.push(std::mem::take(&mut alternative));
            }
            Fragment::Node(node) => alternative.push(node),
        }
    }
    groups.push(alternative);

    let mut left = start;
    let mut nodes = Vec::with_capacity(groups.len());
    let mut bounds = separators.into_iter();
    for children in groups {
        let (right, next_left) = bounds.next().unwrap_or((end, end));
        nodes.push(Node::new(NodeKind::Alternative(children), left, right));
        left = next_left;
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeType;
    use crate::expression::test_support::render;
    use rstest::rstest;

    fn parse_ok(expression: &str) -> Node {
        parse(expression).unwrap_or_else(|e| panic!("{expression:?} should parse: {e}"))
    }

    fn parse_err(expression: &str) -> SyntaxError {
        parse(expression)
            .err()
            .unwrap_or_else(|| panic!("{expression:?} should not parse"))
    }

    #[test]
    fn empty_expression_is_an_empty_root() {
        assert_eq!(render(&parse_ok("")), "EXPRESSION_NODE 0..0 []");
    }

    #[test]
    fn parses_parameter_and_optional() {
        assert_eq!(
            render(&parse_ok("I have {int} cuke(s)")),
            concat!(
                "EXPRESSION_NODE 0..20 [",
                "TEXT_NODE 0..1 \"I\", TEXT_NODE 1..2 \" \", TEXT_NODE 2..6 \"have\", ",
                "TEXT_NODE 6..7 \" \", PARAMETER_NODE 7..12 [TEXT_NODE 8..11 \"int\"], ",
                "TEXT_NODE 12..13 \" \", TEXT_NODE 13..17 \"cuke\", ",
                "OPTIONAL_NODE 17..20 [TEXT_NODE 18..19 \"s\"]]"
            )
        );
    }

    #[test]
    fn parses_alternation_with_spans() {
        assert_eq!(
            render(&parse_ok("mice/rats")),
            concat!(
                "EXPRESSION_NODE 0..9 [ALTERNATION_NODE 0..9 [",
                "ALTERNATIVE_NODE 0..4 [TEXT_NODE 0..4 \"mice\"], ",
                "ALTERNATIVE_NODE 5..9 [TEXT_NODE 5..9 \"rats\"]]]"
            )
        );
    }

    #[test]
    fn middle_alternatives_sit_between_separators() {
        let ast = parse_ok("a/b/c");
        let alternation = ast
            .children()
            .first()
            .unwrap_or_else(|| panic!("expected an alternation"));
        let spans: Vec<_> = alternation
            .children()
            .iter()
            .map(|n| (n.start, n.end))
            .collect();
        assert_eq!(spans, [(0, 1), (2, 3), (4, 5)]);
    }

    #[test]
    fn alternation_stops_at_whitespace_and_parameters() {
        let ast = parse_ok("{int}/x {word}");
        let kinds: Vec<_> = ast.children().iter().map(Node::node_type).collect();
        assert_eq!(
            kinds,
            [
                NodeType::Parameter,
                NodeType::Alternation,
                NodeType::Text,
                NodeType::Parameter
            ]
        );
    }

    #[test]
    fn alternation_may_contain_optionals() {
        assert_eq!(
            render(&parse_ok("(a)b/c")),
            concat!(
                "EXPRESSION_NODE 0..6 [ALTERNATION_NODE 0..6 [",
                "ALTERNATIVE_NODE 0..4 [OPTIONAL_NODE 0..3 [TEXT_NODE 1..2 \"a\"], TEXT_NODE 3..4 \"b\"], ",
                "ALTERNATIVE_NODE 5..6 [TEXT_NODE 5..6 \"c\"]]]"
            )
        );
    }

    #[test]
    fn slash_after_text_is_not_an_alternation_boundary() {
        // The text before the slash starts the alternation instead.
        let ast = parse_ok("x a/b");
        let last = ast
            .children()
            .last()
            .unwrap_or_else(|| panic!("expected children"));
        assert_eq!(last.node_type(), NodeType::Alternation);
        assert_eq!((last.start, last.end), (2, 5));
    }

    #[test]
    fn empty_alternative_still_parses() {
        assert_eq!(
            render(&parse_ok("/")),
            concat!(
                "EXPRESSION_NODE 0..1 [ALTERNATION_NODE 0..1 [",
                "ALTERNATIVE_NODE 0..0 [], ALTERNATIVE_NODE 1..1 []]]"
            )
        );
    }

    #[test]
    fn unmatched_closers_are_text() {
        assert_eq!(
            render(&parse_ok(")}")),
            "EXPRESSION_NODE 0..2 [TEXT_NODE 0..1 \")\", TEXT_NODE 1..2 \"}\"]"
        );
    }

    #[test]
    fn escaped_delimiters_are_text() {
        assert_eq!(
            render(&parse_ok(r"\(a\)")),
            "EXPRESSION_NODE 0..5 [TEXT_NODE 0..5 \"(a)\"]"
        );
    }

    #[test]
    fn optional_may_nest_for_the_compiler_to_reject() {
        assert_eq!(
            render(&parse_ok("((a))")),
            "EXPRESSION_NODE 0..5 [OPTIONAL_NODE 0..5 [OPTIONAL_NODE 1..4 [TEXT_NODE 2..3 \"a\"]]]"
        );
    }

    #[test]
    fn whitespace_is_kept_in_parameter_names() {
        assert_eq!(
            render(&parse_ok("{a b}")),
            concat!(
                "EXPRESSION_NODE 0..5 [PARAMETER_NODE 0..5 [",
                "TEXT_NODE 1..2 \"a\", TEXT_NODE 2..3 \" \", TEXT_NODE 3..4 \"b\"]]"
            )
        );
    }

    #[rstest]
    #[case("{", 0, TokenType::BeginParameter, TokenType::EndParameter)]
    #[case("(", 0, TokenType::BeginOptional, TokenType::EndOptional)]
    #[case("a (b", 2, TokenType::BeginOptional, TokenType::EndOptional)]
    #[case("(a {b", 3, TokenType::BeginParameter, TokenType::EndParameter)]
    fn reports_missing_end_token_at_the_opener(
        #[case] expression: &str,
        #[case] at: usize,
        #[case] begin: TokenType,
        #[case] end: TokenType,
    ) {
        let err = parse_err(expression);
        assert_eq!(err.kind, SyntaxErrorKind::MissingEndToken { begin, end });
        assert_eq!((err.start, err.end), (at, at + 1));
    }

    #[test]
    fn rejects_alternation_in_optional() {
        let err = parse_err("three( brown/black) mice");
        assert_eq!(err.kind, SyntaxErrorKind::AlternationNotAllowedInOptional);
        assert_eq!((err.start, err.end), (12, 13));
    }

    #[rstest]
    #[case("{(string)}", 1)]
    #[case("{a/b}", 2)]
    #[case("{{int}}", 1)]
    fn rejects_reserved_characters_in_names(#[case] expression: &str, #[case] at: usize) {
        let err = parse_err(expression);
        assert_eq!(err.kind, SyntaxErrorKind::InvalidParameterTypeName);
        assert_eq!(err.start, at);
    }

    #[test]
    fn propagates_tokenizer_errors() {
        assert_eq!(parse_err(r"a\").kind, SyntaxErrorKind::TheEndOfLineCannotBeEscaped);
    }
}
