//! Expression tokenizer converting source text into lexical tokens.

use crate::ast::{ESCAPE_CHARACTER, Token, TokenType};
use crate::errors::{SyntaxError, SyntaxErrorKind};

/// Split an expression into tokens.
///
/// The result always starts with a [`TokenType::StartOfLine`] token and ends
/// with a [`TokenType::EndOfLine`] token. Runs of text and runs of
/// whitespace are merged; every other token covers one character. Escaped
/// characters become text and their backslash is counted in the token span.
///
/// # Errors
/// Returns [`SyntaxError`] when a backslash escapes a character that cannot
/// be escaped, or when the expression ends with a lone backslash.
///
/// # Examples
/// ```
/// use cucumber_expressions::{tokenize, TokenType};
///
/// let tokens = tokenize(r"\{").expect("escaped brace is text");
/// let kinds: Vec<_> = tokens.iter().map(|t| t.token_type).collect();
/// assert_eq!(kinds, [TokenType::StartOfLine, TokenType::Text, TokenType::EndOfLine]);
/// assert_eq!(tokens[1].text, "{");
/// ```
pub fn tokenize(expression: &str) -> Result<Vec<Token>, SyntaxError> {
    Tokenizer::new(expression).run()
}

struct Tokenizer<'a> {
    expression: &'a str,
    chars: Vec<char>,
    buffer: String,
    buffered: usize,
    escaped: usize,
    buffer_start: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(expression: &'a str) -> Self {
        Self {
            expression,
            chars: expression.chars().collect(),
            buffer: String::new(),
            buffered: 0,
            escaped: 0,
            buffer_start: 0,
        }
    }

    fn run(mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();
        let mut previous = TokenType::StartOfLine;
        let mut treat_as_text = false;

        if self.chars.is_empty() {
            tokens.push(Token {
                token_type: TokenType::StartOfLine,
                text: String::new(),
                escaped_text: String::new(),
                start: 0,
                end: 0,
            });
        }

        for ch in self.chars.clone() {
            if !treat_as_text && ch == ESCAPE_CHARACTER {
                self.escaped += 1;
                treat_as_text = true;
                continue;
            }
            let current = self.token_type_of(ch, treat_as_text)?;
            treat_as_text = false;

            if should_create_new_token(previous, current) {
                tokens.push(self.flush(previous));
            }
            previous = current;
            self.buffer.push(ch);
            self.buffered += 1;
        }

        if self.buffered > 0 {
            tokens.push(self.flush(previous));
        }

        if treat_as_text {
            return Err(SyntaxError::at(
                SyntaxErrorKind::TheEndOfLineCannotBeEscaped,
                self.expression,
                self.chars.len().saturating_sub(1),
            ));
        }

        let len = self.chars.len();
        tokens.push(Token {
            token_type: TokenType::EndOfLine,
            text: String::new(),
            escaped_text: String::new(),
            start: len,
            end: len,
        });
        Ok(tokens)
    }

    fn token_type_of(&self, ch: char, treat_as_text: bool) -> Result<TokenType, SyntaxError> {
        if !treat_as_text {
            return Ok(TokenType::of(ch));
        }
        if TokenType::can_escape(ch) {
            return Ok(TokenType::Text);
        }
        Err(SyntaxError::at(
            SyntaxErrorKind::CantEscape,
            self.expression,
            self.buffer_start + self.buffered + self.escaped,
        ))
    }

    fn flush(&mut self, token_type: TokenType) -> Token {
        let escapes = if token_type == TokenType::Text {
            std::mem::take(&mut self.escaped)
        } else {
            0
        };
        let start = self.buffer_start;
        let end = start + self.buffered + escapes;
        let escaped_text = self
            .chars
            .get(start..end)
            .map(|chars| chars.iter().collect())
            .unwrap_or_default();
        self.buffer_start = end;
        self.buffered = 0;
        Token {
            token_type,
            text: std::mem::take(&mut self.buffer),
            escaped_text,
            start,
            end,
        }
    }
}

fn should_create_new_token(previous: TokenType, current: TokenType) -> bool {
    current != previous || !matches!(current, TokenType::WhiteSpace | TokenType::Text)
}
