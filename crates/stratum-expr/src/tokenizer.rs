//! Tokenizer for the expression language.

use tracing::trace;

use crate::token::{Token, TokenKind};

/// A tokenizer that produces tokens, with leading trivia attached, from
/// expression source text.
#[derive(Clone)]
pub struct Tokenizer<'src> {
    source: &'src str,
    remaining: &'src str,
    pos: u32,
}

impl<'src> Tokenizer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
        }
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining.chars().nth(n)
    }

    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8() as u32;
        self.remaining = &self.remaining[c.len_utf8()..];
        Some(c)
    }

    fn is_eof(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Consume and return the run of horizontal/vertical whitespace at the
    /// current position.
    fn consume_trivia(&mut self) -> &'src str {
        let start = self.pos as usize;
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
        &self.source[start..self.pos as usize]
    }

    /// Get the next token, including its leading trivia.
    pub fn next_token(&mut self) -> Token<'src> {
        let leading_trivia = self.consume_trivia();
        let start = self.pos;

        if self.is_eof() {
            let token = Token::new(TokenKind::Empty, leading_trivia, "", start);
            trace!(?token.kind, "next_token");
            return token;
        }

        let c = self.peek().unwrap();
        let token = match c {
            '+' | '-' | '*' | '/' | '%' => {
                self.advance();
                self.finish(TokenKind::Operator, leading_trivia, start)
            }
            '(' => {
                self.advance();
                self.finish(TokenKind::LeftParen, leading_trivia, start)
            }
            ')' => {
                self.advance();
                self.finish(TokenKind::RightParen, leading_trivia, start)
            }
            ',' => {
                self.advance();
                self.finish(TokenKind::Comma, leading_trivia, start)
            }
            c if c.is_ascii_digit() => self.tokenize_number(leading_trivia, start),
            c if is_identifier_start(c) => self.tokenize_identifier(leading_trivia, start),
            _ => {
                self.advance();
                self.finish(TokenKind::Error, leading_trivia, start)
            }
        };
        trace!(?token.kind, text = token.text, "next_token");
        token
    }

    fn finish(&self, kind: TokenKind, leading_trivia: &'src str, start: u32) -> Token<'src> {
        let text = &self.source[start as usize..self.pos as usize];
        Token::new(kind, leading_trivia, text, start)
    }

    fn consume_digits(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '_') {
            self.advance();
        }
    }

    fn tokenize_number(&mut self, leading_trivia: &'src str, start: u32) -> Token<'src> {
        let mut is_double = false;
        self.consume_digits();

        if self.peek() == Some('.') && matches!(self.peek_nth(1), Some(c) if c.is_ascii_digit()) {
            is_double = true;
            self.advance();
            self.consume_digits();
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            let lookahead = match self.peek_nth(1) {
                Some('+') | Some('-') => self.peek_nth(2),
                other => other,
            };
            if matches!(lookahead, Some(c) if c.is_ascii_digit()) {
                is_double = true;
                self.advance();
                if matches!(self.peek(), Some('+') | Some('-')) {
                    self.advance();
                }
                self.consume_digits();
            }
        }

        let kind = if is_double { TokenKind::Double } else { TokenKind::Int };
        self.finish(kind, leading_trivia, start)
    }

    fn tokenize_identifier(&mut self, leading_trivia: &'src str, start: u32) -> Token<'src> {
        self.advance();
        while matches!(self.peek(), Some(c) if is_identifier_continue(c)) {
            self.advance();
        }
        self.finish(TokenKind::Identifier, leading_trivia, start)
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Empty {
            None
        } else {
            Some(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(source: &str) -> Vec<(TokenKind, &str, &str)> {
        Tokenizer::new(source)
            .map(|t| (t.kind, t.leading_trivia, t.text))
            .collect()
    }

    #[test]
    fn integers_and_doubles() {
        assert_eq!(tokenize("42"), vec![(TokenKind::Int, "", "42")]);
        assert_eq!(tokenize("1_000"), vec![(TokenKind::Int, "", "1_000")]);
        assert_eq!(tokenize("1.5"), vec![(TokenKind::Double, "", "1.5")]);
        assert_eq!(tokenize("2e10"), vec![(TokenKind::Double, "", "2e10")]);
        assert_eq!(tokenize("2e-3"), vec![(TokenKind::Double, "", "2e-3")]);
    }

    #[test]
    fn identifiers() {
        assert_eq!(tokenize("foo_bar1"), vec![(TokenKind::Identifier, "", "foo_bar1")]);
        assert_eq!(tokenize("_x"), vec![(TokenKind::Identifier, "", "_x")]);
    }

    #[test]
    fn operators_and_structural_tokens() {
        assert_eq!(tokenize("+"), vec![(TokenKind::Operator, "", "+")]);
        assert_eq!(tokenize("%"), vec![(TokenKind::Operator, "", "%")]);
        assert_eq!(tokenize("("), vec![(TokenKind::LeftParen, "", "(")]);
        assert_eq!(tokenize(")"), vec![(TokenKind::RightParen, "", ")")]);
        assert_eq!(tokenize(","), vec![(TokenKind::Comma, "", ",")]);
    }

    #[test]
    fn leading_trivia_attaches_to_the_following_token() {
        let tokens = tokenize("  a + b");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Identifier, "  ", "a"),
                (TokenKind::Operator, " ", "+"),
                (TokenKind::Identifier, " ", "b"),
            ]
        );
    }

    #[test]
    fn full_text_round_trips() {
        // Trailing trivia belongs to the final Empty/EOF token, so it must be
        // included to reconstruct the source exactly.
        let source = "  a + b * c  ";
        let mut tokenizer = Tokenizer::new(source);
        let mut reconstructed = String::new();
        loop {
            let token = tokenizer.next_token();
            let is_empty = token.kind == TokenKind::Empty;
            reconstructed.push_str(&token.full_text());
            if is_empty {
                break;
            }
        }
        assert_eq!(reconstructed, source);
    }

    #[test]
    fn unrecognized_character_is_an_error_token() {
        assert_eq!(tokenize("$"), vec![(TokenKind::Error, "", "$")]);
    }

    fn dump_tokens(source: &str) -> String {
        let mut tokenizer = Tokenizer::new(source);
        let mut lines = Vec::new();
        loop {
            let token = tokenizer.next_token();
            let is_empty = token.kind == TokenKind::Empty;
            lines.push(format!("{:?} {:?} {:?} @{}", token.kind, token.leading_trivia, token.text, token.start));
            if is_empty {
                break;
            }
        }
        lines.join("\n")
    }

    #[test]
    fn token_stream_dump_for_a_call_expression() {
        insta::assert_snapshot!(dump_tokens("a + fun(1, 2)"), @r###"
        Identifier "" "a" @0
        Operator " " "+" @2
        Identifier " " "fun" @4
        LeftParen "" "(" @7
        Int "" "1" @8
        Comma "" "," @9
        Int " " "2" @11
        RightParen "" ")" @12
        Empty "" "" @13
        "###);
    }
}
