//! Recursive-descent parser building a lossless CST with rowan's
//! `GreenNodeBuilder`.
//!
//! ```text
//! expression → term
//! term       → factor ( ("+" | "-") factor )*
//! factor     → unary  ( ("*" | "/" | "%") unary )*
//! unary      → "-" unary | primary
//! primary    → number
//!            | identifier ( "(" arguments? ")" )?
//!            | "(" expression ")"
//! arguments  → expression ( "," expression )*
//! ```
//!
//! Left-associative for `+ - * / %`; unary `-` is right-associative. There
//! is no error recovery: the first [`SyntaxError`] aborts the parse.

use std::iter::Peekable;

use rowan::GreenNodeBuilder;

use crate::cst::Cst;
use crate::syntax_error::SyntaxError;
use crate::syntax_kind::SyntaxKind;
use crate::token::{Token, TokenKind};
use crate::tokenizer::Tokenizer;

/// Parse expression source into a lossless CST.
pub fn parse(source: &str) -> Result<Cst, SyntaxError> {
    let mut parser = Parser::new(source);
    parser.builder.start_node(SyntaxKind::ROOT.into());
    parser.parse_expression()?;
    if !parser.at(TokenKind::Empty) {
        let position = parser.current_pos();
        let found = parser.peek_kind();
        return Err(SyntaxError::UnexpectedToken { position, found });
    }
    parser.bump();
    parser.builder.finish_node();
    Ok(Cst::new(parser.builder.finish()))
}

struct TokenIter<'src> {
    tokenizer: Tokenizer<'src>,
    done: bool,
}

impl<'src> Iterator for TokenIter<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let token = self.tokenizer.next_token();
        if token.kind == TokenKind::Empty {
            self.done = true;
        }
        Some(token)
    }
}

struct Parser<'src> {
    lexer: Peekable<TokenIter<'src>>,
    builder: GreenNodeBuilder<'static>,
    end: u32,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            lexer: TokenIter {
                tokenizer: Tokenizer::new(source),
                done: false,
            }
            .peekable(),
            builder: GreenNodeBuilder::new(),
            end: source.len() as u32,
        }
    }

    fn peek_kind(&mut self) -> TokenKind {
        self.lexer.peek().map(|t| t.kind).unwrap_or(TokenKind::Empty)
    }

    fn peek_text(&mut self) -> &'src str {
        self.lexer.peek().map(|t| t.text).unwrap_or("")
    }

    fn current_pos(&mut self) -> u32 {
        self.lexer.peek().map(|t| t.start).unwrap_or(self.end)
    }

    fn at(&mut self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn at_operator(&mut self, symbols: &[&str]) -> bool {
        self.peek_kind() == TokenKind::Operator && symbols.contains(&self.peek_text())
    }

    fn bump(&mut self) {
        if let Some(token) = self.lexer.next() {
            self.builder.token(SyntaxKind::from(token.kind).into(), &token.full_text());
        }
    }

    fn parse_expression(&mut self) -> Result<(), SyntaxError> {
        self.parse_term()
    }

    fn parse_term(&mut self) -> Result<(), SyntaxError> {
        let checkpoint = self.builder.checkpoint();
        self.parse_factor()?;
        while self.at_operator(&["+", "-"]) {
            self.builder.start_node_at(checkpoint, SyntaxKind::BINARY_EXPR.into());
            self.bump();
            self.parse_factor()?;
            self.builder.finish_node();
        }
        Ok(())
    }

    fn parse_factor(&mut self) -> Result<(), SyntaxError> {
        let checkpoint = self.builder.checkpoint();
        self.parse_unary()?;
        while self.at_operator(&["*", "/", "%"]) {
            self.builder.start_node_at(checkpoint, SyntaxKind::BINARY_EXPR.into());
            self.bump();
            self.parse_unary()?;
            self.builder.finish_node();
        }
        Ok(())
    }

    fn parse_unary(&mut self) -> Result<(), SyntaxError> {
        if self.at_operator(&["-"]) {
            let checkpoint = self.builder.checkpoint();
            self.builder.start_node_at(checkpoint, SyntaxKind::UNARY_EXPR.into());
            self.bump();
            self.parse_unary()?;
            self.builder.finish_node();
            Ok(())
        } else {
            self.parse_primary()
        }
    }

    fn parse_primary(&mut self) -> Result<(), SyntaxError> {
        match self.peek_kind() {
            TokenKind::Int | TokenKind::Double => {
                self.builder.start_node(SyntaxKind::LITERAL.into());
                self.bump();
                self.builder.finish_node();
                Ok(())
            }
            TokenKind::Identifier => {
                let checkpoint = self.builder.checkpoint();
                self.builder.start_node(SyntaxKind::NAME_REF.into());
                self.bump();
                self.builder.finish_node();
                if self.at(TokenKind::LeftParen) {
                    self.builder.start_node_at(checkpoint, SyntaxKind::CALL_EXPR.into());
                    self.parse_arguments()?;
                    self.builder.finish_node();
                }
                Ok(())
            }
            TokenKind::LeftParen => {
                self.builder.start_node(SyntaxKind::PAREN_EXPR.into());
                self.bump();
                self.parse_expression()?;
                if self.at(TokenKind::RightParen) {
                    self.bump();
                } else {
                    let position = self.current_pos();
                    return Err(SyntaxError::MissingRightParenthesis { position });
                }
                self.builder.finish_node();
                Ok(())
            }
            _ => {
                let position = self.current_pos();
                Err(SyntaxError::ExpressionExpected { position })
            }
        }
    }

    /// `"(" expression ( "," expression )* ")"`. Entered with the current
    /// token at `(`.
    fn parse_arguments(&mut self) -> Result<(), SyntaxError> {
        self.builder.start_node(SyntaxKind::ARG_LIST.into());
        self.bump();
        if !self.at(TokenKind::RightParen) {
            self.parse_expression()?;
            while self.at(TokenKind::Comma) {
                self.bump();
                self.parse_expression()?;
            }
        }
        if self.at(TokenKind::RightParen) {
            self.bump();
        } else {
            let position = self.current_pos();
            return Err(SyntaxError::MissingRightParenthesis { position });
        }
        self.builder.finish_node();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_simple_sum() {
        let cst = parse("a + b * c").unwrap();
        assert_eq!(cst.full_text(), "a + b * c");
    }

    #[test]
    fn full_text_round_trips_a_call() {
        let cst = parse("fun(x,y)").unwrap();
        assert_eq!(cst.full_text(), "fun(x,y)");
    }

    #[test]
    fn unary_minus_is_right_associative() {
        let cst = parse("- -1").unwrap();
        assert_eq!(cst.full_text(), "- -1");
    }

    #[test]
    fn missing_closing_paren_is_reported() {
        let err = parse("(1 + 2").unwrap_err();
        assert!(matches!(err, SyntaxError::MissingRightParenthesis { .. }));
    }

    #[test]
    fn empty_input_is_expression_expected() {
        let err = parse("").unwrap_err();
        assert!(matches!(err, SyntaxError::ExpressionExpected { .. }));
    }

    #[test]
    fn trailing_garbage_is_unexpected_token() {
        let err = parse("1 + 2)").unwrap_err();
        assert!(matches!(err, SyntaxError::UnexpectedToken { .. }));
    }

    #[test]
    fn call_missing_paren_is_reported() {
        let err = parse("fun(x,y").unwrap_err();
        assert!(matches!(err, SyntaxError::MissingRightParenthesis { .. }));
    }
}
