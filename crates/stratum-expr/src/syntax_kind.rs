//! Syntax node and token kinds for the expression CST.

use crate::token::TokenKind;

/// The kind of a syntax element (node or token).
///
/// Tokens are terminal (leaves); nodes are non-terminal. The distinction is
/// made by value: tokens sort below `__LAST_TOKEN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
#[allow(clippy::manual_non_exhaustive)]
pub enum SyntaxKind {
    // ===== tokens =====
    INT = 0,
    DOUBLE,
    IDENTIFIER,
    OPERATOR,
    L_PAREN,
    R_PAREN,
    COMMA,
    EMPTY,
    ERROR,

    #[doc(hidden)]
    __LAST_TOKEN,

    // ===== nodes =====
    /// The sole top-level expression.
    ROOT,
    /// A number literal.
    LITERAL,
    /// A bare identifier reference.
    NAME_REF,
    /// `-unary`
    UNARY_EXPR,
    /// `lhs op rhs`
    BINARY_EXPR,
    /// `( expression )`
    PAREN_EXPR,
    /// `name ( arguments? )`
    CALL_EXPR,
    /// The comma-separated argument list of a call.
    ARG_LIST,
}

impl SyntaxKind {
    pub fn is_token(self) -> bool {
        (self as u16) < (Self::__LAST_TOKEN as u16)
    }

    pub fn is_node(self) -> bool {
        (self as u16) > (Self::__LAST_TOKEN as u16)
    }

    pub const fn from_raw(raw: u16) -> Option<Self> {
        match raw {
            0 => Some(Self::INT),
            1 => Some(Self::DOUBLE),
            2 => Some(Self::IDENTIFIER),
            3 => Some(Self::OPERATOR),
            4 => Some(Self::L_PAREN),
            5 => Some(Self::R_PAREN),
            6 => Some(Self::COMMA),
            7 => Some(Self::EMPTY),
            8 => Some(Self::ERROR),
            // 9 is __LAST_TOKEN - skip it
            10 => Some(Self::ROOT),
            11 => Some(Self::LITERAL),
            12 => Some(Self::NAME_REF),
            13 => Some(Self::UNARY_EXPR),
            14 => Some(Self::BINARY_EXPR),
            15 => Some(Self::PAREN_EXPR),
            16 => Some(Self::CALL_EXPR),
            17 => Some(Self::ARG_LIST),
            _ => None,
        }
    }
}

impl From<TokenKind> for SyntaxKind {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Int => Self::INT,
            TokenKind::Double => Self::DOUBLE,
            TokenKind::Identifier => Self::IDENTIFIER,
            TokenKind::Operator => Self::OPERATOR,
            TokenKind::LeftParen => Self::L_PAREN,
            TokenKind::RightParen => Self::R_PAREN,
            TokenKind::Comma => Self::COMMA,
            TokenKind::Empty => Self::EMPTY,
            TokenKind::Error => Self::ERROR,
        }
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}

/// Language definition for the expression CST, used by rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExprLanguage {}

impl rowan::Language for ExprLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        Self::Kind::from_raw(raw.0).expect("invalid SyntaxKind value from rowan")
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

pub type SyntaxNode = rowan::SyntaxNode<ExprLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<ExprLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<ExprLanguage>;

#[cfg(test)]
mod tests {
    use super::*;
    use rowan::Language;

    #[test]
    fn token_vs_node() {
        assert!(SyntaxKind::INT.is_token());
        assert!(SyntaxKind::ERROR.is_token());
        assert!(SyntaxKind::ROOT.is_node());
        assert!(SyntaxKind::BINARY_EXPR.is_node());
    }

    #[test]
    fn rowan_roundtrip() {
        let kind = SyntaxKind::CALL_EXPR;
        let raw = ExprLanguage::kind_to_raw(kind);
        let back = ExprLanguage::kind_from_raw(raw);
        assert_eq!(kind, back);
    }
}
