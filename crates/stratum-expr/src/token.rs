//! Token types for the expression tokenizer.

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A decimal integer literal, possibly with `_` separators: `42`, `1_000`.
    Int,
    /// A literal with a fractional part and/or exponent: `1.5`, `2e10`.
    Double,
    /// `[A-Za-z_][A-Za-z0-9_]*`
    Identifier,
    /// One of `+ - * / %`.
    Operator,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `,`
    Comma,
    /// End of input.
    Empty,
    /// Unrecognized input.
    Error,
}

/// A token with its kind, leading trivia, and literal text.
///
/// Trivia is preserved by attaching it to the token that follows rather than
/// emitting separate whitespace tokens: `full_text()` (leading trivia plus
/// literal text) concatenated across a token stream reproduces the source
/// exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    /// Whitespace preceding this token's literal text.
    pub leading_trivia: &'src str,
    /// The token's own literal text, excluding leading trivia.
    pub text: &'src str,
    /// Byte offset of `text` in the source (after `leading_trivia`).
    pub start: u32,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, leading_trivia: &'src str, text: &'src str, start: u32) -> Self {
        Self {
            kind,
            leading_trivia,
            text,
            start,
        }
    }

    /// Leading trivia followed by literal text — the exact source slice this
    /// token covers.
    pub fn full_text(&self) -> String {
        format!("{}{}", self.leading_trivia, self.text)
    }
}
