//! The lossless concrete syntax tree.
//!
//! Every production owns its own tokens (leading trivia included), so
//! `full_text()` reproduces the source exactly — the round-trip law the CST
//! exists to guarantee.

use rowan::GreenNode;

use crate::syntax_kind::SyntaxNode;
use crate::unbound::{self, UnboundExpr};

#[derive(Debug, Clone)]
pub struct Cst {
    green: GreenNode,
}

impl Cst {
    pub(crate) fn new(green: GreenNode) -> Self {
        Self { green }
    }

    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// The exact source text this CST was parsed from.
    pub fn full_text(&self) -> String {
        self.syntax().to_string()
    }

    /// Lower this tree to its trivia-free [`UnboundExpr`].
    pub fn to_unbound(&self) -> UnboundExpr {
        unbound::lower(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;

    #[test]
    fn full_text_is_a_round_trip() {
        for source in ["a + b * c", "fun(x,y)", "  ( a - -1 ) % 2  ", "2e10 / 4"] {
            let cst = parse(source).unwrap();
            assert_eq!(cst.full_text(), source);
        }
    }
}
