//! Typed AST wrappers over CST nodes.
//!
//! These give ergonomic, kind-checked accessors over the underlying
//! [`SyntaxNode`] tree while still allowing callers to fall back to the raw
//! CST for source-text questions.

use crate::syntax_kind::{SyntaxKind, SyntaxNode, SyntaxToken};

pub trait AstNode: Sized {
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn cast(node: SyntaxNode) -> Option<Self> {
                if node.kind() == $kind {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(
    /// The single top-level expression.
    Root,
    SyntaxKind::ROOT
);

ast_node!(
    /// A number literal (`int` or `double`).
    Literal,
    SyntaxKind::LITERAL
);

ast_node!(
    /// A bare variable name.
    NameRef,
    SyntaxKind::NAME_REF
);

ast_node!(
    /// `-operand`.
    UnaryExpr,
    SyntaxKind::UNARY_EXPR
);

ast_node!(
    /// `lhs op rhs`.
    BinaryExpr,
    SyntaxKind::BINARY_EXPR
);

ast_node!(
    /// `( expression )`.
    ParenExpr,
    SyntaxKind::PAREN_EXPR
);

ast_node!(
    /// `name ( arguments )`.
    CallExpr,
    SyntaxKind::CALL_EXPR
);

ast_node!(
    /// The comma-separated argument list of a call.
    ArgList,
    SyntaxKind::ARG_LIST
);

/// Any of the grammar's expression productions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Literal(Literal),
    NameRef(NameRef),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Paren(ParenExpr),
    Call(CallExpr),
}

impl Expr {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::LITERAL => Literal::cast(node).map(Expr::Literal),
            SyntaxKind::NAME_REF => NameRef::cast(node).map(Expr::NameRef),
            SyntaxKind::UNARY_EXPR => UnaryExpr::cast(node).map(Expr::Unary),
            SyntaxKind::BINARY_EXPR => BinaryExpr::cast(node).map(Expr::Binary),
            SyntaxKind::PAREN_EXPR => ParenExpr::cast(node).map(Expr::Paren),
            SyntaxKind::CALL_EXPR => CallExpr::cast(node).map(Expr::Call),
            _ => None,
        }
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Expr::Literal(n) => n.syntax(),
            Expr::NameRef(n) => n.syntax(),
            Expr::Unary(n) => n.syntax(),
            Expr::Binary(n) => n.syntax(),
            Expr::Paren(n) => n.syntax(),
            Expr::Call(n) => n.syntax(),
        }
    }
}

fn tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> + '_ {
    node.children_with_tokens().filter_map(|el| el.into_token())
}

fn child_expr_nodes(node: &SyntaxNode) -> impl Iterator<Item = SyntaxNode> + '_ {
    node.children()
}

impl Root {
    pub fn expr(&self) -> Option<Expr> {
        child_expr_nodes(self.syntax()).find_map(Expr::cast)
    }
}

impl Literal {
    /// The single `int` or `double` token this literal wraps.
    pub fn token(&self) -> SyntaxToken {
        tokens(self.syntax())
            .find(|t| matches!(t.kind(), SyntaxKind::INT | SyntaxKind::DOUBLE))
            .expect("LITERAL always owns exactly one number token")
    }

    pub fn is_double(&self) -> bool {
        self.token().kind() == SyntaxKind::DOUBLE
    }
}

impl NameRef {
    pub fn name(&self) -> String {
        tokens(self.syntax())
            .find(|t| t.kind() == SyntaxKind::IDENTIFIER)
            .expect("NAME_REF always owns an identifier token")
            .text()
            .to_string()
    }
}

impl UnaryExpr {
    pub fn op(&self) -> String {
        tokens(self.syntax())
            .find(|t| t.kind() == SyntaxKind::OPERATOR)
            .expect("UNARY_EXPR always owns an operator token")
            .text()
            .to_string()
    }

    pub fn operand(&self) -> Expr {
        child_expr_nodes(self.syntax())
            .find_map(Expr::cast)
            .expect("UNARY_EXPR always owns an operand")
    }
}

impl BinaryExpr {
    pub fn op(&self) -> String {
        tokens(self.syntax())
            .find(|t| t.kind() == SyntaxKind::OPERATOR)
            .expect("BINARY_EXPR always owns an operator token")
            .text()
            .to_string()
    }

    pub fn lhs(&self) -> Expr {
        child_expr_nodes(self.syntax())
            .find_map(Expr::cast)
            .expect("BINARY_EXPR always owns a left operand")
    }

    pub fn rhs(&self) -> Expr {
        child_expr_nodes(self.syntax())
            .filter_map(Expr::cast)
            .nth(1)
            .expect("BINARY_EXPR always owns a right operand")
    }
}

impl ParenExpr {
    pub fn inner(&self) -> Expr {
        child_expr_nodes(self.syntax())
            .find_map(Expr::cast)
            .expect("PAREN_EXPR always owns an inner expression")
    }
}

impl CallExpr {
    pub fn name_ref(&self) -> NameRef {
        child_expr_nodes(self.syntax())
            .find_map(NameRef::cast)
            .expect("CALL_EXPR always owns a NAME_REF")
    }

    pub fn args(&self) -> ArgList {
        child_expr_nodes(self.syntax())
            .find_map(ArgList::cast)
            .expect("CALL_EXPR always owns an ARG_LIST")
    }
}

impl ArgList {
    pub fn args(&self) -> impl Iterator<Item = Expr> + '_ {
        child_expr_nodes(self.syntax()).filter_map(Expr::cast)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;

    use super::*;

    #[test]
    fn call_expr_exposes_name_and_args() {
        let cst = parse("fun(x, y)").unwrap();
        let root = Root::cast(cst.syntax()).unwrap();
        let call = match root.expr().unwrap() {
            Expr::Call(c) => c,
            other => panic!("expected call, got {other:?}"),
        };
        assert_eq!(call.name_ref().name(), "fun");
        let arg_names: Vec<String> = call
            .args()
            .args()
            .map(|a| match a {
                Expr::NameRef(n) => n.name(),
                other => panic!("expected name ref, got {other:?}"),
            })
            .collect();
        assert_eq!(arg_names, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn binary_expr_nests_by_precedence() {
        let cst = parse("a + b * c").unwrap();
        let root = Root::cast(cst.syntax()).unwrap();
        let top = match root.expr().unwrap() {
            Expr::Binary(b) => b,
            other => panic!("expected top-level binary, got {other:?}"),
        };
        assert_eq!(top.op(), "+");
        assert!(matches!(top.lhs(), Expr::NameRef(_)));
        assert!(matches!(top.rhs(), Expr::Binary(_)));
    }
}
