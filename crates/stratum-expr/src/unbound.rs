//! The trivia-free unbound AST: the evaluation substrate produced from a CST
//! by a total function (every syntactically valid CST lowers to exactly one
//! tree — there is nothing left to fail on here).

use stratum_value::Variant;

use crate::ast::{self, AstNode, Expr as CstExpr};
use crate::cst::Cst;
use crate::syntax_kind::SyntaxKind;

/// An expression with every name still unresolved.
#[derive(Debug, Clone, PartialEq)]
pub enum UnboundExpr {
    Value(Variant),
    Variable(String),
    Unary {
        op: String,
        operand: Box<UnboundExpr>,
    },
    Binary {
        op: String,
        lhs: Box<UnboundExpr>,
        rhs: Box<UnboundExpr>,
    },
    Function {
        name: String,
        args: Vec<UnboundExpr>,
    },
}

/// Lower a parsed CST into its unbound AST.
pub fn lower(cst: &Cst) -> UnboundExpr {
    let root = ast::Root::cast(cst.syntax()).expect("Cst::syntax() is always a ROOT node");
    let expr = root.expr().expect("a successfully parsed CST always has a top-level expression");
    from_cst(expr)
}

fn from_cst(expr: CstExpr) -> UnboundExpr {
    match expr {
        CstExpr::Literal(literal) => UnboundExpr::Value(literal_value(&literal)),
        CstExpr::NameRef(name_ref) => UnboundExpr::Variable(name_ref.name()),
        CstExpr::Unary(unary) => UnboundExpr::Unary {
            op: unary.op(),
            operand: Box::new(from_cst(unary.operand())),
        },
        CstExpr::Binary(binary) => UnboundExpr::Binary {
            op: binary.op(),
            lhs: Box::new(from_cst(binary.lhs())),
            rhs: Box::new(from_cst(binary.rhs())),
        },
        CstExpr::Paren(paren) => from_cst(paren.inner()),
        CstExpr::Call(call) => UnboundExpr::Function {
            name: call.name_ref().name(),
            args: call.args().args().map(from_cst).collect(),
        },
    }
}

fn literal_value(literal: &ast::Literal) -> Variant {
    let token = literal.token();
    let digits: String = token.text().chars().filter(|c| *c != '_').collect();
    match token.kind() {
        SyntaxKind::INT => Variant::int(
            digits
                .parse()
                .unwrap_or_else(|_| panic!("tokenizer only ever produces valid int text, got {digits:?}")),
        ),
        SyntaxKind::DOUBLE => Variant::double(
            digits
                .parse()
                .unwrap_or_else(|_| panic!("tokenizer only ever produces valid double text, got {digits:?}")),
        ),
        other => unreachable!("LITERAL token is always INT or DOUBLE, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;

    use super::*;

    fn lower_source(source: &str) -> UnboundExpr {
        lower(&parse(source).unwrap())
    }

    #[test]
    fn literals_lower_to_values() {
        assert_eq!(lower_source("42"), UnboundExpr::Value(Variant::int(42)));
        assert_eq!(lower_source("1_000"), UnboundExpr::Value(Variant::int(1000)));
        assert_eq!(lower_source("1.5"), UnboundExpr::Value(Variant::double(1.5)));
    }

    #[test]
    fn precedence_shapes_the_tree() {
        let tree = lower_source("a + b * c");
        match tree {
            UnboundExpr::Binary { op, lhs, rhs } => {
                assert_eq!(op, "+");
                assert_eq!(*lhs, UnboundExpr::Variable("a".into()));
                assert!(matches!(*rhs, UnboundExpr::Binary { .. }));
            }
            other => panic!("expected top-level binary, got {other:?}"),
        }
    }

    #[test]
    fn parens_disappear_in_the_unbound_tree() {
        assert_eq!(lower_source("(a)"), UnboundExpr::Variable("a".into()));
    }

    #[test]
    fn function_calls_lower_with_their_arguments() {
        let tree = lower_source("fun(x, y)");
        match tree {
            UnboundExpr::Function { name, args } => {
                assert_eq!(name, "fun");
                assert_eq!(args, vec![UnboundExpr::Variable("x".into()), UnboundExpr::Variable("y".into())]);
            }
            other => panic!("expected function call, got {other:?}"),
        }
    }

    #[test]
    fn binding_the_same_ast_twice_is_deterministic() {
        assert_eq!(lower_source("a + b * c"), lower_source("a + b * c"));
    }

    #[test]
    fn unbound_tree_dump_for_the_canonical_precedence_example() {
        insta::assert_debug_snapshot!(lower_source("a + b * c"), @r###"
        Binary {
            op: "+",
            lhs: Variable(
                "a",
            ),
            rhs: Binary {
                op: "*",
                lhs: Variable(
                    "b",
                ),
                rhs: Variable(
                    "c",
                ),
            },
        }
        "###);
    }
}
