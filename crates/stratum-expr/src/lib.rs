//! Arithmetic expression language: tokenizer, lossless CST, unbound AST,
//! binder, and evaluator.
//!
//! The pipeline is `tokenize -> parse -> CST -> unbound AST -> bind -> eval`.
//! The CST and the unbound AST are deliberately separate types: the CST
//! preserves trivia for exact source round-tripping, the unbound AST drops it
//! for evaluation. Binding resolves names against a caller-supplied
//! environment; evaluation needs no further name resolution.

mod ast;
mod binder;
mod cst;
mod evaluator;
mod parser;
mod signature;
mod syntax_error;
mod syntax_kind;
mod token;
mod tokenizer;
mod unbound;

pub use ast::{ArgList, AstNode, BinaryExpr, CallExpr, Expr, Literal, NameRef, ParenExpr, Root, UnaryExpr};
pub use binder::{bind, BindError, BoundExpression, VariableReference};
pub use cst::Cst;
pub use evaluator::{evaluate, EvalError};
pub use parser::parse;
pub use signature::{ArgumentDesc, FunctionSignature, SignatureMismatch, UnionType};
pub use syntax_error::SyntaxError;
pub use syntax_kind::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
pub use token::{Token, TokenKind};
pub use tokenizer::Tokenizer;
pub use unbound::UnboundExpr;
