//! The syntactic stage: [`Token`](crate::lexer::Token)s in, syntax-tree
//! nodes out.
//!
//! - [`ast`] — node definitions, each retaining its consumed tokens.
//! - [`grammar`] — the grammar productions, registry, and the
//!   [`grammar::parser`] engine constructor.

/// Syntax-tree node definitions.
pub mod ast;
/// Grammar productions and the production registry.
pub mod grammar;

pub use ast::{CallArgument, CallExpr, Expr, ExprStmt, Ident, MemberExpr, NumberLit, Stmt, StringLit};
pub use grammar::{parser, registry, GrammarRegistry, TokenCtx};
