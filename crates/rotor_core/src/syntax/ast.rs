//! Syntax-tree node definitions.
//!
//! Every node retains the [`Token`]s it consumed, so a tree can be related
//! back to the exact source text for diagnostics and round-tripping.  A
//! node's span is the span around its first and last consumed token.

use crate::lexer::Token;
use crate::source::Span;

// ─────────────────────────────────────────────────────────────────────────────
// Expressions
// ─────────────────────────────────────────────────────────────────────────────

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A plain identifier reference.
    Identifier(Ident),
    /// A string literal.
    String(StringLit),
    /// A numeric literal.
    Number(NumberLit),
    /// `object . property`
    Member(Box<MemberExpr>),
    /// `callee ( arguments )`
    Call(Box<CallExpr>),
}

impl Expr {
    /// Returns the source location of this expression.
    pub fn span(&self) -> Span {
        match self {
            Expr::Identifier(e) => e.token.span.clone(),
            Expr::String(e) => e.token.span.clone(),
            Expr::Number(e) => e.token.span.clone(),
            Expr::Member(e) => e.span(),
            Expr::Call(e) => e.span(),
        }
    }
}

/// An identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    /// The identifier token.
    pub token: Token,
}

impl Ident {
    /// The identifier text.
    pub fn name(&self) -> &str {
        &self.token.text
    }
}

/// A string literal.  The token payload keeps its surrounding quotes.
#[derive(Debug, Clone, PartialEq)]
pub struct StringLit {
    /// The string token.
    pub token: Token,
}

/// A numeric literal.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberLit {
    /// The number token.
    pub token: Token,
}

/// `object . property`
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpr {
    /// The expression before the dot.
    pub object: Expr,
    /// The `.` token.
    pub dot: Token,
    /// The property name after the dot.
    pub property: Ident,
}

impl MemberExpr {
    /// Returns the source location of this expression.
    pub fn span(&self) -> Span {
        Span::around(&self.object.span(), &self.property.token.span)
    }
}

/// `callee ( arguments )`
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    /// The expression being called.
    pub callee: Expr,
    /// The `(` token.
    pub open_paren: Token,
    /// The arguments, each with its optional trailing comma.
    pub arguments: Vec<CallArgument>,
    /// The `)` token.
    pub close_paren: Token,
}

impl CallExpr {
    /// Returns the source location of this expression.
    pub fn span(&self) -> Span {
        Span::around(&self.callee.span(), &self.close_paren.span)
    }
}

/// One call argument plus the `,` that followed it, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct CallArgument {
    /// The argument expression.
    pub expression: Expr,
    /// The trailing `,` token, if present.
    pub comma: Option<Token>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Statements
// ─────────────────────────────────────────────────────────────────────────────

/// A statement node — the unit the syntactic stage emits.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Expression statement (`expr ;`).
    Expr(ExprStmt),
}

impl Stmt {
    /// Returns the source location of this statement.
    pub fn span(&self) -> Span {
        match self {
            Stmt::Expr(s) => s.span(),
        }
    }
}

/// Expression statement: `expr ;`
#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    /// The expression.
    pub expression: Expr,
    /// The `;` token, if present.
    pub semicolon: Option<Token>,
}

impl ExprStmt {
    /// Returns the source location of this statement.
    pub fn span(&self) -> Span {
        match &self.semicolon {
            Some(semi) => Span::around(&self.expression.span(), &semi.span),
            None => self.expression.span(),
        }
    }
}
