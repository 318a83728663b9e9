//! The ECMAScript grammar subset, as parser coroutines over [`Token`]s.
//!
//! Productions register on their abstract base in a process-wide
//! [`GrammarRegistry`], initialised on first use and read-only thereafter:
//! statement variants are tried with `first`, and expression *modifiers*
//! (member access, calls) are applied in a loop that wraps the expression
//! parsed so far — left recursion flattened into iteration.
//!
//! Trivia (whitespace, line terminators, comments) is skipped before every
//! significant token; skipped trivia that precedes a failed optional match
//! is rolled back along with it.

use std::sync::OnceLock;

use crate::engine::{parser_coroutine, Ctx, Engine, Failure, ParseFuture};
use crate::lexer::{Token, TokenKind};
use crate::syntax::ast::{
    CallArgument, CallExpr, Expr, ExprStmt, Ident, MemberExpr, NumberLit, Stmt, StringLit,
};

/// Combinator context over tokens.
pub type TokenCtx<'co> = Ctx<'co, Token>;

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

/// A statement variant: tried by `Statement` via first-choice.
pub type StatementRule = for<'a> fn(&'a TokenCtx<'a>) -> ParseFuture<'a, Stmt>;
/// A primary-expression variant.
pub type PrimaryRule = for<'a> fn(&'a TokenCtx<'a>) -> ParseFuture<'a, Expr>;
/// An expression modifier: wraps the expression parsed so far.
pub type ModifierRule = for<'a> fn(&'a TokenCtx<'a>, Expr) -> ParseFuture<'a, Expr>;

/// Ordered lists of concrete productions per abstract base.
#[derive(Default)]
pub struct GrammarRegistry {
    statements: Vec<StatementRule>,
    primaries: Vec<PrimaryRule>,
    modifiers: Vec<ModifierRule>,
}

impl GrammarRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a `Statement` variant.
    pub fn register_statement(&mut self, rule: StatementRule) {
        self.statements.push(rule);
    }

    /// Register a `PrimaryExpression` variant.
    pub fn register_primary(&mut self, rule: PrimaryRule) {
        self.primaries.push(rule);
    }

    /// Register an `Expression` modifier.
    pub fn register_modifier(&mut self, rule: ModifierRule) {
        self.modifiers.push(rule);
    }

    /// The registry with every production of the current grammar subset.
    fn standard() -> Self {
        let mut registry = Self::new();
        registry.register_statement(expression_statement);
        registry.register_primary(identifier_expression);
        registry.register_primary(literal_expression);
        registry.register_modifier(member_expression);
        registry.register_modifier(call_expression);
        registry
    }
}

static REGISTRY: OnceLock<GrammarRegistry> = OnceLock::new();

/// The process-wide production registry.
pub fn registry() -> &'static GrammarRegistry {
    REGISTRY.get_or_init(GrammarRegistry::standard)
}

// ─────────────────────────────────────────────────────────────────────────────
// Trivia and token helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Consume any run of comments, whitespace, and line terminators.
async fn skip_trivia(cx: &TokenCtx<'_>) -> Result<(), Failure> {
    cx.many(|| cx.consume_matching(TokenKind::TRIVIA)).await?;
    Ok(())
}

/// The next significant token, which must match `kind`.
async fn significant_kind(cx: &TokenCtx<'_>, kind: TokenKind) -> Result<Token, Failure> {
    skip_trivia(cx).await?;
    cx.consume_matching(kind).await
}

/// The next significant token, which must be the punctuator `text`.
async fn significant_punct(cx: &TokenCtx<'_>, text: &str) -> Result<Token, Failure> {
    skip_trivia(cx).await?;
    cx.consume_exact(TokenKind::PUNCTUATOR, text).await
}

// ─────────────────────────────────────────────────────────────────────────────
// Expression
// ─────────────────────────────────────────────────────────────────────────────

/// *Expression* = *PrimaryExpression* wrapped by zero or more modifiers.
pub fn expression<'a>(cx: &'a TokenCtx<'a>) -> ParseFuture<'a, Expr> {
    Box::pin(async move {
        let reg = registry();
        let primaries: Vec<ParseFuture<'_, Expr>> =
            reg.primaries.iter().map(|rule| rule(cx)).collect();
        let mut expr = cx.first(primaries).await?;

        // Apply modifiers until none match.
        'grow: loop {
            for rule in &reg.modifiers {
                if let Some(wrapped) = cx.maybe(rule(cx, expr.clone())).await? {
                    expr = wrapped;
                    continue 'grow;
                }
            }
            break;
        }
        Ok(expr)
    })
}

fn identifier_expression<'a>(cx: &'a TokenCtx<'a>) -> ParseFuture<'a, Expr> {
    Box::pin(async move {
        let token = significant_kind(cx, TokenKind::IDENTIFIER).await?;
        Ok(Expr::Identifier(Ident { token }))
    })
}

fn literal_expression<'a>(cx: &'a TokenCtx<'a>) -> ParseFuture<'a, Expr> {
    Box::pin(async move {
        let token = significant_kind(cx, TokenKind::LITERAL).await?;
        Ok(if token.matches(TokenKind::STRING) {
            Expr::String(StringLit { token })
        } else {
            Expr::Number(NumberLit { token })
        })
    })
}

/// `prev . Identifier` — the dot is recoverable, the identifier is not.
fn member_expression<'a>(cx: &'a TokenCtx<'a>, object: Expr) -> ParseFuture<'a, Expr> {
    Box::pin(async move {
        let dot = significant_punct(cx, ".").await?;
        let property = cx
            .fatal(significant_kind(cx, TokenKind::IDENTIFIER))
            .await?;
        Ok(Expr::Member(Box::new(MemberExpr {
            object,
            dot,
            property: Ident { token: property },
        })))
    })
}

/// `prev ( Argument,* )` — everything after the `(` is committed.
fn call_expression<'a>(cx: &'a TokenCtx<'a>, callee: Expr) -> ParseFuture<'a, Expr> {
    Box::pin(async move {
        let open_paren = significant_punct(cx, "(").await?;
        let (arguments, close_paren) = cx.fatal(call_arguments(cx)).await?;
        Ok(Expr::Call(Box::new(CallExpr {
            callee,
            open_paren,
            arguments,
            close_paren,
        })))
    })
}

/// The argument list and closing `)`.
///
/// After an argument without a comma the next token must be `)`; after a
/// comma, another argument or `)` (trailing commas accepted).
async fn call_arguments(cx: &TokenCtx<'_>) -> Result<(Vec<CallArgument>, Token), Failure> {
    let mut arguments = Vec::new();
    loop {
        if let Some(close) = cx.maybe(significant_punct(cx, ")")).await? {
            return Ok((arguments, close));
        }
        let expression = expression(cx).await.map_err(|failure| {
            if failure.is_fatal() {
                failure
            } else {
                failure.with_message("Expression or ) expected")
            }
        })?;
        let comma = cx.maybe(significant_punct(cx, ",")).await?;
        let has_comma = comma.is_some();
        arguments.push(CallArgument { expression, comma });
        if !has_comma {
            let close = significant_punct(cx, ")").await.map_err(|failure| {
                if failure.is_fatal() {
                    failure
                } else {
                    failure.with_message(") expected")
                }
            })?;
            return Ok((arguments, close));
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Statement
// ─────────────────────────────────────────────────────────────────────────────

fn expression_statement<'a>(cx: &'a TokenCtx<'a>) -> ParseFuture<'a, Stmt> {
    Box::pin(async move {
        let expr = expression(cx).await?;
        let semicolon = cx.maybe(significant_punct(cx, ";")).await?;
        Ok(Stmt::Expr(ExprStmt {
            expression: expr,
            semicolon,
        }))
    })
}

/// The top-level coroutine body: skip leading trivia, then parse exactly one
/// statement — or report no more output if only trivia remained.
pub async fn next_statement(cx: &TokenCtx<'_>) -> Result<Option<Stmt>, Failure> {
    skip_trivia(cx).await?;
    if cx.try_peek().await.is_none() {
        return Ok(None);
    }
    let branches: Vec<ParseFuture<'_, Stmt>> =
        registry().statements.iter().map(|rule| rule(cx)).collect();
    cx.first(branches).await.map(Some)
}

/// Build the syntactic-stage engine: [`Token`]s in, [`Stmt`]s out.
pub fn parser() -> Engine<Token, Stmt> {
    Engine::new(|| {
        parser_coroutine(|co| async move {
            let cx = Ctx::new(&co);
            next_statement(&cx).await
        })
    })
}
