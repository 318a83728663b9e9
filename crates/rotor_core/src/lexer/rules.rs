//! ECMAScript lexical rules.
//!
//! The tokenizer is a dispatch coroutine over [`CodePoint`]s: given the
//! first code point it selects the matching token rule, drives it to
//! completion, and returns the [`TokenKind`]; the surrounding [`Scan`]
//! assembles the payload and span from the code points the rule consumed.
//!
//! Context-sensitive behaviour (template substitution gaps, the regexp /
//! division ambiguity) lives in [`LexState`], which is shared across
//! coroutine invocations but is invisible to the parser engine.

use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::{parser_coroutine, Ctx, Engine, Failure};
use crate::lexer::token::{Token, TokenKind};
use crate::source::{CodePoint, Span};

// ─────────────────────────────────────────────────────────────────────────────
// Character classification
// ─────────────────────────────────────────────────────────────────────────────

/// Code points the `LineTerminator` token rule consumes.
fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Code points the `Whitespace` token rule consumes.
fn is_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t'                        // CHARACTER TABULATION
        | '\x0B'                    // LINE TABULATION
        | '\x0C'                    // FORM FEED
        | ' '                       // SPACE
        | '\u{00A0}'                // NO-BREAK SPACE
        | '\u{FEFF}'                // ZERO WIDTH NO-BREAK SPACE (BOM)
        | '\u{2000}'..='\u{200F}'   // EN QUAD … RIGHT-TO-LEFT MARK
        | '\u{2028}'
        | '\u{2029}'
        | '\u{205F}'                // MEDIUM MATHEMATICAL SPACE
        | '\u{3000}'                // IDEOGRAPHIC SPACE
    )
}

/// Characters that may start an identifier.
fn is_id_start(c: char) -> bool {
    c == '$' || c == '_' || c.is_alphabetic()
}

/// Characters that may continue an identifier.
fn is_id_continue(c: char) -> bool {
    c == '$' || c == '_' || c == '\u{200C}' || c == '\u{200D}' || c.is_alphanumeric()
}

/// First characters of the punctuator alphabet (`/` is handled by the
/// slash rule, which also owns comments and regexps).
fn is_punctuator_start(c: char) -> bool {
    matches!(
        c,
        '{' | '}'
            | '('
            | ')'
            | '['
            | ']'
            | '.'
            | ';'
            | ','
            | '~'
            | '?'
            | ':'
            | '<'
            | '>'
            | '='
            | '!'
            | '+'
            | '-'
            | '*'
            | '%'
            | '&'
            | '|'
            | '^'
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Lexer mode state
// ─────────────────────────────────────────────────────────────────────────────

/// Mode state shared by all tokenizer coroutine invocations.
///
/// Tracks template-substitution nesting (so `}` can re-enter template
/// scanning) and the last significant token (so `/` can pick between
/// regexp and division).
#[derive(Debug, Default)]
struct LexState {
    /// Kind and payload of the most recent non-trivia token.
    last_significant: Option<(TokenKind, String)>,
    /// `brace_depth` recorded when entering each template substitution.
    /// When `}` appears and the depth matches the top entry, the `}`
    /// closes the substitution.
    template_stack: SmallVec<[usize; 4]>,
    /// Nesting depth of plain `{…}` braces.
    brace_depth: usize,
}

impl LexState {
    /// Whether a `/` in the current context opens a regular expression
    /// rather than a division operator.
    ///
    /// `/` is division only after a token that ends a value expression:
    /// an identifier, a literal, a closing template or regexp, `)`, `]`,
    /// `++`, or `--`.  Every other context is regexp.
    fn slash_is_regexp(&self) -> bool {
        match &self.last_significant {
            None => true,
            Some((kind, text)) => {
                if kind.intersects(
                    TokenKind::IDENTIFIER
                        | TokenKind::LITERAL
                        | TokenKind::TEMPLATE
                        | TokenKind::TEMPLATE_TAIL
                        | TokenKind::REGEXP,
                ) {
                    false
                } else if *kind == TokenKind::PUNCTUATOR {
                    !matches!(text.as_str(), ")" | "]" | "++" | "--")
                } else {
                    true
                }
            }
        }
    }

    /// `true` when the next `}` closes a template substitution.
    fn in_template_gap(&self) -> bool {
        self.template_stack.last() == Some(&self.brace_depth)
    }

    /// Record a produced token's effect on the mode state.
    fn note(&mut self, token: &Token) {
        if token.kind == TokenKind::TEMPLATE_HEAD || token.kind == TokenKind::TEMPLATE_MIDDLE {
            self.template_stack.push(self.brace_depth);
        } else if token.kind == TokenKind::PUNCTUATOR {
            match token.text.as_str() {
                "{" => self.brace_depth += 1,
                "}" => self.brace_depth = self.brace_depth.saturating_sub(1),
                _ => {}
            }
        }
        if !token.kind.intersects(TokenKind::TRIVIA) {
            self.last_significant = Some((token.kind, token.text.clone()));
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scan: payload and span assembly
// ─────────────────────────────────────────────────────────────────────────────

/// Accumulates the code points a token rule consumes into the token's
/// payload and span.
struct Scan<'a, 'co> {
    cx: &'a Ctx<'co, CodePoint>,
    text: String,
    first: Option<Span>,
    last: Option<Span>,
}

impl<'a, 'co> Scan<'a, 'co> {
    fn new(cx: &'a Ctx<'co, CodePoint>) -> Self {
        Self {
            cx,
            text: String::new(),
            first: None,
            last: None,
        }
    }

    /// The current code point, if any.
    async fn peek(&self) -> Option<char> {
        self.cx.try_peek().await.map(|cp| cp.value)
    }

    /// The code point after the current one, if any.  Implemented with a
    /// cursor save/restore so nothing is committed.
    async fn peek_second(&self) -> Option<char> {
        let entry = self.cx.position().await;
        if self.cx.try_consume().await.is_none() {
            return None;
        }
        let second = self.cx.try_peek().await.map(|cp| cp.value);
        self.cx.set_position(entry).await;
        second
    }

    /// Consume the current code point into the token being built.
    async fn bump(&mut self) -> Result<char, Failure> {
        let cp = self.cx.consume().await?;
        if self.first.is_none() {
            self.first = Some(cp.span.clone());
        }
        self.text.push(cp.value);
        self.last = Some(cp.span);
        Ok(cp.value)
    }

    /// Consume the current code point iff it equals `expected`.
    async fn bump_if(&mut self, expected: char) -> Result<bool, Failure> {
        if self.peek().await == Some(expected) {
            self.bump().await?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// A fatal failure anchored at the token consumed so far.
    fn unterminated(&self, message: &str, at_end: bool) -> Failure {
        let mut failure = Failure::fatal(message);
        failure.at_end = at_end;
        match (&self.first, &self.last) {
            (Some(first), Some(last)) => failure.with_span(Span::around(first, last)),
            _ => failure,
        }
    }

    /// Finish the token with the rule's kind.
    fn token(self, kind: TokenKind) -> Token {
        let first = self.first.expect("token assembled from no code points");
        let last = self.last.expect("token assembled from no code points");
        Token {
            kind,
            text: self.text,
            span: Span::around(&first, &last),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Token rules
// ─────────────────────────────────────────────────────────────────────────────

/// `"…"` / `'…'`.  Backslash escapes any following code point; a line
/// terminator or end of input inside the literal is fatal.
async fn string_literal(scan: &mut Scan<'_, '_>) -> Result<TokenKind, Failure> {
    let quote = scan.bump().await?;
    loop {
        match scan.peek().await {
            None => return Err(scan.unterminated("Unclosed string literal", true)),
            Some(c) if is_line_terminator(c) => {
                return Err(scan.unterminated("Unclosed string literal", false));
            }
            Some(c) if c == quote => {
                scan.bump().await?;
                return Ok(TokenKind::STRING);
            }
            Some('\\') => {
                scan.bump().await?;
                if scan.peek().await.is_none() {
                    return Err(scan.unterminated("Unclosed string literal", true));
                }
                scan.bump().await?;
            }
            Some(_) => {
                scan.bump().await?;
            }
        }
    }
}

/// Template characters after `` ` `` or after a substitution-closing `}`.
/// Returns `true` when the body ended at `${` (a substitution follows).
async fn template_body(scan: &mut Scan<'_, '_>) -> Result<bool, Failure> {
    loop {
        match scan.peek().await {
            None => return Err(scan.unterminated("Unclosed template literal", true)),
            Some('`') => {
                scan.bump().await?;
                return Ok(false);
            }
            Some('$') if scan.peek_second().await == Some('{') => {
                scan.bump().await?;
                scan.bump().await?;
                return Ok(true);
            }
            Some('\\') => {
                scan.bump().await?;
                if scan.peek().await.is_none() {
                    return Err(scan.unterminated("Unclosed template literal", true));
                }
                scan.bump().await?;
            }
            Some(_) => {
                scan.bump().await?;
            }
        }
    }
}

/// `` `…` `` or `` `…${ ``.
async fn template_open(scan: &mut Scan<'_, '_>) -> Result<TokenKind, Failure> {
    scan.bump().await?; // `
    Ok(if template_body(scan).await? {
        TokenKind::TEMPLATE_HEAD
    } else {
        TokenKind::TEMPLATE
    })
}

/// `}` — either a plain punctuator or, in a template gap, the start of
/// `}…${` / ``}…` ``.
async fn right_brace(
    scan: &mut Scan<'_, '_>,
    state: &Rc<RefCell<LexState>>,
) -> Result<TokenKind, Failure> {
    let closes_substitution = state.borrow().in_template_gap();
    if closes_substitution {
        state.borrow_mut().template_stack.pop();
        scan.bump().await?; // }
        Ok(if template_body(scan).await? {
            TokenKind::TEMPLATE_MIDDLE
        } else {
            TokenKind::TEMPLATE_TAIL
        })
    } else {
        scan.bump().await?;
        Ok(TokenKind::PUNCTUATOR)
    }
}

/// `/pattern/flags`.  The opening `/` has not been consumed yet.
async fn regexp_literal(scan: &mut Scan<'_, '_>) -> Result<TokenKind, Failure> {
    scan.bump().await?; // /
    let mut in_class = false;
    loop {
        match scan.peek().await {
            None => return Err(scan.unterminated("Unclosed regular expression literal", true)),
            Some(c) if is_line_terminator(c) => {
                return Err(scan.unterminated("Unclosed regular expression literal", false));
            }
            Some('[') => {
                in_class = true;
                scan.bump().await?;
            }
            Some(']') => {
                in_class = false;
                scan.bump().await?;
            }
            Some('/') if !in_class => {
                scan.bump().await?;
                break;
            }
            Some('\\') => {
                scan.bump().await?;
                match scan.peek().await {
                    None => {
                        return Err(
                            scan.unterminated("Unclosed regular expression literal", true)
                        );
                    }
                    Some(c) if is_line_terminator(c) => {
                        return Err(
                            scan.unterminated("Unclosed regular expression literal", false)
                        );
                    }
                    Some(_) => {
                        scan.bump().await?;
                    }
                }
            }
            Some(_) => {
                scan.bump().await?;
            }
        }
    }
    while matches!(scan.peek().await, Some(c) if c.is_ascii_alphabetic()) {
        scan.bump().await?;
    }
    Ok(TokenKind::REGEXP)
}

/// `/` — line comment, block comment, regexp, `/=`, or `/`.
async fn slash(
    scan: &mut Scan<'_, '_>,
    state: &Rc<RefCell<LexState>>,
) -> Result<TokenKind, Failure> {
    match scan.peek_second().await {
        Some('/') => {
            scan.bump().await?;
            scan.bump().await?;
            while matches!(scan.peek().await, Some(c) if !is_line_terminator(c)) {
                scan.bump().await?;
            }
            Ok(TokenKind::LINE_COMMENT)
        }
        Some('*') => {
            scan.bump().await?;
            scan.bump().await?;
            loop {
                match scan.peek().await {
                    None => return Err(scan.unterminated("Unclosed block comment", true)),
                    Some('*') if scan.peek_second().await == Some('/') => {
                        scan.bump().await?;
                        scan.bump().await?;
                        return Ok(TokenKind::BLOCK_COMMENT);
                    }
                    Some(_) => {
                        scan.bump().await?;
                    }
                }
            }
        }
        _ => {
            let regexp = state.borrow().slash_is_regexp();
            if regexp {
                regexp_literal(scan).await
            } else {
                scan.bump().await?; // /
                scan.bump_if('=').await?;
                Ok(TokenKind::PUNCTUATOR)
            }
        }
    }
}

/// One or more whitespace code points.
async fn whitespace_run(scan: &mut Scan<'_, '_>) -> Result<TokenKind, Failure> {
    scan.bump().await?;
    while matches!(scan.peek().await, Some(c) if is_whitespace(c)) {
        scan.bump().await?;
    }
    Ok(TokenKind::WHITESPACE)
}

/// One or more line terminators; CRLF is one token covering both.
async fn line_terminator_run(scan: &mut Scan<'_, '_>) -> Result<TokenKind, Failure> {
    scan.bump().await?;
    while matches!(scan.peek().await, Some(c) if is_line_terminator(c)) {
        scan.bump().await?;
    }
    Ok(TokenKind::LINE_TERMINATOR)
}

/// `[$_ L][$_ L N ZWNJ ZWJ]*`.
async fn identifier(scan: &mut Scan<'_, '_>) -> Result<TokenKind, Failure> {
    scan.bump().await?;
    while matches!(scan.peek().await, Some(c) if is_id_continue(c)) {
        scan.bump().await?;
    }
    Ok(TokenKind::IDENTIFIER)
}

/// A run of ASCII decimal digits.
async fn integer_literal(scan: &mut Scan<'_, '_>) -> Result<TokenKind, Failure> {
    scan.bump().await?;
    while matches!(scan.peek().await, Some(c) if c.is_ascii_digit()) {
        scan.bump().await?;
    }
    Ok(TokenKind::INTEGER)
}

/// Maximal-munch decision tree over the punctuator alphabet.
async fn punctuator(scan: &mut Scan<'_, '_>) -> Result<TokenKind, Failure> {
    let first = scan.bump().await?;
    match first {
        '<' => {
            // <= << <<=
            if scan.bump_if('<').await? {
                scan.bump_if('=').await?;
            } else {
                scan.bump_if('=').await?;
            }
        }
        '>' => {
            // >= >> >>= >>> >>>=
            if scan.bump_if('>').await? {
                if scan.bump_if('>').await? {
                    scan.bump_if('=').await?;
                } else {
                    scan.bump_if('=').await?;
                }
            } else {
                scan.bump_if('=').await?;
            }
        }
        '=' => {
            // == ===
            if scan.bump_if('=').await? {
                scan.bump_if('=').await?;
            }
        }
        '!' => {
            // != !==
            if scan.bump_if('=').await? {
                scan.bump_if('=').await?;
            }
        }
        '+' => {
            if !scan.bump_if('+').await? {
                scan.bump_if('=').await?;
            }
        }
        '-' => {
            if !scan.bump_if('-').await? {
                scan.bump_if('=').await?;
            }
        }
        '&' => {
            if !scan.bump_if('&').await? {
                scan.bump_if('=').await?;
            }
        }
        '|' => {
            if !scan.bump_if('|').await? {
                scan.bump_if('=').await?;
            }
        }
        '*' | '%' | '^' => {
            scan.bump_if('=').await?;
        }
        _ => {} // { } ( ) [ ] . ; , ~ ? :
    }
    Ok(TokenKind::PUNCTUATOR)
}

// ─────────────────────────────────────────────────────────────────────────────
// Dispatch
// ─────────────────────────────────────────────────────────────────────────────

/// Produce one token: dispatch on the first code point, drive the matching
/// rule to completion, and fold the token's effect into the mode state.
async fn next_token(
    cx: &Ctx<'_, CodePoint>,
    state: &Rc<RefCell<LexState>>,
) -> Result<Token, Failure> {
    let mut scan = Scan::new(cx);
    let first = cx.peek().await?.value;

    let kind = match first {
        '"' | '\'' => string_literal(&mut scan).await?,
        '`' => template_open(&mut scan).await?,
        '}' => right_brace(&mut scan, state).await?,
        '/' => slash(&mut scan, state).await?,
        c if is_whitespace(c) => whitespace_run(&mut scan).await?,
        c if is_line_terminator(c) => line_terminator_run(&mut scan).await?,
        c if is_id_start(c) => identifier(&mut scan).await?,
        c if c.is_ascii_digit() => integer_literal(&mut scan).await?,
        c if is_punctuator_start(c) => punctuator(&mut scan).await?,
        _ => {
            // No rule matched: consume one code point as Unknown.  The
            // lexer never fails on unexpected input; diagnostics happen
            // at the syntactic layer.
            scan.bump().await?;
            TokenKind::UNKNOWN
        }
    };

    let token = scan.token(kind);
    state.borrow_mut().note(&token);
    Ok(token)
}

/// Build the lexical-stage engine: [`CodePoint`]s in, [`Token`]s out.
pub fn tokenizer() -> Engine<CodePoint, Token> {
    let state = Rc::new(RefCell::new(LexState::default()));
    Engine::new(move || {
        let state = Rc::clone(&state);
        parser_coroutine(move |co| async move {
            let cx = Ctx::new(&co);
            next_token(&cx, &state).await.map(Some)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{CodePointStream, Scheme, SourceUrl};

    fn lex_result(source: &str) -> Result<Vec<Token>, Failure> {
        let url = Rc::new(SourceUrl::new(Scheme::File, "/test.js"));
        let mut cps = CodePointStream::new(url);
        let mut engine = tokenizer();
        let mut tokens = engine.feed(cps.push(source))?;
        tokens.extend(engine.finish()?);
        Ok(tokens)
    }

    fn lex(source: &str) -> Vec<Token> {
        lex_result(source).expect("lex failed")
    }

    /// Kinds of the non-trivia tokens.
    fn significant(source: &str) -> Vec<(TokenKind, String)> {
        lex(source)
            .into_iter()
            .filter(|t| !t.matches(TokenKind::TRIVIA))
            .map(|t| (t.kind, t.text))
            .collect()
    }

    fn texts(source: &str) -> Vec<String> {
        lex(source).into_iter().map(|t| t.text).collect()
    }

    // ── Coverage and spans ──────────────────────────────────────────────────

    #[test]
    fn test_payloads_reproduce_source() {
        let source = "let x = 1; // done\n  f(\"s\")";
        let joined: String = lex(source).iter().map(|t| t.text.as_str()).collect();
        assert_eq!(joined, source);
    }

    #[test]
    fn test_spans_are_contiguous() {
        let tokens = lex("a + b\n\"str\"");
        for pair in tokens.windows(2) {
            assert_eq!(pair[0].span.end, pair[1].span.begin);
        }
    }

    #[test]
    fn test_span_length_matches_payload() {
        for token in lex("ab \"cd\" /*x*/ >>>= é") {
            assert_eq!(token.span.len(), token.text.chars().count());
        }
    }

    // ── Strings ─────────────────────────────────────────────────────────────

    #[test]
    fn test_string_with_escaped_quote() {
        let tokens = lex(r#""a\"b""#);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::STRING);
        assert_eq!(tokens[0].text, r#""a\"b""#);
    }

    #[test]
    fn test_single_quoted_string() {
        let tokens = lex("'hi'");
        assert_eq!(tokens[0].kind, TokenKind::STRING);
    }

    #[test]
    fn test_unterminated_string_is_fatal() {
        let failure = lex_result("'oops").unwrap_err();
        assert!(failure.is_fatal());
        assert_eq!(failure.message, "Unclosed string literal");
    }

    #[test]
    fn test_string_with_line_terminator_is_fatal() {
        let failure = lex_result("'a\nb'").unwrap_err();
        assert!(failure.is_fatal());
        assert_eq!(failure.message, "Unclosed string literal");
    }

    // ── Punctuators ─────────────────────────────────────────────────────────

    #[test]
    fn test_longest_punctuator_wins() {
        assert_eq!(texts(">>>="), vec![">>>="]);
        assert_eq!(texts(">>>"), vec![">>>"]);
        assert_eq!(texts(">>"), vec![">>"]);
        assert_eq!(texts(">="), vec![">="]);
    }

    #[test]
    fn test_punctuator_sequences() {
        assert_eq!(
            significant("=== !== <<= ++ -- &&")
                .into_iter()
                .map(|(_, t)| t)
                .collect::<Vec<_>>(),
            vec!["===", "!==", "<<=", "++", "--", "&&"]
        );
    }

    #[test]
    fn test_adjacent_punctuators_split_greedily() {
        // `<<<` is `<<` then `<`.
        assert_eq!(texts("<<<"), vec!["<<", "<"]);
    }

    // ── Comments ────────────────────────────────────────────────────────────

    #[test]
    fn test_line_comment_stops_before_terminator() {
        let tokens = lex("// c\nx");
        assert_eq!(tokens[0].kind, TokenKind::LINE_COMMENT);
        assert_eq!(tokens[0].text, "// c");
        assert_eq!(tokens[1].kind, TokenKind::LINE_TERMINATOR);
        assert_eq!(tokens[2].kind, TokenKind::IDENTIFIER);
    }

    #[test]
    fn test_block_comment_then_identifier() {
        let tokens = lex("/* c */x");
        assert_eq!(tokens[0].kind, TokenKind::BLOCK_COMMENT);
        assert_eq!(tokens[0].text, "/* c */");
        assert_eq!(tokens[1].kind, TokenKind::IDENTIFIER);
        assert_eq!(tokens[1].text, "x");
    }

    #[test]
    fn test_unterminated_block_comment_is_fatal() {
        let failure = lex_result("/* oops").unwrap_err();
        assert!(failure.is_fatal());
        assert_eq!(failure.message, "Unclosed block comment");
    }

    // ── Line terminators and whitespace ─────────────────────────────────────

    #[test]
    fn test_crlf_is_one_token() {
        let tokens = lex("a\r\nb");
        assert_eq!(tokens[1].kind, TokenKind::LINE_TERMINATOR);
        assert_eq!(tokens[1].text, "\r\n");
    }

    #[test]
    fn test_whitespace_run_is_one_token() {
        let tokens = lex("a \t b");
        assert_eq!(tokens[1].kind, TokenKind::WHITESPACE);
        assert_eq!(tokens[1].text, " \t ");
    }

    // ── Identifiers and integers ────────────────────────────────────────────

    #[test]
    fn test_identifier_shapes() {
        assert_eq!(
            significant("$a _b c1 é"),
            vec![
                (TokenKind::IDENTIFIER, "$a".into()),
                (TokenKind::IDENTIFIER, "_b".into()),
                (TokenKind::IDENTIFIER, "c1".into()),
                (TokenKind::IDENTIFIER, "é".into()),
            ]
        );
    }

    #[test]
    fn test_integer_literal() {
        assert_eq!(significant("42"), vec![(TokenKind::INTEGER, "42".into())]);
    }

    #[test]
    fn test_integer_then_dot_is_two_tokens() {
        let kinds: Vec<_> = significant("1.x").into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::INTEGER,
                TokenKind::PUNCTUATOR,
                TokenKind::IDENTIFIER
            ]
        );
    }

    // ── Unknown ─────────────────────────────────────────────────────────────

    #[test]
    fn test_unknown_consumes_one_code_point() {
        let tokens = lex("@@");
        assert_eq!(tokens.len(), 2);
        assert!(tokens.iter().all(|t| t.kind == TokenKind::UNKNOWN));
    }

    // ── Templates ───────────────────────────────────────────────────────────

    #[test]
    fn test_template_without_substitution() {
        let tokens = lex("`hello`");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::TEMPLATE);
        assert_eq!(tokens[0].text, "`hello`");
    }

    #[test]
    fn test_template_head_middle_tail() {
        let kinds: Vec<_> = significant("`a ${x} b ${y} c`")
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::TEMPLATE_HEAD,
                TokenKind::IDENTIFIER,
                TokenKind::TEMPLATE_MIDDLE,
                TokenKind::IDENTIFIER,
                TokenKind::TEMPLATE_TAIL,
            ]
        );
    }

    #[test]
    fn test_template_substitution_with_braces() {
        let kinds: Vec<_> = significant("`a ${{k:1}} b`")
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::TEMPLATE_HEAD,
                TokenKind::PUNCTUATOR, // {
                TokenKind::IDENTIFIER, // k
                TokenKind::PUNCTUATOR, // :
                TokenKind::INTEGER,    // 1
                TokenKind::PUNCTUATOR, // }
                TokenKind::TEMPLATE_TAIL,
            ]
        );
    }

    #[test]
    fn test_unterminated_template_is_fatal() {
        let failure = lex_result("`oops").unwrap_err();
        assert!(failure.is_fatal());
        assert_eq!(failure.message, "Unclosed template literal");
    }

    // ── RegExp vs division ──────────────────────────────────────────────────

    #[test]
    fn test_regexp_at_start() {
        assert_eq!(
            significant("/foo/gi"),
            vec![(TokenKind::REGEXP, "/foo/gi".into())]
        );
    }

    #[test]
    fn test_division_after_identifier() {
        let kinds: Vec<_> = significant("x / y").into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::IDENTIFIER,
                TokenKind::PUNCTUATOR,
                TokenKind::IDENTIFIER
            ]
        );
    }

    #[test]
    fn test_regexp_after_assignment() {
        let kinds: Vec<_> = significant("x = /foo/").into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::IDENTIFIER,
                TokenKind::PUNCTUATOR,
                TokenKind::REGEXP
            ]
        );
    }

    #[test]
    fn test_division_after_close_paren() {
        let kinds: Vec<_> = significant("(a) / b").into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::PUNCTUATOR,
                TokenKind::IDENTIFIER,
                TokenKind::PUNCTUATOR,
                TokenKind::PUNCTUATOR,
                TokenKind::IDENTIFIER,
            ]
        );
    }

    #[test]
    fn test_regexp_with_class_and_escape() {
        assert_eq!(
            significant(r"/[a-z/]\//"),
            vec![(TokenKind::REGEXP, r"/[a-z/]\//".into())]
        );
    }

    #[test]
    fn test_slash_equal_in_division_context() {
        let sig = significant("x /= 2");
        assert_eq!(sig[1], (TokenKind::PUNCTUATOR, "/=".into()));
    }

    #[test]
    fn test_unterminated_regexp_is_fatal() {
        let failure = lex_result("/oops").unwrap_err();
        assert!(failure.is_fatal());
        assert_eq!(failure.message, "Unclosed regular expression literal");
    }

    // ── Chunked feeding ─────────────────────────────────────────────────────

    #[test]
    fn test_chunked_input_yields_identical_tokens() {
        let source = "console.log(\"hi\") // done";
        let whole = lex(source);

        let url = Rc::new(SourceUrl::new(Scheme::File, "/test.js"));
        let mut cps = CodePointStream::new(url);
        let mut engine = tokenizer();
        let mut chunked = Vec::new();
        for c in source.chars() {
            chunked.extend(engine.feed(cps.push(&c.to_string())).unwrap());
        }
        chunked.extend(engine.finish().unwrap());

        assert_eq!(whole, chunked);
    }
}
