//! Lexical tokens.

use bitflags::bitflags;
use std::fmt;

use crate::engine::Lexeme;
use crate::source::Span;

bitflags! {
    /// The lexical category of a [`Token`], as a bitmask so callers can
    /// match groups of kinds with one predicate.
    ///
    /// The compound constants (`NUMBER`, `LITERAL`, `COMMENT`, `TRIVIA`)
    /// are unions; [`Token::matches`] tests by intersection.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TokenKind: u32 {
        /// End of input.
        const END = 1 << 0;
        /// Decimal integer literal.
        const INTEGER = 1 << 1;
        /// Floating-point literal (declared for the `NUMBER` union; no
        /// lexical rule produces it yet).
        const FLOAT = 1 << 2;
        /// String literal, quotes included in the payload.
        const STRING = 1 << 3;
        /// Operator or delimiter.
        const PUNCTUATOR = 1 << 4;
        /// Identifier.
        const IDENTIFIER = 1 << 5;
        /// `// …` comment, terminator excluded.
        const LINE_COMMENT = 1 << 6;
        /// `/* … */` comment.
        const BLOCK_COMMENT = 1 << 7;
        /// `` `…` `` template with no substitution.
        const TEMPLATE = 1 << 8;
        /// `` `…${ `` opening a substituted template.
        const TEMPLATE_HEAD = 1 << 9;
        /// `}…${` between two substitutions.
        const TEMPLATE_MIDDLE = 1 << 10;
        /// ``}…` `` closing a substituted template.
        const TEMPLATE_TAIL = 1 << 11;
        /// Regular-expression literal, `/pattern/flags`.
        const REGEXP = 1 << 12;
        /// One or more contiguous line terminators.
        const LINE_TERMINATOR = 1 << 13;
        /// One or more contiguous whitespace code points.
        const WHITESPACE = 1 << 14;
        /// A single code point no other rule matched.
        const UNKNOWN = 1 << 15;

        /// Any numeric literal.
        const NUMBER = Self::INTEGER.bits() | Self::FLOAT.bits();
        /// Any literal.
        const LITERAL = Self::NUMBER.bits() | Self::STRING.bits();
        /// Any comment.
        const COMMENT = Self::LINE_COMMENT.bits() | Self::BLOCK_COMMENT.bits();
        /// Everything the grammar skips between significant tokens.
        const TRIVIA =
            Self::COMMENT.bits() | Self::WHITESPACE.bits() | Self::LINE_TERMINATOR.bits();
    }
}

impl TokenKind {
    /// A short lowercase name for diagnostics.  Union kinds have names of
    /// their own; other combinations fall back to `"token"`.
    pub fn name(self) -> &'static str {
        const NAMES: &[(TokenKind, &str)] = &[
            (TokenKind::END, "end of input"),
            (TokenKind::INTEGER, "integer literal"),
            (TokenKind::FLOAT, "float literal"),
            (TokenKind::STRING, "string literal"),
            (TokenKind::PUNCTUATOR, "punctuator"),
            (TokenKind::IDENTIFIER, "identifier"),
            (TokenKind::LINE_COMMENT, "line comment"),
            (TokenKind::BLOCK_COMMENT, "block comment"),
            (TokenKind::TEMPLATE, "template literal"),
            (TokenKind::TEMPLATE_HEAD, "template head"),
            (TokenKind::TEMPLATE_MIDDLE, "template middle"),
            (TokenKind::TEMPLATE_TAIL, "template tail"),
            (TokenKind::REGEXP, "regular expression"),
            (TokenKind::LINE_TERMINATOR, "line terminator"),
            (TokenKind::WHITESPACE, "whitespace"),
            (TokenKind::UNKNOWN, "unknown"),
            (TokenKind::NUMBER, "number"),
            (TokenKind::LITERAL, "literal"),
            (TokenKind::COMMENT, "comment"),
            (TokenKind::TRIVIA, "trivia"),
        ];
        NAMES
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, name)| *name)
            .unwrap_or("token")
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single lexical token: kind, matched source text, and location.
///
/// Tokens tile the source exactly: concatenating the payloads of every
/// emitted token reproduces the input, and each token's span length equals
/// the code-point length of its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The lexical category.
    pub kind: TokenKind,
    /// The matched source text, verbatim.
    pub text: String,
    /// Source location of this token.
    pub span: Span,
}

impl Token {
    /// `true` when this token's kind intersects `kind`.
    pub fn matches(&self, kind: TokenKind) -> bool {
        self.kind.intersects(kind)
    }
}

impl Lexeme for Token {
    type Kind = TokenKind;

    fn kind(&self) -> TokenKind {
        self.kind
    }

    fn matches(&self, kind: TokenKind) -> bool {
        self.kind.intersects(kind)
    }

    fn payload(&self) -> &str {
        &self.text
    }

    fn span(&self) -> &Span {
        &self.span
    }

    fn kind_name(kind: TokenKind) -> String {
        kind.name().to_string()
    }
}
