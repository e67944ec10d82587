//! Lexer for the source language.
//!
//! Produces span-based tokens without storing text; text is sliced from the
//! source only when the parser needs it. Trivia (whitespace, comments) is
//! dropped here since nothing downstream is lossless.
//!
//! Consecutive unrecognized characters are coalesced into one `Garbage` token.

use std::ops::Range;

use logos::Logos;
use rowan::TextRange;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip(r"//[^\n]*", allow_greedy = true))]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum TokenKind {
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,
    #[token(".")]
    Dot,

    #[token("=")]
    Eq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("~=")]
    TildeEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("<<=")]
    ShlEq,
    #[token(">>=")]
    ShrEq,
    #[token(">>>=")]
    UShrEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("^^=")]
    PowEq,

    #[token("||")]
    PipePipe,
    #[token("&&")]
    AmpAmp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("&")]
    Amp,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    Le,
    #[token(">")]
    Gt,
    #[token(">=")]
    Ge,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token(">>>")]
    UShr,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("~")]
    Tilde,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^^")]
    Pow,
    #[token("!")]
    Bang,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,

    #[token("alias")]
    KwAlias,
    #[token("assert")]
    KwAssert,
    #[token("auto")]
    KwAuto,
    #[token("cast")]
    KwCast,
    #[token("class")]
    KwClass,
    #[token("delegate")]
    KwDelegate,
    #[token("delete")]
    KwDelete,
    #[token("else")]
    KwElse,
    #[token("false")]
    KwFalse,
    #[token("for")]
    KwFor,
    #[token("function")]
    KwFunction,
    #[token("if")]
    KwIf,
    #[token("import")]
    KwImport,
    #[token("in")]
    KwIn,
    #[token("is")]
    KwIs,
    #[token("new")]
    KwNew,
    #[token("nothrow")]
    KwNothrow,
    #[token("null")]
    KwNull,
    #[token("pure")]
    KwPure,
    #[token("ref")]
    KwRef,
    #[token("return")]
    KwReturn,
    #[token("true")]
    KwTrue,
    #[token("tuple")]
    KwTuple,
    #[token("while")]
    KwWhile,
    #[token("__traits")]
    KwTraits,

    #[token("void")]
    KwVoid,
    #[token("bool")]
    KwBool,
    #[token("int")]
    KwInt,
    #[token("long")]
    KwLong,
    #[token("uint")]
    KwUint,
    #[token("char")]
    KwChar,
    #[token("double")]
    KwDouble,
    #[token("string")]
    KwString,

    /// Defined after keywords so they take precedence.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r"[0-9][0-9_]*")]
    IntLiteral,

    #[regex(r#""(?:[^"\\]|\\.)*""#)]
    StringLiteral,

    /// Coalesced run of unrecognized characters.
    Garbage,
}

impl TokenKind {
    pub fn is_basic_type(self) -> bool {
        matches!(
            self,
            Self::KwVoid
                | Self::KwBool
                | Self::KwInt
                | Self::KwLong
                | Self::KwUint
                | Self::KwChar
                | Self::KwDouble
                | Self::KwString
        )
    }

    pub fn is_function_attribute(self) -> bool {
        matches!(self, Self::KwPure | Self::KwNothrow)
    }

    /// Human-readable form for "unexpected token" messages.
    pub fn describe(self) -> &'static str {
        match self {
            Self::ParenOpen => "`(`",
            Self::ParenClose => "`)`",
            Self::BracketOpen => "`[`",
            Self::BracketClose => "`]`",
            Self::BraceOpen => "`{`",
            Self::BraceClose => "`}`",
            Self::Comma => "`,`",
            Self::Semicolon => "`;`",
            Self::Ident => "identifier",
            Self::IntLiteral => "integer literal",
            Self::StringLiteral => "string literal",
            Self::Garbage => "unrecognized input",
            k if k.is_basic_type() => "type keyword",
            _ => "operator or keyword",
        }
    }
}

/// Zero-copy token: kind + span, text retrieved via [`token_text`] when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: TextRange,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: TextRange) -> Self {
        Self { kind, span }
    }
}

pub(crate) fn range_to_text_range(range: Range<usize>) -> TextRange {
    TextRange::new((range.start as u32).into(), (range.end as u32).into())
}

/// Tokenizes source into span-based tokens.
pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);
    let mut garbage: Option<Range<usize>> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                if let Some(range) = garbage.take() {
                    tokens.push(Token::new(TokenKind::Garbage, range_to_text_range(range)));
                }
                tokens.push(Token::new(kind, range_to_text_range(lexer.span())));
            }
            Some(Err(())) => {
                let span = lexer.span();
                garbage = Some(match garbage {
                    Some(range) => range.start..span.end,
                    None => span,
                });
            }
            None => {
                if let Some(range) = garbage.take() {
                    tokens.push(Token::new(TokenKind::Garbage, range_to_text_range(range)));
                }
                break;
            }
        }
    }

    tokens
}

/// Retrieves the text slice for a token. O(1) slice into source.
#[inline]
pub fn token_text<'src>(source: &'src str, token: &Token) -> &'src str {
    &source[Range::<usize>::from(token.span)]
}
