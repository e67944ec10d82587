//! Parser state machine and low-level operations.

use rowan::{TextRange, TextSize};

use super::ast::{Ident, SourceFile};
use super::lexer::{Token, TokenKind, token_text};
use crate::Error;
use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Recursive-descent parser over a pre-lexed token stream.
///
/// Two budgets bound the work on hostile input:
/// - exec fuel: one unit per token inspection, catches non-progressing loops
/// - recursion fuel: maximum nesting of statements and unary expressions
///
/// Exhausting either is fatal and reported through `Error`, not diagnostics.
pub struct Parser<'src> {
    pub(super) source: &'src str,
    pub(super) tokens: Vec<Token>,
    pub(super) pos: usize,
    pub(super) diagnostics: Diagnostics,
    pub(super) depth: u32,
    last_diagnostic_pos: Option<TextSize>,
    fuel_initial: u32,
    fuel_remaining: u32,
    recursion_limit: u32,
    fatal_error: Option<Error>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<Token>, fuel: u32, recursion_limit: u32) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            diagnostics: Diagnostics::new(),
            depth: 0,
            last_diagnostic_pos: None,
            fuel_initial: fuel,
            fuel_remaining: fuel,
            recursion_limit,
            fatal_error: None,
        }
    }

    /// Consume the parser, returning the tree and its diagnostics or the fatal error.
    pub fn finish(self, file: SourceFile) -> Result<(SourceFile, Diagnostics), Error> {
        if let Some(err) = self.fatal_error {
            return Err(err);
        }
        tracing::trace!(
            fuel = self.fuel_initial - self.fuel_remaining,
            items = file.items.len(),
            "parsed source file"
        );
        Ok((file, self.diagnostics))
    }

    fn consume_fuel(&mut self) {
        if self.fuel_remaining == 0 {
            if self.fatal_error.is_none() {
                self.fatal_error = Some(Error::ExecFuelExhausted);
            }
            return;
        }
        self.fuel_remaining -= 1;
    }

    pub(super) fn has_fatal_error(&self) -> bool {
        self.fatal_error.is_some()
    }

    /// Current token kind, `None` at end of input or after a fatal error.
    pub(super) fn current(&mut self) -> Option<TokenKind> {
        self.consume_fuel();
        if self.has_fatal_error() {
            return None;
        }
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    pub(super) fn nth(&self, lookahead: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + lookahead).map(|t| t.kind)
    }

    pub(super) fn at(&mut self, kind: TokenKind) -> bool {
        self.current() == Some(kind)
    }

    pub(super) fn eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(super) fn should_stop(&self) -> bool {
        self.eof() || self.has_fatal_error()
    }

    pub(super) fn eof_offset(&self) -> TextSize {
        TextSize::from(self.source.len() as u32)
    }

    pub(super) fn current_span(&self) -> TextRange {
        self.tokens
            .get(self.pos)
            .map_or_else(|| TextRange::empty(self.eof_offset()), |t| t.span)
    }

    /// Start offset of the current token; end of input when exhausted.
    pub(super) fn current_start(&self) -> TextSize {
        self.current_span().start()
    }

    /// End offset of the most recently consumed token.
    pub(super) fn prev_end(&self) -> TextSize {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(t) => t.span.end(),
            None => TextSize::from(0),
        }
    }

    pub(super) fn range_from(&self, start: TextSize) -> TextRange {
        let end = self.prev_end().max(start);
        TextRange::new(start, end)
    }

    pub(super) fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    pub(super) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            return true;
        }
        false
    }

    /// Consume `kind` or report `missing` at the current position without consuming.
    pub(super) fn expect(&mut self, kind: TokenKind, missing: DiagnosticKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        let span = self.current_span();
        self.error(missing, span);
        false
    }

    pub(super) fn expect_ident(&mut self) -> Option<Ident> {
        if self.at(TokenKind::Ident) {
            let token = self.bump()?;
            return Some(Ident {
                text: token_text(self.source, &token).to_string(),
                range: token.span,
            });
        }
        let span = self.current_span();
        self.error(DiagnosticKind::ExpectedIdentifier, span);
        None
    }

    pub(super) fn span_text(&self, span: TextRange) -> &'src str {
        &self.source[std::ops::Range::<usize>::from(span)]
    }

    /// Report a diagnostic unless one was already reported at the same position.
    pub(super) fn error(&mut self, kind: DiagnosticKind, range: TextRange) {
        self.error_with(kind, range, None);
    }

    pub(super) fn error_with(&mut self, kind: DiagnosticKind, range: TextRange, detail: Option<&str>) {
        if self.last_diagnostic_pos == Some(range.start()) {
            return;
        }
        self.last_diagnostic_pos = Some(range.start());
        let builder = self.diagnostics.report(kind, range);
        match detail {
            Some(detail) => builder.message(detail).emit(),
            None => builder.emit(),
        }
    }

    /// Enter a nested production. Returns `false` once the recursion budget is spent.
    pub(super) fn enter(&mut self) -> bool {
        if self.depth >= self.recursion_limit {
            if self.fatal_error.is_none() {
                self.fatal_error = Some(Error::RecursionLimitExceeded);
            }
            return false;
        }
        self.depth += 1;
        true
    }

    pub(super) fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Skip to just past the next `;`, or up to (not past) the next `}`.
    pub(super) fn recover_to_statement_end(&mut self) {
        while let Some(kind) = self.current() {
            match kind {
                TokenKind::Semicolon => {
                    self.bump();
                    return;
                }
                TokenKind::BraceClose => return,
                _ => {
                    self.bump();
                }
            }
        }
    }
}
