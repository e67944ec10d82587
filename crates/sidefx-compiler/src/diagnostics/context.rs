//! Session-scoped diagnostic state: warning policy and error gagging.
//!
//! Passed explicitly to every pass that emits diagnostics. There is no
//! process-wide state; two modules analyzed side by side never see each
//! other's gag depth or counters.

use rowan::TextRange;

use super::message::DiagnosticMessage;
use super::{DiagnosticBuilder, DiagnosticKind, Diagnostics};

/// How advisory diagnostics are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WarningMode {
    /// Warnings are not produced at all.
    Off,
    /// Warnings are reported but do not fail the module.
    #[default]
    Informational,
    /// Warnings are reported and fail the module like errors do.
    AsErrors,
}

impl WarningMode {
    pub fn is_enabled(self) -> bool {
        self != Self::Off
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct GagState {
    depth: u32,
    swallowed_errors: u32,
}

impl GagState {
    pub(crate) fn swallow(&mut self, message: &DiagnosticMessage) {
        tracing::trace!(kind = ?message.kind(), depth = self.depth, "gagged diagnostic");
        if message.is_error() {
            self.swallowed_errors += 1;
        }
    }
}

/// Marker returned by [`DiagnosticContext::start_gagging`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "pass the snapshot to end_gagging"]
pub struct GagSnapshot {
    swallowed_before: u32,
}

#[derive(Debug, Clone, Default)]
pub struct DiagnosticContext {
    diagnostics: Diagnostics,
    warnings: WarningMode,
    gag: GagState,
}

impl DiagnosticContext {
    pub fn new(warnings: WarningMode) -> Self {
        Self {
            diagnostics: Diagnostics::new(),
            warnings,
            gag: GagState::default(),
        }
    }

    /// Continue a session that already has diagnostics (e.g. from parsing).
    pub fn with_diagnostics(diagnostics: Diagnostics, warnings: WarningMode) -> Self {
        Self {
            diagnostics,
            warnings,
            gag: GagState::default(),
        }
    }

    /// Start a diagnostic. While gagged, emitting it only bumps the gag counter.
    pub fn report(&mut self, kind: DiagnosticKind, range: TextRange) -> DiagnosticBuilder<'_> {
        if self.gag.depth > 0 {
            return DiagnosticBuilder::gagged(&mut self.diagnostics, &mut self.gag, kind, range);
        }
        self.diagnostics.report(kind, range)
    }

    pub fn warning_mode(&self) -> WarningMode {
        self.warnings
    }

    /// Whether an advisory diagnostic may be produced right now.
    pub fn warnings_enabled(&self) -> bool {
        self.warnings.is_enabled() && !self.is_gagged()
    }

    pub fn is_gagged(&self) -> bool {
        self.gag.depth > 0
    }

    pub fn gag_depth(&self) -> u32 {
        self.gag.depth
    }

    /// Errors swallowed by gags over the whole session.
    pub fn gagged_errors(&self) -> u32 {
        self.gag.swallowed_errors
    }

    /// Enter a speculative region: errors are counted instead of reported.
    pub fn start_gagging(&mut self) -> GagSnapshot {
        self.gag.depth += 1;
        GagSnapshot {
            swallowed_before: self.gag.swallowed_errors,
        }
    }

    /// Leave a speculative region. Returns `true` if any error was swallowed inside it.
    pub fn end_gagging(&mut self, snapshot: GagSnapshot) -> bool {
        debug_assert!(self.gag.depth > 0, "end_gagging without start_gagging");
        self.gag.depth = self.gag.depth.saturating_sub(1);
        self.gag.swallowed_errors != snapshot.swallowed_before
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Whether the session so far should fail compilation.
    pub fn has_failures(&self) -> bool {
        self.diagnostics.has_errors()
            || (self.warnings == WarningMode::AsErrors && self.diagnostics.has_warnings())
    }
}
