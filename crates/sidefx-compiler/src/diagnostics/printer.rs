//! Rendering of diagnostics for terminals and logs.

use std::fmt::Write;
use std::ops::Range;

use annotate_snippets::{AnnotationKind, Group, Level, Patch, Renderer, Snippet};
use rowan::TextRange;

use super::Diagnostics;
use super::message::{DiagnosticMessage, Severity};

/// Renders diagnostics against the analyzed source.
///
/// With source text attached, each diagnostic is an annotated snippet and a
/// fix becomes a `help` patch of the rewritten line. Without source, each
/// diagnostic is one plain line with byte offsets. The rendered text has no
/// trailing newline.
pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    /// File name shown in the `-->` header of each snippet.
    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        // Snippet reports are separated by a blank line, plain lines by a newline.
        let separator = if self.source.is_some() { "\n\n" } else { "\n" };
        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_str(separator)?;
            }
            match self.source {
                Some(source) => {
                    let report = renderer.render(&self.report(diag, source));
                    w.write_str(report.trim_end_matches('\n'))?;
                }
                None => write!(w, "{diag}")?,
            }
        }
        Ok(())
    }

    /// Title group with the primary and related spans, then an optional fix group.
    fn report<'a>(&'a self, diag: &'a DiagnosticMessage, source: &'a str) -> Vec<Group<'a>> {
        let span = clamp_span(diag.range, source);

        let mut snippet = Snippet::source(source)
            .line_start(1)
            .annotation(AnnotationKind::Primary.span(span.clone()));
        if let Some(path) = self.path {
            snippet = snippet.path(path);
        }
        for related in &diag.related {
            snippet = snippet.annotation(
                AnnotationKind::Context
                    .span(clamp_span(related.range, source))
                    .label(&related.message),
            );
        }

        let mut groups = vec![level(diag.severity).primary_title(&diag.message).element(snippet)];
        if let Some(fix) = &diag.fix {
            let patched = Snippet::source(source)
                .line_start(1)
                .patch(Patch::new(span, &fix.replacement));
            groups.push(Level::HELP.secondary_title(&fix.description).element(patched));
        }
        groups
    }
}

fn level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

/// Byte span inside `source`. Empty ranges widen to one column so the caret shows.
fn clamp_span(range: TextRange, source: &str) -> Range<usize> {
    let limit = source.len();
    let start = usize::from(range.start()).min(limit);
    let end = usize::from(range.end()).min(limit);
    if start == end {
        return start..(start + 1).min(limit);
    }
    start..end
}

impl Diagnostics {
    pub fn printer(&self) -> DiagnosticsPrinter<'_, '_> {
        DiagnosticsPrinter::new(self)
    }
}
