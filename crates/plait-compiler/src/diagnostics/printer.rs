//! Builder-pattern printer for rendering diagnostics.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use rowan::TextRange;

use super::Diagnostics;
use super::message::Severity;

/// Renders each diagnostic against the annotation it points into; the
/// snippet path is `Type.field`. Diagnostics without a site render as one
/// plain line.
pub struct DiagnosticsPrinter<'d> {
    diagnostics: &'d Diagnostics,
    colored: bool,
}

impl<'d> DiagnosticsPrinter<'d> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            colored: false,
        }
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

        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }

            let Some(site) = &diag.site else {
                write!(w, "{}: {} (in `{}`)", diag.severity(), diag.message, diag.type_name)?;
                for hint in &diag.hints {
                    write!(w, "\n  = help: {}", hint)?;
                }
                continue;
            };

            let path = format!("{}.{}", diag.type_name, site.field);
            let range = adjust_range(site.range, site.annotation.len());
            let snippet = Snippet::source(site.annotation.as_str())
                .line_start(1)
                .path(path.as_str())
                .annotation(AnnotationKind::Primary.span(range).label(&diag.message));

            let level = severity_to_level(diag.severity());
            let report: Vec<Group> = vec![level.primary_title(&diag.message).element(snippet)];
            write!(w, "{}", renderer.render(&report))?;

            for hint in &diag.hints {
                write!(w, "\n  = help: {}", hint)?;
            }
        }

        Ok(())
    }
}

fn severity_to_level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

fn adjust_range(range: TextRange, limit: usize) -> std::ops::Range<usize> {
    let start: usize = range.start().into();
    let end: usize = range.end().into();

    if start == end {
        return start..(start + 1).min(limit);
    }

    start..end
}

impl Diagnostics {
    pub fn printer(&self) -> DiagnosticsPrinter<'_> {
        DiagnosticsPrinter::new(self)
    }
}
