mod message;
mod printer;


pub use message::{DiagnosticKind, DiagnosticMessage, Severity, Site};
pub use printer::DiagnosticsPrinter;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    messages: Vec<DiagnosticMessage>,
}

#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: DiagnosticMessage,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Starts a diagnostic of `kind` against the grammar of `type_name`.
    ///
    /// Uses the kind's default message; `.message()` adds detail.
    pub fn report(&mut self, kind: DiagnosticKind, type_name: &str) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::new(kind, type_name),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|d| d.is_error())
    }

    pub fn has_warnings(&self) -> bool {
        self.messages.iter().any(|d| d.is_warning())
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_warning()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.messages.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.messages.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.messages.iter().filter(|d| d.is_warning())
    }

    /// Splits off the warnings, leaving only errors behind.
    pub fn take_warnings(&mut self) -> Diagnostics {
        let (warnings, errors): (Vec<_>, Vec<_>) = std::mem::take(&mut self.messages)
            .into_iter()
            .partition(|d| d.is_warning());
        self.messages = errors;
        Diagnostics { messages: warnings }
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    pub fn render(&self) -> String {
        self.printer().render()
    }

    pub fn render_colored(&self, colored: bool) -> String {
        self.printer().colored(colored).render()
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut errors = self.errors();
        let Some(first) = errors.next() else {
            return write!(f, "no errors");
        };
        write!(f, "{}", first.message())?;
        let rest = errors.count();
        if rest > 0 {
            write!(f, " (and {} more)", rest)?;
        }
        Ok(())
    }
}

impl<'a> DiagnosticBuilder<'a> {
    /// Points the diagnostic at a range of a field's annotation.
    pub fn at(mut self, site: Site) -> Self {
        self.message.site = Some(site);
        self
    }

    /// Provide custom detail, rendered using the kind's template.
    pub fn message(mut self, msg: impl Into<String>) -> Self {
        let detail = msg.into();
        self.message.message = self.message.kind.message(Some(&detail));
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.message.hints.push(hint.into());
        self
    }

    pub fn emit(self) {
        self.diagnostics.messages.push(self.message);
    }
}
