use rowan::TextRange;

/// Diagnostic kinds ordered by priority (highest priority first).
///
/// Syntax errors come first because everything after an unclosed delimiter
/// is noise; semantic and link errors assume the annotations parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Unclosed delimiters
    UnclosedGroup,
    UnclosedOptional,
    UnclosedRepetition,

    // Something required is missing
    ExpectedExpression,
    ExpectedTokenKind,
    CaptureWithoutTarget,

    // Something that does not belong
    UnterminatedString,
    InvalidEscape,
    UnexpectedToken,

    // Valid syntax, invalid against the output type
    EmptyGrammar,
    UnboundCapture,
    IncompatibleCapture,
    RepeatedScalarCapture,

    // Link pass
    UnknownTokenKind,
    LeftRecursion,

    // Warnings
    NullableRepetition,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::NullableRepetition => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Hint attached to every diagnostic of this kind.
    pub fn default_hint(&self) -> Option<&'static str> {
        match self {
            Self::UnboundCapture => Some("register the field with a slot, e.g. `g.value(..)`"),
            Self::RepeatedScalarCapture => {
                Some("use a `Vec` field to keep every match, or move the capture out of the repetition")
            }
            Self::LeftRecursion => Some("consume at least one token before recursing"),
            Self::EmptyGrammar => Some("annotate at least one field"),
            _ => None,
        }
    }

    /// Base message for this kind, used when no detail is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnclosedGroup => "missing closing `)`",
            Self::UnclosedOptional => "missing closing `]`",
            Self::UnclosedRepetition => "missing closing `}`",

            Self::ExpectedExpression => "expected an expression",
            Self::ExpectedTokenKind => "expected a token kind after `:`",
            Self::CaptureWithoutTarget => "`@` has nothing to capture",

            Self::UnterminatedString => "unterminated string literal",
            Self::InvalidEscape => "invalid escape in string literal",
            Self::UnexpectedToken => "unexpected token",

            Self::EmptyGrammar => "type has no grammar",
            Self::UnboundCapture => "capture into a field without a slot",
            Self::IncompatibleCapture => "capture does not fit the field",
            Self::RepeatedScalarCapture => "single-value field captured inside a repetition",

            Self::UnknownTokenKind => "unknown token kind",
            Self::LeftRecursion => "left recursion",

            Self::NullableRepetition => "repetition can match without consuming input",
        }
    }

    /// Template for custom messages; `{}` is replaced by the detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::UnknownTokenKind => "`{}` is not a token kind of this lexer".to_string(),
            Self::LeftRecursion => "left recursion: {}".to_string(),
            Self::UnboundCapture => "field `{}` has no slot to capture into".to_string(),
            Self::UnclosedGroup | Self::UnclosedOptional | Self::UnclosedRepetition => {
                format!("{}; {{}}", self.fallback_message())
            }
            Self::IncompatibleCapture | Self::UnexpectedToken | Self::EmptyGrammar => {
                "{}".to_string()
            }
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    pub fn message(&self, detail: Option<&str>) -> String {
        match detail {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Where in which annotation a diagnostic points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub(crate) field: String,
    pub(crate) annotation: String,
    pub(crate) range: TextRange,
}

impl Site {
    pub fn new(field: impl Into<String>, annotation: impl Into<String>, range: TextRange) -> Self {
        Self {
            field: field.into(),
            annotation: annotation.into(),
            range,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    pub(crate) type_name: String,
    pub(crate) site: Option<Site>,
    pub(crate) message: String,
    pub(crate) hints: Vec<String>,
}

impl DiagnosticMessage {
    pub(crate) fn new(kind: DiagnosticKind, type_name: impl Into<String>) -> Self {
        let mut hints = Vec::new();
        if let Some(hint) = kind.default_hint() {
            hints.push(hint.to_owned());
        }
        Self {
            kind,
            type_name: type_name.into(),
            site: None,
            message: kind.fallback_message().to_owned(),
            hints,
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }

    /// Name of the output type whose grammar is at fault.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn field(&self) -> Option<&str> {
        self.site.as_ref().map(|s| s.field.as_str())
    }

    pub fn annotation(&self) -> Option<&str> {
        self.site.as_ref().map(|s| s.annotation.as_str())
    }

    pub fn range(&self) -> Option<TextRange> {
        self.site.as_ref().map(|s| s.range)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.site {
            Some(site) => write!(
                f,
                "{} in `{}.{}` at {}..{}: {}",
                self.severity(),
                self.type_name,
                site.field,
                u32::from(site.range.start()),
                u32::from(site.range.end()),
                self.message
            )?,
            None => write!(f, "{} in `{}`: {}", self.severity(), self.type_name, self.message)?,
        }
        for hint in &self.hints {
            write!(f, " (hint: {})", hint)?;
        }
        Ok(())
    }
}
