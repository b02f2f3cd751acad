//! Diagnostic collection
//!
//!     Extraction is best effort: a malformed table or an odd declaration never aborts the run.
//!     Every such anomaly is reported twice, once as a `log` record at the matching level and
//!     once as a structured [Diagnostic] handed back to the caller, so a human can audit the
//!     catalog against the source document.
//!
//!     Functions that can report anomalies take a `&mut Diagnostics` sink that lives for one
//!     extraction or spreading pass.

use std::fmt;

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Information,
}

impl DiagnosticSeverity {
    fn log_level(self) -> log::Level {
        match self {
            DiagnosticSeverity::Error => log::Level::Error,
            DiagnosticSeverity::Warning => log::Level::Warn,
            DiagnosticSeverity::Information => log::Level::Info,
        }
    }
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Error => write!(f, "error"),
            DiagnosticSeverity::Warning => write!(f, "warning"),
            DiagnosticSeverity::Information => write!(f, "info"),
        }
    }
}

/// Machine-readable diagnostic codes.
pub mod codes {
    pub const TABLE_NOT_OPERATION: &str = "table-not-operation";
    pub const UNRECOGNIZED_ROW: &str = "unrecognized-row";
    pub const DECLARATION_UNPARSED: &str = "declaration-unparsed";
    pub const ROW_SPAN_OVERFLOW: &str = "row-span-overflow";
    pub const INCONSISTENT_TEMPLATING: &str = "inconsistent-templating";
    pub const EMPTY_DEFINITION: &str = "empty-definition";
}

/// A single non-fatal anomaly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub code: &'static str,
    pub message: String,
    /// Where it happened, usually the definition section title or node name
    pub context: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: DiagnosticSeverity, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)?;
        if let Some(context) = &self.context {
            write!(f, " (in {})", context)?;
        }
        Ok(())
    }
}

/// Ordered diagnostic sink for one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log and record a diagnostic.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        log::log!(diagnostic.severity.log_level(), "{}", diagnostic);
        self.items.push(diagnostic);
    }

    pub fn warning(&mut self, code: &'static str, message: impl Into<String>, context: &str) {
        self.report(
            Diagnostic::new(DiagnosticSeverity::Warning, code, message).with_context(context),
        );
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// All diagnostics carrying `code`, in report order.
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.items.iter().filter(move |d| d.code == code)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
