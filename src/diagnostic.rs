//! Validation diagnostics
//!
//! A diagnostic is a single validation finding: where it was found,
//! what class of problem it is, and a human-readable message. The
//! validator accumulates diagnostics instead of failing, so a UI can
//! show every problem at once.

use std::fmt;

/// Where in the document a diagnostic applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// The flow document itself (id, schema tag, ...).
    Flow,
    /// A specific step, by id.
    Step(String),
    /// An edge, by owning step id and declaration index.
    Edge { step: String, index: usize },
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Flow => write!(f, "flow"),
            Scope::Step(id) => write!(f, "step '{id}'"),
            Scope::Edge { step, index } => write!(f, "step '{step}' edge [{index}]"),
        }
    }
}

/// Machine-readable class of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    InvalidIdentifier,
    DuplicateIdentifier,
    NotFound,
    DanglingReference,
    CycleDetected,
    StructuralIncomplete,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::InvalidIdentifier => write!(f, "InvalidIdentifier"),
            DiagnosticKind::DuplicateIdentifier => write!(f, "DuplicateIdentifier"),
            DiagnosticKind::NotFound => write!(f, "NotFound"),
            DiagnosticKind::DanglingReference => write!(f, "DanglingReference"),
            DiagnosticKind::CycleDetected => write!(f, "CycleDetected"),
            DiagnosticKind::StructuralIncomplete => write!(f, "StructuralIncomplete"),
        }
    }
}

/// Severity of a validation finding.
///
/// Mutations fail on the first `Error`; `Warning`s are informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub scope: Scope,
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    /// The offending identifier (bad id, duplicate id, edge target),
    /// when the finding is about one. Lets conversions into
    /// [`crate::error::FlowError`] name real identifiers instead of
    /// rendered scope strings.
    pub subject: Option<String>,
}

impl Diagnostic {
    pub fn error(scope: Scope, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Diagnostic {
            scope,
            kind,
            severity: Severity::Error,
            message: message.into(),
            subject: None,
        }
    }

    pub fn warning(scope: Scope, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Diagnostic {
            scope,
            kind,
            severity: Severity::Warning,
            message: message.into(),
            subject: None,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [{}] {}", self.scope, self.kind, self.message)
    }
}
