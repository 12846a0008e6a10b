//! Error types with fix suggestions
//!
//! Every fallible operation in the crate reports through [`FlowError`];
//! nothing panics across a public boundary. Each variant carries the
//! identifiers involved so callers can render precise inline errors.

use thiserror::Error;

use crate::diagnostic::{Diagnostic, DiagnosticKind, Scope};

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// Machine-readable error class, mirroring the diagnostic taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidIdentifier,
    DuplicateIdentifier,
    NotFound,
    DanglingReference,
    CycleDetected,
    StructuralIncomplete,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    #[error("Invalid identifier '{ident}' (expected {expected})")]
    InvalidIdentifier {
        ident: String,
        expected: &'static str,
    },

    #[error("Identifier '{ident}' already exists")]
    DuplicateIdentifier { ident: String },

    #[error("Step '{step_id}' not found")]
    StepNotFound { step_id: String },

    #[error("Step '{step_id}' has no edge at index {index}")]
    EdgeNotFound { step_id: String, index: usize },

    #[error("Edge from '{step_id}' targets unknown step '{to}'")]
    DanglingReference { step_id: String, to: String },

    #[error("Edge from '{from}' to '{to}' would create a cycle back to '{from}'")]
    CycleDetected { from: String, to: String },

    #[error("{scope} is structurally incomplete: {detail}")]
    StructuralIncomplete { scope: String, detail: String },
}

impl FlowError {
    /// Machine-readable kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FlowError::InvalidIdentifier { .. } => ErrorKind::InvalidIdentifier,
            FlowError::DuplicateIdentifier { .. } => ErrorKind::DuplicateIdentifier,
            FlowError::StepNotFound { .. } => ErrorKind::NotFound,
            FlowError::EdgeNotFound { .. } => ErrorKind::NotFound,
            FlowError::DanglingReference { .. } => ErrorKind::DanglingReference,
            FlowError::CycleDetected { .. } => ErrorKind::CycleDetected,
            FlowError::StructuralIncomplete { .. } => ErrorKind::StructuralIncomplete,
        }
    }
}

impl FixSuggestion for FlowError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            FlowError::InvalidIdentifier { .. } => {
                Some("Use lowercase identifiers; flow ids follow <domain>.<name>.v<major>")
            }
            FlowError::DuplicateIdentifier { .. } => Some("Pick an id not already in use"),
            FlowError::StepNotFound { .. } => Some("Check the step id against the flow's steps"),
            FlowError::EdgeNotFound { .. } => {
                Some("Edge indices follow declaration order; refresh before editing")
            }
            FlowError::DanglingReference { .. } => {
                Some("Add the target step first, or point the edge at an existing step")
            }
            FlowError::CycleDetected { .. } => {
                Some("Flows must stay acyclic; route the transition forward instead")
            }
            FlowError::StructuralIncomplete { .. } => {
                Some("Give every step a role, instructions, and at least one acceptance check")
            }
        }
    }
}

/// A fatal diagnostic surfaces as the failure of a mutation.
///
/// Identifiers come from the diagnostic's structured fields: the
/// owning step out of its scope, the offending id out of its subject.
impl From<Diagnostic> for FlowError {
    fn from(diag: Diagnostic) -> Self {
        // The step the finding is attached to, when there is one.
        let step_id = match &diag.scope {
            Scope::Flow => None,
            Scope::Step(id) => Some(id.clone()),
            Scope::Edge { step, .. } => Some(step.clone()),
        };
        let subject = diag.subject;

        match diag.kind {
            DiagnosticKind::InvalidIdentifier => FlowError::InvalidIdentifier {
                ident: subject
                    .or(step_id)
                    .unwrap_or_else(|| diag.scope.to_string()),
                expected: match diag.scope {
                    Scope::Flow => crate::ident::FLOW_ID_HINT,
                    _ => crate::ident::STEP_ID_HINT,
                },
            },
            DiagnosticKind::DuplicateIdentifier => FlowError::DuplicateIdentifier {
                ident: subject
                    .or(step_id)
                    .unwrap_or_else(|| diag.scope.to_string()),
            },
            DiagnosticKind::NotFound => FlowError::StepNotFound {
                step_id: subject
                    .or(step_id)
                    .unwrap_or_else(|| diag.scope.to_string()),
            },
            DiagnosticKind::DanglingReference => FlowError::DanglingReference {
                step_id: step_id.unwrap_or_else(|| diag.scope.to_string()),
                to: subject.unwrap_or_default(),
            },
            DiagnosticKind::CycleDetected => FlowError::CycleDetected {
                from: step_id.unwrap_or_else(|| diag.scope.to_string()),
                to: subject.unwrap_or_default(),
            },
            DiagnosticKind::StructuralIncomplete => FlowError::StructuralIncomplete {
                scope: diag.scope.to_string(),
                detail: diag.message,
            },
        }
    }
}
