//! flowspec - in-memory core for a visual workflow editor
//!
//! Owns the canonical representation of a Flow (a directed graph of
//! steps connected by conditional transitions), enforces structural and
//! semantic validity, and lets a UI mutate the graph safely with full
//! undo/redo. The core is pure and synchronous: no I/O, no clocks, no
//! randomness. Serialization, persistence, and rendering live in
//! external collaborators that consume the types re-exported here.

pub mod diagnostic;
pub mod edit;
pub mod error;
pub mod flow;
pub mod history;
pub mod ident;
pub mod validate;

pub use diagnostic::{Diagnostic, DiagnosticKind, Scope, Severity};
pub use edit::{
    add_edge, add_step, add_step_at, duplicate_step, remove_edge, remove_step, update_edge,
    update_step, DuplicateOptions, StepPatch,
};
pub use error::{ErrorKind, FixSuggestion, FlowError};
pub use flow::{
    Check, Enforcement, Flow, NextStep, Policy, Prompts, Role, Step, StepContext, TokenGrant,
    TokenScope, FLOW_SCHEMA,
};
pub use history::{describe_action, ActionKind, History, HistoryEntry, HistoryInfo};
pub use validate::{validate, would_create_cycle};
