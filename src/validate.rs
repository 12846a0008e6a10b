//! Flow validation
//!
//! Pure checks over a [`Flow`]: identifier syntax, structural
//! completeness, referential integrity, and the per-edge acyclicity
//! probe used by the mutation API. `validate` never fails; it
//! accumulates every finding so a UI can show all problems at once.
//!
//! Output order is deterministic: flow-level diagnostics first, then
//! steps in document order, then each step's edges in declaration
//! order. Test assertions on ordering are stable.

use std::collections::HashSet;

use crate::diagnostic::{Diagnostic, DiagnosticKind, Scope};
use crate::flow::{Flow, FLOW_SCHEMA};
use crate::ident;

/// Validate a flow. Empty result means the flow is valid.
pub fn validate(flow: &Flow) -> Vec<Diagnostic> {
    let mut diags = Vec::new();

    // Flow-level checks
    if flow.schema != FLOW_SCHEMA {
        diags.push(
            Diagnostic::error(
                Scope::Flow,
                DiagnosticKind::InvalidIdentifier,
                format!("schema must be \"{FLOW_SCHEMA}\", got \"{}\"", flow.schema),
            )
            .with_subject(&flow.schema),
        );
    }
    if !ident::is_valid_flow_id(&flow.id) {
        diags.push(
            Diagnostic::error(
                Scope::Flow,
                DiagnosticKind::InvalidIdentifier,
                format!("flow id '{}' must match {}", flow.id, ident::FLOW_ID_HINT),
            )
            .with_subject(&flow.id),
        );
    }
    if flow.title.trim().is_empty() {
        diags.push(Diagnostic::error(
            Scope::Flow,
            DiagnosticKind::StructuralIncomplete,
            "a title is required",
        ));
    }
    if flow.steps.is_empty() {
        diags.push(Diagnostic::error(
            Scope::Flow,
            DiagnosticKind::StructuralIncomplete,
            "at least one step is required",
        ));
    }

    // Step-level checks, in document order
    let declared: HashSet<&str> = flow.step_ids().collect();
    let mut seen: HashSet<&str> = HashSet::new();

    for step in &flow.steps {
        let scope = Scope::Step(step.id.clone());

        if !ident::is_valid_step_id(&step.id) {
            diags.push(
                Diagnostic::error(
                    scope.clone(),
                    DiagnosticKind::InvalidIdentifier,
                    format!("step id '{}' must be {}", step.id, ident::STEP_ID_HINT),
                )
                .with_subject(&step.id),
            );
        }

        if !seen.insert(step.id.as_str()) {
            diags.push(
                Diagnostic::error(
                    scope.clone(),
                    DiagnosticKind::DuplicateIdentifier,
                    format!("duplicate step id '{}'", step.id),
                )
                .with_subject(&step.id),
            );
        }

        // Completeness: the typed model makes missing fields
        // unrepresentable, so only emptiness is reportable.
        if step.instructions.is_empty() {
            diags.push(Diagnostic::warning(
                scope.clone(),
                DiagnosticKind::StructuralIncomplete,
                "at least one instruction is required",
            ));
        }
        if step.acceptance.is_empty() {
            diags.push(Diagnostic::warning(
                scope.clone(),
                DiagnosticKind::StructuralIncomplete,
                "at least one acceptance check is required",
            ));
        }

        // Edge checks, in declaration order
        for (index, edge) in step.next.iter().enumerate() {
            let edge_scope = Scope::Edge {
                step: step.id.clone(),
                index,
            };

            if !declared.contains(edge.to.as_str()) {
                diags.push(
                    Diagnostic::error(
                        edge_scope.clone(),
                        DiagnosticKind::DanglingReference,
                        format!("target step '{}' does not exist", edge.to),
                    )
                    .with_subject(&edge.to),
                );
            }

            if edge.to == step.id {
                diags.push(
                    Diagnostic::error(
                        edge_scope,
                        DiagnosticKind::CycleDetected,
                        format!("step '{}' lists itself as a transition target", step.id),
                    )
                    .with_subject(&edge.to),
                );
            }
        }
    }

    diags
}

/// Would an edge `source_id -> target_id` close a cycle?
///
/// Depth-first walk from `target_id` over the current edge set; the
/// visited set guards against revisiting diamonds. True the moment
/// `source_id` is reached. Invoked per edge mutation; `validate` does
/// not sweep the whole graph for cycles.
pub fn would_create_cycle(flow: &Flow, source_id: &str, target_id: &str) -> bool {
    if source_id == target_id {
        return true;
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&str> = vec![target_id];

    while let Some(current) = stack.pop() {
        if current == source_id {
            return true;
        }
        if !visited.insert(current) {
            continue;
        }
        if let Some(step) = flow.step(current) {
            for edge in &step.next {
                stack.push(edge.to.as_str());
            }
        }
    }

    false
}
