//! Pure mutation API
//!
//! Every operation takes the current flow by reference and returns a
//! brand-new `Flow` on success; the input is never touched. Uniform
//! shape: check preconditions, clone, apply, re-validate, and surface
//! the first fatal diagnostic as the failure. Callers own persisting
//! and history-pushing the returned flow.

use tracing::debug;

use crate::error::FlowError;
use crate::flow::{Check, Flow, NextStep, Prompts, Role, Step, StepContext, TokenGrant};
use crate::ident;
use crate::validate::{validate, would_create_cycle};

/// Field-wise patch for [`update_step`]. `None` keeps the current
/// value. The step id is not patchable; renames are a separate concern.
#[derive(Debug, Clone, Default)]
pub struct StepPatch {
    pub title: Option<Option<String>>,
    pub role: Option<Role>,
    pub instructions: Option<Vec<String>>,
    pub acceptance: Option<Vec<Check>>,
    pub prompts: Option<Option<Prompts>>,
    pub context: Option<Option<StepContext>>,
    pub token: Option<Option<TokenGrant>>,
}

/// Options for [`duplicate_step`].
///
/// Outgoing edges are not copied by default; a duplicate starts as a
/// leaf so the editor never materializes surprise transitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateOptions {
    pub copy_edges: bool,
}

/// Append a step to the end of the flow.
pub fn add_step(flow: &Flow, step: Step) -> Result<Flow, FlowError> {
    let index = flow.steps.len();
    add_step_at(flow, step, index)
}

/// Insert a step at `index` (clamped to the end of the sequence).
pub fn add_step_at(flow: &Flow, step: Step, index: usize) -> Result<Flow, FlowError> {
    debug!(step_id = %step.id, index, "adding step");

    if !ident::is_valid_step_id(&step.id) {
        return Err(FlowError::InvalidIdentifier {
            ident: step.id,
            expected: ident::STEP_ID_HINT,
        });
    }
    if flow.step(&step.id).is_some() {
        return Err(FlowError::DuplicateIdentifier { ident: step.id });
    }

    let mut next = flow.clone();
    let index = index.min(next.steps.len());
    next.steps.insert(index, step);
    finalize(next)
}

/// Remove a step and every edge anywhere that targets it.
///
/// Dangling-reference cleanup is mandatory: a removed step leaves no
/// orphaned edges behind.
pub fn remove_step(flow: &Flow, step_id: &str) -> Result<Flow, FlowError> {
    debug!(step_id, "removing step");

    let index = flow
        .position_of(step_id)
        .ok_or_else(|| FlowError::StepNotFound {
            step_id: step_id.to_string(),
        })?;

    let mut next = flow.clone();
    next.steps.remove(index);
    for step in &mut next.steps {
        step.next.retain(|edge| edge.to != step_id);
    }
    finalize(next)
}

/// Replace fields of the named step per `patch`.
pub fn update_step(flow: &Flow, step_id: &str, patch: StepPatch) -> Result<Flow, FlowError> {
    debug!(step_id, "updating step");

    let index = flow
        .position_of(step_id)
        .ok_or_else(|| FlowError::StepNotFound {
            step_id: step_id.to_string(),
        })?;

    let mut next = flow.clone();
    let step = &mut next.steps[index];
    if let Some(title) = patch.title {
        step.title = title;
    }
    if let Some(role) = patch.role {
        step.role = role;
    }
    if let Some(instructions) = patch.instructions {
        step.instructions = instructions;
    }
    if let Some(acceptance) = patch.acceptance {
        step.acceptance = acceptance;
    }
    if let Some(prompts) = patch.prompts {
        step.prompts = prompts;
    }
    if let Some(context) = patch.context {
        step.context = context;
    }
    if let Some(token) = patch.token {
        step.token = token;
    }
    finalize(next)
}

/// Copy a step's content under `new_id`, inserted right after the
/// source step.
pub fn duplicate_step(
    flow: &Flow,
    step_id: &str,
    new_id: &str,
    options: DuplicateOptions,
) -> Result<Flow, FlowError> {
    debug!(step_id, new_id, copy_edges = options.copy_edges, "duplicating step");

    let index = flow
        .position_of(step_id)
        .ok_or_else(|| FlowError::StepNotFound {
            step_id: step_id.to_string(),
        })?;
    if !ident::is_valid_step_id(new_id) {
        return Err(FlowError::InvalidIdentifier {
            ident: new_id.to_string(),
            expected: ident::STEP_ID_HINT,
        });
    }
    if flow.step(new_id).is_some() {
        return Err(FlowError::DuplicateIdentifier {
            ident: new_id.to_string(),
        });
    }

    let mut copy = flow.steps[index].clone();
    copy.id = new_id.to_string();
    if !options.copy_edges {
        copy.next.clear();
    }

    let mut next = flow.clone();
    next.steps.insert(index + 1, copy);
    finalize(next)
}

/// Add a transition from `step_id`.
pub fn add_edge(flow: &Flow, step_id: &str, edge: NextStep) -> Result<Flow, FlowError> {
    debug!(step_id, to = %edge.to, "adding edge");

    let index = flow
        .position_of(step_id)
        .ok_or_else(|| FlowError::StepNotFound {
            step_id: step_id.to_string(),
        })?;
    check_edge(flow, step_id, &edge)?;

    // One edge per condition on a given source step
    if let Some(ref when) = edge.when {
        let source = &flow.steps[index];
        if source.next.iter().any(|e| e.when.as_deref() == Some(when)) {
            return Err(FlowError::DuplicateIdentifier {
                ident: when.clone(),
            });
        }
    }

    let mut next = flow.clone();
    next.steps[index].next.push(edge);
    finalize(next)
}

/// Replace the edge at `index` on `step_id`.
pub fn update_edge(
    flow: &Flow,
    step_id: &str,
    index: usize,
    edge: NextStep,
) -> Result<Flow, FlowError> {
    debug!(step_id, index, to = %edge.to, "updating edge");

    let step_index = flow
        .position_of(step_id)
        .ok_or_else(|| FlowError::StepNotFound {
            step_id: step_id.to_string(),
        })?;
    if index >= flow.steps[step_index].next.len() {
        return Err(FlowError::EdgeNotFound {
            step_id: step_id.to_string(),
            index,
        });
    }

    // The edge being replaced must not participate in the cycle probe,
    // so drop it before checking.
    let mut next = flow.clone();
    next.steps[step_index].next.remove(index);
    check_edge(&next, step_id, &edge)?;

    if let Some(ref when) = edge.when {
        let source = &next.steps[step_index];
        if source.next.iter().any(|e| e.when.as_deref() == Some(when)) {
            return Err(FlowError::DuplicateIdentifier {
                ident: when.clone(),
            });
        }
    }

    next.steps[step_index].next.insert(index, edge);
    finalize(next)
}

/// Remove the edge at `index` on `step_id`. Fails only on a bad index.
pub fn remove_edge(flow: &Flow, step_id: &str, index: usize) -> Result<Flow, FlowError> {
    debug!(step_id, index, "removing edge");

    let step_index = flow
        .position_of(step_id)
        .ok_or_else(|| FlowError::StepNotFound {
            step_id: step_id.to_string(),
        })?;
    if index >= flow.steps[step_index].next.len() {
        return Err(FlowError::EdgeNotFound {
            step_id: step_id.to_string(),
            index,
        });
    }

    let mut next = flow.clone();
    next.steps[step_index].next.remove(index);
    finalize(next)
}

/// Shared edge preconditions: target resolves, condition is well
/// formed, and the transition does not close a cycle.
fn check_edge(flow: &Flow, step_id: &str, edge: &NextStep) -> Result<(), FlowError> {
    if flow.step(&edge.to).is_none() {
        return Err(FlowError::DanglingReference {
            step_id: step_id.to_string(),
            to: edge.to.clone(),
        });
    }
    if let Some(ref when) = edge.when {
        if !ident::is_valid_condition(when) {
            return Err(FlowError::InvalidIdentifier {
                ident: when.clone(),
                expected: ident::CONDITION_HINT,
            });
        }
    }
    if would_create_cycle(flow, step_id, &edge.to) {
        return Err(FlowError::CycleDetected {
            from: step_id.to_string(),
            to: edge.to.clone(),
        });
    }
    Ok(())
}

/// Run the validator over the mutated flow; the first fatal diagnostic
/// becomes the failure.
fn finalize(flow: Flow) -> Result<Flow, FlowError> {
    match validate(&flow).into_iter().find(|d| d.is_fatal()) {
        Some(diag) => Err(diag.into()),
        None => Ok(flow),
    }
}
