//! Flow document model
//!
//! The canonical in-memory representation of a workflow: a directed
//! graph of steps connected by conditional transitions. These types are
//! plain owned data; `Clone` on `Flow` is the single deep-copy
//! primitive the rest of the crate relies on. A cloned flow shares no
//! mutable substructure with its original, which is what makes history
//! snapshots immune to later edits elsewhere.

use serde::{Deserialize, Serialize};

use crate::error::FlowError;
use crate::ident;

/// The canonical schema tag for flow documents.
pub const FLOW_SCHEMA: &str = "flowspec.v1";

/// A complete workflow document.
///
/// Invariants (enforced by [`crate::validate::validate`], not the type):
/// - `id` matches `<domain>.<name>.v<major>`
/// - step ids are pairwise unique
/// - every `next.to` resolves to a declared step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    pub schema: String,
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    pub policy: Policy,
    pub steps: Vec<Step>,
}

impl Flow {
    /// Create a minimal valid flow with a single starting step.
    ///
    /// Fails if `id` does not match the flow-id pattern.
    pub fn from_template(id: &str, title: &str) -> Result<Self, FlowError> {
        if !ident::is_valid_flow_id(id) {
            return Err(FlowError::InvalidIdentifier {
                ident: id.to_string(),
                expected: ident::FLOW_ID_HINT,
            });
        }

        Ok(Flow {
            schema: FLOW_SCHEMA.to_string(),
            id: id.to_string(),
            title: title.to_string(),
            owner: None,
            labels: Vec::new(),
            policy: Policy::default(),
            steps: vec![Step {
                id: "start".to_string(),
                title: Some("Start".to_string()),
                role: Role::Human,
                instructions: vec!["Describe the first unit of work".to_string()],
                acceptance: vec![Check::Manual {
                    expr: "done".to_string(),
                }],
                next: Vec::new(),
                prompts: None,
                context: None,
                token: None,
            }],
        })
    }

    /// Look up a step by id.
    pub fn step(&self, step_id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    /// Position of a step in document order.
    pub fn position_of(&self, step_id: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.id == step_id)
    }

    /// All step ids in document order.
    pub fn step_ids(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.id.as_str())
    }
}

/// One unit of work in the flow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub role: Role,
    pub instructions: Vec<String>,
    pub acceptance: Vec<Check>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next: Vec<NextStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompts: Option<Prompts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<StepContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenGrant>,
}

/// Actor that carries out a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Human,
    Ai,
    System,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Human => write!(f, "human"),
            Role::Ai => write!(f, "ai"),
            Role::System => write!(f, "system"),
        }
    }
}

/// Directed transition from the owning step to `to`.
///
/// `when` is an optional guard label (lowercase with underscores).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextStep {
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,
}

impl NextStep {
    pub fn to(target: impl Into<String>) -> Self {
        NextStep {
            to: target.into(),
            when: None,
        }
    }

    pub fn when(target: impl Into<String>, condition: impl Into<String>) -> Self {
        NextStep {
            to: target.into(),
            when: Some(condition.into()),
        }
    }
}

/// Cross-cutting enforcement mode for the whole flow.
///
/// Read-only input to validation; the mutation API never touches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub enforcement: Enforcement,
    #[serde(default)]
    pub tokens_required: bool,
    #[serde(default)]
    pub events_required: bool,
}

impl Default for Policy {
    fn default() -> Self {
        Policy {
            enforcement: Enforcement::Advice,
            tokens_required: false,
            events_required: false,
        }
    }
}

/// Enforcement levels, from advisory to hard-blocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Enforcement {
    None,
    Advice,
    Guard,
    Hard,
}

/// Acceptance check, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Check {
    /// A human attests that `expr` holds.
    Manual { expr: String },
    /// A file must exist at the given path.
    FileExists { file: String },
    /// Named keys must be present in a file.
    KeysPresent { file: String, keys: Vec<String> },
    /// A collection at `path` must have at least `min` entries.
    MinCount { path: String, min: u32 },
}

/// Prompt material attached to an AI step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Background context for a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brief: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
}

/// Capability grant scoped to a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenGrant {
    #[serde(default)]
    pub advisory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<TokenScope>,
}

/// What a token grant allows the step to touch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenScope {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fs_read: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fs_write: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exec: Vec<String>,
}
