//! Identifier syntax contracts
//!
//! Wire-level patterns other layers must honor. Regexes are compiled
//! once and shared.

use once_cell::sync::Lazy;
use regex::Regex;

/// Flow id: `<domain>.<name>.v<major>`
static FLOW_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_.-]+\.[a-z0-9_.-]+\.v[0-9]+$").unwrap());

/// Step id: lowercase alphanumeric plus `_`, `.`, `-`
static STEP_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9_.-]+$").unwrap());

/// Edge condition: lowercase with underscores
static CONDITION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9_]+$").unwrap());

pub const FLOW_ID_HINT: &str = "<domain>.<name>.v<major>";
pub const STEP_ID_HINT: &str = "lowercase alphanumeric with underscores, dots, or hyphens";
pub const CONDITION_HINT: &str = "lowercase with underscores";

pub fn is_valid_flow_id(id: &str) -> bool {
    FLOW_ID.is_match(id)
}

pub fn is_valid_step_id(id: &str) -> bool {
    STEP_ID.is_match(id)
}

pub fn is_valid_condition(when: &str) -> bool {
    CONDITION.is_match(when)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_id_accepts_domain_name_version() {
        assert!(is_valid_flow_id("ops.review.v1"));
        assert!(is_valid_flow_id("my-team.data_sync.v12"));
        assert!(is_valid_flow_id("a.b.c.v2")); // extra dotted segment folds into domain
    }

    #[test]
    fn flow_id_rejects_missing_version() {
        assert!(!is_valid_flow_id("ops.review"));
        assert!(!is_valid_flow_id("ops.review.v"));
        assert!(!is_valid_flow_id("ops.review.1"));
        assert!(!is_valid_flow_id("Ops.Review.v1"));
        assert!(!is_valid_flow_id(""));
    }

    #[test]
    fn step_id_is_lowercase_token() {
        assert!(is_valid_step_id("review"));
        assert!(is_valid_step_id("step_1"));
        assert!(is_valid_step_id("a.b-c"));
        assert!(!is_valid_step_id("Review"));
        assert!(!is_valid_step_id("has space"));
        assert!(!is_valid_step_id(""));
    }

    #[test]
    fn condition_is_snake_case() {
        assert!(is_valid_condition("approved"));
        assert!(is_valid_condition("checks_passed"));
        assert!(!is_valid_condition("Invalid-Condition"));
        assert!(!is_valid_condition(""));
    }
}
