//! End-to-end editing scenarios: mutate, validate, and walk history
//! the way a UI session would.

use flowspec::{
    add_edge, add_step, describe_action, duplicate_step, remove_step, validate, ActionKind,
    Check, DuplicateOptions, Flow, FlowError, History, NextStep, Role, Step,
};

fn review_flow() -> Flow {
    serde_yaml::from_str(
        r#"
schema: flowspec.v1
id: ops.review.v1
title: Ops review
policy:
  enforcement: guard
steps:
  - id: a
    role: ai
    instructions: ["Draft the change"]
    acceptance:
      - kind: manual
        expr: drafted
    next:
      - to: b
  - id: b
    role: human
    instructions: ["Review the change"]
    acceptance:
      - kind: manual
        expr: reviewed
"#,
    )
    .unwrap()
}

fn make_step(id: &str) -> Step {
    Step {
        id: id.to_string(),
        title: None,
        role: Role::System,
        instructions: vec!["Run checks".to_string()],
        acceptance: vec![Check::Manual {
            expr: "checks_passed".to_string(),
        }],
        next: Vec::new(),
        prompts: None,
        context: None,
        token: None,
    }
}

#[test]
fn valid_flow_validates_clean() {
    assert!(validate(&review_flow()).is_empty());
}

#[test]
fn back_edge_is_rejected_as_cycle() {
    // a -> b exists, so b -> a must fail
    let flow = review_flow();
    let err = add_edge(&flow, "b", NextStep::to("a")).unwrap_err();
    assert!(matches!(err, FlowError::CycleDetected { .. }));

    // while an edge that does not close a cycle succeeds
    let flow = add_step(&flow, make_step("c")).unwrap();
    assert!(add_edge(&flow, "b", NextStep::to("c")).is_ok());
}

#[test]
fn removing_a_step_leaves_no_dangling_edges() {
    let flow = review_flow();
    let next = remove_step(&flow, "b").unwrap();
    assert!(next.step("a").unwrap().next.is_empty());
    assert!(next
        .steps
        .iter()
        .all(|s| s.next.iter().all(|e| e.to != "b")));
    assert!(validate(&next).is_empty());
}

#[test]
fn duplicate_then_readd_same_id_fails() {
    let flow = review_flow();
    let next = duplicate_step(&flow, "a", "a_copy", DuplicateOptions::default()).unwrap();

    let original = next.step("a").unwrap();
    let copy = next.step("a_copy").unwrap();
    assert_eq!(original.instructions, copy.instructions);
    assert_eq!(original.acceptance, copy.acceptance);
    assert_ne!(original.id, copy.id);

    let err = add_step(&next, make_step("a_copy")).unwrap_err();
    assert!(matches!(err, FlowError::DuplicateIdentifier { .. }));
}

#[test]
fn editing_session_with_branching_history() {
    let mut history = History::new();
    let f1 = review_flow();
    history.push(&f1, describe_action(ActionKind::Load, None), 100);

    let f2 = add_step(&f1, make_step("c")).unwrap();
    history.push(
        &f2,
        describe_action(ActionKind::AddStep, Some("c")),
        200,
    );

    // user undoes, then makes a different edit: the f2 branch dies
    let undone = history.undo().unwrap().flow.clone();
    assert_eq!(undone, f1);

    let f3 = duplicate_step(&undone, "a", "a_copy", DuplicateOptions::default()).unwrap();
    history.push(
        &f3,
        describe_action(ActionKind::DuplicateStep, Some("a")),
        300,
    );

    assert!(!history.can_redo());
    assert_eq!(history.current().unwrap().flow, f3);

    let info = history.info();
    assert_eq!(info.total, 2);
    assert_eq!(info.actions.last().unwrap(), "→ Duplicated step 'a'");
}

#[test]
fn sixty_pushes_keep_the_newest_fifty() {
    let mut history = History::new();
    let base = review_flow();
    for n in 1..=60u64 {
        let mut f = base.clone();
        f.title = format!("rev {n}");
        history.push(&f, format!("edit {n}"), n);
    }
    assert_eq!(history.len(), 50);
    assert_eq!(history.current().unwrap().flow.title, "rev 60");

    // walk all the way back: the oldest surviving entry is the 11th push
    while history.can_undo() {
        history.undo();
    }
    assert_eq!(history.current().unwrap().flow.title, "rev 11");
}

#[test]
fn mutations_never_touch_their_input() {
    let flow = review_flow();
    let before = flow.clone();

    let _ = add_step(&flow, make_step("c")).unwrap();
    let _ = remove_step(&flow, "b").unwrap();
    let _ = add_edge(&flow, "a", NextStep::when("b", "approved")).unwrap();

    assert_eq!(flow, before);
}
