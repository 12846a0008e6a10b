//! Bounded branching undo/redo
//!
//! A cursor over an ordered sequence of flow snapshots. Pushing after
//! an undo discards the forward branch (branching, not merging). The
//! manager owns deep copies of every snapshot, so external mutation of
//! a live flow can never retroactively corrupt history. Timestamps are
//! supplied by the caller; the manager never reads a clock.

use std::fmt::Write as _;

use tracing::debug;

use crate::flow::Flow;

/// Default cap on retained snapshots.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// An immutable snapshot of a flow plus how and when it got there.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub flow: Flow,
    pub label: String,
    pub timestamp_ms: u64,
}

/// Display summary of the history state.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryInfo {
    /// 1-based position of the current entry.
    pub current: usize,
    pub total: usize,
    pub can_undo: bool,
    pub can_redo: bool,
    /// All action labels in order; the current entry is prefixed `→ `.
    pub actions: Vec<String>,
}

/// Branching undo/redo stack, bounded at `limit` entries.
///
/// Not shared across editing sessions; concurrent access to a single
/// instance must be serialized by the caller.
#[derive(Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        History {
            entries: Vec::new(),
            cursor: 0,
            limit: limit.max(1),
        }
    }

    /// Record a new snapshot as the present state.
    ///
    /// Any redo branch past the cursor is discarded first. When the cap
    /// is exceeded the oldest entry is evicted; the just-pushed entry is
    /// always the current one, so eviction never removes it.
    pub fn push(&mut self, flow: &Flow, label: impl Into<String>, timestamp_ms: u64) {
        let label = label.into();
        debug!(%label, "pushing history entry");

        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(HistoryEntry {
            flow: flow.clone(),
            label,
            timestamp_ms,
        });

        if self.entries.len() > self.limit {
            self.entries.remove(0);
            // cursor already points at the shifted last entry
        } else if self.entries.len() > 1 {
            self.cursor += 1;
        }
    }

    /// Step back one entry. `None` when already at the first entry.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor])
    }

    /// Step forward one entry. `None` when already at the last entry.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(&self.entries[self.cursor])
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.entries.is_empty() && self.cursor + 1 < self.entries.len()
    }

    /// The entry under the cursor.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ordered action labels with a marker on the current entry.
    pub fn info(&self) -> HistoryInfo {
        let actions = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                if i == self.cursor {
                    format!("→ {}", entry.label)
                } else {
                    format!("  {}", entry.label)
                }
            })
            .collect();

        HistoryInfo {
            current: if self.entries.is_empty() {
                0
            } else {
                self.cursor + 1
            },
            total: self.entries.len(),
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            actions,
        }
    }

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    /// Compressed one-line-per-entry dump for debugging.
    pub fn debug_info(&self) -> String {
        let mut out = String::new();
        for (i, entry) in self.entries.iter().enumerate() {
            let marker = if i == self.cursor { '→' } else { ' ' };
            let _ = writeln!(out, "{marker} [{i}] {}ms: {}", entry.timestamp_ms, entry.label);
        }
        out
    }
}

/// What kind of edit a history label describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    AddStep,
    RemoveStep,
    UpdateStep,
    DuplicateStep,
    AddEdge,
    RemoveEdge,
    UpdateEdge,
    Load,
    Reset,
}

/// Human-readable label for a history entry, e.g. `Added step 'review'`.
pub fn describe_action(kind: ActionKind, subject: Option<&str>) -> String {
    let (verb, noun) = match kind {
        ActionKind::AddStep => ("Added", "step"),
        ActionKind::RemoveStep => ("Removed", "step"),
        ActionKind::UpdateStep => ("Updated", "step"),
        ActionKind::DuplicateStep => ("Duplicated", "step"),
        ActionKind::AddEdge => ("Added", "edge"),
        ActionKind::RemoveEdge => ("Removed", "edge"),
        ActionKind::UpdateEdge => ("Updated", "edge"),
        ActionKind::Load => return "Loaded workflow".to_string(),
        ActionKind::Reset => return "Reset changes".to_string(),
    };
    match subject {
        Some(subject) => format!("{verb} {noun} '{subject}'"),
        None => format!("{verb} {noun}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow(n: usize) -> Flow {
        let mut f = Flow::from_template("ops.review.v1", "Review").unwrap();
        f.title = format!("Review v{n}");
        f
    }

    #[test]
    fn test_empty_history() {
        let mut history = History::new();
        assert!(history.is_empty());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert!(history.current().is_none());
        assert_eq!(history.info().current, 0);
    }

    #[test]
    fn test_push_then_undo_redo() {
        let mut history = History::new();
        history.push(&flow(1), "Loaded workflow", 1);
        history.push(&flow(2), "Updated step 'a'", 2);

        assert!(history.can_undo());
        assert!(!history.can_redo());

        let entry = history.undo().unwrap();
        assert_eq!(entry.flow.title, "Review v1");
        assert!(history.can_redo());

        let entry = history.redo().unwrap();
        assert_eq!(entry.flow.title, "Review v2");
        assert!(!history.can_redo());
    }

    #[test]
    fn test_push_after_undo_discards_redo_branch() {
        let mut history = History::new();
        history.push(&flow(1), "f1", 1);
        history.push(&flow(2), "f2", 2);
        history.undo();
        history.push(&flow(3), "f3", 3);

        assert!(!history.can_redo(), "the f2 branch must be discarded");
        assert_eq!(history.len(), 2);
        assert_eq!(history.current().unwrap().flow.title, "Review v3");
        assert!(history
            .info()
            .actions
            .iter()
            .all(|label| !label.contains("f2")));
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut history = History::new();
        for n in 1..=60 {
            history.push(&flow(n), format!("push {n}"), n as u64);
        }
        assert_eq!(history.len(), 50);
        assert_eq!(history.current().unwrap().flow.title, "Review v60");
        // the first 10 entries are gone
        assert_eq!(history.info().actions[0], "  push 11");
        // undo still walks back from the newest
        assert_eq!(history.undo().unwrap().flow.title, "Review v59");
    }

    #[test]
    fn test_custom_limit() {
        let mut history = History::with_limit(2);
        history.push(&flow(1), "one", 1);
        history.push(&flow(2), "two", 2);
        history.push(&flow(3), "three", 3);
        assert_eq!(history.len(), 2);
        assert_eq!(history.current().unwrap().flow.title, "Review v3");
        assert_eq!(history.undo().unwrap().flow.title, "Review v2");
        assert!(!history.can_undo());
    }

    #[test]
    fn test_snapshots_are_owned_copies() {
        let mut history = History::new();
        let mut live = flow(1);
        history.push(&live, "initial", 1);

        live.steps[0].instructions.push("mutated after push".to_string());

        let snapshot = &history.current().unwrap().flow;
        assert_eq!(snapshot.steps[0].instructions.len(), 1);
    }

    #[test]
    fn test_info_marks_exactly_one_current() {
        let mut history = History::new();
        history.push(&flow(1), "one", 1);
        history.push(&flow(2), "two", 2);
        history.push(&flow(3), "three", 3);
        history.undo();

        let info = history.info();
        assert_eq!(info.current, 2);
        assert_eq!(info.total, 3);
        assert!(info.can_undo);
        assert!(info.can_redo);
        let marked: Vec<_> = info
            .actions
            .iter()
            .filter(|a| a.starts_with("→ "))
            .collect();
        assert_eq!(marked.len(), 1);
        assert_eq!(marked[0], "→ two");
    }

    #[test]
    fn test_clear() {
        let mut history = History::new();
        history.push(&flow(1), "one", 1);
        history.clear();
        assert!(history.is_empty());
        assert!(history.current().is_none());
    }

    #[test]
    fn test_debug_info_lists_entries() {
        let mut history = History::new();
        history.push(&flow(1), "one", 10);
        history.push(&flow(2), "two", 20);
        let dump = history.debug_info();
        assert!(dump.contains("[0] 10ms: one"));
        assert!(dump.contains("→ [1] 20ms: two"));
    }

    #[test]
    fn test_describe_action() {
        assert_eq!(
            describe_action(ActionKind::AddStep, Some("review")),
            "Added step 'review'"
        );
        assert_eq!(
            describe_action(ActionKind::RemoveEdge, None),
            "Removed edge"
        );
        assert_eq!(describe_action(ActionKind::Load, None), "Loaded workflow");
    }
}
