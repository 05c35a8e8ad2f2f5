//! Draft editor state machine
//!
//! An [`Editor`] holds an in-memory draft next to the last value the server
//! acknowledged. It is driven by discrete events (edit, submit, success,
//! failure, external update) and never talks to the network itself; the
//! controllers own the remote calls and feed their outcomes back in.

use std::fmt;

use crate::kv::KeyValueModel;
use crate::model::Head;

/// Something that can be edited locally and compared against a committed value
pub trait Draft {
    type Snapshot: Clone + PartialEq + fmt::Debug;

    fn from_snapshot(snapshot: &Self::Snapshot) -> Self;

    /// Value that would be sent on submit
    fn snapshot(&self) -> Self::Snapshot;
}

impl Draft for KeyValueModel {
    type Snapshot = Head;

    fn from_snapshot(snapshot: &Head) -> Self {
        KeyValueModel::from_head(snapshot)
    }

    fn snapshot(&self) -> Head {
        self.to_submittable()
    }
}

impl Draft for String {
    type Snapshot = String;

    fn from_snapshot(snapshot: &String) -> Self {
        snapshot.clone()
    }

    fn snapshot(&self) -> String {
        self.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// Draft equals the committed value
    Clean,
    /// Draft differs from the committed value
    Dirty,
    /// A save request is in flight
    Submitting,
    /// Last save failed; draft retained
    Error,
}

impl EditorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorState::Clean => "clean",
            EditorState::Dirty => "dirty",
            EditorState::Submitting => "submitting",
            EditorState::Error => "error",
        }
    }
}

impl fmt::Display for EditorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct Editor<D: Draft> {
    draft: D,
    committed: D::Snapshot,
    state: EditorState,
    last_error: Option<String>,
}

/// Head metadata editor
pub type KeyValueEditor = Editor<KeyValueModel>;
/// Page name editor
pub type NameEditor = Editor<String>;

impl<D: Draft> Editor<D> {
    pub fn new(committed: D::Snapshot) -> Self {
        let draft = D::from_snapshot(&committed);
        Self {
            committed: draft.snapshot(),
            draft,
            state: EditorState::Clean,
            last_error: None,
        }
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    /// Last value acknowledged by the server
    pub fn committed(&self) -> &D::Snapshot {
        &self.committed
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Structural comparison of the draft against the committed value
    pub fn is_dirty(&self) -> bool {
        self.draft.snapshot() != self.committed
    }

    pub fn is_submitting(&self) -> bool {
        self.state == EditorState::Submitting
    }

    /// Whether a save affordance should be offered
    pub fn can_submit(&self) -> bool {
        matches!(self.state, EditorState::Dirty | EditorState::Error) && self.is_dirty()
    }

    /// Apply a change to the draft.
    ///
    /// Returns `None` without touching the draft while a save is in flight.
    pub fn edit<R>(&mut self, change: impl FnOnce(&mut D) -> R) -> Option<R> {
        if self.is_submitting() {
            tracing::debug!("Edit ignored while a save is in flight");
            return None;
        }
        let result = change(&mut self.draft);
        if self.is_dirty() {
            self.state = EditorState::Dirty;
        } else {
            self.state = EditorState::Clean;
            self.last_error = None;
        }
        Some(result)
    }

    /// Enter `Submitting` and hand out the payload to send.
    ///
    /// Returns `None` when there is nothing to save or a save is already in flight.
    pub fn begin_submit(&mut self) -> Option<D::Snapshot> {
        if !self.can_submit() {
            return None;
        }
        self.state = EditorState::Submitting;
        Some(self.draft.snapshot())
    }

    /// Server accepted the save; adopt its acknowledged value.
    pub fn submit_succeeded(&mut self, acknowledged: D::Snapshot) {
        if !self.is_submitting() {
            return;
        }
        self.draft = D::from_snapshot(&acknowledged);
        self.committed = self.draft.snapshot();
        self.state = EditorState::Clean;
        self.last_error = None;
    }

    /// Server rejected the save; keep the draft for a retry.
    pub fn submit_failed(&mut self, message: impl Into<String>) {
        if !self.is_submitting() {
            return;
        }
        self.state = EditorState::Error;
        self.last_error = Some(message.into());
    }

    /// A fresh value arrived from outside (e.g. the record was reloaded).
    ///
    /// The draft is replaced only when the editor is clean; otherwise only the
    /// committed value moves. Returns whether the draft was replaced.
    pub fn external_update(&mut self, snapshot: D::Snapshot) -> bool {
        match self.state {
            EditorState::Clean => {
                self.draft = D::from_snapshot(&snapshot);
                self.committed = self.draft.snapshot();
                true
            }
            EditorState::Submitting => {
                self.committed = normalized::<D>(&snapshot);
                false
            }
            EditorState::Dirty | EditorState::Error => {
                self.committed = normalized::<D>(&snapshot);
                if !self.is_dirty() {
                    self.state = EditorState::Clean;
                    self.last_error = None;
                }
                false
            }
        }
    }

    /// Throw the draft away and go back to the committed value
    pub fn cancel(&mut self) {
        if self.is_submitting() {
            return;
        }
        self.draft = D::from_snapshot(&self.committed);
        self.state = EditorState::Clean;
        self.last_error = None;
    }
}

/// Committed values are stored in the same shape a draft would submit, so
/// entries a draft can never carry (blank keys) do not keep it dirty.
fn normalized<D: Draft>(snapshot: &D::Snapshot) -> D::Snapshot {
    D::from_snapshot(snapshot).snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn head_editor() -> KeyValueEditor {
        KeyValueEditor::new(Head::from_entries([("title", "Home"), ("description", "")]))
    }

    #[test]
    fn test_edit_marks_dirty() {
        let mut editor = head_editor();
        assert_eq!(editor.state(), EditorState::Clean);
        assert!(!editor.can_submit());

        editor.edit(|m| m.set("keywords", "shop"));
        assert_eq!(editor.state(), EditorState::Dirty);
        assert!(editor.can_submit());
    }

    #[test]
    fn test_edit_back_to_committed_is_clean() {
        let mut editor = head_editor();
        editor.edit(|m| m.set("title", "Other"));
        editor.edit(|m| m.set("title", "Home"));
        assert_eq!(editor.state(), EditorState::Clean);
    }

    #[test]
    fn test_staged_row_alone_is_not_submittable() {
        let mut editor = head_editor();
        editor.edit(|m| m.add_row());
        assert_eq!(editor.draft().len(), 3);
        assert!(!editor.can_submit());
        assert_eq!(editor.begin_submit(), None);
    }

    #[test]
    fn test_success_adopts_acknowledged_value() {
        let mut editor = head_editor();
        editor.edit(|m| m.set("title", "Welcome"));
        let payload = editor.begin_submit().unwrap();
        assert_eq!(payload.get("title"), Some("Welcome"));
        assert_eq!(editor.state(), EditorState::Submitting);

        // Server trimmed the title on its side
        let ack = Head::from_entries([("title", "Welcome"), ("description", "normalized")]);
        editor.submit_succeeded(ack.clone());

        assert_eq!(editor.state(), EditorState::Clean);
        assert_eq!(editor.committed(), &ack);
        assert_eq!(editor.draft().to_submittable(), ack);
        assert_eq!(editor.last_error(), None);
    }

    #[test]
    fn test_failure_keeps_draft() {
        let mut editor = head_editor();
        editor.edit(|m| m.set("title", "Welcome"));
        editor.begin_submit().unwrap();
        editor.submit_failed("server unavailable");

        assert_eq!(editor.state(), EditorState::Error);
        assert_eq!(editor.last_error(), Some("server unavailable"));
        assert_eq!(editor.draft().get("title"), Some("Welcome"));

        // Retry straight from the error state
        assert!(editor.begin_submit().is_some());
    }

    #[test]
    fn test_no_second_submit_while_in_flight() {
        let mut editor = head_editor();
        editor.edit(|m| m.set("title", "Welcome"));
        assert!(editor.begin_submit().is_some());
        assert!(editor.begin_submit().is_none());
        assert_eq!(editor.edit(|m| m.set("title", "late")), None);
        assert_eq!(editor.draft().get("title"), Some("Welcome"));
    }

    #[test]
    fn test_external_update_respects_local_edits() {
        let mut editor = head_editor();
        let refreshed = Head::from_entries([("title", "Remote")]);

        editor.edit(|m| m.set("title", "Local"));
        assert!(!editor.external_update(refreshed.clone()));
        assert_eq!(editor.draft().get("title"), Some("Local"));
        assert_eq!(editor.committed(), &refreshed);
        assert_eq!(editor.state(), EditorState::Dirty);

        let mut clean = head_editor();
        assert!(clean.external_update(refreshed.clone()));
        assert_eq!(clean.draft().to_submittable(), refreshed);
    }

    #[test]
    fn test_external_update_matching_draft_clears_error() {
        let mut editor = NameEditor::new("about".to_string());
        editor.edit(|name| *name = "about-us".to_string());
        editor.begin_submit().unwrap();
        editor.submit_failed("timeout");

        editor.external_update("about-us".to_string());
        assert_eq!(editor.state(), EditorState::Clean);
        assert_eq!(editor.last_error(), None);
    }

    #[test]
    fn test_blank_key_from_server_stays_clean() {
        let mut editor =
            KeyValueEditor::new(Head::from_entries([("title", "Home"), ("", "stray")]));
        assert_eq!(editor.state(), EditorState::Clean);
        assert!(!editor.is_dirty());

        editor.edit(|m| m.set("title", "Home"));
        assert_eq!(editor.state(), EditorState::Clean);
        assert!(!editor.can_submit());

        editor.external_update(Head::from_entries([("title", "Remote"), ("  ", "x")]));
        assert!(!editor.is_dirty());
        assert_eq!(editor.committed(), &Head::from_entries([("title", "Remote")]));
    }

    #[test]
    fn test_edit_back_after_failure_clears_error() {
        let mut editor = NameEditor::new("about".to_string());
        editor.edit(|name| *name = "x".to_string());
        editor.begin_submit().unwrap();
        editor.submit_failed("boom");
        assert_eq!(editor.last_error(), Some("boom"));

        editor.edit(|name| *name = "about".to_string());
        assert_eq!(editor.state(), EditorState::Clean);
        assert_eq!(editor.last_error(), None);
    }

    #[test]
    fn test_cancel_restores_committed() {
        let mut editor = NameEditor::new("about".to_string());
        editor.edit(|name| name.push_str("-us"));
        assert!(editor.can_submit());
        editor.cancel();
        assert_eq!(editor.draft(), "about");
        assert_eq!(editor.state(), EditorState::Clean);
    }
}
