//! Host editor capabilities the core depends on.
//!
//! # Responsibility
//! - Abstract "which document is focused" away from any rendered UI.
//! - Abstract the host actions triggered by navigation and the view.
//!
//! # Invariants
//! - "No active document" is `None`, never an error.
//! - Host actions are fire-and-forget from the core's point of view.

use crate::model::document::DocId;
use std::sync::Mutex;

mod tab_session;

pub use tab_session::TabSession;

/// Reports the document currently focused in the host editor.
pub trait ActiveDocumentProvider {
    /// Returns the focused document id, or `None` when no editor is focused.
    fn active_document(&self) -> Option<DocId>;
}

/// Host-side effects requested by commands.
pub trait HostActions {
    /// Opens (or focuses) a tab for `doc_id`.
    fn open_document(&self, doc_id: &str);
    /// Closes the tab showing `doc_id`, if any.
    fn close_document(&self, doc_id: &str);
    /// Reveals `doc_id` in the host's file tree.
    fn focus_in_file_tree(&self, doc_id: &str);
    /// Shows a transient message to the user.
    fn notify(&self, message: &str);
}

/// Provider with a fixed answer, for one-shot invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedActiveDocument(Option<DocId>);

impl FixedActiveDocument {
    pub fn new(doc_id: Option<DocId>) -> Self {
        Self(doc_id.filter(|id| !id.trim().is_empty()))
    }
}

impl ActiveDocumentProvider for FixedActiveDocument {
    fn active_document(&self) -> Option<DocId> {
        self.0.clone()
    }
}

/// Host action recorded by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostAction {
    Open(DocId),
    Close(DocId),
    FocusInFileTree(DocId),
    Notify(String),
}

/// Host that records every requested action in order.
///
/// Used by headless front-ends and tests.
#[derive(Debug, Default)]
pub struct RecordingHost {
    actions: Mutex<Vec<HostAction>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns and clears the recorded actions.
    pub fn take_actions(&self) -> Vec<HostAction> {
        match self.actions.lock() {
            Ok(mut actions) => std::mem::take(&mut *actions),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    fn record(&self, action: HostAction) {
        match self.actions.lock() {
            Ok(mut actions) => actions.push(action),
            Err(poisoned) => poisoned.into_inner().push(action),
        }
    }
}

impl HostActions for RecordingHost {
    fn open_document(&self, doc_id: &str) {
        self.record(HostAction::Open(doc_id.to_string()));
    }

    fn close_document(&self, doc_id: &str) {
        self.record(HostAction::Close(doc_id.to_string()));
    }

    fn focus_in_file_tree(&self, doc_id: &str) {
        self.record(HostAction::FocusInFileTree(doc_id.to_string()));
    }

    fn notify(&self, message: &str) {
        self.record(HostAction::Notify(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ActiveDocumentProvider, FixedActiveDocument, HostAction, HostActions, RecordingHost,
    };

    #[test]
    fn blank_fixed_document_is_none() {
        assert_eq!(
            FixedActiveDocument::new(Some("  ".to_string())).active_document(),
            None
        );
        assert_eq!(
            FixedActiveDocument::new(Some("d1".to_string())).active_document(),
            Some("d1".to_string())
        );
    }

    #[test]
    fn recording_host_keeps_order_and_drains() {
        let host = RecordingHost::new();
        host.open_document("a");
        host.notify("hello");
        host.close_document("b");

        assert_eq!(
            host.take_actions(),
            vec![
                HostAction::Open("a".to_string()),
                HostAction::Notify("hello".to_string()),
                HostAction::Close("b".to_string()),
            ]
        );
        assert!(host.take_actions().is_empty());
    }
}
