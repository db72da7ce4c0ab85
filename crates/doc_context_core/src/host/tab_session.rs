//! In-memory tab bar standing in for the host editor.

use super::{ActiveDocumentProvider, HostActions};
use crate::model::document::DocId;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct TabState {
    tabs: Vec<DocId>,
    active: Option<DocId>,
    focused_in_tree: Option<DocId>,
    notices: Vec<String>,
}

/// Ordered tabs plus the focused one.
///
/// Opening an already open document focuses its tab instead of duplicating it.
/// Closing the focused tab focuses the last remaining tab.
#[derive(Debug, Default)]
pub struct TabSession {
    state: Mutex<TabState>,
}

impl TabSession {
    /// Starts a session with `doc_id` open and focused.
    pub fn with_document(doc_id: impl Into<DocId>) -> Self {
        let doc_id = doc_id.into();
        Self {
            state: Mutex::new(TabState {
                tabs: vec![doc_id.clone()],
                active: Some(doc_id),
                ..TabState::default()
            }),
        }
    }

    pub fn tabs(&self) -> Vec<DocId> {
        self.lock().tabs.clone()
    }

    pub fn focused_in_tree(&self) -> Option<DocId> {
        self.lock().focused_in_tree.clone()
    }

    /// Returns and clears notices shown since the last call.
    pub fn take_notices(&self) -> Vec<String> {
        std::mem::take(&mut self.lock().notices)
    }

    fn lock(&self) -> MutexGuard<'_, TabState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ActiveDocumentProvider for TabSession {
    fn active_document(&self) -> Option<DocId> {
        self.lock().active.clone()
    }
}

impl HostActions for TabSession {
    fn open_document(&self, doc_id: &str) {
        let mut state = self.lock();
        if !state.tabs.iter().any(|tab| tab == doc_id) {
            state.tabs.push(doc_id.to_string());
        }
        state.active = Some(doc_id.to_string());
    }

    fn close_document(&self, doc_id: &str) {
        let mut state = self.lock();
        state.tabs.retain(|tab| tab != doc_id);
        if state.active.as_deref() == Some(doc_id) {
            state.active = state.tabs.last().cloned();
        }
    }

    fn focus_in_file_tree(&self, doc_id: &str) {
        self.lock().focused_in_tree = Some(doc_id.to_string());
    }

    fn notify(&self, message: &str) {
        self.lock().notices.push(message.to_string());
    }
}
