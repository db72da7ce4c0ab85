//! Parent/child/sibling navigation and tab throttling.
//!
//! # Responsibility
//! - Pick the jump target relative to the active document.
//! - Open the target through the host and close the previous tab when
//!   navigations arrive within the throttle window.
//!
//! # Invariants
//! - Sibling index is matched on the raw logical path, not the id.
//! - Sibling moves wrap modularly; leaving either end fires a boundary notice
//!   and still wraps.
//! - The throttle timestamp is updated on every jump, closed tab or not.
//! - The previous tab is closed only after the new one was opened.

use crate::host::{ActiveDocumentProvider, HostActions};
use crate::model::document::DocId;
use crate::store::{DocumentStore, StoreError};
use log::{debug, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tokio::time::Instant;

/// Notice shown when moving before the first sibling.
pub const NOTICE_WRAPPED_TO_LAST: &str = "Wrapped to the last document";
/// Notice shown when moving past the last sibling.
pub const NOTICE_WRAPPED_TO_FIRST: &str = "Wrapped to the first document";
/// Notice shown when a root-level document has no parent.
pub const NOTICE_NO_PARENT: &str = "No parent document";
/// Notice shown when a document has no children.
pub const NOTICE_NO_CHILDREN: &str = "No child documents";
/// Notice shown when the active document is missing from its sibling listing.
pub const NOTICE_NOT_IN_LISTING: &str = "Current document is not in its sibling listing";

/// Direction of a sibling move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Previous,
    Next,
}

impl Step {
    pub fn delta(self) -> isize {
        match self {
            Self::Previous => -1,
            Self::Next => 1,
        }
    }
}

/// Result of one navigation command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationOutcome {
    /// No focused document; nothing happened.
    NoActiveDocument,
    /// Target opened.
    Opened {
        target: DocId,
        /// Previous document's tab was closed by the throttle.
        closed_previous: bool,
        /// Sibling move crossed a boundary and wrapped.
        wrapped: bool,
    },
    /// No target exists; the notice was shown.
    Unavailable(&'static str),
}

/// Errors from navigation commands.
#[derive(Debug)]
pub enum NavigationError {
    Store(StoreError),
}

impl Display for NavigationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NavigationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for NavigationError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Closes the previous tab when jumps come in faster than `window`.
#[derive(Debug, Clone)]
pub struct TabThrottle {
    enabled: bool,
    window: Duration,
    last_triggered: Option<Instant>,
}

impl TabThrottle {
    pub fn new(enabled: bool, window: Duration) -> Self {
        Self {
            enabled,
            window,
            last_triggered: None,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_window(&mut self, window: Duration) {
        self.window = window;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Records a jump at `now` and returns whether the previous tab should
    /// be closed.
    ///
    /// Disabled throttles never close and do not record.
    pub fn consult(&mut self, now: Instant) -> bool {
        if !self.enabled {
            return false;
        }
        let close_previous = self
            .last_triggered
            .map(|last| now.saturating_duration_since(last) <= self.window)
            .unwrap_or(false);
        self.last_triggered = Some(now);
        close_previous
    }
}

/// Navigation commands over a document store.
pub struct NavigationService<S: DocumentStore> {
    store: S,
    throttle: TabThrottle,
}

impl<S: DocumentStore> NavigationService<S> {
    pub fn new(store: S, throttle: TabThrottle) -> Self {
        Self { store, throttle }
    }

    pub fn throttle(&self) -> &TabThrottle {
        &self.throttle
    }

    pub fn throttle_mut(&mut self) -> &mut TabThrottle {
        &mut self.throttle
    }

    /// Opens the previous or next sibling, wrapping at either end.
    pub async fn go_to_sibling<P, H>(
        &mut self,
        provider: &P,
        host: &H,
        step: Step,
    ) -> Result<NavigationOutcome, NavigationError>
    where
        P: ActiveDocumentProvider + ?Sized,
        H: HostActions + ?Sized,
    {
        let Some(doc_id) = provider.active_document() else {
            return Ok(NavigationOutcome::NoActiveDocument);
        };
        let document = self.store.get_document(&doc_id).await?;
        let listing_path = document.sibling_listing_path();
        let siblings = self
            .store
            .list_documents(&document.box_id, &listing_path)
            .await?;

        let Some(index) = siblings
            .iter()
            .position(|sibling| sibling.path == document.path)
        else {
            host.notify(NOTICE_NOT_IN_LISTING);
            return Ok(NavigationOutcome::Unavailable(NOTICE_NOT_IN_LISTING));
        };

        let len = siblings.len();
        let wrapped = match step {
            Step::Previous => index == 0,
            Step::Next => index == len - 1,
        };
        if wrapped {
            host.notify(match step {
                Step::Previous => NOTICE_WRAPPED_TO_LAST,
                Step::Next => NOTICE_WRAPPED_TO_FIRST,
            });
        }

        let target_index = wrap_index(index, step.delta(), len);
        let target = siblings[target_index].id.clone();
        debug!(
            "event=go_to_sibling module=navigation status=ok from={index} to={target_index} len={len}"
        );
        let closed_previous = self.jump(host, &doc_id, &target);
        Ok(NavigationOutcome::Opened {
            target,
            closed_previous,
            wrapped,
        })
    }

    /// Opens the direct parent of the active document.
    pub async fn go_to_parent<P, H>(
        &mut self,
        provider: &P,
        host: &H,
    ) -> Result<NavigationOutcome, NavigationError>
    where
        P: ActiveDocumentProvider + ?Sized,
        H: HostActions + ?Sized,
    {
        let Some(doc_id) = provider.active_document() else {
            return Ok(NavigationOutcome::NoActiveDocument);
        };
        let document = self.store.get_document(&doc_id).await?;
        let path = document.logical_path();
        let Some(parent_id) = path.parent_id() else {
            host.notify(NOTICE_NO_PARENT);
            return Ok(NavigationOutcome::Unavailable(NOTICE_NO_PARENT));
        };
        let parent = self.store.get_document(parent_id).await?;

        let closed_previous = self.jump(host, &doc_id, &parent.id);
        Ok(NavigationOutcome::Opened {
            target: parent.id,
            closed_previous,
            wrapped: false,
        })
    }

    /// Opens the first child of the active document.
    pub async fn go_to_child<P, H>(
        &mut self,
        provider: &P,
        host: &H,
    ) -> Result<NavigationOutcome, NavigationError>
    where
        P: ActiveDocumentProvider + ?Sized,
        H: HostActions + ?Sized,
    {
        let Some(doc_id) = provider.active_document() else {
            return Ok(NavigationOutcome::NoActiveDocument);
        };
        let document = self.store.get_document(&doc_id).await?;
        let children = self
            .store
            .list_documents(&document.box_id, &document.path)
            .await?;
        let Some(first) = children.into_iter().next() else {
            host.notify(NOTICE_NO_CHILDREN);
            return Ok(NavigationOutcome::Unavailable(NOTICE_NO_CHILDREN));
        };

        let closed_previous = self.jump(host, &doc_id, &first.id);
        Ok(NavigationOutcome::Opened {
            target: first.id,
            closed_previous,
            wrapped: false,
        })
    }

    fn jump<H>(&mut self, host: &H, previous: &str, target: &str) -> bool
    where
        H: HostActions + ?Sized,
    {
        let close_previous = self.throttle.consult(Instant::now());
        host.open_document(target);
        // A one-element wrap reopens the same tab; closing it would lose it.
        let closed = close_previous && previous != target;
        if closed {
            host.close_document(previous);
        }
        info!(
            "event=navigate module=navigation status=ok target={target} closed_previous={closed}"
        );
        closed
    }
}

/// Moves `index` by `delta` within `0..len`, wrapping at both ends.
pub fn wrap_index(index: usize, delta: isize, len: usize) -> usize {
    debug_assert!(len > 0, "wrap_index needs a non-empty range");
    let len = len as isize;
    ((index as isize + delta).rem_euclid(len)) as usize
}
