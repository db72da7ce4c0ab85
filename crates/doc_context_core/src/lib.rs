//! Core logic for the document context navigator.
//! Resolves a document's place in its notebook hierarchy and drives
//! parent/child/sibling navigation against a remote document store.

pub mod command;
pub mod config;
pub mod host;
pub mod logging;
pub mod model;
pub mod render;
pub mod service;
pub mod store;

pub use command::dispatcher::{CommandDispatcher, CommandError, CommandOutput};
pub use command::registry::{
    Command, CommandGroup, CommandRegistry, CommandRegistryError, CommandSpec,
};
pub use config::{PluginSettings, SettingsError, StoreConfig};
pub use host::{
    ActiveDocumentProvider, FixedActiveDocument, HostAction, HostActions, RecordingHost, TabSession,
};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::document::{
    AncestorEntry, DocId, Document, ListingEntry, LogicalPath, Notebook, NotebookDirectory,
};
pub use model::outline::OutlineNode;
pub use render::{render_context, render_json, render_outline, Labels};
pub use service::create_service::{CreateError, CreateService, CreatedDocument, Placement};
pub use service::hierarchy_service::{ancestor_chain, DocContext, HierarchyError, HierarchyService};
pub use service::navigation_service::{
    NavigationError, NavigationOutcome, NavigationService, Step, TabThrottle,
};
pub use service::outline_service::OutlineService;
pub use store::{DocumentStore, HttpDocumentStore, StoreError, StoreResult};

