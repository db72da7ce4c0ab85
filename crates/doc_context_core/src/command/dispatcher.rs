//! Command dispatcher owning per-activation state.
//!
//! # Responsibility
//! - Wire services to the command surface and gate commands by settings.
//! - Own the tab throttle for the lifetime of one activation.
//!
//! # Invariants
//! - One dispatcher per activation; dropping it tears the throttle down.
//! - Disabled commands are rejected, never silently executed.

use super::registry::{Command, CommandGroup, CommandRegistry, CommandRegistryError};
use crate::config::PluginSettings;
use crate::host::{ActiveDocumentProvider, HostActions};
use crate::model::document::{DocId, NotebookDirectory};
use crate::model::outline::OutlineNode;
use crate::service::create_service::{CreateError, CreateService, CreatedDocument, Placement};
use crate::service::hierarchy_service::{DocContext, HierarchyError, HierarchyService};
use crate::service::navigation_service::{
    NavigationError, NavigationOutcome, NavigationService, Step, TabThrottle,
};
use crate::service::outline_service::OutlineService;
use crate::store::{DocumentStore, StoreError};
use log::{info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result of one dispatched command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum CommandOutput {
    /// No focused document; nothing happened.
    NoActiveDocument,
    Context(Box<DocContext>),
    Outline(Vec<OutlineNode>),
    Navigation(NavigationOutcome),
    Created(CreatedDocument),
    Focused(DocId),
}

/// Errors from dispatched commands.
#[derive(Debug)]
pub enum CommandError {
    /// Command exists but is turned off in settings.
    Disabled(&'static str),
    Registry(CommandRegistryError),
    Hierarchy(HierarchyError),
    Navigation(NavigationError),
    Create(CreateError),
    Store(StoreError),
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled(key) => write!(f, "command is disabled: {key}"),
            Self::Registry(err) => write!(f, "{err}"),
            Self::Hierarchy(err) => write!(f, "{err}"),
            Self::Navigation(err) => write!(f, "{err}"),
            Self::Create(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Disabled(_) => None,
            Self::Registry(err) => Some(err),
            Self::Hierarchy(err) => Some(err),
            Self::Navigation(err) => Some(err),
            Self::Create(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<CommandRegistryError> for CommandError {
    fn from(value: CommandRegistryError) -> Self {
        Self::Registry(value)
    }
}

impl From<HierarchyError> for CommandError {
    fn from(value: HierarchyError) -> Self {
        Self::Hierarchy(value)
    }
}

impl From<NavigationError> for CommandError {
    fn from(value: NavigationError) -> Self {
        Self::Navigation(value)
    }
}

impl From<CreateError> for CommandError {
    fn from(value: CreateError) -> Self {
        Self::Create(value)
    }
}

impl From<StoreError> for CommandError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Command surface bound to one store for one activation.
pub struct CommandDispatcher<S: DocumentStore + Clone> {
    registry: CommandRegistry,
    settings: PluginSettings,
    hierarchy: HierarchyService<S>,
    outline: OutlineService<S>,
    navigation: NavigationService<S>,
    create: CreateService<S>,
}

impl<S: DocumentStore + Clone> CommandDispatcher<S> {
    /// Activates the command surface with a known notebook directory.
    pub fn activate(
        store: S,
        notebooks: NotebookDirectory,
        settings: PluginSettings,
    ) -> Result<Self, CommandError> {
        let throttle = TabThrottle::new(
            settings.enable_tab_throttle,
            settings.tab_throttle_window(),
        );
        let mut dispatcher = Self {
            registry: CommandRegistry::new(),
            settings,
            hierarchy: HierarchyService::new(store.clone(), notebooks),
            outline: OutlineService::new(store.clone()),
            navigation: NavigationService::new(store.clone(), throttle),
            create: CreateService::new(store),
        };
        dispatcher.registry.set_group_enabled(CommandGroup::Core, true)?;
        dispatcher.apply_settings(settings)?;
        info!(
            "event=activate module=command status=ok commands={} notebooks={}",
            dispatcher.registry.len(),
            dispatcher.hierarchy.notebooks().len()
        );
        Ok(dispatcher)
    }

    /// Activates after loading the notebook directory from the store.
    pub async fn activate_with_store(
        store: S,
        settings: PluginSettings,
    ) -> Result<Self, CommandError> {
        let notebooks = store.list_notebooks().await?;
        Self::activate(store, NotebookDirectory::new(notebooks), settings)
    }

    /// Applies toggles and throttle window without resetting throttle history.
    pub fn apply_settings(&mut self, settings: PluginSettings) -> Result<(), CommandError> {
        self.registry.set_group_enabled(
            CommandGroup::ParentChild,
            settings.enable_parent_child_shortcuts,
        )?;
        self.registry
            .set_group_enabled(CommandGroup::Sibling, settings.enable_sibling_shortcuts)?;
        let throttle = self.navigation.throttle_mut();
        throttle.set_enabled(settings.enable_tab_throttle);
        throttle.set_window(settings.tab_throttle_window());
        self.settings = settings;
        Ok(())
    }

    pub fn settings(&self) -> &PluginSettings {
        &self.settings
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn throttle(&self) -> &TabThrottle {
        self.navigation.throttle()
    }

    /// Runs one registered command.
    pub async fn dispatch<P, H>(
        &mut self,
        command: Command,
        provider: &P,
        host: &H,
    ) -> Result<CommandOutput, CommandError>
    where
        P: ActiveDocumentProvider + ?Sized,
        H: HostActions + ?Sized,
    {
        if !self.registry.contains(command.key()) {
            warn!(
                "event=dispatch module=command status=rejected key={}",
                command.key()
            );
            return Err(CommandError::Disabled(command.key()));
        }

        let navigation = match command {
            Command::ShowContext => {
                return Ok(match self.hierarchy.resolve(provider).await? {
                    Some(context) => CommandOutput::Context(Box::new(context)),
                    None => CommandOutput::NoActiveDocument,
                });
            }
            Command::GoToParent => self.navigation.go_to_parent(provider, host).await?,
            Command::GoToChild => self.navigation.go_to_child(provider, host).await?,
            Command::PreviousSibling => {
                self.navigation
                    .go_to_sibling(provider, host, Step::Previous)
                    .await?
            }
            Command::NextSibling => {
                self.navigation
                    .go_to_sibling(provider, host, Step::Next)
                    .await?
            }
        };
        Ok(match navigation {
            NavigationOutcome::NoActiveDocument => CommandOutput::NoActiveDocument,
            other => CommandOutput::Navigation(other),
        })
    }

    /// Loads the outline of the active document.
    pub async fn outline<P>(&self, provider: &P) -> Result<CommandOutput, CommandError>
    where
        P: ActiveDocumentProvider + ?Sized,
    {
        Ok(match self.outline.outline_for_active(provider).await? {
            Some(outline) => CommandOutput::Outline(outline),
            None => CommandOutput::NoActiveDocument,
        })
    }

    /// Reveals the active document in the host file tree.
    pub fn focus_in_file_tree<P, H>(&self, provider: &P, host: &H) -> CommandOutput
    where
        P: ActiveDocumentProvider + ?Sized,
        H: HostActions + ?Sized,
    {
        match provider.active_document() {
            Some(doc_id) => {
                host.focus_in_file_tree(&doc_id);
                CommandOutput::Focused(doc_id)
            }
            None => CommandOutput::NoActiveDocument,
        }
    }

    /// Creates a sibling or child document and opens it.
    pub async fn create_document<P, H>(
        &self,
        provider: &P,
        host: &H,
        placement: Placement,
        title: &str,
    ) -> Result<CommandOutput, CommandError>
    where
        P: ActiveDocumentProvider + ?Sized,
        H: HostActions + ?Sized,
    {
        Ok(match self.create.create(provider, placement, title).await? {
            Some(created) => {
                host.open_document(&created.id);
                CommandOutput::Created(created)
            }
            None => CommandOutput::NoActiveDocument,
        })
    }

    /// Ends the activation.
    pub fn deactivate(self) {
        info!(
            "event=deactivate module=command status=ok commands={}",
            self.registry.len()
        );
    }
}
