//! Command declarations and in-process registry.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Key of the show-context command.
pub const COMMAND_SHOW_CONTEXT: &str = "doc-context::show";
/// Key of the go-to-parent command.
pub const COMMAND_PARENT_DOC: &str = "doc-context::parent-doc";
/// Key of the go-to-child command.
pub const COMMAND_CHILD_DOC: &str = "doc-context::child-doc";
/// Key of the previous-sibling command.
pub const COMMAND_PREV_DOC: &str = "doc-context::prev-doc";
/// Key of the next-sibling command.
pub const COMMAND_NEXT_DOC: &str = "doc-context::next-doc";

/// Settings group a command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommandGroup {
    /// Always registered.
    Core,
    /// Gated by `enable_parent_child_shortcuts`.
    ParentChild,
    /// Gated by `enable_sibling_shortcuts`.
    Sibling,
}

/// User-invocable command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    ShowContext,
    GoToParent,
    GoToChild,
    PreviousSibling,
    NextSibling,
}

impl Command {
    pub const ALL: [Command; 5] = [
        Command::ShowContext,
        Command::GoToParent,
        Command::GoToChild,
        Command::PreviousSibling,
        Command::NextSibling,
    ];

    /// Stable registry key.
    pub fn key(self) -> &'static str {
        match self {
            Self::ShowContext => COMMAND_SHOW_CONTEXT,
            Self::GoToParent => COMMAND_PARENT_DOC,
            Self::GoToChild => COMMAND_CHILD_DOC,
            Self::PreviousSibling => COMMAND_PREV_DOC,
            Self::NextSibling => COMMAND_NEXT_DOC,
        }
    }

    pub fn group(self) -> CommandGroup {
        match self {
            Self::ShowContext => CommandGroup::Core,
            Self::GoToParent | Self::GoToChild => CommandGroup::ParentChild,
            Self::PreviousSibling | Self::NextSibling => CommandGroup::Sibling,
        }
    }

    /// Declaration with default label and hotkey.
    pub fn spec(self) -> CommandSpec {
        let (label, hotkey) = match self {
            Self::ShowContext => ("Document Context", "⌥S"),
            Self::GoToParent => ("Parent Document", "⌘↑"),
            Self::GoToChild => ("Child Document", "⌘↓"),
            Self::PreviousSibling => ("Previous Document", "⌘←"),
            Self::NextSibling => ("Next Document", "⌘→"),
        };
        CommandSpec {
            key: self.key().to_string(),
            label: label.to_string(),
            hotkey: hotkey.to_string(),
            group: self.group(),
        }
    }

    /// Looks a command up by registry key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.key() == key)
    }
}

/// Declarative command registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub key: String,
    pub label: String,
    pub hotkey: String,
    pub group: CommandGroup,
}

impl CommandSpec {
    /// Validates declaration-level invariants.
    pub fn validate(&self) -> Result<(), CommandRegistryError> {
        if self.key.trim().is_empty() {
            return Err(CommandRegistryError::EmptyKey);
        }
        if !is_valid_command_key(&self.key) {
            return Err(CommandRegistryError::InvalidKey(self.key.clone()));
        }
        if self.hotkey.trim().is_empty() {
            return Err(CommandRegistryError::MissingHotkey(self.key.clone()));
        }
        Ok(())
    }
}

/// Registered commands keyed by command key.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    entries: BTreeMap<String, CommandSpec>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one command. Re-registering an existing key is a no-op.
    ///
    /// Returns `true` when the command was newly added.
    pub fn add(&mut self, spec: CommandSpec) -> Result<bool, CommandRegistryError> {
        spec.validate()?;
        if self.entries.contains_key(spec.key.as_str()) {
            return Ok(false);
        }
        self.entries.insert(spec.key.clone(), spec);
        Ok(true)
    }

    /// Removes one command. Returns `true` when it was registered.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Registers or removes every command of `group`.
    pub fn set_group_enabled(
        &mut self,
        group: CommandGroup,
        enabled: bool,
    ) -> Result<(), CommandRegistryError> {
        for command in Command::ALL.into_iter().filter(|c| c.group() == group) {
            if enabled {
                self.add(command.spec())?;
            } else {
                self.remove(command.key());
            }
        }
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&CommandSpec> {
        self.entries.get(key)
    }

    /// Registered commands sorted by key.
    pub fn list(&self) -> Vec<&CommandSpec> {
        self.entries.values().collect()
    }

    pub fn find_by_hotkey(&self, hotkey: &str) -> Option<&CommandSpec> {
        self.entries.values().find(|spec| spec.hotkey == hotkey)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Command registration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandRegistryError {
    EmptyKey,
    InvalidKey(String),
    MissingHotkey(String),
}

impl Display for CommandRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyKey => write!(f, "command key must not be empty"),
            Self::InvalidKey(value) => write!(f, "command key is invalid: {value}"),
            Self::MissingHotkey(value) => write!(f, "command has no hotkey: {value}"),
        }
    }
}

impl Error for CommandRegistryError {}

fn is_valid_command_key(value: &str) -> bool {
    let mut chars = value.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };
    if !first.is_ascii_lowercase() && !first.is_ascii_digit() {
        return false;
    }

    let mut last = first;
    for c in chars {
        if !(c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-' | ':')) {
            return false;
        }
        last = c;
    }
    last.is_ascii_lowercase() || last.is_ascii_digit()
}
