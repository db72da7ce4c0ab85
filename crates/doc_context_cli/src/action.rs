//! Actions shared by one-shot subcommands and session lines.

use doc_context_core::{
    Command, CommandDispatcher, CommandError, CommandOutput, DocumentStore, Placement, TabSession,
};

/// One unit of work against the active document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Run(Command),
    Outline,
    Focus,
    Create(Placement, String),
}

impl Action {
    /// Parses `show`, `outline`, `parent`, `child`, `prev`, `next`, `focus`,
    /// `new-sibling <title>` or `new-child <title>`.
    pub fn parse(input: &str) -> Result<Self, String> {
        let input = input.trim();
        let (word, rest) = match input.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (input, ""),
        };

        let action = match word {
            "show" => Self::Run(Command::ShowContext),
            "parent" => Self::Run(Command::GoToParent),
            "child" => Self::Run(Command::GoToChild),
            "prev" => Self::Run(Command::PreviousSibling),
            "next" => Self::Run(Command::NextSibling),
            "outline" => Self::Outline,
            "focus" => Self::Focus,
            "new-sibling" => Self::Create(Placement::Sibling, require_title(word, rest)?),
            "new-child" => Self::Create(Placement::Child, require_title(word, rest)?),
            other => return Err(format!("unknown command `{other}`")),
        };
        if !rest.is_empty() && !matches!(action, Self::Create(..)) {
            return Err(format!("`{word}` takes no arguments"));
        }
        Ok(action)
    }
}

fn require_title(word: &str, rest: &str) -> Result<String, String> {
    if rest.is_empty() {
        return Err(format!("`{word}` needs a title"));
    }
    Ok(rest.to_string())
}

/// Runs `action` with `session` as both the focus source and the host.
pub async fn execute<S>(
    dispatcher: &mut CommandDispatcher<S>,
    session: &TabSession,
    action: Action,
) -> Result<CommandOutput, CommandError>
where
    S: DocumentStore + Clone,
{
    match action {
        Action::Run(command) => dispatcher.dispatch(command, session, session).await,
        Action::Outline => dispatcher.outline(session).await,
        Action::Focus => Ok(dispatcher.focus_in_file_tree(session, session)),
        Action::Create(placement, title) => {
            dispatcher
                .create_document(session, session, placement, &title)
                .await
        }
    }
}
