//! Line-driven session over an in-memory tab bar.
//!
//! # Invariants
//! - A failing line is reported and the loop continues.
//! - Throttle history persists across lines for the whole session.

use crate::action::{execute, Action};
use crate::output::{format_output, format_tabs};
use doc_context_core::{
    ActiveDocumentProvider, CommandDispatcher, DocumentStore, Labels, TabSession,
};
use log::{error, info};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionLine {
    Action(Action),
    Tabs,
    Quit,
}

/// Parses one input line; blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<SessionLine>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    Ok(Some(match line {
        "tabs" => SessionLine::Tabs,
        "quit" | "exit" => SessionLine::Quit,
        other => SessionLine::Action(Action::parse(other)?),
    }))
}

/// Reads commands from `input` until EOF or `quit`.
pub async fn run_session<S, R, W>(
    dispatcher: &mut CommandDispatcher<S>,
    session: &TabSession,
    input: R,
    out: &mut W,
    json: bool,
) -> anyhow::Result<()>
where
    S: DocumentStore + Clone,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let labels = Labels::default();
    let mut lines = input.lines();
    let mut handled = 0usize;

    while let Some(line) = lines.next_line().await? {
        let parsed = match parse_line(&line) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => continue,
            Err(message) => {
                writeln!(out, "error: {message}")?;
                continue;
            }
        };

        match parsed {
            SessionLine::Quit => break,
            SessionLine::Tabs => {
                let active = session.active_document();
                write!(out, "{}", format_tabs(&session.tabs(), active.as_deref()))?;
            }
            SessionLine::Action(action) => {
                handled += 1;
                match execute(dispatcher, session, action).await {
                    Ok(output) => {
                        let text = format_output(
                            &output,
                            &session.take_notices(),
                            &session.tabs(),
                            json,
                            &labels,
                        )?;
                        write!(out, "{text}")?;
                        if json {
                            writeln!(out)?;
                        }
                    }
                    Err(err) => {
                        error!("event=session_command module=cli status=error error={err}");
                        session.take_notices();
                        writeln!(out, "error: {err}")?;
                    }
                }
            }
        }
        out.flush()?;
    }

    info!("event=session_end module=cli status=ok commands={handled}");
    Ok(())
}
