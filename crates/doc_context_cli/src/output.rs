//! Text and JSON printing of command results.

use doc_context_core::render::block_link;
use doc_context_core::{
    render_context, render_json, render_outline, CommandOutput, DocId, Labels, NavigationOutcome,
};
use serde::Serialize;

#[derive(Serialize)]
struct Report<'a> {
    result: &'a CommandOutput,
    notices: &'a [String],
    tabs: &'a [DocId],
}

/// Formats one result, with notices shown by the host since the last call.
pub fn format_output(
    output: &CommandOutput,
    notices: &[String],
    tabs: &[DocId],
    json: bool,
    labels: &Labels,
) -> anyhow::Result<String> {
    if json {
        return Ok(render_json(&Report {
            result: output,
            notices,
            tabs,
        })?);
    }

    let mut text = String::new();
    for notice in notices {
        text.push_str(&format!("ℹ️ {notice}\n"));
    }
    match output {
        CommandOutput::NoActiveDocument => text.push_str("No active document\n"),
        CommandOutput::Context(context) => text.push_str(&render_context(context, labels)),
        CommandOutput::Outline(outline) => text.push_str(&render_outline(outline, labels)),
        CommandOutput::Navigation(NavigationOutcome::Opened {
            target,
            closed_previous,
            ..
        }) => {
            text.push_str(&format!("Opened <{}>", block_link(target)));
            if *closed_previous {
                text.push_str(" (previous tab closed)");
            }
            text.push('\n');
        }
        // The notice already says why.
        CommandOutput::Navigation(_) => {}
        CommandOutput::Created(created) => text.push_str(&format!(
            "Created {} <{}>\n",
            created.hpath,
            block_link(&created.id)
        )),
        CommandOutput::Focused(doc_id) => {
            text.push_str(&format!("{} <{}>\n", labels.focus, block_link(doc_id)))
        }
    }
    Ok(text)
}

/// Formats the tab bar, marking the active tab.
pub fn format_tabs(tabs: &[DocId], active: Option<&str>) -> String {
    if tabs.is_empty() {
        return "No open tabs\n".to_string();
    }
    tabs.iter()
        .map(|tab| {
            let marker = if Some(tab.as_str()) == active { "▶ " } else { "  " };
            format!("{marker}{tab}\n")
        })
        .collect()
}
