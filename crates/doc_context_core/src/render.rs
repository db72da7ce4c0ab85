//! Text and JSON views of a resolved context.
//!
//! # Responsibility
//! - Render breadcrumb, parent, children, siblings and outline sections.
//! - Keep navigation links built from raw ids only.
//!
//! # Invariants
//! - Empty sections render the "none" label, never an empty list.
//! - The active document stays in the sibling list and is highlighted.

use crate::model::document::DocId;
use crate::model::outline::OutlineNode;
use crate::service::hierarchy_service::DocContext;
use serde::Serialize;

/// Link scheme the host resolves into "open document".
pub const BLOCK_LINK_PREFIX: &str = "siyuan://blocks/";

/// User-facing section labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub title: String,
    pub focus: String,
    pub parent: String,
    pub children: String,
    pub siblings: String,
    pub outline: String,
    pub none: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            title: "Document Context".to_string(),
            focus: "Focus document in file tree".to_string(),
            parent: "Parent".to_string(),
            children: "Children".to_string(),
            siblings: "Siblings".to_string(),
            outline: "Outline".to_string(),
            none: "None".to_string(),
        }
    }
}

/// Returns the host link that opens `id`.
pub fn block_link(id: &str) -> String {
    format!("{BLOCK_LINK_PREFIX}{id}")
}

/// Renders the full context view.
pub fn render_context(context: &DocContext, labels: &Labels) -> String {
    let mut out = String::new();

    let crumbs = context
        .ancestors
        .iter()
        .map(|entry| format!("{} <{}>", entry.title, block_link(&entry.id)))
        .collect::<Vec<_>>()
        .join(" / ");
    out.push_str(&format!("🍞 [{}] / {crumbs}\n", context.notebook_name));
    out.push_str(&format!("🎯 {}\n", labels.focus));
    out.push('\n');

    out.push_str(&format!("⬆️ {}\n", labels.parent));
    match &context.parent {
        Some(parent) => {
            out.push_str(&format!("  {} <{}>\n", parent.title, block_link(&parent.id)))
        }
        None => out.push_str(&format!("  {}\n", labels.none)),
    }
    out.push('\n');

    out.push_str(&format!("⬇️ {}\n", labels.children));
    render_entries(
        &mut out,
        context
            .children
            .iter()
            .map(|entry| (entry.display_name(), &entry.id, false)),
        labels,
    );
    out.push('\n');

    out.push_str(&format!("↔️ {}\n", labels.siblings));
    render_entries(
        &mut out,
        context
            .siblings
            .iter()
            .map(|entry| (entry.display_name(), &entry.id, context.is_current(entry))),
        labels,
    );
    out
}

fn render_entries<'a>(
    out: &mut String,
    entries: impl Iterator<Item = (&'a str, &'a DocId, bool)>,
    labels: &Labels,
) {
    let mut rendered = 0usize;
    for (index, (name, id, current)) in entries.enumerate() {
        let marker = if current { "▶ " } else { "" };
        out.push_str(&format!("  {}. {marker}{name} <{}>\n", index + 1, block_link(id)));
        rendered += 1;
    }
    if rendered == 0 {
        out.push_str(&format!("  {}\n", labels.none));
    }
}

/// Renders an outline forest indented by depth.
pub fn render_outline(outline: &[OutlineNode], labels: &Labels) -> String {
    let mut out = String::new();
    out.push_str(&format!("📑 {}\n", labels.outline));
    if outline.is_empty() {
        out.push_str(&format!("  {}\n", labels.none));
        return out;
    }
    for node in outline {
        render_outline_node(&mut out, node);
    }
    out
}

// Indent follows heading depth, not nesting.
fn render_outline_node(out: &mut String, node: &OutlineNode) {
    let indent = "  ".repeat(node.depth as usize + 1);
    out.push_str(&format!("{indent}- {} <{}>\n", node.name, block_link(&node.id)));
    for child in &node.children {
        render_outline_node(out, child);
    }
}

/// Serializes any view model as pretty JSON.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::{block_link, render_context, render_outline, Labels};
    use crate::model::document::{AncestorEntry, Document, ListingEntry};
    use crate::model::outline::OutlineNode;
    use crate::service::hierarchy_service::DocContext;

    fn entry(id: &str, name: &str) -> ListingEntry {
        ListingEntry {
            id: id.to_string(),
            name: format!("{name}.sy"),
            path: format!("/p/{id}.sy"),
            sub_file_count: 0,
        }
    }

    fn context() -> DocContext {
        DocContext {
            document: Document {
                id: "n2".to_string(),
                box_id: "box".to_string(),
                path: "/n1/n2.sy".to_string(),
                hpath: "/Title1/Title2".to_string(),
                title: "Title2".to_string(),
            },
            notebook_name: "Journal".to_string(),
            parent: None,
            children: Vec::new(),
            siblings: vec![entry("n9", "Other"), entry("n2", "Title2")],
            ancestors: vec![
                AncestorEntry::new("Title1", "n1"),
                AncestorEntry::new("Title2", "n2"),
            ],
        }
    }

    #[test]
    fn renders_breadcrumb_and_none_sections() {
        let text = render_context(&context(), &Labels::default());
        assert!(text.starts_with("🍞 [Journal] / Title1 <siyuan://blocks/n1> / Title2"));
        assert_eq!(text.matches("  None").count(), 2, "{text}");
    }

    #[test]
    fn highlights_current_sibling_and_strips_suffix() {
        let text = render_context(&context(), &Labels::default());
        assert!(text.contains("  1. Other <siyuan://blocks/n9>"));
        assert!(text.contains("  2. ▶ Title2 <siyuan://blocks/n2>"));
        assert!(!text.contains(".sy"));
    }

    #[test]
    fn empty_outline_renders_none() {
        let text = render_outline(&[], &Labels::default());
        assert!(text.contains("  None"));
    }

    #[test]
    fn outline_indents_by_depth() {
        let outline = vec![OutlineNode {
            depth: 0,
            name: "Intro".to_string(),
            id: "h1".to_string(),
            children: vec![OutlineNode {
                depth: 1,
                name: "Detail".to_string(),
                id: "h2".to_string(),
                children: Vec::new(),
            }],
        }];
        let text = render_outline(&outline, &Labels::default());
        assert!(text.contains(&format!("  - Intro <{}>", block_link("h1"))));
        assert!(text.contains(&format!("    - Detail <{}>", block_link("h2"))));
    }

    #[test]
    fn outline_indent_follows_depth_when_levels_are_skipped() {
        let outline = vec![OutlineNode {
            depth: 0,
            name: "Intro".to_string(),
            id: "h1".to_string(),
            children: vec![OutlineNode {
                depth: 2,
                name: "Deep".to_string(),
                id: "h3".to_string(),
                children: Vec::new(),
            }],
        }];
        let text = render_outline(&outline, &Labels::default());
        assert!(text.contains(&format!("\n      - Deep <{}>", block_link("h3"))), "{text}");
    }
}
