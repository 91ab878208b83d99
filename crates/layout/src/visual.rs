//! Backend-agnostic visual nodes: the shared contract between the builder
//! and both renderer backends.

use crate::search::EntryId;
use crate::style::EffectiveStyle;
use docview_idf::NoteKind;
use docview_style::text::TextAlign;
use docview_types::NoteId;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum VisualNode {
    /// Opens a paragraph; inline nodes follow until `ParagraphEnd`.
    ParagraphStart {
        align: TextAlign,
        /// Line height of a line holding no runs, in points.
        line_height: f32,
        space_after: f32,
    },
    ParagraphEnd,
    /// Placeholder for an empty paragraph so it still takes vertical space.
    EmptyLine { height: f32 },
    TextRun {
        text: String,
        style: Arc<EffectiveStyle>,
        href: Option<String>,
        entry: EntryId,
    },
    LineBreak { entry: EntryId },
    Tab { entry: EntryId },
    Image {
        src: String,
        width: f32,
        height: f32,
        alt: Option<String>,
    },
    /// Opens a table. `columns` are relative widths summing to 1.
    TableStart { columns: Vec<f32> },
    Row,
    Cell {
        content: Vec<VisualNode>,
        col_span: usize,
    },
    TableEnd,
    ListItem {
        marker: String,
        marker_style: Arc<EffectiveStyle>,
        depth: usize,
        content: Vec<VisualNode>,
    },
    NoteReference {
        id: NoteId,
        kind: NoteKind,
        label: String,
        style: Arc<EffectiveStyle>,
    },
    PageBreak,
}

impl VisualNode {
    /// The searchable text this node contributes, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            VisualNode::TextRun { text, .. } => Some(text),
            VisualNode::LineBreak { .. } => Some("\n"),
            VisualNode::Tab { .. } => Some("\t"),
            _ => None,
        }
    }

    /// The search index entry of a text-bearing node.
    pub fn entry(&self) -> Option<EntryId> {
        match self {
            VisualNode::TextRun { entry, .. }
            | VisualNode::LineBreak { entry }
            | VisualNode::Tab { entry } => Some(*entry),
            _ => None,
        }
    }

    /// Nested content of cells and list items.
    pub fn children(&self) -> &[VisualNode] {
        match self {
            VisualNode::Cell { content, .. } | VisualNode::ListItem { content, .. } => content,
            _ => &[],
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            VisualNode::ParagraphStart { .. } => "paragraph-start",
            VisualNode::ParagraphEnd => "paragraph-end",
            VisualNode::EmptyLine { .. } => "empty-line",
            VisualNode::TextRun { .. } => "text-run",
            VisualNode::LineBreak { .. } => "line-break",
            VisualNode::Tab { .. } => "tab",
            VisualNode::Image { .. } => "image",
            VisualNode::TableStart { .. } => "table-start",
            VisualNode::Row => "row",
            VisualNode::Cell { .. } => "cell",
            VisualNode::TableEnd => "table-end",
            VisualNode::ListItem { .. } => "list-item",
            VisualNode::NoteReference { .. } => "note-reference",
            VisualNode::PageBreak => "page-break",
        }
    }
}

/// Pre-order walk over `nodes` and everything nested in them.
pub fn walk<'a>(nodes: &'a [VisualNode], visit: &mut impl FnMut(&'a VisualNode)) {
    for node in nodes {
        visit(node);
        walk(node.children(), visit);
    }
}

/// Concatenated text of every text-bearing node, in document order.
pub fn flatten_text(nodes: &[VisualNode]) -> String {
    let mut out = String::new();
    walk(nodes, &mut |node| {
        if let Some(text) = node.text() {
            out.push_str(text);
        }
    });
    out
}

/// Finds the node that owns a search entry.
pub fn find_entry(nodes: &[VisualNode], entry: EntryId) -> Option<&VisualNode> {
    let mut found = None;
    walk(nodes, &mut |node| {
        if found.is_none() && node.entry() == Some(entry) {
            found = Some(node);
        }
    });
    found
}

/// Total node count, nested nodes included.
pub fn count_nodes(nodes: &[VisualNode]) -> usize {
    let mut count = 0;
    walk(nodes, &mut |_| count += 1);
    count
}
