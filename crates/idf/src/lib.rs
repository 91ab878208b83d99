//! Document tree
//! The in-memory representation of a word-processing document after parsing
//! and before visual node building. Immutable once handed to the pipeline.

use docview_style::list::ListKind;
use docview_style::stylesheet::{RunStyle, Stylesheet};
use docview_style::text::TextAlign;
use docview_types::{FamilyName, NoteId, StyleId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

mod bytes;

/// A parsed document: block content, style tables, embedded fonts and notes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTree {
    #[serde(default)]
    pub blocks: Vec<BlockNode>,
    #[serde(default)]
    pub stylesheet: Stylesheet,
    #[serde(default)]
    pub fonts: Vec<EmbeddedFont>,
    #[serde(default)]
    pub notes: HashMap<NoteId, Note>,
}

impl DocumentTree {
    pub fn new(blocks: Vec<BlockNode>) -> Self {
        Self {
            blocks,
            ..Default::default()
        }
    }

    pub fn note(&self, id: &NoteId) -> Option<&Note> {
        self.notes.get(id)
    }
}

// --- Block nodes ---

/// Represents a block-level element in the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BlockNode {
    Paragraph(Paragraph),
    Table(Table),
    List(List),
    /// A section or hard page break.
    SectionBreak,
    /// Any element type the pipeline does not know how to render.
    #[serde(other)]
    Unsupported,
}

impl BlockNode {
    pub fn kind(&self) -> &'static str {
        match self {
            BlockNode::Paragraph(_) => "paragraph",
            BlockNode::Table(_) => "table",
            BlockNode::List(_) => "list",
            BlockNode::SectionBreak => "section-break",
            BlockNode::Unsupported => "unsupported",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    /// Named paragraph style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleId>,
    /// Direct paragraph alignment, overriding the style's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
    #[serde(default)]
    pub children: Vec<InlineNode>,
}

impl Paragraph {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            children: vec![InlineNode::Text(TextRun::plain(text))],
            ..Default::default()
        }
    }
}

// --- Inline nodes ---

/// Represents an inline-level element within a paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InlineNode {
    Text(TextRun),
    LineBreak,
    Tab,
    Image(Image),
    Hyperlink(Hyperlink),
    NoteReference(NoteReference),
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    pub text: String,
    /// Named character style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleId>,
    /// Direct run formatting.
    #[serde(default, skip_serializing_if = "RunStyle::is_empty")]
    pub format: RunStyle,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_format(text: impl Into<String>, format: RunStyle) -> Self {
        Self {
            text: text.into(),
            style: None,
            format,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub src: String,
    /// Extent in points.
    pub width: f32,
    pub height: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hyperlink {
    pub href: String,
    #[serde(default)]
    pub children: Vec<TextRun>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NoteKind {
    #[default]
    Footnote,
    Endnote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteReference {
    pub id: NoteId,
    #[serde(default)]
    pub kind: NoteKind,
}

// --- Tables ---

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Relative column widths; equal widths when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_widths: Option<Vec<f32>>,
    #[serde(default)]
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Number of grid columns, taking spans into account.
    pub fn column_count(&self) -> usize {
        let from_rows = self
            .rows
            .iter()
            .map(|row| row.cells.iter().fold(0usize, |acc, c| acc.saturating_add(c.span())))
            .max()
            .unwrap_or(0);
        let from_widths = self.column_widths.as_ref().map_or(0, Vec::len);
        from_rows.max(from_widths)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(default)]
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    #[serde(default)]
    pub blocks: Vec<BlockNode>,
    #[serde(default = "default_span")]
    pub col_span: usize,
}

impl Default for TableCell {
    fn default() -> Self {
        Self {
            blocks: Vec::new(),
            col_span: 1,
        }
    }
}

/// Widest grid a table may span. Word processors cap tables at 63 columns.
pub const MAX_TABLE_COLUMNS: usize = 63;

impl TableCell {
    /// Declared span clamped to `1..=MAX_TABLE_COLUMNS`.
    pub fn span(&self) -> usize {
        self.col_span.clamp(1, MAX_TABLE_COLUMNS)
    }
}

fn default_span() -> usize {
    1
}

// --- Lists ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    #[serde(default)]
    pub kind: ListKind,
    /// Number of the first item for ordered lists.
    #[serde(default = "default_start")]
    pub start: usize,
    #[serde(default)]
    pub items: Vec<ListItem>,
}

fn default_start() -> usize {
    1
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    /// Item content; nested lists appear here as `BlockNode::List`.
    #[serde(default)]
    pub blocks: Vec<BlockNode>,
}

// --- Notes and fonts ---

/// The content of a footnote or endnote.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(default)]
    pub kind: NoteKind,
    #[serde(default)]
    pub blocks: Vec<BlockNode>,
}

/// A font program shipped inside the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedFont {
    pub family: FamilyName,
    /// Raw font bytes; base64 in the JSON form.
    #[serde(with = "bytes::base64_or_array")]
    pub data: Vec<u8>,
    /// GUID-form key, present when the leading bytes are obfuscated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfuscation_key: Option<String>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}
