use docview_layout::{EffectiveStyle, EntryId};
use docview_style::dimension::Margins;
use docview_style::text::TextAlign;
use docview_types::{Color, NoteId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How pages are arranged on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Nodes flow top to bottom; page breaks become dividers.
    #[default]
    Continuous,
    /// Content sits in fixed-width, centred page containers.
    Paged,
}

/// Presentation settings that do not depend on zoom.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayOptions {
    /// Logical width of a page container.
    pub page_width: f32,
    pub padding: Margins,
    /// Fill outside the page bounds.
    pub background: Color,
    pub page_color: Color,
    pub highlight_color: Color,
    pub current_match_color: Color,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            page_width: 768.0,
            padding: Margins::all(16.0),
            background: Color::rgb(0xEE, 0xEE, 0xEE),
            page_color: Color::WHITE,
            highlight_color: Color::rgb(0xFF, 0xEB, 0x3B),
            current_match_color: Color::rgb(0xFF, 0x98, 0x00),
        }
    }
}

/// A highlighted char range inside one span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub start: usize,
    pub len: usize,
    /// Part of the current match.
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplaySpan {
    Text {
        text: String,
        style: Arc<EffectiveStyle>,
        href: Option<String>,
        entry: EntryId,
        highlights: Vec<Highlight>,
    },
    Tab {
        entry: EntryId,
        highlights: Vec<Highlight>,
    },
    LineBreak {
        entry: EntryId,
        highlights: Vec<Highlight>,
    },
    Image {
        src: String,
        width: f32,
        height: f32,
        alt: Option<String>,
    },
    /// Tappable note marker; content is fetched on demand.
    NoteLabel {
        id: NoteId,
        label: String,
        style: Arc<EffectiveStyle>,
    },
}

impl DisplaySpan {
    pub fn entry(&self) -> Option<EntryId> {
        match self {
            DisplaySpan::Text { entry, .. }
            | DisplaySpan::Tab { entry, .. }
            | DisplaySpan::LineBreak { entry, .. } => Some(*entry),
            _ => None,
        }
    }

    pub fn highlights(&self) -> &[Highlight] {
        match self {
            DisplaySpan::Text { highlights, .. }
            | DisplaySpan::Tab { highlights, .. }
            | DisplaySpan::LineBreak { highlights, .. } => highlights,
            _ => &[],
        }
    }

    pub(crate) fn highlights_mut(&mut self) -> Option<&mut Vec<Highlight>> {
        match self {
            DisplaySpan::Text { highlights, .. }
            | DisplaySpan::Tab { highlights, .. }
            | DisplaySpan::LineBreak { highlights, .. } => Some(highlights),
            _ => None,
        }
    }

    fn text(&self) -> Option<&str> {
        match self {
            DisplaySpan::Text { text, .. } => Some(text),
            DisplaySpan::Tab { .. } => Some("\t"),
            DisplaySpan::LineBreak { .. } => Some("\n"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayCell {
    pub col_span: usize,
    pub children: Vec<DisplayNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayNode {
    Paragraph {
        align: TextAlign,
        line_height: f32,
        space_after: f32,
        spans: Vec<DisplaySpan>,
    },
    /// Vertical space standing in for an empty paragraph.
    Spacer { height: f32 },
    Table {
        columns: Vec<f32>,
        rows: Vec<Vec<DisplayCell>>,
    },
    ListItem {
        marker: String,
        marker_style: Arc<EffectiveStyle>,
        depth: usize,
        children: Vec<DisplayNode>,
    },
    /// A section break in continuous mode.
    Divider,
}

impl DisplayNode {
    pub fn children(&self) -> Vec<&DisplayNode> {
        match self {
            DisplayNode::ListItem { children, .. } => children.iter().collect(),
            DisplayNode::Table { rows, .. } => rows
                .iter()
                .flatten()
                .flat_map(|cell| cell.children.iter())
                .collect(),
            _ => Vec::new(),
        }
    }

    pub(crate) fn for_each_span_mut(&mut self, f: &mut impl FnMut(&mut DisplaySpan)) {
        match self {
            DisplayNode::Paragraph { spans, .. } => spans.iter_mut().for_each(|s| f(s)),
            DisplayNode::ListItem { children, .. } => {
                children.iter_mut().for_each(|c| c.for_each_span_mut(f))
            }
            DisplayNode::Table { rows, .. } => rows
                .iter_mut()
                .flatten()
                .flat_map(|cell| cell.children.iter_mut())
                .for_each(|c| c.for_each_span_mut(f)),
            DisplayNode::Spacer { .. } | DisplayNode::Divider => {}
        }
    }

    fn for_each_span<'a>(&'a self, f: &mut impl FnMut(&'a DisplaySpan)) {
        match self {
            DisplayNode::Paragraph { spans, .. } => spans.iter().for_each(|s| f(s)),
            _ => self.children().into_iter().for_each(|c| c.for_each_span(f)),
        }
    }
}

/// One page container. In continuous mode the single page is unconstrained.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayPage {
    /// Fixed logical width, `None` when the page fills the viewport.
    pub width: Option<f32>,
    /// Page fill, `None` when it shares the viewport background.
    pub color: Option<Color>,
    pub children: Vec<DisplayNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayTree {
    pub scale: f32,
    pub mode: LayoutMode,
    pub options: DisplayOptions,
    pub pages: Vec<DisplayPage>,
}

impl DisplayTree {
    /// Changes the presentation scale only; the node tree is untouched.
    pub fn set_zoom(&mut self, scale: f32) {
        self.scale = scale;
    }

    /// On-screen width of a page container, `None` in continuous mode.
    pub fn scaled_page_width(&self) -> Option<f32> {
        self.pages
            .first()
            .and_then(|p| p.width)
            .map(|w| w * self.scale)
    }

    /// Size at which a run is painted at the current zoom.
    pub fn scaled_font_size(&self, style: &EffectiveStyle) -> f32 {
        style.font_size * self.scale
    }

    pub fn highlight_color(&self, highlight: &Highlight) -> Color {
        if highlight.current {
            self.options.current_match_color
        } else {
            self.options.highlight_color
        }
    }

    /// Every span in document order.
    pub fn spans(&self) -> Vec<&DisplaySpan> {
        let mut out = Vec::new();
        for page in &self.pages {
            for node in &page.children {
                node.for_each_span(&mut |s| out.push(s));
            }
        }
        out
    }

    /// Concatenated searchable text of all spans.
    pub fn text(&self) -> String {
        self.spans().into_iter().filter_map(DisplaySpan::text).collect()
    }

    pub(crate) fn for_each_span_mut(&mut self, f: &mut impl FnMut(&mut DisplaySpan)) {
        for page in &mut self.pages {
            for node in &mut page.children {
                node.for_each_span_mut(f);
            }
        }
    }
}
