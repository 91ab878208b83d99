//! Reads a flat visual node sequence as a list of blocks.

use docview_layout::{EffectiveStyle, VisualNode};
use docview_style::text::TextAlign;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphBlock<'a> {
    pub align: TextAlign,
    pub line_height: f32,
    pub space_after: f32,
    /// Inline nodes only.
    pub inlines: &'a [VisualNode],
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellBlock<'a> {
    pub content: &'a [VisualNode],
    pub col_span: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableBlock<'a> {
    pub columns: &'a [f32],
    pub rows: Vec<Vec<CellBlock<'a>>>,
}

impl TableBlock<'_> {
    /// Column fractions, widened to the widest row when cells outnumber them.
    pub fn column_fractions(&self) -> Vec<f32> {
        let widest = self
            .rows
            .iter()
            .map(|r| r.iter().fold(0usize, |acc, c| acc.saturating_add(c.col_span)))
            .max()
            .unwrap_or(0);
        if widest <= self.columns.len() && !self.columns.is_empty() {
            return self.columns.to_vec();
        }
        let n = widest.max(1);
        vec![1.0 / n as f32; n]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItemBlock<'a> {
    pub marker: &'a str,
    pub marker_style: &'a Arc<EffectiveStyle>,
    pub depth: usize,
    pub content: &'a [VisualNode],
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block<'a> {
    Paragraph(ParagraphBlock<'a>),
    EmptyLine(f32),
    Table(TableBlock<'a>),
    ListItem(ListItemBlock<'a>),
    PageBreak,
}

fn is_inline(node: &VisualNode) -> bool {
    matches!(
        node,
        VisualNode::TextRun { .. }
            | VisualNode::LineBreak { .. }
            | VisualNode::Tab { .. }
            | VisualNode::Image { .. }
            | VisualNode::NoteReference { .. }
    )
}

/// Groups `nodes` into blocks. Inline nodes outside a paragraph are wrapped
/// in an implicit left-aligned paragraph; stray closing nodes are ignored.
pub fn group_blocks(nodes: &[VisualNode]) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut i = 0;
    while i < nodes.len() {
        match &nodes[i] {
            VisualNode::ParagraphStart {
                align,
                line_height,
                space_after,
            } => {
                let start = i + 1;
                let end = start + nodes[start..].iter().take_while(|n| is_inline(n)).count();
                blocks.push(Block::Paragraph(ParagraphBlock {
                    align: *align,
                    line_height: *line_height,
                    space_after: *space_after,
                    inlines: &nodes[start..end],
                }));
                i = end;
                if matches!(nodes.get(i), Some(VisualNode::ParagraphEnd)) {
                    i += 1;
                }
            }
            VisualNode::TableStart { columns } => {
                let mut rows: Vec<Vec<CellBlock<'_>>> = Vec::new();
                i += 1;
                while let Some(node) = nodes.get(i) {
                    match node {
                        VisualNode::Row => rows.push(Vec::new()),
                        VisualNode::Cell { content, col_span } => {
                            if rows.is_empty() {
                                rows.push(Vec::new());
                            }
                            if let Some(row) = rows.last_mut() {
                                row.push(CellBlock {
                                    content,
                                    col_span: (*col_span).max(1),
                                });
                            }
                        }
                        VisualNode::TableEnd => {
                            i += 1;
                            break;
                        }
                        _ => break,
                    }
                    i += 1;
                }
                blocks.push(Block::Table(TableBlock { columns, rows }));
            }
            VisualNode::ListItem {
                marker,
                marker_style,
                depth,
                content,
            } => {
                blocks.push(Block::ListItem(ListItemBlock {
                    marker,
                    marker_style,
                    depth: *depth,
                    content,
                }));
                i += 1;
            }
            VisualNode::EmptyLine { height } => {
                blocks.push(Block::EmptyLine(*height));
                i += 1;
            }
            VisualNode::PageBreak => {
                blocks.push(Block::PageBreak);
                i += 1;
            }
            node if is_inline(node) => {
                let start = i;
                let end = start + nodes[start..].iter().take_while(|n| is_inline(n)).count();
                let line_height = nodes[start..end]
                    .iter()
                    .filter_map(|n| match n {
                        VisualNode::TextRun { style, .. } => Some(style.line_height),
                        _ => None,
                    })
                    .fold(0.0_f32, f32::max);
                blocks.push(Block::Paragraph(ParagraphBlock {
                    align: TextAlign::Left,
                    line_height,
                    space_after: 0.0,
                    inlines: &nodes[start..end],
                }));
                i = end;
            }
            _ => i += 1,
        }
    }
    blocks
}
