//! Flows grouped visual nodes onto fixed-size pages.
//!
//! Paragraphs are broken into lines greedily at whitespace. A line never
//! splits across pages; a table row never splits either, and is pushed to the
//! next page whole unless it is taller than a page on its own. Cells are laid
//! out in an unbounded sub-flow first so the row height is known before
//! anything is placed.

use docview_layout::{EffectiveStyle, VisualNode};
use docview_render_core::utils::builtin_family;
use docview_render_core::{
    Block, DrawOp, FontKey, ListItemBlock, PageContent, PageFormat, ParagraphBlock, TableBlock,
    TextMeasurer, TextOp, group_blocks,
};
use docview_style::text::{TextAlign, TextDecoration};
use docview_types::{Color, Rect, Size};
use std::sync::Arc;

/// Distance between default tab stops, in points.
pub const TAB_STOP: f32 = 36.0;
/// Indentation of list item content relative to its container.
pub const LIST_INDENT: f32 = 18.0;

const CELL_PADDING: f32 = 4.0;
const BORDER_WIDTH: f32 = 0.5;
const NOTE_LABEL_SCALE: f32 = 0.7;
const ASCENT: f32 = 0.8;
const BORDER_COLOR: Color = Color::rgb(0x80, 0x80, 0x80);

/// Lays out `nodes` on pages of `format`. Always yields at least one page.
pub fn paginate(
    nodes: &[VisualNode],
    format: &PageFormat,
    measurer: &dyn TextMeasurer,
) -> Vec<PageContent> {
    let mut flow = Flow::paged(format, measurer);
    let region = Region {
        x: format.margins.left,
        width: format.content_width(),
    };
    flow.flow_blocks(&group_blocks(nodes), region);
    flow.finish()
}

#[derive(Debug, Clone, Copy)]
struct Region {
    x: f32,
    width: f32,
}

impl Region {
    fn inset(self, left: f32, right: f32) -> Self {
        Region {
            x: self.x + left,
            width: (self.width - left - right).max(1.0),
        }
    }
}

struct Flow<'m> {
    measurer: &'m dyn TextMeasurer,
    default_line: f32,
    pages: Vec<PageContent>,
    ops: Vec<DrawOp>,
    y: f32,
    top: f32,
    /// `None` for the unbounded sub-flows used to measure table cells.
    bottom: Option<f32>,
}

impl<'m> Flow<'m> {
    fn paged(format: &PageFormat, measurer: &'m dyn TextMeasurer) -> Self {
        let content = format.content_rect();
        Self {
            measurer,
            default_line: format.default_font_size * 1.2,
            pages: Vec::new(),
            ops: Vec::new(),
            y: content.y,
            top: content.y,
            bottom: Some(content.bottom()),
        }
    }

    fn unbounded(&self) -> Flow<'m> {
        Flow {
            measurer: self.measurer,
            default_line: self.default_line,
            pages: Vec::new(),
            ops: Vec::new(),
            y: 0.0,
            top: 0.0,
            bottom: None,
        }
    }

    fn finish(mut self) -> Vec<PageContent> {
        if !self.ops.is_empty() || self.pages.is_empty() {
            self.pages.push(PageContent { ops: self.ops });
        }
        self.pages
    }

    fn at_page_top(&self) -> bool {
        self.y <= self.top
    }

    fn new_page(&mut self) {
        if self.bottom.is_none() {
            return;
        }
        let ops = std::mem::take(&mut self.ops);
        self.pages.push(PageContent { ops });
        self.y = self.top;
    }

    /// Starts a new page when `height` does not fit below the cursor.
    fn ensure(&mut self, height: f32) {
        if let Some(bottom) = self.bottom {
            if self.y + height > bottom && !self.at_page_top() {
                self.new_page();
            }
        }
    }

    fn page_height(&self) -> Option<f32> {
        self.bottom.map(|b| b - self.top)
    }

    fn flow_blocks(&mut self, blocks: &[Block<'_>], region: Region) {
        for block in blocks {
            match block {
                Block::Paragraph(p) => self.flow_paragraph(p, region, None),
                Block::EmptyLine(height) => {
                    let height = height.max(self.default_line);
                    self.ensure(height);
                    self.y += height;
                }
                Block::Table(table) => self.flow_table(table, region),
                Block::ListItem(item) => self.flow_list_item(item, region),
                Block::PageBreak => {
                    if !self.at_page_top() {
                        self.new_page();
                    }
                }
            }
        }
    }

    fn flow_list_item(&mut self, item: &ListItemBlock<'_>, region: Region) {
        let inner = region.inset(LIST_INDENT, 0.0);
        let marker = Marker {
            text: item.marker,
            style: item.marker_style,
        };
        let blocks = group_blocks(item.content);
        match blocks.split_first() {
            Some((Block::Paragraph(first), rest)) => {
                self.flow_paragraph(first, inner, Some(marker));
                self.flow_blocks(rest, inner);
            }
            _ => {
                let marker_only = ParagraphBlock {
                    align: TextAlign::Left,
                    line_height: item.marker_style.line_height,
                    space_after: 0.0,
                    inlines: &[],
                };
                self.flow_paragraph(&marker_only, inner, Some(marker));
                self.flow_blocks(&blocks, inner);
            }
        }
    }

    fn flow_paragraph(&mut self, para: &ParagraphBlock<'_>, region: Region, marker: Option<Marker<'_>>) {
        let lines = LineBreaker::new(self.measurer, region.width, para.line_height)
            .break_lines(para.inlines, marker);
        for line in &lines {
            self.ensure(line.height);
            let offset = match para.align {
                TextAlign::Center => (region.width - line.width).max(0.0) / 2.0,
                TextAlign::Right => (region.width - line.width).max(0.0),
                TextAlign::Left | TextAlign::Justify => 0.0,
            };
            self.place_line(line, region.x + offset);
            self.y += line.height;
        }
        self.y += para.space_after;
    }

    fn place_line(&mut self, line: &Line, x0: f32) {
        let top = self.y;
        let mut x = x0;
        for piece in &line.pieces {
            match &piece.kind {
                PieceKind::Text { text, style, href } => {
                    self.ops.push(DrawOp::Text(text_op(
                        x,
                        top + line.ascent - style.font_size * ASCENT,
                        text,
                        style,
                        style.font_size,
                        piece.width,
                        href.clone(),
                    )));
                }
                PieceKind::Label { text, style } => {
                    // Top-aligned with the line so the smaller label sits raised.
                    self.ops.push(DrawOp::Text(text_op(
                        x,
                        top + line.ascent - style.font_size * ASCENT,
                        text,
                        style,
                        style.font_size * NOTE_LABEL_SCALE,
                        piece.width,
                        None,
                    )));
                }
                PieceKind::Image { height, alt } => {
                    let rect = Rect::new(x, top + line.ascent - height, piece.width, *height);
                    self.ops.push(DrawOp::Border {
                        rect,
                        color: BORDER_COLOR,
                        width: BORDER_WIDTH,
                    });
                    if let Some(alt) = alt {
                        self.ops.push(DrawOp::Text(TextOp {
                            x: rect.x + 2.0,
                            y: rect.y + 2.0,
                            text: alt.clone(),
                            font: FontKey {
                                family: "Helvetica".to_string(),
                                bold: false,
                                italic: true,
                            },
                            size: (self.default_line / 1.2 * 0.75).min(rect.height),
                            color: BORDER_COLOR,
                            background: None,
                            decoration: TextDecoration::None,
                            width: rect.width - 4.0,
                            href: None,
                        }));
                    }
                }
                PieceKind::Space => {}
            }
            x += piece.width;
        }
    }

    fn flow_table(&mut self, table: &TableBlock<'_>, region: Region) {
        let fractions = table.column_fractions();
        let widths: Vec<f32> = fractions.iter().map(|f| f * region.width).collect();

        for row in &table.rows {
            let mut cells = Vec::with_capacity(row.len());
            let mut col = 0;
            let mut row_height = self.default_line + 2.0 * CELL_PADDING;
            for cell in row {
                let span = cell.col_span.min(widths.len().saturating_sub(col)).max(1);
                let x = region.x + widths[..col.min(widths.len())].iter().sum::<f32>();
                let width = widths[col.min(widths.len())..]
                    .iter()
                    .take(span)
                    .sum::<f32>()
                    .max(2.0 * CELL_PADDING + 1.0);
                col += span;

                let mut sub = self.unbounded();
                let inner = Region { x: 0.0, width }.inset(CELL_PADDING, CELL_PADDING);
                sub.flow_blocks(&group_blocks(cell.content), inner);
                let content_height = sub.y.max(self.default_line);
                row_height = row_height.max(content_height + 2.0 * CELL_PADDING);
                cells.push((x, width, sub.ops));
            }

            if let Some(page_height) = self.page_height() {
                if row_height > page_height {
                    log::warn!(
                        "Table row of height {:.1}pt exceeds the page content height {:.1}pt and will overflow",
                        row_height,
                        page_height
                    );
                }
            }
            self.ensure(row_height);
            let row_top = self.y;
            for (x, width, ops) in cells {
                self.ops.push(DrawOp::Border {
                    rect: Rect::new(x, row_top, width, row_height),
                    color: BORDER_COLOR,
                    width: BORDER_WIDTH,
                });
                self.ops
                    .extend(ops.into_iter().map(|op| translate(op, x, row_top + CELL_PADDING)));
            }
            self.y += row_height;
        }
        self.y += CELL_PADDING;
    }
}

fn text_op(
    x: f32,
    y: f32,
    text: &str,
    style: &EffectiveStyle,
    size: f32,
    width: f32,
    href: Option<String>,
) -> TextOp {
    TextOp {
        x,
        y,
        text: text.to_string(),
        font: font_key(style),
        size,
        color: style.color,
        background: style.background,
        decoration: style.text_decoration,
        width,
        href,
    }
}

/// The built-in face a style is exported with.
pub(crate) fn font_key(style: &EffectiveStyle) -> FontKey {
    FontKey {
        family: builtin_family(&style.font_family).to_string(),
        bold: style.is_bold(),
        italic: style.is_italic(),
    }
}

fn translate(op: DrawOp, dx: f32, dy: f32) -> DrawOp {
    match op {
        DrawOp::Text(mut t) => {
            t.x += dx;
            t.y += dy;
            DrawOp::Text(t)
        }
        DrawOp::Border { rect, color, width } => DrawOp::Border {
            rect: rect.translate(dx, dy),
            color,
            width,
        },
        DrawOp::FillRect { rect, color } => DrawOp::FillRect {
            rect: rect.translate(dx, dy),
            color,
        },
    }
}

#[derive(Clone, Copy)]
struct Marker<'a> {
    text: &'a str,
    style: &'a Arc<EffectiveStyle>,
}

#[derive(Debug)]
enum PieceKind {
    Text {
        text: String,
        style: Arc<EffectiveStyle>,
        href: Option<String>,
    },
    Label {
        text: String,
        style: Arc<EffectiveStyle>,
    },
    Image {
        height: f32,
        alt: Option<String>,
    },
    Space,
}

#[derive(Debug)]
struct Piece {
    kind: PieceKind,
    width: f32,
}

#[derive(Debug, Default)]
struct Line {
    pieces: Vec<Piece>,
    width: f32,
    /// Distance from the line top to the baseline.
    ascent: f32,
    height: f32,
}

impl Line {
    fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

struct LineBreaker<'m> {
    measurer: &'m dyn TextMeasurer,
    max_width: f32,
    min_height: f32,
    lines: Vec<Line>,
    current: Line,
}

impl<'m> LineBreaker<'m> {
    fn new(measurer: &'m dyn TextMeasurer, max_width: f32, min_height: f32) -> Self {
        Self {
            measurer,
            max_width,
            min_height,
            lines: Vec::new(),
            current: Line::default(),
        }
    }

    fn break_lines(mut self, inlines: &[VisualNode], marker: Option<Marker<'_>>) -> Vec<Line> {
        if let Some(marker) = marker {
            self.push_text(marker.text, marker.style, None);
        }
        for node in inlines {
            match node {
                VisualNode::TextRun { text, style, href, .. } => {
                    self.push_text(text, style, href.as_deref())
                }
                VisualNode::LineBreak { .. } => self.end_line(true),
                VisualNode::Tab { .. } => {
                    let width = TAB_STOP - (self.current.width % TAB_STOP);
                    if self.current.width + width > self.max_width {
                        self.end_line(false);
                    }
                    self.push_piece(
                        Piece {
                            kind: PieceKind::Space,
                            width,
                        },
                        0.0,
                        0.0,
                    );
                }
                VisualNode::Image { width, height, alt, .. } => {
                    let size = Size::new(*width, *height).fit_width(self.max_width);
                    if !self.current.is_empty() && self.current.width + size.width > self.max_width {
                        self.end_line(false);
                    }
                    self.push_piece(
                        Piece {
                            kind: PieceKind::Image {
                                height: size.height,
                                alt: alt.clone(),
                            },
                            width: size.width,
                        },
                        size.height,
                        size.height,
                    );
                }
                VisualNode::NoteReference { label, style, .. } => {
                    let width = self.measurer.measure(label, style) * NOTE_LABEL_SCALE;
                    self.push_piece(
                        Piece {
                            kind: PieceKind::Label {
                                text: label.clone(),
                                style: style.clone(),
                            },
                            width,
                        },
                        style.font_size * ASCENT,
                        style.line_height,
                    );
                }
                _ => {}
            }
        }
        if !self.current.is_empty() || self.lines.is_empty() {
            self.end_line(true);
        }
        self.lines
    }

    fn end_line(&mut self, forced: bool) {
        let mut line = std::mem::take(&mut self.current);
        if line.is_empty() && !forced {
            return;
        }
        line.height = line.height.max(self.min_height);
        if line.ascent == 0.0 {
            line.ascent = line.height / 1.2 * ASCENT;
        }
        self.lines.push(line);
    }

    fn push_piece(&mut self, piece: Piece, ascent: f32, height: f32) {
        self.current.width += piece.width;
        self.current.ascent = self.current.ascent.max(ascent);
        self.current.height = self.current.height.max(height);
        self.current.pieces.push(piece);
    }

    fn push_text(&mut self, text: &str, style: &Arc<EffectiveStyle>, href: Option<&str>) {
        for word in text.split_inclusive(char::is_whitespace) {
            let width = self.measurer.measure(word, style);
            let visible = self.measurer.measure(word.trim_end(), style);
            if !self.current.is_empty() && self.current.width + visible > self.max_width {
                self.end_line(false);
            }
            if self.current.is_empty() && word.trim().is_empty() && !self.lines.is_empty() {
                continue;
            }
            if visible > self.max_width {
                self.push_long_word(word, style, href);
            } else {
                self.append(word, width, style, href);
            }
        }
    }

    /// Splits a word wider than the line at character boundaries.
    fn push_long_word(&mut self, word: &str, style: &Arc<EffectiveStyle>, href: Option<&str>) {
        let mut chunk = String::new();
        for c in word.chars() {
            let mut candidate = chunk.clone();
            candidate.push(c);
            let width = self.measurer.measure(&candidate, style);
            if self.current.width + width > self.max_width && !chunk.is_empty() {
                let chunk_width = self.measurer.measure(&chunk, style);
                self.append(&chunk, chunk_width, style, href);
                self.end_line(false);
                chunk.clear();
                chunk.push(c);
            } else {
                chunk = candidate;
            }
        }
        if !chunk.is_empty() {
            let width = self.measurer.measure(&chunk, style);
            self.append(&chunk, width, style, href);
        }
    }

    /// Appends to the previous piece when it continues the same run.
    fn append(&mut self, text: &str, width: f32, style: &Arc<EffectiveStyle>, href: Option<&str>) {
        if let Some(Piece {
            kind:
                PieceKind::Text {
                    text: prev,
                    style: prev_style,
                    href: prev_href,
                },
            width: prev_width,
        }) = self.current.pieces.last_mut()
        {
            if (Arc::ptr_eq(prev_style, style) || **prev_style == **style)
                && prev_href.as_deref() == href
            {
                prev.push_str(text);
                *prev_width += width;
                self.current.width += width;
                return;
            }
        }
        self.push_piece(
            Piece {
                kind: PieceKind::Text {
                    text: text.to_string(),
                    style: style.clone(),
                    href: href.map(str::to_string),
                },
                width,
            },
            style.font_size * ASCENT,
            style.line_height,
        );
    }
}
