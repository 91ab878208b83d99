use crate::tree::{
    DisplayCell, DisplayNode, DisplayOptions, DisplayPage, DisplaySpan, DisplayTree, LayoutMode,
};
use docview_layout::VisualNode;
use docview_render_core::{Block, group_blocks};

/// Builds the display tree for `nodes` at zoom `scale`.
pub fn render(
    nodes: &[VisualNode],
    scale: f32,
    mode: LayoutMode,
    options: &DisplayOptions,
) -> DisplayTree {
    let new_page = || DisplayPage {
        width: match mode {
            LayoutMode::Paged => Some(options.page_width),
            LayoutMode::Continuous => None,
        },
        color: match mode {
            LayoutMode::Paged => Some(options.page_color),
            LayoutMode::Continuous => None,
        },
        children: Vec::new(),
    };

    let mut pages = vec![new_page()];
    for block in group_blocks(nodes) {
        match (block, mode) {
            (Block::PageBreak, LayoutMode::Paged) => pages.push(new_page()),
            (Block::PageBreak, LayoutMode::Continuous) => {
                if let Some(page) = pages.last_mut() {
                    page.children.push(DisplayNode::Divider);
                }
            }
            (block, _) => {
                if let Some(page) = pages.last_mut() {
                    page.children.push(convert_block(block));
                }
            }
        }
    }

    log::debug!("Display tree: {} page container(s) at scale {}", pages.len(), scale);
    DisplayTree {
        scale,
        mode,
        options: options.clone(),
        pages,
    }
}

fn convert_all(nodes: &[VisualNode]) -> Vec<DisplayNode> {
    group_blocks(nodes).into_iter().map(convert_block).collect()
}

fn convert_block(block: Block<'_>) -> DisplayNode {
    match block {
        Block::Paragraph(p) => DisplayNode::Paragraph {
            align: p.align,
            line_height: p.line_height,
            space_after: p.space_after,
            spans: p.inlines.iter().filter_map(convert_inline).collect(),
        },
        Block::EmptyLine(height) => DisplayNode::Spacer { height },
        Block::Table(table) => DisplayNode::Table {
            columns: table.column_fractions(),
            rows: table
                .rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|cell| DisplayCell {
                            col_span: cell.col_span,
                            children: convert_all(cell.content),
                        })
                        .collect()
                })
                .collect(),
        },
        Block::ListItem(item) => DisplayNode::ListItem {
            marker: item.marker.to_string(),
            marker_style: item.marker_style.clone(),
            depth: item.depth,
            children: convert_all(item.content),
        },
        // Nested page breaks (inside cells or items) have no page to break.
        Block::PageBreak => DisplayNode::Divider,
    }
}

fn convert_inline(node: &VisualNode) -> Option<DisplaySpan> {
    match node {
        VisualNode::TextRun {
            text,
            style,
            href,
            entry,
        } => Some(DisplaySpan::Text {
            text: text.clone(),
            style: style.clone(),
            href: href.clone(),
            entry: *entry,
            highlights: Vec::new(),
        }),
        VisualNode::Tab { entry } => Some(DisplaySpan::Tab {
            entry: *entry,
            highlights: Vec::new(),
        }),
        VisualNode::LineBreak { entry } => Some(DisplaySpan::LineBreak {
            entry: *entry,
            highlights: Vec::new(),
        }),
        VisualNode::Image {
            src,
            width,
            height,
            alt,
        } => Some(DisplaySpan::Image {
            src: src.clone(),
            width: *width,
            height: *height,
            alt: alt.clone(),
        }),
        VisualNode::NoteReference {
            id, label, style, ..
        } => Some(DisplaySpan::NoteLabel {
            id: id.clone(),
            label: label.clone(),
            style: style.clone(),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docview_idf::{
        BlockNode, DocumentTree, InlineNode, List, ListItem, NoteKind, NoteReference, Paragraph,
        Table, TableCell, TableRow, TextRun,
    };
    use docview_layout::visual::flatten_text;
    use docview_style::list::ListKind;
    use docview_types::NoteId;

    fn doc() -> Vec<VisualNode> {
        let tree = DocumentTree::new(vec![
            BlockNode::Paragraph(Paragraph::plain("Intro")),
            BlockNode::Table(Table {
                column_widths: None,
                rows: vec![TableRow {
                    cells: vec![
                        TableCell {
                            blocks: vec![BlockNode::List(List {
                                kind: ListKind::Unordered,
                                start: 1,
                                items: vec![ListItem {
                                    blocks: vec![BlockNode::Paragraph(Paragraph::plain("nested"))],
                                }],
                            })],
                            col_span: 1,
                        },
                        TableCell::default(),
                    ],
                }],
            }),
            BlockNode::SectionBreak,
            BlockNode::Paragraph(Paragraph {
                children: vec![
                    InlineNode::Text(TextRun::plain("Outro")),
                    InlineNode::NoteReference(NoteReference {
                        id: NoteId::new("n1"),
                        kind: NoteKind::Footnote,
                    }),
                ],
                ..Default::default()
            }),
        ]);
        docview_layout::build(&tree).nodes
    }

    #[test]
    fn continuous_mode_uses_one_unconstrained_page() {
        let tree = render(&doc(), 1.0, LayoutMode::Continuous, &DisplayOptions::default());
        assert_eq!(tree.pages.len(), 1);
        assert_eq!(tree.pages[0].width, None);
        assert!(tree.pages[0].children.contains(&DisplayNode::Divider));
        assert_eq!(tree.scaled_page_width(), None);
    }

    #[test]
    fn paged_mode_splits_at_section_breaks() {
        let options = DisplayOptions::default();
        let tree = render(&doc(), 1.0, LayoutMode::Paged, &options);
        assert_eq!(tree.pages.len(), 2);
        assert!(tree.pages.iter().all(|p| p.width == Some(options.page_width)));
        assert!(tree.pages.iter().all(|p| p.color == Some(options.page_color)));
        assert!(!tree.pages[0].children.contains(&DisplayNode::Divider));
    }

    #[test]
    fn display_text_matches_visual_text() {
        let nodes = doc();
        let tree = render(&nodes, 1.0, LayoutMode::Paged, &DisplayOptions::default());
        assert_eq!(tree.text(), flatten_text(&nodes));
    }

    #[test]
    fn zoom_scales_without_rebuilding() {
        let mut tree = render(&doc(), 1.0, LayoutMode::Paged, &DisplayOptions::default());
        let before = tree.pages.clone();
        tree.set_zoom(2.0);
        assert_eq!(tree.pages, before);
        assert_eq!(tree.scaled_page_width(), Some(768.0 * 2.0));
        let style = docview_layout::EffectiveStyle::default();
        assert_eq!(tree.scaled_font_size(&style), 24.0);
    }

    #[test]
    fn nested_content_is_kept_structured() {
        let tree = render(&doc(), 1.0, LayoutMode::Continuous, &DisplayOptions::default());
        let table = tree.pages[0]
            .children
            .iter()
            .find(|n| matches!(n, DisplayNode::Table { .. }))
            .unwrap();
        let DisplayNode::Table { rows, columns } = table else {
            unreachable!()
        };
        assert_eq!(columns.len(), 2);
        assert!(matches!(rows[0][0].children[0], DisplayNode::ListItem { ref marker, .. } if marker == "• "));
        assert!(rows[0][1].children.is_empty());
        let labels: Vec<_> = tree
            .spans()
            .into_iter()
            .filter_map(|s| match s {
                DisplaySpan::NoteLabel { label, .. } => Some(label.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["1"]);
    }
}
