//! The end-of-document notes section used by the export path.

use crate::builder::{NoteRef, VisualNodeBuilder};
use crate::fonts::FontAvailability;
use crate::visual::VisualNode;
use docview_idf::{Paragraph, TextRun};
use docview_style::font::FontWeight;
use docview_style::stylesheet::{RunStyle, Stylesheet};
use docview_traits::NoteLookup;

pub const NOTES_HEADING: &str = "Notes";

/// Builds a heading followed by one item per referenced note, labelled as in
/// the body. References inside a note render as labels and are not expanded.
pub fn build_notes_section(
    stylesheet: &Stylesheet,
    fonts: &FontAvailability,
    lookup: &dyn NoteLookup,
    refs: &[NoteRef],
) -> Vec<VisualNode> {
    let mut builder = VisualNodeBuilder::new(stylesheet, fonts).with_note_labels(refs);
    let mut out = Vec::new();

    for r in refs {
        let Some(note) = lookup.note(&r.id) else {
            log::warn!("Note '{}' is referenced but has no content", r.id);
            continue;
        };
        let marker_style = builder
            .resolver
            .resolve_plain(&builder.resolver.paragraph_context(&Paragraph::default()));
        let mut content = Vec::new();
        builder.build_blocks(&note.blocks, 1, &mut content);
        out.push(VisualNode::ListItem {
            marker: format!("{}. ", r.label),
            marker_style,
            depth: 0,
            content,
        });
    }

    if out.is_empty() {
        return out;
    }

    let heading = Paragraph {
        children: vec![docview_idf::InlineNode::Text(TextRun::with_format(
            NOTES_HEADING,
            RunStyle {
                font_weight: Some(FontWeight::Bold),
                ..Default::default()
            },
        ))],
        ..Default::default()
    };
    let mut section = vec![VisualNode::EmptyLine {
        height: builder
            .resolver
            .resolve_plain(&builder.resolver.paragraph_context(&heading))
            .line_height,
    }];
    builder.build_paragraph(&heading, &mut section);
    section.extend(out);
    section
}
