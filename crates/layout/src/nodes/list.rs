use super::list_utils::marker_text;
use crate::builder::VisualNodeBuilder;
use crate::style::EffectiveStyle;
use crate::visual::VisualNode;
use docview_idf::{BlockNode, InlineNode, List, ListItem, Paragraph};
use std::sync::Arc;

impl VisualNodeBuilder<'_> {
    /// Each list numbers its own items; nested lists start over at their own
    /// `start`.
    pub(crate) fn build_list(&mut self, list: &List, depth: usize, out: &mut Vec<VisualNode>) {
        for (i, item) in list.items.iter().enumerate() {
            let marker_style = self.marker_style(item);
            let mut content = Vec::new();
            self.build_blocks(&item.blocks, depth + 1, &mut content);
            out.push(VisualNode::ListItem {
                marker: marker_text(list.kind, list.start, i),
                marker_style,
                depth,
                content,
            });
        }
    }

    /// Markers take the style of the item's first run.
    fn marker_style(&self, item: &ListItem) -> Arc<EffectiveStyle> {
        let default_paragraph = Paragraph::default();
        let paragraph = item
            .blocks
            .iter()
            .find_map(|b| match b {
                BlockNode::Paragraph(p) => Some(p),
                _ => None,
            })
            .unwrap_or(&default_paragraph);
        let ctx = self.resolver.paragraph_context(paragraph);
        let first_run = paragraph.children.iter().find_map(|c| match c {
            InlineNode::Text(run) => Some(run),
            _ => None,
        });
        match first_run {
            Some(run) => self.resolver.resolve_run(&ctx, run),
            None => self.resolver.resolve_plain(&ctx),
        }
    }
}
