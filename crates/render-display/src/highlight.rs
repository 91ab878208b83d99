use crate::tree::{DisplayTree, Highlight};
use docview_layout::{EntryId, MatchSpan, SearchIndex};
use std::collections::HashMap;

impl DisplayTree {
    /// Replaces all highlights with `matches`, marking `matches[current]` as
    /// the current match. Spans are found by their index entry, so the tree
    /// is walked once regardless of the match count.
    pub fn apply_highlights(
        &mut self,
        index: &SearchIndex,
        matches: &[MatchSpan],
        current: Option<usize>,
    ) {
        let mut by_entry: HashMap<EntryId, Vec<Highlight>> = HashMap::new();
        for (i, span) in matches.iter().enumerate() {
            for segment in index.segments(*span) {
                by_entry.entry(segment.entry).or_default().push(Highlight {
                    start: segment.start,
                    len: segment.len,
                    current: current == Some(i),
                });
            }
        }

        self.for_each_span_mut(&mut |span| {
            let entry = span.entry();
            if let Some(highlights) = span.highlights_mut() {
                highlights.clear();
                if let Some(found) = entry.and_then(|e| by_entry.get(&e)) {
                    highlights.extend_from_slice(found);
                }
            }
        });
    }

    pub fn clear_highlights(&mut self) {
        self.for_each_span_mut(&mut |span| {
            if let Some(highlights) = span.highlights_mut() {
                highlights.clear();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::{DisplayOptions, DisplaySpan, LayoutMode, render};
    use docview_idf::{BlockNode, DocumentTree, InlineNode, Paragraph, TextRun};
    use docview_style::font::FontWeight;
    use docview_style::stylesheet::RunStyle;

    fn fixture() -> (docview_layout::BuildOutput, crate::DisplayTree) {
        let tree = DocumentTree::new(vec![
            BlockNode::Paragraph(Paragraph {
                children: vec![
                    InlineNode::Text(TextRun::plain("The qu")),
                    InlineNode::Text(TextRun::with_format(
                        "ick fox",
                        RunStyle {
                            font_weight: Some(FontWeight::Bold),
                            ..Default::default()
                        },
                    )),
                ],
                ..Default::default()
            }),
            BlockNode::Paragraph(Paragraph::plain("Quick again")),
        ]);
        let output = docview_layout::build(&tree);
        let display = render(&output.nodes, 1.0, LayoutMode::Continuous, &DisplayOptions::default());
        (output, display)
    }

    #[test]
    fn match_across_runs_highlights_both_spans() {
        let (output, mut display) = fixture();
        let matches = output.index.find("quick");
        assert_eq!(matches.len(), 2);
        display.apply_highlights(&output.index, &matches, Some(1));

        let spans = display.spans();
        let hl: Vec<_> = spans.iter().map(|s| s.highlights().to_vec()).collect();
        assert_eq!(hl[0].len(), 1);
        assert_eq!((hl[0][0].start, hl[0][0].len, hl[0][0].current), (4, 2, false));
        assert_eq!((hl[1][0].start, hl[1][0].len), (0, 3));
        assert_eq!((hl[2][0].start, hl[2][0].len, hl[2][0].current), (0, 5, true));
        assert_eq!(
            display.highlight_color(&hl[2][0]),
            DisplayOptions::default().current_match_color
        );
    }

    #[test]
    fn reapplying_replaces_previous_highlights() {
        let (output, mut display) = fixture();
        let first = output.index.find("quick");
        display.apply_highlights(&output.index, &first, Some(0));
        display.apply_highlights(&output.index, &output.index.find("fox"), None);
        let highlighted: Vec<_> = display
            .spans()
            .into_iter()
            .filter(|s| !s.highlights().is_empty())
            .collect();
        assert_eq!(highlighted.len(), 1);
        assert!(matches!(highlighted[0], DisplaySpan::Text { text, .. } if text == "ick fox"));

        display.clear_highlights();
        assert!(display.spans().iter().all(|s| s.highlights().is_empty()));
    }
}
