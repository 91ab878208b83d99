use crate::builder::build;
use crate::nodes::build_notes_section;
use crate::fonts::FontAvailability;
use crate::test_utils::*;
use crate::visual::{VisualNode, find_entry, flatten_text};
use docview_idf::{
    BlockNode, Hyperlink, Image, InlineNode, MAX_TABLE_COLUMNS, Note, NoteKind, Table, TableCell,
    TableRow, TextRun,
};
use docview_style::list::{BULLET_MARKER, ListKind};
use docview_types::NoteId;

fn markers(nodes: &[VisualNode]) -> Vec<(String, usize)> {
    let mut out = Vec::new();
    crate::visual::walk(nodes, &mut |n| {
        if let VisualNode::ListItem { marker, depth, .. } = n {
            out.push((marker.clone(), *depth));
        }
    });
    out
}

#[test]
fn test_empty_paragraph_becomes_empty_line() {
    let output = build(&doc(vec![para(vec![])]));
    assert_eq!(output.nodes.len(), 1);
    match &output.nodes[0] {
        VisualNode::EmptyLine { height } => assert!(*height > 0.0),
        other => panic!("expected empty line, got {other:?}"),
    }
    assert!(output.index.is_empty());
}

#[test]
fn test_paragraph_emits_one_node_per_inline() {
    let output = build(&doc(vec![para(vec![
        text("Hello"),
        InlineNode::Tab,
        text("world"),
        InlineNode::LineBreak,
        text("!"),
    ])]));
    let kinds: Vec<_> = output.nodes.iter().map(VisualNode::kind).collect();
    assert_eq!(
        kinds,
        vec!["paragraph-start", "text-run", "tab", "text-run", "line-break", "text-run", "paragraph-end"]
    );
    assert_eq!(flatten_text(&output.nodes), "Hello\tworld\n!");
}

#[test]
fn test_ordered_list_counts_from_start() {
    let output = build(&doc(vec![list(
        ListKind::Ordered,
        3,
        vec![vec![plain("three")], vec![plain("four")]],
    )]));
    assert_eq!(
        markers(&output.nodes),
        vec![("3. ".to_string(), 0), ("4. ".to_string(), 0)]
    );
}

#[test]
fn test_nested_lists_number_independently() {
    let inner = list(ListKind::Ordered, 1, vec![vec![plain("a")], vec![plain("b")]]);
    let output = build(&doc(vec![list(
        ListKind::Unordered,
        1,
        vec![vec![plain("outer"), inner], vec![plain("outer 2")]],
    )]));
    assert_eq!(
        markers(&output.nodes),
        vec![
            (BULLET_MARKER.to_string(), 0),
            ("1. ".to_string(), 1),
            ("2. ".to_string(), 1),
            (BULLET_MARKER.to_string(), 0),
        ]
    );
}

#[test]
fn test_table_structure_and_recursive_cells() {
    let nested = table(vec![vec![vec![plain("deep")]]]);
    let output = build(&doc(vec![table(vec![
        vec![vec![plain("a")], vec![]],
        vec![vec![list(ListKind::Unordered, 1, vec![vec![plain("item")]])], vec![nested]],
    ])]));

    let kinds: Vec<_> = output.nodes.iter().map(VisualNode::kind).collect();
    assert_eq!(
        kinds,
        vec!["table-start", "row", "cell", "cell", "row", "cell", "cell", "table-end"]
    );
    match &output.nodes[1 + 1 + 1] {
        VisualNode::Cell { content, col_span } => {
            assert!(content.is_empty());
            assert_eq!(*col_span, 1);
        }
        other => panic!("expected empty cell, got {other:?}"),
    }
    assert_eq!(flatten_text(&output.nodes), "aitemdeep");
}

#[test]
fn test_oversized_span_is_clamped_and_siblings_render() {
    let wide = BlockNode::Table(Table {
        column_widths: None,
        rows: vec![TableRow {
            cells: vec![
                TableCell {
                    blocks: vec![plain("wide")],
                    col_span: 100_000_000_000,
                },
                TableCell {
                    blocks: vec![plain("max")],
                    col_span: usize::MAX,
                },
            ],
        }],
    });
    let output = build(&doc(vec![wide, plain("after")]));

    match &output.nodes[0] {
        VisualNode::TableStart { columns } => assert_eq!(columns.len(), 2 * MAX_TABLE_COLUMNS),
        other => panic!("expected table start, got {other:?}"),
    }
    let spans: Vec<usize> = output
        .nodes
        .iter()
        .filter_map(|n| match n {
            VisualNode::Cell { col_span, .. } => Some(*col_span),
            _ => None,
        })
        .collect();
    assert_eq!(spans, vec![MAX_TABLE_COLUMNS, MAX_TABLE_COLUMNS]);
    assert_eq!(flatten_text(&output.nodes), "widemaxafter");
}

#[test]
fn test_list_starting_at_usize_max_does_not_overflow() {
    let output = build(&doc(vec![list(
        ListKind::Ordered,
        usize::MAX,
        vec![vec![plain("last")], vec![plain("beyond")]],
    )]));
    let expected = format!("{}. ", usize::MAX);
    assert_eq!(
        markers(&output.nodes),
        vec![(expected.clone(), 0), (expected, 0)]
    );
}

#[test]
fn test_unsupported_blocks_are_skipped_and_siblings_render() {
    let output = build(&doc(vec![
        BlockNode::Unsupported,
        plain("after"),
        para(vec![InlineNode::Unsupported, text("kept")]),
    ]));
    assert_eq!(output.diagnostics.skipped_blocks, 1);
    assert_eq!(output.diagnostics.skipped_inlines, 1);
    assert_eq!(flatten_text(&output.nodes), "afterkept");
}

#[test]
fn test_section_break_becomes_page_break() {
    let output = build(&doc(vec![plain("a"), BlockNode::SectionBreak, plain("b")]));
    assert!(output.nodes.contains(&VisualNode::PageBreak));
}

#[test]
fn test_hyperlinks_and_images() {
    let output = build(&doc(vec![para(vec![
        InlineNode::Hyperlink(Hyperlink {
            href: "https://example.com".into(),
            children: vec![TextRun::plain("link")],
        }),
        InlineNode::Image(Image {
            src: "media/image1.png".into(),
            width: 120.0,
            height: 80.0,
            alt: Some("chart".into()),
        }),
    ])]));
    assert!(output.nodes.iter().any(|n| matches!(
        n,
        VisualNode::TextRun { href: Some(h), .. } if h == "https://example.com"
    )));
    assert!(output
        .nodes
        .iter()
        .any(|n| matches!(n, VisualNode::Image { width, .. } if *width == 120.0)));
}

#[test]
fn test_note_references_are_labelled_not_inlined() {
    let mut tree = doc(vec![para(vec![
        text("Claim"),
        footnote_ref("7"),
        text(" again"),
        footnote_ref("7"),
        footnote_ref("9"),
    ])]);
    tree.notes.insert(
        NoteId::new("7"),
        Note {
            kind: NoteKind::Footnote,
            blocks: vec![plain("Source text")],
        },
    );
    let output = build(&tree);

    let labels: Vec<_> = output
        .nodes
        .iter()
        .filter_map(|n| match n {
            VisualNode::NoteReference { label, .. } => Some(label.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec!["1", "1", "2"]);
    assert!(!flatten_text(&output.nodes).contains("Source text"));
    assert_eq!(output.diagnostics.note_references.len(), 2);
}

#[test]
fn test_notes_section_expands_one_level() {
    let mut tree = doc(vec![para(vec![text("Body"), footnote_ref("1")])]);
    tree.notes.insert(
        NoteId::new("1"),
        Note {
            kind: NoteKind::Footnote,
            blocks: vec![para(vec![text("First note"), footnote_ref("2")])],
        },
    );
    tree.notes.insert(
        NoteId::new("2"),
        Note {
            kind: NoteKind::Footnote,
            blocks: vec![plain("Never expanded")],
        },
    );
    let output = build(&tree);
    let section = build_notes_section(
        &tree.stylesheet,
        &FontAvailability::permissive(),
        &tree,
        &output.diagnostics.note_references,
    );

    let text = flatten_text(&section);
    assert!(text.contains("Notes"));
    assert!(text.contains("First note"));
    assert!(!text.contains("Never expanded"));
    assert_eq!(markers(&section), vec![("1. ".to_string(), 0)]);
}

#[test]
fn test_text_nodes_point_back_to_their_entries() {
    let output = build(&doc(vec![plain("one"), plain("two")]));
    for (id, entry) in output.index.entries().iter().enumerate() {
        let node = find_entry(&output.nodes, id).unwrap();
        assert_eq!(node.text().unwrap().chars().count(), entry.len);
    }
}
