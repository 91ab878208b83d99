use docview_idf::{
    BlockNode, DocumentTree, InlineNode, List, ListItem, NoteKind, NoteReference, Paragraph, Table,
    TableCell, TableRow, TextRun,
};
use docview_style::list::ListKind;
use docview_types::NoteId;

pub fn text(s: &str) -> InlineNode {
    InlineNode::Text(TextRun::plain(s))
}

pub fn para(children: Vec<InlineNode>) -> BlockNode {
    BlockNode::Paragraph(Paragraph {
        children,
        ..Default::default()
    })
}

pub fn plain(s: &str) -> BlockNode {
    BlockNode::Paragraph(Paragraph::plain(s))
}

pub fn list(kind: ListKind, start: usize, items: Vec<Vec<BlockNode>>) -> BlockNode {
    BlockNode::List(List {
        kind,
        start,
        items: items.into_iter().map(|blocks| ListItem { blocks }).collect(),
    })
}

pub fn table(rows: Vec<Vec<Vec<BlockNode>>>) -> BlockNode {
    BlockNode::Table(Table {
        column_widths: None,
        rows: rows
            .into_iter()
            .map(|cells| TableRow {
                cells: cells
                    .into_iter()
                    .map(|blocks| TableCell { blocks, col_span: 1 })
                    .collect(),
            })
            .collect(),
    })
}

pub fn footnote_ref(id: &str) -> InlineNode {
    InlineNode::NoteReference(NoteReference {
        id: NoteId::new(id),
        kind: NoteKind::Footnote,
    })
}

pub fn doc(blocks: Vec<BlockNode>) -> DocumentTree {
    DocumentTree::new(blocks)
}
