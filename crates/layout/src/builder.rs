use crate::fonts::FontAvailability;
use crate::nodes::list_utils::int_to_lower_roman;
use crate::search::{SearchIndex, SearchIndexBuilder};
use crate::style::StyleResolver;
use crate::visual::{VisualNode, count_nodes};
use docview_idf::{BlockNode, DocumentTree, NoteKind};
use docview_style::stylesheet::Stylesheet;
use docview_types::NoteId;
use std::collections::HashMap;

/// A note reference met during the walk, with the label it was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRef {
    pub id: NoteId,
    pub kind: NoteKind,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildDiagnostics {
    pub skipped_blocks: usize,
    pub skipped_inlines: usize,
    /// Distinct note references in order of first appearance.
    pub note_references: Vec<NoteRef>,
}

impl BuildDiagnostics {
    pub fn skipped_elements(&self) -> usize {
        self.skipped_blocks + self.skipped_inlines
    }
}

#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    pub nodes: Vec<VisualNode>,
    pub index: SearchIndex,
    pub diagnostics: BuildDiagnostics,
}

impl BuildOutput {
    pub fn node_count(&self) -> usize {
        count_nodes(&self.nodes)
    }
}

/// Walks a document tree and emits visual nodes, filling the search index
/// in the same pass.
#[derive(Debug)]
pub struct VisualNodeBuilder<'a> {
    pub(crate) resolver: StyleResolver<'a>,
    pub(crate) index: SearchIndexBuilder,
    pub(crate) diagnostics: BuildDiagnostics,
    note_labels: HashMap<NoteId, String>,
    footnotes: usize,
    endnotes: usize,
}

impl<'a> VisualNodeBuilder<'a> {
    pub fn new(stylesheet: &'a Stylesheet, fonts: &'a FontAvailability) -> Self {
        Self {
            resolver: StyleResolver::new(stylesheet, fonts),
            index: SearchIndexBuilder::new(),
            diagnostics: BuildDiagnostics::default(),
            note_labels: HashMap::new(),
            footnotes: 0,
            endnotes: 0,
        }
    }

    /// Seeds the label table so references keep labels assigned elsewhere.
    pub fn with_note_labels(mut self, refs: &[NoteRef]) -> Self {
        for r in refs {
            match r.kind {
                NoteKind::Footnote => self.footnotes += 1,
                NoteKind::Endnote => self.endnotes += 1,
            }
            self.note_labels.insert(r.id.clone(), r.label.clone());
        }
        self
    }

    pub fn build(mut self, blocks: &[BlockNode]) -> BuildOutput {
        let mut nodes = Vec::new();
        self.build_blocks(blocks, 0, &mut nodes);
        log::debug!(
            "Built {} visual nodes ({} skipped elements)",
            count_nodes(&nodes),
            self.diagnostics.skipped_elements()
        );
        BuildOutput {
            nodes,
            index: self.index.finish(),
            diagnostics: self.diagnostics,
        }
    }

    pub(crate) fn build_blocks(
        &mut self,
        blocks: &[BlockNode],
        depth: usize,
        out: &mut Vec<VisualNode>,
    ) {
        for block in blocks {
            match block {
                BlockNode::Paragraph(p) => self.build_paragraph(p, out),
                BlockNode::Table(t) => self.build_table(t, depth, out),
                BlockNode::List(l) => self.build_list(l, depth, out),
                BlockNode::SectionBreak => out.push(VisualNode::PageBreak),
                BlockNode::Unsupported => {
                    log::debug!("Skipping unsupported block element");
                    self.diagnostics.skipped_blocks += 1;
                }
            }
        }
    }

    /// Footnotes are numbered 1, 2, ...; endnotes i, ii, ... in order of
    /// first reference.
    pub(crate) fn note_label(&mut self, id: &NoteId, kind: NoteKind) -> String {
        if let Some(label) = self.note_labels.get(id) {
            return label.clone();
        }
        let label = match kind {
            NoteKind::Footnote => {
                self.footnotes += 1;
                self.footnotes.to_string()
            }
            NoteKind::Endnote => {
                self.endnotes += 1;
                int_to_lower_roman(self.endnotes)
            }
        };
        self.note_labels.insert(id.clone(), label.clone());
        self.diagnostics.note_references.push(NoteRef {
            id: id.clone(),
            kind,
            label: label.clone(),
        });
        label
    }
}

/// Builds a document with every font family treated as available.
pub fn build(tree: &DocumentTree) -> BuildOutput {
    build_with_fonts(tree, &FontAvailability::permissive())
}

pub fn build_with_fonts(tree: &DocumentTree, fonts: &FontAvailability) -> BuildOutput {
    VisualNodeBuilder::new(&tree.stylesheet, fonts).build(&tree.blocks)
}
