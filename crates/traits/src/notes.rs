use docview_idf::{DocumentTree, Note};
use docview_types::NoteId;

/// Resolves footnote/endnote content on demand.
pub trait NoteLookup: Send + Sync {
    fn note(&self, id: &NoteId) -> Option<&Note>;
}

impl NoteLookup for DocumentTree {
    fn note(&self, id: &NoteId) -> Option<&Note> {
        self.notes.get(id)
    }
}
