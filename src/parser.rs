//! JSON form of the document tree, standing in for an archive parser.

use docview_idf::DocumentTree;
use docview_traits::{DocumentParser, ParseError};

/// Deserialises a `DocumentTree` from JSON. Unknown element types become
/// `Unsupported` nodes instead of errors.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonDocumentParser;

impl DocumentParser for JsonDocumentParser {
    fn parse(&self, bytes: &[u8]) -> Result<DocumentTree, ParseError> {
        if bytes.starts_with(b"PK\x03\x04") {
            return Err(ParseError::UnsupportedFormat(
                "zip archive (OOXML packages need an archive parser)".to_string(),
            ));
        }
        let tree: DocumentTree =
            serde_json::from_slice(bytes).map_err(|e| ParseError::Malformed(e.to_string()))?;
        log::debug!(
            "Parsed document: {} blocks, {} fonts, {} notes",
            tree.blocks.len(),
            tree.fonts.len(),
            tree.notes.len()
        );
        Ok(tree)
    }

    fn name(&self) -> &'static str {
        "json"
    }
}
