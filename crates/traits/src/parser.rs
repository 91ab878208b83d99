//! DocumentParser trait: the seam to whatever turns raw bytes into a document tree.

use docview_idf::DocumentTree;
use std::fmt::Debug;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
}

/// Turns the bytes of exactly one source into a `DocumentTree`.
///
/// Parsing is CPU-bound; callers run it off the interactive thread.
pub trait DocumentParser: Send + Sync + Debug {
    fn parse(&self, bytes: &[u8]) -> Result<DocumentTree, ParseError>;

    /// Returns a human-readable name for this parser (for logging/debugging).
    fn name(&self) -> &'static str;
}
