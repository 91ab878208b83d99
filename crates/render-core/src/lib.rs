//! Shared contract for the renderer backends.
//!
//! Both backends consume the same visual node sequence. This crate provides:
//! - `group_blocks` for reading that sequence as paragraphs, tables and list items
//! - `PageFormat`, `ExportArtifact` and the positioned `PageContent` of the export path
//! - `DocumentRenderer` for abstracting PDF writing operations
//! - `TextMeasurer` for line breaking without a shaping engine
//! - Error types for rendering operations

pub mod blocks;
mod error;
pub mod measure;
mod traits;
mod types;
pub mod utils;

pub use blocks::{Block, CellBlock, ListItemBlock, ParagraphBlock, TableBlock, group_blocks};
pub use error::RenderError;
pub use measure::{AverageWidthMeasurer, TextMeasurer};
pub use traits::DocumentRenderer;
pub use types::{DrawOp, ExportArtifact, FontKey, PageContent, PageFormat, TextOp};
