//! List numbering vocabulary.
use serde::{Deserialize, Serialize};

/// The marker glyph used for every unordered list item, at every depth.
pub const BULLET_MARKER: &str = "• ";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ListKind {
    #[default]
    Unordered,
    Ordered,
}
