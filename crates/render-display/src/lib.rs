//! Interactive renderer backend.
//!
//! Converts visual nodes into a retained display tree once per load. Zoom is a
//! uniform scale stored on the tree and applied at paint time, so changing it
//! never rebuilds the tree. Search highlights are attached to individual spans.

mod highlight;
mod render;
mod tree;

pub use render::render;
pub use tree::{
    DisplayCell, DisplayNode, DisplayOptions, DisplayPage, DisplaySpan, DisplayTree, Highlight,
    LayoutMode,
};
