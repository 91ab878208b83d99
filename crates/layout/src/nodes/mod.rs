//! Per-block expansion rules of the visual node builder.

pub mod list;
pub mod list_utils;
pub mod note;
pub mod paragraph;
pub mod table;

pub use note::build_notes_section;
pub use table::column_fractions;
