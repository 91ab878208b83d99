//! Export renderer backend: flows visual nodes onto fixed-size pages and
//! writes them as a PDF with the `lopdf` object model.
//!
//! Export always happens at the reference scale of one point per unit; the
//! interactive zoom never reaches this crate.

mod content;
mod flow;
mod renderer;
mod writer;

pub use content::{render_page_to_content, to_win_ansi};
pub use flow::{paginate, LIST_INDENT, TAB_STOP};
pub use renderer::{LopdfRenderer, PdfExportRenderer};
pub use writer::StreamingPdfWriter;
