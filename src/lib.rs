//! Document viewer: loads a parsed word-processing document, shows it as a
//! zoomable, searchable display tree and exports it as a paginated PDF.
//!
//! The pipeline crates are re-exported so hosts only depend on `docview`.

pub mod callbacks;
pub mod config;
pub mod error;
pub mod parser;
pub mod search;
pub mod source;
pub mod surfaces;
pub mod viewer;
pub mod zoom;

pub use callbacks::{ActionOverride, ViewerCallbacks};
pub use config::{ExportConfig, ToolbarPosition, ViewerConfig, ZoomConfig};
pub use error::{ActionError, ConfigError, LoadError};
pub use parser::JsonDocumentParser;
pub use search::SearchState;
pub use source::DocumentSource;
pub use surfaces::{DirectorySurface, NoSurface};
pub use viewer::{
    ActionOutcome, BUILTIN_FAMILIES, DocumentViewer, LoadDiagnostics, ViewStatus, ViewerBuilder,
};
pub use zoom::{ZoomState, fit_to_width};

pub use docview_idf as idf;
pub use docview_layout as layout;
pub use docview_render_core as render_core;
pub use docview_render_display as display;
pub use docview_render_lopdf as pdf;
pub use docview_style as style;
pub use docview_traits as traits;
pub use docview_types as types;
