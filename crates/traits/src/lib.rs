pub mod font;
pub mod notes;
pub mod parser;
pub mod surface;

pub use font::{
    FontDescriptor, FontError, FontRegistrar, InMemoryFontRegistrar, RegistrationHandle,
    SharedFontData, looks_like_font,
};
pub use notes::NoteLookup;
pub use parser::{DocumentParser, ParseError};
pub use surface::{
    DownloadSurface, PrintSurface, RecordingSurface, ShareSurface, SurfaceError, SurfaceKind,
};
