pub mod dimension;
pub mod font;
pub mod list;
pub mod parsers;
pub mod stylesheet;
pub mod text;

pub use dimension::{Margins, PageSize};
pub use font::{FontStyle, FontWeight};
pub use list::{ListKind, BULLET_MARKER};
pub use parsers::StyleParseError;
pub use stylesheet::{ParagraphStyle, RunStyle, Stylesheet};
pub use text::{Paint, TextAlign, TextDecoration};
