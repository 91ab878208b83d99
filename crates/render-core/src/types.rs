use crate::error::RenderError;
use docview_style::dimension::{Margins, PageSize};
use docview_style::text::TextDecoration;
use docview_types::{Color, Rect};

/// Page geometry and base font size of the export artifact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFormat {
    pub page_size: PageSize,
    pub margins: Margins,
    pub default_font_size: f32,
}

impl Default for PageFormat {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            margins: Margins::all(72.0),
            default_font_size: 12.0,
        }
    }
}

impl PageFormat {
    pub fn dimensions(&self) -> (f32, f32) {
        self.page_size.dimensions_pt()
    }

    pub fn content_width(&self) -> f32 {
        self.dimensions().0 - self.margins.horizontal()
    }

    pub fn content_height(&self) -> f32 {
        self.dimensions().1 - self.margins.vertical()
    }

    /// The printable area, top-left origin.
    pub fn content_rect(&self) -> Rect {
        Rect::new(
            self.margins.left,
            self.margins.top,
            self.content_width(),
            self.content_height(),
        )
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        let (w, h) = self.dimensions();
        if !(w > 0.0 && h > 0.0) {
            return Err(RenderError::InvalidPageFormat(format!(
                "page size must be positive, got {}x{}",
                w, h
            )));
        }
        let m = &self.margins;
        if [m.top, m.right, m.bottom, m.left].iter().any(|v| *v < 0.0) {
            return Err(RenderError::InvalidPageFormat(
                "margins must not be negative".to_string(),
            ));
        }
        if self.content_width() <= 0.0 || self.content_height() <= 0.0 {
            return Err(RenderError::InvalidPageFormat(
                "margins leave no room for content".to_string(),
            ));
        }
        if self.default_font_size <= 0.0 {
            return Err(RenderError::InvalidPageFormat(
                "default font size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// A finished, paginated export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

impl ExportArtifact {
    pub const MEDIA_TYPE: &'static str = "application/pdf";

    pub fn file_name(&self, stem: &str) -> String {
        format!("{}.pdf", stem)
    }
}

/// A face of one of the export surface's built-in font families.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontKey {
    pub family: String,
    pub bold: bool,
    pub italic: bool,
}

/// One positioned piece of text. `y` is the top of the line box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOp {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub font: FontKey,
    pub size: f32,
    pub color: Color,
    pub background: Option<Color>,
    pub decoration: TextDecoration,
    pub width: f32,
    pub href: Option<String>,
}

/// Drawing operations on a page, in points with a top-left origin.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text(TextOp),
    /// Stroked rectangle outline.
    Border { rect: Rect, color: Color, width: f32 },
    FillRect { rect: Rect, color: Color },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContent {
    pub ops: Vec<DrawOp>,
}

impl PageContent {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// All text on the page, in drawing order.
    pub fn text(&self) -> String {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text(t) => Some(t.text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
