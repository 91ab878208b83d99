use docview_render_core::utils::flip_y;
use docview_render_core::{DrawOp, FontKey, PageContent, TextOp};
use docview_style::text::TextDecoration;
use docview_types::{Color, Rect};
use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};
use std::collections::BTreeMap;

/// Fraction of the font size from the top of the line box to the baseline.
const ASCENT: f32 = 0.8;

/// Translates one laid-out page into PDF content stream operations.
///
/// `font_map` maps each face to its resource name; faces missing from it
/// fall back to the first entry.
pub fn render_page_to_content(
    page: &PageContent,
    page_height: f32,
    font_map: &BTreeMap<FontKey, String>,
) -> Content {
    let mut ctx = PageContext::new(page_height, font_map);
    for op in &page.ops {
        ctx.draw(op);
    }
    ctx.finish()
}

struct PageContext<'a> {
    page_height: f32,
    content: Content,
    state: RenderState,
    font_map: &'a BTreeMap<FontKey, String>,
}

#[derive(Default, Clone, PartialEq)]
struct RenderState {
    font_name: String,
    font_size: f32,
    fill_color: Option<Color>,
}

impl<'a> PageContext<'a> {
    fn new(page_height: f32, font_map: &'a BTreeMap<FontKey, String>) -> Self {
        Self {
            page_height,
            content: Content { operations: vec![] },
            state: RenderState::default(),
            font_map,
        }
    }

    fn finish(self) -> Content {
        self.content
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }

    fn draw(&mut self, op: &DrawOp) {
        match op {
            DrawOp::Text(text) => self.draw_text(text),
            DrawOp::FillRect { rect, color } => self.fill_rect(*rect, *color),
            DrawOp::Border { rect, color, width } => self.stroke_rect(*rect, *color, *width),
        }
    }

    fn pdf_rect(&self, rect: Rect) -> Vec<Object> {
        vec![
            rect.x.into(),
            flip_y(rect.bottom(), self.page_height).into(),
            rect.width.into(),
            rect.height.into(),
        ]
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.set_fill_color(color);
        let operands = self.pdf_rect(rect);
        self.push("re", operands);
        self.push("f", vec![]);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        let (r, g, b) = color.unit_rgb();
        self.push("w", vec![width.into()]);
        self.push("RG", vec![r.into(), g.into(), b.into()]);
        let operands = self.pdf_rect(rect);
        self.push("re", operands);
        self.push("S", vec![]);
    }

    fn set_fill_color(&mut self, color: Color) {
        if self.state.fill_color != Some(color) {
            let (r, g, b) = color.unit_rgb();
            self.push("rg", vec![r.into(), g.into(), b.into()]);
            self.state.fill_color = Some(color);
        }
    }

    fn set_font(&mut self, font: &FontKey, size: f32) {
        let internal = self
            .font_map
            .get(font)
            .or_else(|| self.font_map.values().next())
            .cloned()
            .unwrap_or_else(|| "F1".to_string());
        if self.state.font_name != internal || self.state.font_size != size {
            self.push(
                "Tf",
                vec![Object::Name(internal.as_bytes().to_vec()), size.into()],
            );
            self.state.font_name = internal;
            self.state.font_size = size;
        }
    }

    fn draw_text(&mut self, text: &TextOp) {
        if let Some(bg) = text.background {
            self.fill_rect(Rect::new(text.x, text.y, text.width, text.size * 1.2), bg);
        }
        if text.text.trim().is_empty() {
            return;
        }

        let baseline_y = text.y + text.size * ASCENT;
        self.push("BT", vec![]);
        self.set_font(&text.font, text.size);
        self.set_fill_color(text.color);
        self.push(
            "Td",
            vec![text.x.into(), flip_y(baseline_y, self.page_height).into()],
        );
        self.push(
            "Tj",
            vec![Object::String(to_win_ansi(&text.text), StringFormat::Literal)],
        );
        self.push("ET", vec![]);

        let line_y = match text.decoration {
            TextDecoration::None => return,
            TextDecoration::Underline => baseline_y + text.size * 0.1,
            TextDecoration::LineThrough => baseline_y - text.size * 0.3,
        };
        let (r, g, b) = text.color.unit_rgb();
        let pdf_y = flip_y(line_y, self.page_height);
        self.push("w", vec![(text.size / 18.0).into()]);
        self.push("RG", vec![r.into(), g.into(), b.into()]);
        self.push("m", vec![text.x.into(), pdf_y.into()]);
        self.push("l", vec![(text.x + text.width).into(), pdf_y.into()]);
        self.push("S", vec![]);
    }
}

/// Encodes text for the built-in fonts' WinAnsi encoding. Characters with no
/// WinAnsi code become `?`.
pub fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\t' | '\n' | '\r' => b' ',
            c if (c as u32) < 0x20 => b' ',
            c if (c as u32) <= 0xFF => c as u8,
            _ => b'?',
        })
        .collect()
}
