//! Style resolution: folds document defaults, paragraph styles, character
//! styles and direct formatting into one `EffectiveStyle` per run.

use crate::fonts::FontAvailability;
use docview_idf::{Paragraph, TextRun};
use docview_style::font::{FontStyle, FontWeight};
use docview_style::stylesheet::{RunStyle, Stylesheet};
use docview_style::text::{Paint, TextAlign, TextDecoration};
use docview_types::{Color, StyleId};
use std::collections::HashSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub const DEFAULT_FONT_FAMILY: &str = "Helvetica";
pub const DEFAULT_FONT_SIZE: f32 = 12.0;
pub const DEFAULT_LINE_HEIGHT: f32 = 1.2;

// Helper to hash floats
fn hash_f32<H: Hasher>(v: &f32, state: &mut H) {
    v.to_bits().hash(state);
}

/// Holds the resolved formatting. Separated from `EffectiveStyle` to enforce safe hashing.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveStyleData {
    /// Family to draw with, after fallback substitution.
    pub font_family: Arc<str>,
    /// Family the document asked for.
    pub requested_family: Arc<str>,
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub text_decoration: TextDecoration,
    pub color: Color,
    pub background: Option<Color>,
    pub text_align: TextAlign,
    /// Absolute line height in points.
    pub line_height: f32,
}

impl Default for EffectiveStyleData {
    fn default() -> Self {
        Self {
            font_family: Arc::from(DEFAULT_FONT_FAMILY),
            requested_family: Arc::from(DEFAULT_FONT_FAMILY),
            font_size: DEFAULT_FONT_SIZE,
            font_weight: FontWeight::Regular,
            font_style: FontStyle::Normal,
            text_decoration: TextDecoration::None,
            color: Color::BLACK,
            background: None,
            text_align: TextAlign::Left,
            line_height: DEFAULT_FONT_SIZE * DEFAULT_LINE_HEIGHT,
        }
    }
}

impl Eq for EffectiveStyleData {}

impl Hash for EffectiveStyleData {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.font_family.hash(state);
        self.requested_family.hash(state);
        hash_f32(&self.font_size, state);
        self.font_weight.hash(state);
        self.font_style.hash(state);
        self.text_decoration.hash(state);
        self.color.hash(state);
        self.background.hash(state);
        self.text_align.hash(state);
        hash_f32(&self.line_height, state);
    }
}

impl EffectiveStyleData {
    pub fn is_bold(&self) -> bool {
        self.font_weight.is_bold()
    }

    pub fn is_italic(&self) -> bool {
        self.font_style == FontStyle::Italic
    }

    pub fn was_substituted(&self) -> bool {
        self.font_family != self.requested_family
    }
}

/// A wrapper around style data that enforces hashing on construction.
#[derive(Debug, Clone)]
pub struct EffectiveStyle {
    pub inner: EffectiveStyleData,
    cached_hash: u64,
}

impl EffectiveStyle {
    pub fn new(data: EffectiveStyleData) -> Self {
        let mut s = DefaultHasher::new();
        data.hash(&mut s);
        Self {
            inner: data,
            cached_hash: s.finish(),
        }
    }
}

impl Default for EffectiveStyle {
    fn default() -> Self {
        Self::new(EffectiveStyleData::default())
    }
}

impl std::ops::Deref for EffectiveStyle {
    type Target = EffectiveStyleData;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Eq for EffectiveStyle {}

impl PartialEq for EffectiveStyle {
    fn eq(&self, other: &Self) -> bool {
        if self.cached_hash != other.cached_hash {
            return false;
        }
        self.inner == other.inner
    }
}

impl Hash for EffectiveStyle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cached_hash.hash(state);
    }
}

/// The paragraph tier, resolved once per paragraph and shared by its runs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParagraphContext {
    /// Run formatting contributed by the paragraph style chain.
    pub run: RunStyle,
    pub text_align: TextAlign,
    /// Line height as a multiple of font size.
    pub line_height: f32,
    pub space_after: f32,
}

/// Resolves styles against one document's stylesheet.
///
/// Resolution is a pure function of its inputs: the same run in the same
/// paragraph always yields an equal `EffectiveStyle`.
#[derive(Debug, Clone)]
pub struct StyleResolver<'a> {
    stylesheet: &'a Stylesheet,
    fonts: &'a FontAvailability,
}

impl<'a> StyleResolver<'a> {
    pub fn new(stylesheet: &'a Stylesheet, fonts: &'a FontAvailability) -> Self {
        Self { stylesheet, fonts }
    }

    /// Resolves the paragraph tier for `paragraph`. A paragraph without a
    /// style uses the document's default paragraph style, if any.
    pub fn paragraph_context(&self, paragraph: &Paragraph) -> ParagraphContext {
        let style_id = paragraph
            .style
            .as_ref()
            .or(self.stylesheet.default_paragraph_style.as_ref());

        let mut ctx = ParagraphContext {
            run: RunStyle::default(),
            text_align: TextAlign::Left,
            line_height: DEFAULT_LINE_HEIGHT,
            space_after: 0.0,
        };

        // Apply ancestors first so the most derived style wins.
        for id in self.style_chain(style_id).iter().rev() {
            let Some(style) = self.stylesheet.paragraph_style(id) else {
                continue;
            };
            ctx.run.apply(&style.run);
            if let Some(align) = style.text_align {
                ctx.text_align = align;
            }
            if let Some(lh) = style.line_height.filter(|lh| *lh > 0.0) {
                ctx.line_height = lh;
            }
            if let Some(space) = style.space_after {
                ctx.space_after = space.max(0.0);
            }
        }

        if let Some(align) = paragraph.align {
            ctx.text_align = align;
        }
        ctx
    }

    /// Walks `basedOn` links from `start`. Unknown ids and cycles end the walk.
    fn style_chain(&self, start: Option<&StyleId>) -> Vec<StyleId> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = start.cloned();
        while let Some(id) = current {
            if !seen.insert(id.clone()) {
                log::warn!("Paragraph style '{}' inherits from itself; chain truncated", id);
                break;
            }
            let Some(style) = self.stylesheet.paragraph_style(&id) else {
                log::debug!("Unknown paragraph style '{}'; using next tier", id);
                break;
            };
            current = style.based_on.clone();
            chain.push(id);
        }
        chain
    }

    /// Resolves one run: direct formatting > character style > paragraph
    /// chain > document defaults > built-in fallback.
    pub fn resolve_run(&self, ctx: &ParagraphContext, run: &TextRun) -> Arc<EffectiveStyle> {
        self.resolve_with(ctx, run.style.as_ref(), &run.format)
    }

    /// The style a run with no formatting of its own would get.
    pub fn resolve_plain(&self, ctx: &ParagraphContext) -> Arc<EffectiveStyle> {
        self.resolve_with(ctx, None, &RunStyle::default())
    }

    fn resolve_with(
        &self,
        ctx: &ParagraphContext,
        character_style: Option<&StyleId>,
        direct: &RunStyle,
    ) -> Arc<EffectiveStyle> {
        let mut merged = self.stylesheet.doc_defaults.clone();
        merged.apply(&ctx.run);
        if let Some(id) = character_style {
            match self.stylesheet.character_style(id) {
                Some(style) => merged.apply(style),
                None => log::debug!("Unknown character style '{}'; ignored", id),
            }
        }
        merged.apply(direct);
        Arc::new(EffectiveStyle::new(self.finish(merged, ctx)))
    }

    fn finish(&self, merged: RunStyle, ctx: &ParagraphContext) -> EffectiveStyleData {
        let fallback = EffectiveStyleData::default();
        let requested: Arc<str> = merged
            .font_family
            .filter(|f| !f.trim().is_empty())
            .map(Arc::from)
            .unwrap_or_else(|| fallback.font_family.clone());
        let font_family = Arc::from(self.fonts.resolve_family(&requested));
        let font_size = merged
            .font_size
            .filter(|s| *s > 0.0)
            .unwrap_or(fallback.font_size);

        EffectiveStyleData {
            font_family,
            requested_family: requested,
            font_size,
            font_weight: merged.font_weight.unwrap_or(fallback.font_weight),
            font_style: merged.font_style.unwrap_or(fallback.font_style),
            text_decoration: merged.text_decoration.unwrap_or(fallback.text_decoration),
            // Explicit none/auto means the default text colour, not "inherit".
            color: match merged.color {
                Some(Paint::Solid(c)) => c,
                Some(Paint::None) | None => fallback.color,
            },
            background: merged.background.and_then(|p| p.color()),
            text_align: ctx.text_align,
            line_height: font_size * ctx.line_height,
        }
    }
}
