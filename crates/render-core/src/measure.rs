//! Text measurement for line breaking.

use docview_layout::EffectiveStyle;

/// Measures the advance width of `text` set in `style`, in points.
pub trait TextMeasurer: Send + Sync {
    fn measure(&self, text: &str, style: &EffectiveStyle) -> f32;
}

/// Approximates widths from per-character classes of a sans-serif face.
#[derive(Debug, Clone, Copy)]
pub struct AverageWidthMeasurer {
    /// Widening factor for bold faces.
    pub bold_factor: f32,
}

impl Default for AverageWidthMeasurer {
    fn default() -> Self {
        Self { bold_factor: 1.06 }
    }
}

impl AverageWidthMeasurer {
    fn char_em(c: char) -> f32 {
        match c {
            ' ' => 0.278,
            'i' | 'j' | 'l' | '.' | ',' | ';' | ':' | '!' | '|' | '\'' => 0.25,
            'f' | 't' | 'r' | '(' | ')' | '-' => 0.35,
            'm' | 'w' | 'M' | 'W' => 0.83,
            '0'..='9' => 0.556,
            c if c.is_uppercase() => 0.667,
            '\t' => 1.0,
            _ => 0.5,
        }
    }
}

impl TextMeasurer for AverageWidthMeasurer {
    fn measure(&self, text: &str, style: &EffectiveStyle) -> f32 {
        let ems: f32 = text.chars().map(Self::char_em).sum();
        let factor = if style.is_bold() { self.bold_factor } else { 1.0 };
        ems * style.font_size * factor
    }
}
