//! Named style definitions and document defaults as delivered with the document tree.

use super::font::{FontStyle, FontWeight};
use super::parsers::parse_length;
use super::text::{Paint, TextAlign, TextDecoration};
use docview_types::StyleId;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Character formatting at one tier of the cascade. Every field is optional;
/// `None` means "not set here, inherit from the tier below".
#[derive(Deserialize, Serialize, Default, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RunStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, deserialize_with = "optional_length", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<TextDecoration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Paint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Paint>,
}

impl RunStyle {
    pub fn is_empty(&self) -> bool {
        *self == RunStyle::default()
    }

    /// Overlays the fields set in `higher` onto `self`.
    pub fn apply(&mut self, higher: &RunStyle) {
        if let Some(family) = &higher.font_family {
            self.font_family = Some(family.clone());
        }
        if higher.font_size.is_some() {
            self.font_size = higher.font_size;
        }
        if higher.font_weight.is_some() {
            self.font_weight = higher.font_weight;
        }
        if higher.font_style.is_some() {
            self.font_style = higher.font_style;
        }
        if higher.text_decoration.is_some() {
            self.text_decoration = higher.text_decoration;
        }
        if higher.color.is_some() {
            self.color = higher.color;
        }
        if higher.background.is_some() {
            self.background = higher.background;
        }
    }
}

/// A named paragraph style. `based_on` links to a parent paragraph style.
#[derive(Deserialize, Serialize, Default, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub based_on: Option<StyleId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    /// Line height as a multiple of the font size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
    #[serde(default, deserialize_with = "optional_length", skip_serializing_if = "Option::is_none")]
    pub space_after: Option<f32>,
    #[serde(default, skip_serializing_if = "RunStyle::is_empty")]
    pub run: RunStyle,
}

/// Document-level style information: defaults plus the named style tables.
#[derive(Deserialize, Serialize, Default, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Stylesheet {
    /// Theme / `docDefaults` run formatting.
    #[serde(default)]
    pub doc_defaults: RunStyle,
    #[serde(default)]
    pub default_paragraph_style: Option<StyleId>,
    #[serde(default)]
    pub paragraph_styles: HashMap<StyleId, ParagraphStyle>,
    #[serde(default)]
    pub character_styles: HashMap<StyleId, RunStyle>,
}

impl Stylesheet {
    pub fn paragraph_style(&self, id: &StyleId) -> Option<&ParagraphStyle> {
        self.paragraph_styles.get(id)
    }

    pub fn character_style(&self, id: &StyleId) -> Option<&RunStyle> {
        self.character_styles.get(id)
    }
}

fn optional_length<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum LengthDef {
        Num(f32),
        Str(String),
    }

    match Option::<LengthDef>::deserialize(deserializer)? {
        None => Ok(None),
        Some(LengthDef::Num(n)) => Ok(Some(n)),
        Some(LengthDef::Str(s)) => parse_length(&s).map(Some).map_err(de::Error::custom),
    }
}
