use docview_types::Color;
use serde::{de, Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
    Justify,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    #[serde(alias = "strikethrough")]
    LineThrough,
}

/// A colour slot that distinguishes "explicitly no colour" from a colour.
///
/// Style records hold `Option<Paint>`: `None` means the attribute is unset and
/// inherits, `Some(Paint::None)` means it was set to none/auto at that tier.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum Paint {
    None,
    Solid(Color),
}

impl Paint {
    pub fn color(&self) -> Option<Color> {
        match self {
            Paint::None => None,
            Paint::Solid(c) => Some(*c),
        }
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

impl<'de> Deserialize<'de> for Paint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum PaintDef {
            Str(String),
            Color(Color),
        }

        match PaintDef::deserialize(deserializer)? {
            PaintDef::Str(s) => match s.trim().to_lowercase().as_str() {
                "none" | "auto" | "transparent" => Ok(Paint::None),
                _ => Color::parse_hex(&s).map(Paint::Solid).map_err(de::Error::custom),
            },
            PaintDef::Color(c) => Ok(Paint::Solid(c)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_keeps_explicit_none_apart_from_colors() {
        let p: Paint = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(p, Paint::None);
        let p: Paint = serde_json::from_str("\"FF0000\"").unwrap();
        assert_eq!(p, Paint::Solid(Color::rgb(255, 0, 0)));
        let p: Paint = serde_json::from_str(r#"{"r":0,"g":0,"b":255}"#).unwrap();
        assert_eq!(p.color(), Some(Color::rgb(0, 0, 255)));
    }

    #[test]
    fn decoration_accepts_strikethrough_alias() {
        let d: TextDecoration = serde_json::from_str("\"strikethrough\"").unwrap();
        assert_eq!(d, TextDecoration::LineThrough);
    }
}
