use serde::{de, Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
pub enum FontWeight {
    Light,
    #[default]
    Regular,
    Bold,
    Numeric(u16),
}

impl FontWeight {
    /// Returns the numeric weight value (100-900 scale).
    pub fn numeric_value(&self) -> u16 {
        match self {
            FontWeight::Light => 300,
            FontWeight::Regular => 400,
            FontWeight::Bold => 700,
            FontWeight::Numeric(n) => *n,
        }
    }

    pub fn is_bold(&self) -> bool {
        self.numeric_value() >= 600
    }

    fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "light" => Ok(FontWeight::Light),
            "regular" | "normal" => Ok(FontWeight::Regular),
            "bold" => Ok(FontWeight::Bold),
            _ => s
                .parse::<u16>()
                .map(FontWeight::Numeric)
                .map_err(|_| format!("Invalid font weight: '{}'", s)),
        }
    }
}

impl From<bool> for FontWeight {
    fn from(bold: bool) -> Self {
        if bold { FontWeight::Bold } else { FontWeight::Regular }
    }
}

impl<'de> Deserialize<'de> for FontWeight {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum FontWeightDef {
            Flag(bool),
            Str(String),
            Num(u16),
        }

        match FontWeightDef::deserialize(deserializer)? {
            FontWeightDef::Flag(b) => Ok(FontWeight::from(b)),
            FontWeightDef::Str(s) => Self::parse(&s).map_err(de::Error::custom),
            FontWeightDef::Num(n) => Ok(FontWeight::Numeric(n)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl From<bool> for FontStyle {
    fn from(italic: bool) -> Self {
        if italic { FontStyle::Italic } else { FontStyle::Normal }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_accepts_flags_names_and_numbers() {
        let w: FontWeight = serde_json::from_str("true").unwrap();
        assert_eq!(w, FontWeight::Bold);
        let w: FontWeight = serde_json::from_str("\"normal\"").unwrap();
        assert_eq!(w, FontWeight::Regular);
        let w: FontWeight = serde_json::from_str("650").unwrap();
        assert!(w.is_bold());
        assert!(serde_json::from_str::<FontWeight>("\"heavyish\"").is_err());
    }
}
