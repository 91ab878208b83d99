//! Newtype wrappers for the string identifiers that flow through a document.
//!
//! A note id, a style id and a font family name are all strings in the source
//! document; wrapping them keeps a style id from being looked up in the note map.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(id: impl Into<Arc<str>>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s.into())
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.into())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a footnote or endnote.
    NoteId
);

string_id!(
    /// Identifier of a named paragraph or character style.
    StyleId
);

string_id!(
    /// A font family name as referenced by runs and embedded font records.
    FamilyName
);

impl FamilyName {
    /// Case-insensitive key used by font caches.
    pub fn cache_key(&self) -> String {
        self.0.to_lowercase()
    }
}
