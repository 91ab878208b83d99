//! FontRegistrar trait for handing font programs to the host text surface.
//!
//! The pipeline never decodes fonts itself. It passes de-obfuscated bytes to a
//! registrar, which owns whatever the host needs to draw with them.

use docview_style::font::{FontStyle, FontWeight};
use docview_types::FamilyName;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Error type for font registration. Never fatal to a document load.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FontError {
    #[error("Invalid font data for '{family}': {message}")]
    InvalidData { family: String, message: String },

    #[error("Font surface rejected '{family}': {message}")]
    Rejected { family: String, message: String },

    #[error("Invalid obfuscation key: {0}")]
    InvalidKey(String),
}

/// Shared font data type (reference-counted bytes).
pub type SharedFontData = Arc<Vec<u8>>;

/// Opaque token returned by a successful registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationHandle(pub u64);

/// Describes the face being registered.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    pub family: FamilyName,
    pub weight: FontWeight,
    pub style: FontStyle,
}

impl FontDescriptor {
    pub fn regular(family: impl Into<FamilyName>) -> Self {
        Self {
            family: family.into(),
            weight: FontWeight::Regular,
            style: FontStyle::Normal,
        }
    }
}

/// A host text-rendering surface that can accept font programs.
///
/// Implementations must be safe to call from several threads; callers
/// serialize calls for the same family themselves.
pub trait FontRegistrar: Send + Sync + Debug {
    /// Registers one face. The bytes are already de-obfuscated.
    fn register(
        &self,
        descriptor: &FontDescriptor,
        data: SharedFontData,
    ) -> Result<RegistrationHandle, FontError>;

    /// Whether text in `family` can be drawn, matched case-insensitively.
    fn has_family(&self, family: &str) -> bool;

    /// All family names the surface can draw.
    fn list_families(&self) -> Vec<String>;

    /// Returns a human-readable name for this registrar (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// Checks the sfnt version tag at the start of a font program.
pub fn looks_like_font(data: &[u8]) -> bool {
    matches!(
        data.get(0..4),
        Some([0x00, 0x01, 0x00, 0x00]) | Some(b"OTTO") | Some(b"true") | Some(b"ttcf") | Some(b"wOFF")
    )
}

/// An in-memory registrar.
///
/// Accepts anything carrying a valid sfnt tag, records every call, and can be
/// told to reject particular families. Works anywhere, including tests.
#[derive(Debug, Default)]
pub struct InMemoryFontRegistrar {
    faces: RwLock<HashMap<String, Vec<SharedFontData>>>,
    builtin: HashSet<String>,
    rejected: RwLock<HashSet<String>>,
    next_handle: AtomicU64,
    calls: AtomicUsize,
}

impl InMemoryFontRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registrar whose surface already knows the given families.
    pub fn with_builtin<I, S>(families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            builtin: families
                .into_iter()
                .map(|f| f.as_ref().to_lowercase())
                .collect(),
            ..Default::default()
        }
    }

    /// Makes every later registration of `family` fail with `FontError::Rejected`.
    pub fn reject_family(&self, family: &str) {
        if let Ok(mut rejected) = self.rejected.write() {
            rejected.insert(family.to_lowercase());
        }
    }

    /// Stops rejecting `family`.
    pub fn accept_family(&self, family: &str) {
        if let Ok(mut rejected) = self.rejected.write() {
            rejected.remove(&family.to_lowercase());
        }
    }

    /// Number of `register` calls received, successful or not.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of faces stored for `family`.
    ///
    /// Returns 0 if the lock is poisoned.
    pub fn face_count(&self, family: &str) -> usize {
        self.faces
            .read()
            .map(|f| f.get(&family.to_lowercase()).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    /// The bytes stored for the first face of `family`.
    pub fn face_data(&self, family: &str) -> Option<SharedFontData> {
        self.faces
            .read()
            .ok()?
            .get(&family.to_lowercase())?
            .first()
            .cloned()
    }
}

impl FontRegistrar for InMemoryFontRegistrar {
    fn register(
        &self,
        descriptor: &FontDescriptor,
        data: SharedFontData,
    ) -> Result<RegistrationHandle, FontError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let family = descriptor.family.as_str().to_string();
        let key = descriptor.family.cache_key();

        let rejected = self
            .rejected
            .read()
            .map(|r| r.contains(&key))
            .unwrap_or(false);
        if rejected {
            return Err(FontError::Rejected {
                family,
                message: "family refused by surface".to_string(),
            });
        }
        if !looks_like_font(&data) {
            return Err(FontError::InvalidData {
                family,
                message: "missing sfnt version tag".to_string(),
            });
        }

        let mut faces = self.faces.write().map_err(|_| FontError::Rejected {
            family: family.clone(),
            message: "font store lock poisoned".to_string(),
        })?;
        faces.entry(key).or_default().push(data);
        Ok(RegistrationHandle(
            self.next_handle.fetch_add(1, Ordering::SeqCst) + 1,
        ))
    }

    fn has_family(&self, family: &str) -> bool {
        let key = family.to_lowercase();
        self.builtin.contains(&key)
            || self
                .faces
                .read()
                .map(|f| f.contains_key(&key))
                .unwrap_or(false)
    }

    fn list_families(&self) -> Vec<String> {
        let mut families: Vec<String> = self.builtin.iter().cloned().collect();
        if let Ok(faces) = self.faces.read() {
            families.extend(faces.keys().cloned());
        }
        families.sort();
        families.dedup();
        families
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}
