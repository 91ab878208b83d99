//! Font registration bridge.
//!
//! Embedded fonts arrive as raw bytes plus an optional GUID-form key. This
//! module undoes the OOXML obfuscation, hands the bytes to an injected
//! `FontRegistrar`, and remembers which families were registered so repeated
//! registrations are no-ops.
//!
//! ## Platform Abstraction
//!
//! The registrar can be:
//! - **System fonts** (feature: `system-fonts`): `FontdbRegistrar`, backed by fontdb
//! - **Provider mode**: any `FontRegistrar`, e.g. `InMemoryFontRegistrar` in tests

use docview_idf::EmbeddedFont;
use docview_style::font::{FontStyle, FontWeight};
use docview_traits::{FontDescriptor, FontError, FontRegistrar, RegistrationHandle};
use docview_types::FamilyName;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Length of the obfuscated prefix of an embedded font.
pub const OBFUSCATED_PREFIX_LEN: usize = 32;

/// Parses a `{XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX}` key into the 16-byte XOR
/// schedule: the GUID's hex byte pairs, last pair first.
pub fn parse_obfuscation_key(key: &str) -> Result<[u8; 16], FontError> {
    let hex: String = key
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | '-'))
        .collect();
    if hex.len() != 32 || !hex.is_ascii() {
        return Err(FontError::InvalidKey(key.to_string()));
    }

    let mut bytes = [0u8; 16];
    for (i, byte) in bytes.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
            .map_err(|_| FontError::InvalidKey(key.to_string()))?;
    }
    bytes.reverse();
    Ok(bytes)
}

/// XORs the first 32 bytes of `data` with the key schedule, in place.
/// The operation is its own inverse.
pub fn deobfuscate(data: &mut [u8], key: &[u8; 16]) {
    for (i, byte) in data.iter_mut().take(OBFUSCATED_PREFIX_LEN).enumerate() {
        *byte ^= key[i % key.len()];
    }
}

/// Result of one registration request.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationOutcome {
    Registered(RegistrationHandle),
    /// The face was registered by an earlier call.
    AlreadyRegistered(RegistrationHandle),
    Failed(FontError),
}

impl RegistrationOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, RegistrationOutcome::Failed(_))
    }

    pub fn handle(&self) -> Option<RegistrationHandle> {
        match self {
            RegistrationOutcome::Registered(h) | RegistrationOutcome::AlreadyRegistered(h) => {
                Some(*h)
            }
            RegistrationOutcome::Failed(_) => None,
        }
    }
}

/// Summary of registering every embedded font of one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontReport {
    pub registered: Vec<FamilyName>,
    pub failed: Vec<(FamilyName, FontError)>,
}

/// Key for the registration cache: family plus face variant.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct FaceKey {
    family: String,
    bold: bool,
    italic: bool,
}

impl FaceKey {
    fn new(descriptor: &FontDescriptor) -> Self {
        Self {
            family: descriptor.family.cache_key(),
            bold: descriptor.weight.is_bold(),
            italic: descriptor.style == FontStyle::Italic,
        }
    }
}

type Slot = Arc<Mutex<Option<RegistrationHandle>>>;

/// Process-wide registration record over an injected registrar.
///
/// The record is kept per face: family (case-insensitive), bold and italic.
/// Registering a face that already succeeded is a no-op, while the bold or
/// italic face of a registered family still reaches the registrar.
/// Calls for different faces proceed in parallel; calls for the same face
/// serialize on that face's slot.
#[derive(Debug, Clone)]
pub struct FontRegistry {
    registrar: Arc<dyn FontRegistrar>,
    slots: Arc<Mutex<HashMap<FaceKey, Slot>>>,
}

impl FontRegistry {
    pub fn new(registrar: Arc<dyn FontRegistrar>) -> Self {
        Self {
            registrar,
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn registrar(&self) -> &Arc<dyn FontRegistrar> {
        &self.registrar
    }

    /// Registers the regular face of `family`.
    pub fn register(
        &self,
        family: &FamilyName,
        raw: &[u8],
        obfuscation_key: Option<&str>,
    ) -> RegistrationOutcome {
        self.register_face(&FontDescriptor::regular(family.clone()), raw, obfuscation_key)
    }

    pub fn register_embedded(&self, font: &EmbeddedFont) -> RegistrationOutcome {
        let descriptor = FontDescriptor {
            family: font.family.clone(),
            weight: FontWeight::from(font.bold),
            style: FontStyle::from(font.italic),
        };
        self.register_face(&descriptor, &font.data, font.obfuscation_key.as_deref())
    }

    pub fn register_face(
        &self,
        descriptor: &FontDescriptor,
        raw: &[u8],
        obfuscation_key: Option<&str>,
    ) -> RegistrationOutcome {
        let slot = match self.slot(FaceKey::new(descriptor)) {
            Ok(slot) => slot,
            Err(e) => return RegistrationOutcome::Failed(e),
        };
        let Ok(mut registered) = slot.lock() else {
            return RegistrationOutcome::Failed(FontError::Rejected {
                family: descriptor.family.to_string(),
                message: "registration slot lock poisoned".to_string(),
            });
        };
        if let Some(handle) = *registered {
            log::debug!("Font '{}' already registered", descriptor.family);
            return RegistrationOutcome::AlreadyRegistered(handle);
        }

        let data = match prepare_font_data(descriptor, raw, obfuscation_key) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("Font '{}' unusable: {}", descriptor.family, e);
                return RegistrationOutcome::Failed(e);
            }
        };

        match self.registrar.register(descriptor, Arc::new(data)) {
            Ok(handle) => {
                log::debug!(
                    "Registered font '{}' with {} ({:?})",
                    descriptor.family,
                    self.registrar.name(),
                    handle
                );
                *registered = Some(handle);
                RegistrationOutcome::Registered(handle)
            }
            Err(e) => {
                log::warn!("Font '{}' registration failed: {}", descriptor.family, e);
                RegistrationOutcome::Failed(e)
            }
        }
    }

    /// Registers every embedded font; failures are collected, never raised.
    pub fn register_all(&self, fonts: &[EmbeddedFont]) -> FontReport {
        let mut report = FontReport::default();
        for font in fonts {
            match self.register_embedded(font) {
                RegistrationOutcome::Failed(e) => report.failed.push((font.family.clone(), e)),
                _ => {
                    if !report.registered.contains(&font.family) {
                        report.registered.push(font.family.clone());
                    }
                }
            }
        }
        report
    }

    pub fn is_registered(&self, family: &str) -> bool {
        let key = family.to_lowercase();
        self.slots
            .lock()
            .map(|slots| {
                slots.iter().any(|(k, slot)| {
                    k.family == key && slot.lock().map(|s| s.is_some()).unwrap_or(false)
                })
            })
            .unwrap_or(false)
    }

    /// Snapshot of what the host can draw, for fallback substitution.
    pub fn availability(&self, fallbacks: &[String]) -> FontAvailability {
        FontAvailability::new(self.registrar.list_families(), fallbacks.to_vec())
    }

    fn slot(&self, key: FaceKey) -> Result<Slot, FontError> {
        let mut slots = self.slots.lock().map_err(|_| FontError::Rejected {
            family: key.family.clone(),
            message: "font registry lock poisoned".to_string(),
        })?;
        Ok(slots.entry(key).or_default().clone())
    }
}

fn prepare_font_data(
    descriptor: &FontDescriptor,
    raw: &[u8],
    obfuscation_key: Option<&str>,
) -> Result<Vec<u8>, FontError> {
    let mut data = raw.to_vec();
    if let Some(key) = obfuscation_key {
        let schedule = parse_obfuscation_key(key)?;
        if data.len() < OBFUSCATED_PREFIX_LEN {
            return Err(FontError::InvalidData {
                family: descriptor.family.to_string(),
                message: format!("{} bytes is shorter than the obfuscated prefix", data.len()),
            });
        }
        deobfuscate(&mut data, &schedule);
    }
    if data.is_empty() {
        return Err(FontError::InvalidData {
            family: descriptor.family.to_string(),
            message: "empty font program".to_string(),
        });
    }
    Ok(data)
}

/// Which families can be drawn, and what to use when one cannot.
#[derive(Debug, Clone, Default)]
pub struct FontAvailability {
    /// `None` accepts every family as-is.
    available: Option<HashSet<String>>,
    fallbacks: Vec<String>,
}

impl FontAvailability {
    pub fn new<I, S>(available: I, fallbacks: Vec<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            available: Some(
                available
                    .into_iter()
                    .map(|f| f.as_ref().to_lowercase())
                    .collect(),
            ),
            fallbacks,
        }
    }

    /// Treats every family as available.
    pub fn permissive() -> Self {
        Self::default()
    }

    pub fn is_available(&self, family: &str) -> bool {
        self.available
            .as_ref()
            .is_none_or(|set| set.contains(&family.to_lowercase()))
    }

    /// The requested family if drawable, else the first drawable fallback,
    /// else the first fallback.
    pub fn resolve_family<'a>(&'a self, requested: &'a str) -> &'a str {
        if self.is_available(requested) {
            return requested;
        }
        self.fallbacks
            .iter()
            .find(|f| self.is_available(f))
            .or_else(|| self.fallbacks.first())
            .map(String::as_str)
            .unwrap_or(requested)
    }
}

/// Registrar backed by a fontdb database.
///
/// Only available with the `system-fonts` feature enabled.
#[cfg(feature = "system-fonts")]
pub struct FontdbRegistrar {
    db: std::sync::RwLock<fontdb::Database>,
    aliases: std::sync::RwLock<HashSet<String>>,
}

#[cfg(feature = "system-fonts")]
impl std::fmt::Debug for FontdbRegistrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontdbRegistrar")
            .field("faces", &self.db.read().map(|db| db.len()).unwrap_or(0))
            .finish()
    }
}

#[cfg(feature = "system-fonts")]
impl Default for FontdbRegistrar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "system-fonts")]
impl FontdbRegistrar {
    pub fn new() -> Self {
        Self {
            db: std::sync::RwLock::new(fontdb::Database::new()),
            aliases: std::sync::RwLock::new(HashSet::new()),
        }
    }

    /// Loads the host's installed fonts so they count as available.
    pub fn with_system_fonts(self) -> Self {
        if let Ok(mut db) = self.db.write() {
            db.load_system_fonts();
            log::debug!("Loaded {} system font faces", db.len());
        }
        self
    }
}

#[cfg(feature = "system-fonts")]
impl FontRegistrar for FontdbRegistrar {
    fn register(
        &self,
        descriptor: &FontDescriptor,
        data: docview_traits::SharedFontData,
    ) -> Result<RegistrationHandle, FontError> {
        let family = descriptor.family.to_string();
        let mut db = self.db.write().map_err(|_| FontError::Rejected {
            family: family.clone(),
            message: "fontdb lock poisoned".to_string(),
        })?;
        let ids = db.load_font_source(fontdb::Source::Binary(data));
        if ids.is_empty() {
            return Err(FontError::InvalidData {
                family,
                message: "fontdb found no faces".to_string(),
            });
        }
        let handle = RegistrationHandle(db.len() as u64);
        drop(db);

        if let Ok(mut aliases) = self.aliases.write() {
            aliases.insert(descriptor.family.cache_key());
        }
        Ok(handle)
    }

    fn has_family(&self, family: &str) -> bool {
        let key = family.to_lowercase();
        self.list_families().contains(&key)
    }

    fn list_families(&self) -> Vec<String> {
        let mut families: Vec<String> = self
            .aliases
            .read()
            .map(|a| a.iter().cloned().collect())
            .unwrap_or_default();
        if let Ok(db) = self.db.read() {
            for face in db.faces() {
                families.extend(face.families.iter().map(|(name, _)| name.to_lowercase()));
            }
        }
        families.sort();
        families.dedup();
        families
    }

    fn name(&self) -> &'static str {
        "fontdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docview_traits::InMemoryFontRegistrar;

    const KEY: &str = "{00112233-4455-6677-8899-AABBCCDDEEFF}";

    fn ttf() -> Vec<u8> {
        let mut data = vec![0x00, 0x01, 0x00, 0x00];
        data.extend((4u8..64).collect::<Vec<_>>());
        data
    }

    fn obfuscated(data: &[u8]) -> Vec<u8> {
        let mut out = data.to_vec();
        deobfuscate(&mut out, &parse_obfuscation_key(KEY).unwrap());
        out
    }

    #[test]
    fn key_schedule_reverses_guid_bytes() {
        let key = parse_obfuscation_key(KEY).unwrap();
        assert_eq!(key[0], 0xFF);
        assert_eq!(key[15], 0x00);
        assert!(parse_obfuscation_key("{not-a-guid}").is_err());
    }

    #[test]
    fn deobfuscation_touches_only_the_prefix() {
        let data = ttf();
        let scrambled = obfuscated(&data);
        assert_ne!(scrambled[..32], data[..32]);
        assert_eq!(scrambled[32..], data[32..]);
        assert_eq!(obfuscated(&scrambled), data);
    }

    #[test]
    fn obfuscated_font_registers_after_recovery() {
        let registrar = Arc::new(InMemoryFontRegistrar::new());
        let registry = FontRegistry::new(registrar.clone());
        let outcome = registry.register(&FamilyName::new("Foo"), &obfuscated(&ttf()), Some(KEY));
        assert!(matches!(outcome, RegistrationOutcome::Registered(_)));
        assert_eq!(registrar.face_data("Foo").unwrap().as_slice(), ttf().as_slice());
    }

    #[test]
    fn repeated_registration_is_a_no_op() {
        let registrar = Arc::new(InMemoryFontRegistrar::new());
        let registry = FontRegistry::new(registrar.clone());
        let first = registry.register(&FamilyName::new("Foo"), &ttf(), None);
        let second = registry.register(&FamilyName::new("foo"), &ttf(), None);
        assert!(first.is_success() && second.is_success());
        assert!(matches!(second, RegistrationOutcome::AlreadyRegistered(_)));
        assert_eq!(first.handle(), second.handle());
        assert_eq!(registrar.face_count("Foo"), 1);
        assert_eq!(registrar.call_count(), 1);
    }

    #[test]
    fn each_face_of_a_family_registers_once() {
        let registrar = Arc::new(InMemoryFontRegistrar::new());
        let registry = FontRegistry::new(registrar.clone());
        let bold = FontDescriptor {
            weight: FontWeight::Bold,
            ..FontDescriptor::regular(FamilyName::new("Foo"))
        };
        let regular = registry.register(&FamilyName::new("Foo"), &ttf(), None);
        let bold_first = registry.register_face(&bold, &ttf(), None);
        let bold_again = registry.register_face(&bold, &ttf(), None);

        assert!(matches!(regular, RegistrationOutcome::Registered(_)));
        assert!(matches!(bold_first, RegistrationOutcome::Registered(_)));
        assert!(matches!(bold_again, RegistrationOutcome::AlreadyRegistered(_)));
        assert_ne!(regular.handle(), bold_first.handle());
        assert_eq!(registrar.call_count(), 2);
    }

    #[test]
    fn failure_leaves_family_unregistered_and_retryable() {
        let registrar = Arc::new(InMemoryFontRegistrar::new());
        let registry = FontRegistry::new(registrar.clone());
        registrar.reject_family("Foo");
        assert!(!registry.register(&FamilyName::new("Foo"), &ttf(), None).is_success());
        assert!(!registry.is_registered("Foo"));
        registrar.accept_family("Foo");
        assert!(registry.register(&FamilyName::new("Foo"), &ttf(), None).is_success());
        assert!(registry.is_registered("Foo"));
    }

    #[test]
    fn bad_key_and_short_data_fail_without_panicking() {
        let registry = FontRegistry::new(Arc::new(InMemoryFontRegistrar::new()));
        let outcome = registry.register(&FamilyName::new("A"), &ttf(), Some("xyz"));
        assert!(matches!(outcome, RegistrationOutcome::Failed(FontError::InvalidKey(_))));
        let outcome = registry.register(&FamilyName::new("B"), &[0, 1, 0, 0], Some(KEY));
        assert!(matches!(outcome, RegistrationOutcome::Failed(FontError::InvalidData { .. })));
    }

    #[test]
    fn concurrent_registration_of_one_family_registers_once() {
        let registrar = Arc::new(InMemoryFontRegistrar::new());
        let registry = FontRegistry::new(registrar.clone());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    let family = if i % 2 == 0 { "Shared" } else { "Other" };
                    registry.register(&FamilyName::new(family), &ttf(), None).is_success()
                })
            })
            .collect();
        for h in handles {
            assert!(h.join().unwrap());
        }
        assert_eq!(registrar.face_count("Shared"), 1);
        assert_eq!(registrar.face_count("Other"), 1);
    }

    #[test]
    fn availability_substitutes_missing_families() {
        let fallbacks = vec!["Helvetica".to_string(), "Arial".to_string()];
        let fonts = FontAvailability::new(["arial", "Foo"], fallbacks);
        assert_eq!(fonts.resolve_family("foo"), "foo");
        assert_eq!(fonts.resolve_family("Missing"), "Arial");
        let none = FontAvailability::new(Vec::<String>::new(), vec!["Helvetica".into()]);
        assert_eq!(none.resolve_family("Missing"), "Helvetica");
        assert_eq!(FontAvailability::permissive().resolve_family("Anything"), "Anything");
    }
}
