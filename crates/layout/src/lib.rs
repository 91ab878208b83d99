//! Document-model rendering core: style resolution, font registration,
//! visual node building and the text search index.

pub mod builder;
pub mod fonts;
pub mod nodes;
pub mod search;
pub mod style;
pub mod visual;

pub use self::builder::{
    BuildDiagnostics, BuildOutput, NoteRef, VisualNodeBuilder, build, build_with_fonts,
};
pub use self::fonts::{
    FontAvailability, FontRegistry, FontReport, RegistrationOutcome, deobfuscate,
    parse_obfuscation_key,
};
#[cfg(feature = "system-fonts")]
pub use self::fonts::FontdbRegistrar;
pub use self::nodes::build_notes_section;
pub use self::search::{EntryId, EntrySegment, MatchSpan, SearchEntry, SearchIndex};
pub use self::style::{EffectiveStyle, EffectiveStyleData, ParagraphContext, StyleResolver};
pub use self::visual::VisualNode;

#[cfg(test)]
mod builder_test;
#[cfg(test)]
mod test_utils;
