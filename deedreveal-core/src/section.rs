//! Sections and phases
//!
//! Every metadata item is tagged with a [`SectionKey`]. Sections map one to
//! one onto auction phases through the [`SECTIONS`] table; an item tagged
//! `section_k` becomes visible once the auction reaches phase `k`.
//!
//! The phase itself is owned by the on-chain auction contract. This module
//! only interprets it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SectionError;

/// Section a metadata item belongs to, in phase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SectionKey {
    /// Public listing data, visible from the first phase
    #[serde(rename = "section_0")]
    Section0 = 0,
    /// Unlocked in phase 1
    #[serde(rename = "section_1")]
    Section1 = 1,
    /// Unlocked in phase 2
    #[serde(rename = "section_2")]
    Section2 = 2,
    /// Unlocked in the final phase
    #[serde(rename = "section_3")]
    Section3 = 3,
}

/// One row of the section table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionDef {
    /// Enum key
    pub key: SectionKey,
    /// Wire identifier used in metadata documents
    pub id: &'static str,
    /// Human-readable heading
    pub title: &'static str,
}

/// Ordered section table. Row `i` is the section unlocked by phase `i`.
pub const SECTIONS: [SectionDef; 4] = [
    SectionDef {
        key: SectionKey::Section0,
        id: "section_0",
        title: "Listing",
    },
    SectionDef {
        key: SectionKey::Section1,
        id: "section_1",
        title: "Property Details",
    },
    SectionDef {
        key: SectionKey::Section2,
        id: "section_2",
        title: "Inspection & Appraisal",
    },
    SectionDef {
        key: SectionKey::Section3,
        id: "section_3",
        title: "Closing Documents",
    },
];

/// Number of auction phases.
pub const TOTAL_PHASES: usize = SECTIONS.len();

/// Separators allowed between a section prefix and the rest of a media key.
const MEDIA_KEY_SEPARATORS: [char; 4] = ['_', '-', '/', '.'];

impl SectionKey {
    /// Returns the table row for this section.
    #[must_use]
    pub const fn def(self) -> SectionDef {
        SECTIONS[self as usize]
    }

    /// Position of the section in phase order.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Wire identifier, e.g. `"section_2"`.
    #[must_use]
    pub const fn id(self) -> &'static str {
        self.def().id
    }

    /// Human-readable heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        self.def().title
    }

    /// Looks up a section by its phase index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        SECTIONS.get(index).map(|def| def.key)
    }

    /// All sections in phase order.
    pub fn all() -> impl Iterator<Item = Self> {
        SECTIONS.iter().map(|def| def.key)
    }

    /// Derives a section from the media key naming convention.
    ///
    /// `section_1_tour.mp4`, `section_1/tour.mp4` and `section_1` all belong
    /// to `section_1`. Keys without a recognized prefix return `None`.
    #[must_use]
    pub fn from_media_key(key: &str) -> Option<Self> {
        let lower = key.trim().to_ascii_lowercase();
        SECTIONS
            .iter()
            .find(|def| {
                lower.strip_prefix(def.id).is_some_and(|rest| {
                    rest.is_empty() || rest.starts_with(MEDIA_KEY_SEPARATORS)
                })
            })
            .map(|def| def.key)
    }

    /// Returns the length of the section prefix on `key`, including the
    /// separator that follows it, if the key carries one.
    #[must_use]
    pub fn media_key_prefix_len(key: &str) -> Option<usize> {
        let section = Self::from_media_key(key)?;
        let leading = key.len() - key.trim_start().len();
        let prefix = leading + section.id().len();
        let separator = usize::from(key.len() > prefix);
        Some(prefix + separator)
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SectionKey {
    type Err = SectionError;

    /// Accepts `section_<k>` (any case) or the bare index `<k>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();

        if let Some(def) = SECTIONS.iter().find(|def| def.id == normalized) {
            return Ok(def.key);
        }

        if let Some(section) = normalized
            .parse::<usize>()
            .ok()
            .and_then(Self::from_index)
        {
            return Ok(section);
        }

        Err(SectionError::Unknown {
            input: s.to_string(),
            suggestion: suggest(&normalized),
        })
    }
}

/// Finds the closest section id within edit distance 2.
fn suggest(input: &str) -> Option<String> {
    SECTIONS
        .iter()
        .map(|def| (def.id, strsim::damerau_levenshtein(input, def.id)))
        .filter(|(_, distance)| *distance <= 2)
        .min_by_key(|(_, distance)| *distance)
        .map(|(id, _)| id.to_string())
}

// ============================================================================
// Phase
// ============================================================================

/// Current auction phase, always within `[0, TOTAL_PHASES - 1]`.
///
/// Out-of-range inputs are clamped to the nearest boundary rather than
/// rejected, so a display surface can always render something.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(from = "i64", into = "i64")]
pub struct Phase(usize);

impl Phase {
    /// The opening phase.
    pub const FIRST: Self = Self(0);

    /// The final phase.
    pub const LAST: Self = Self(TOTAL_PHASES - 1);

    /// Creates a phase, clamping indexes past the final phase.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        if index > Self::LAST.0 {
            Self::LAST
        } else {
            Self(index)
        }
    }

    /// Creates a phase from a raw, possibly out-of-range value.
    ///
    /// Negative values clamp to [`Phase::FIRST`], values past the end clamp
    /// to [`Phase::LAST`].
    #[must_use]
    pub fn clamped(raw: i64) -> Self {
        usize::try_from(raw.max(0)).map_or(Self::LAST, Self::new)
    }

    /// Zero-based phase index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }

    /// Whether items tagged with `section` are visible in this phase.
    #[must_use]
    pub const fn unlocks(self, section: SectionKey) -> bool {
        section.index() <= self.0
    }

    /// The section this phase unlocks last.
    #[must_use]
    pub const fn section(self) -> SectionKey {
        SECTIONS[self.0].key
    }
}

impl From<i64> for Phase {
    fn from(raw: i64) -> Self {
        Self::clamped(raw)
    }
}

impl From<Phase> for i64 {
    fn from(phase: Phase) -> Self {
        Self::try_from(phase.0).unwrap_or(Self::MAX)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The phase at which items tagged with `section` become visible.
#[must_use]
pub const fn unlock_phase(section: SectionKey) -> Phase {
    Phase(section.index())
}
