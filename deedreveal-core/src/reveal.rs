//! Phase reveal engine
//!
//! Decides which traits, media and documents of a listing are visible for
//! a given auction phase. Every function here is a pure function of
//! `(metadata, phase)`: nothing is cached and nothing is mutated, so the
//! result is recomputed from scratch on every call.
//!
//! Filtering by section and checking whether a section is revealed are
//! deliberately separate operations. [`RevealView`] combines them for
//! presentation code.

use serde::{Deserialize, Serialize};

use crate::metadata::{AuctionMetadata, DocumentItem, MediaItem, Trait};
use crate::section::{Phase, SectionKey, unlock_phase};

/// Whether items tagged with `section` are visible at `current_phase`.
///
/// `current_phase` is clamped to `[0, TOTAL_PHASES - 1]` first, so
/// negative phases behave like phase 0 and phases past the end behave
/// like the final phase.
#[must_use]
pub fn is_section_revealed(section: SectionKey, current_phase: i64) -> bool {
    Phase::clamped(current_phase).unlocks(section)
}

/// Traits tagged with `section`, in document order. Ignores reveal state.
#[must_use]
pub fn traits_for_section(metadata: &AuctionMetadata, section: SectionKey) -> Vec<&Trait> {
    metadata
        .traits
        .iter()
        .filter(|t| t.section == section)
        .collect()
}

/// Media items tagged with `section`, in document order. Ignores reveal state.
#[must_use]
pub fn media_for_section(metadata: &AuctionMetadata, section: SectionKey) -> Vec<&MediaItem> {
    metadata
        .media
        .values()
        .filter(|m| m.section == section)
        .collect()
}

/// Documents tagged with `section`, in document order. Ignores reveal state.
#[must_use]
pub fn documents_for_section(
    metadata: &AuctionMetadata,
    section: SectionKey,
) -> Vec<&DocumentItem> {
    metadata
        .documents
        .iter()
        .filter(|d| d.section == section)
        .collect()
}

/// How locked sections are represented in a [`RevealView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum RevealMode {
    /// Locked sections carry item counts only.
    #[default]
    Redacted,
    /// Locked sections carry their items too, still flagged as locked.
    Full,
}

/// Item counts for one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SectionCounts {
    /// Number of traits
    pub traits: usize,
    /// Number of media items
    pub media: usize,
    /// Number of documents
    pub documents: usize,
}

impl SectionCounts {
    /// Total items in the section.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.traits + self.media + self.documents
    }
}

/// One section of a listing, classified for a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionView {
    /// Section key
    pub section: SectionKey,
    /// Section heading
    pub title: String,
    /// Phase at which the section unlocks
    pub unlocks_at: Phase,
    /// Whether the section is visible in the viewed phase
    pub revealed: bool,
    /// Item counts, present even when items are redacted
    pub counts: SectionCounts,
    /// Traits (empty when redacted)
    pub traits: Vec<Trait>,
    /// Media items (empty when redacted)
    pub media: Vec<MediaItem>,
    /// Documents (empty when redacted)
    pub documents: Vec<DocumentItem>,
}

/// Every section of a listing, classified for one phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealView {
    /// Listing name
    pub name: String,
    /// Listing description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Phase the view was computed for, after clamping
    pub phase: Phase,
    /// Representation used for locked sections
    pub mode: RevealMode,
    /// One entry per section, in phase order
    pub sections: Vec<SectionView>,
}

impl RevealView {
    /// Classifies every section of `metadata` for `current_phase`.
    ///
    /// `current_phase` is clamped like [`is_section_revealed`].
    #[must_use]
    pub fn compute(metadata: &AuctionMetadata, current_phase: i64, mode: RevealMode) -> Self {
        let phase = Phase::clamped(current_phase);

        let sections = SectionKey::all()
            .map(|section| {
                let traits = traits_for_section(metadata, section);
                let media = media_for_section(metadata, section);
                let documents = documents_for_section(metadata, section);
                let revealed = phase.unlocks(section);

                let counts = SectionCounts {
                    traits: traits.len(),
                    media: media.len(),
                    documents: documents.len(),
                };

                let include_items = revealed || mode == RevealMode::Full;
                SectionView {
                    section,
                    title: section.title().to_string(),
                    unlocks_at: unlock_phase(section),
                    revealed,
                    counts,
                    traits: cloned_if(include_items, traits),
                    media: cloned_if(include_items, media),
                    documents: cloned_if(include_items, documents),
                }
            })
            .collect();

        Self {
            name: metadata.name.clone(),
            description: metadata.description.clone(),
            phase,
            mode,
            sections,
        }
    }

    /// Sections visible in this phase.
    pub fn revealed_sections(&self) -> impl Iterator<Item = &SectionView> {
        self.sections.iter().filter(|s| s.revealed)
    }

    /// The next section to unlock, if any remain locked.
    #[must_use]
    pub fn next_unlock(&self) -> Option<&SectionView> {
        self.sections.iter().find(|s| !s.revealed)
    }
}

fn cloned_if<T: Clone>(include: bool, items: Vec<&T>) -> Vec<T> {
    if include {
        items.into_iter().cloned().collect()
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata() -> AuctionMetadata {
        AuctionMetadata::from_json(&json!({
            "name": "12 Harbor Lane",
            "traits": [
                {"key": "bedrooms", "value": "3", "section": "section_0"},
                {"key": "appraisal", "value": "$450k", "section": "section_2"},
                {"key": "baths", "value": "2", "section": "section_0"}
            ],
            "media": {
                "section_0_front.jpg": "ipfs://front",
                "section_1_tour.mp4": "ipfs://tour"
            },
            "documents": [
                {"name": "Inspection", "uri": "ipfs://insp", "section": "section_2"},
                {"name": "Deed", "uri": "ipfs://deed", "section": "section_3"}
            ]
        }))
        .metadata
    }

    #[test]
    fn reveal_matches_example_scenario() {
        assert!(is_section_revealed(SectionKey::Section0, 1));
        assert!(!is_section_revealed(SectionKey::Section2, 1));

        let meta = metadata();
        let s0: Vec<_> = traits_for_section(&meta, SectionKey::Section0)
            .iter()
            .map(|t| t.key.as_str())
            .collect();
        assert_eq!(s0, ["bedrooms", "baths"]);

        // Filtering does not depend on reveal state.
        let s2 = traits_for_section(&meta, SectionKey::Section2);
        assert_eq!(s2.len(), 1);
        assert_eq!(s2[0].key, "appraisal");
    }

    #[test]
    fn out_of_range_phases_clamp() {
        assert!(is_section_revealed(SectionKey::Section0, -1));
        assert!(!is_section_revealed(SectionKey::Section1, -100));
        assert!(is_section_revealed(SectionKey::Section3, 4));
        assert!(is_section_revealed(SectionKey::Section3, i64::MAX));
        assert!(!is_section_revealed(SectionKey::Section1, i64::MIN));
    }

    #[test]
    fn empty_metadata_filters_to_nothing() {
        let meta = AuctionMetadata::default();
        for section in SectionKey::all() {
            assert!(traits_for_section(&meta, section).is_empty());
            assert!(media_for_section(&meta, section).is_empty());
            assert!(documents_for_section(&meta, section).is_empty());
        }
    }

    #[test]
    fn items_in_one_section_keep_document_order() {
        let meta = AuctionMetadata::from_json(&json!({
            "media": {
                "section_1_zeta.jpg": "ipfs://z",
                "section_2_plan.png": "ipfs://p",
                "section_1_alpha.jpg": "ipfs://a",
                "section_1_mid.mp4": "ipfs://m"
            },
            "documents": [
                {"name": "Title", "uri": "ipfs://t", "section": "section_3"},
                {"name": "Survey", "uri": "ipfs://s", "section": "section_2"},
                {"name": "Deed", "uri": "ipfs://d", "section": "section_3"},
                {"name": "Appraisal", "uri": "ipfs://ap", "section": "section_3"}
            ]
        }))
        .metadata;

        let media: Vec<_> = media_for_section(&meta, SectionKey::Section1)
            .iter()
            .map(|m| m.key.as_str())
            .collect();
        assert_eq!(media, ["section_1_zeta.jpg", "section_1_alpha.jpg", "section_1_mid.mp4"]);

        let docs: Vec<_> = documents_for_section(&meta, SectionKey::Section3)
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(docs, ["Title", "Deed", "Appraisal"]);

        let view = RevealView::compute(&meta, 3, RevealMode::Redacted);
        let shown: Vec<_> = view.sections[1].media.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(shown, media);
    }

    #[test]
    fn media_and_documents_filter_by_section() {
        let meta = metadata();
        let media = media_for_section(&meta, SectionKey::Section1);
        assert_eq!(media.len(), 1);
        assert_eq!(media[0].uri, "ipfs://tour");

        let docs = documents_for_section(&meta, SectionKey::Section3);
        assert_eq!(docs[0].name, "Deed");
        assert!(documents_for_section(&meta, SectionKey::Section0).is_empty());
    }

    #[test]
    fn view_redacts_locked_sections() {
        let view = RevealView::compute(&metadata(), 1, RevealMode::Redacted);
        assert_eq!(view.phase, Phase::new(1));
        assert_eq!(view.sections.len(), 4);

        let s2 = &view.sections[2];
        assert!(!s2.revealed);
        assert_eq!(s2.unlocks_at, Phase::new(2));
        assert_eq!(s2.counts.traits, 1);
        assert_eq!(s2.counts.documents, 1);
        assert!(s2.traits.is_empty());
        assert!(s2.documents.is_empty());

        let s1 = &view.sections[1];
        assert!(s1.revealed);
        assert_eq!(s1.media.len(), 1);
    }

    #[test]
    fn full_mode_keeps_locked_items() {
        let view = RevealView::compute(&metadata(), 0, RevealMode::Full);
        let s3 = &view.sections[3];
        assert!(!s3.revealed);
        assert_eq!(s3.documents.len(), 1);
    }

    #[test]
    fn next_unlock_and_revealed_sections() {
        let meta = metadata();
        let view = RevealView::compute(&meta, 2, RevealMode::Redacted);
        assert_eq!(view.revealed_sections().count(), 3);
        assert_eq!(
            view.next_unlock().map(|s| s.section),
            Some(SectionKey::Section3)
        );

        let done = RevealView::compute(&meta, 3, RevealMode::Redacted);
        assert!(done.next_unlock().is_none());
    }

    #[test]
    fn view_serializes_with_wire_ids() {
        let view = RevealView::compute(&metadata(), 0, RevealMode::Redacted);
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["phase"], 0);
        assert_eq!(value["mode"], "redacted");
        assert_eq!(value["sections"][0]["section"], "section_0");
        assert_eq!(value["sections"][2]["revealed"], false);
    }
}
