//! Presentation of reveal views
//!
//! Turns a [`RevealView`] into terminal text, and rewrites content-addressed
//! URIs so browsers and terminals can open them.

use std::fmt::Write as _;

use deedreveal_core::media::{format_media_label, ipfs_to_http_with_gateway, media_kind};
use deedreveal_core::{RevealView, SectionView, TOTAL_PHASES};

/// Rewrites every media and document URI in `view` through `gateway`.
pub fn resolve_uris(view: &mut RevealView, gateway: &str) {
    for section in &mut view.sections {
        for item in &mut section.media {
            item.uri = ipfs_to_http_with_gateway(&item.uri, gateway);
        }
        for doc in &mut section.documents {
            doc.uri = ipfs_to_http_with_gateway(&doc.uri, gateway);
        }
    }
}

/// Renders a view as plain text, one block per section.
#[must_use]
pub fn render_human(view: &RevealView) -> String {
    let mut out = String::new();

    let name = if view.name.is_empty() {
        "(unnamed listing)"
    } else {
        view.name.as_str()
    };
    let _ = writeln!(out, "{name}");
    if let Some(description) = &view.description {
        let _ = writeln!(out, "{description}");
    }
    let _ = writeln!(out, "Phase {} of {}", view.phase, TOTAL_PHASES - 1);

    for section in &view.sections {
        out.push('\n');
        render_section(&mut out, section);
    }

    if let Some(next) = view.next_unlock() {
        let _ = writeln!(
            out,
            "\nNext unlock: {} at phase {}",
            next.title, next.unlocks_at
        );
    }

    out
}

fn render_section(out: &mut String, section: &SectionView) {
    let state = if section.revealed { "unlocked" } else { "locked" };
    let _ = writeln!(out, "[{state}] {} ({})", section.title, section.section);

    if !section.revealed {
        let _ = writeln!(
            out,
            "  unlocks at phase {}: {} trait(s), {} media, {} document(s)",
            section.unlocks_at,
            section.counts.traits,
            section.counts.media,
            section.counts.documents
        );
        if section.traits.is_empty() && section.media.is_empty() && section.documents.is_empty() {
            return;
        }
    }

    if section.counts.total() == 0 {
        let _ = writeln!(out, "  (nothing in this section)");
        return;
    }

    for t in &section.traits {
        let _ = writeln!(out, "  {}: {}", t.key, t.value);
    }
    for m in &section.media {
        let _ = writeln!(
            out,
            "  media  {} ({}) {}",
            format_media_label(&m.key),
            media_kind(&m.key),
            m.uri
        );
    }
    for d in &section.documents {
        let _ = writeln!(out, "  doc    {} {}", d.name, d.uri);
    }
}
