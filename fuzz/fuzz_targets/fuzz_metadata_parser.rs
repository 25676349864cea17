#![no_main]

use deedreveal_core::{AuctionMetadata, RevealMode, RevealView, SectionKey};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(parsed) = AuctionMetadata::from_json_slice(data) else {
        return;
    };

    // Every accepted item lands in exactly one section.
    let view = RevealView::compute(&parsed.metadata, 1, RevealMode::Full);
    let counted: usize = view.sections.iter().map(|s| s.counts.total()).sum();
    assert_eq!(counted, parsed.metadata.item_count());

    for key in parsed.metadata.media.keys() {
        let _ = SectionKey::from_media_key(key);
        let _ = deedreveal_core::media::format_media_label(key);
    }
});
