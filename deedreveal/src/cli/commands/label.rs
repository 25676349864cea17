//! `label` command
//!
//! Shows how the gallery will caption media keys.

use deedreveal_core::SectionKey;
use deedreveal_core::media::{format_media_label, media_kind};
use serde_json::json;

use crate::cli::args::{LabelArgs, OutputFormat};
use crate::error::DeedRevealError;

/// Prints label, kind and section for each key.
///
/// # Errors
///
/// Returns [`DeedRevealError::Json`] if JSON output cannot be serialized.
pub fn run(args: &LabelArgs) -> Result<(), DeedRevealError> {
    match args.format {
        OutputFormat::Human => {
            for key in &args.keys {
                let section = SectionKey::from_media_key(key)
                    .map_or_else(|| "-".to_string(), |s| s.to_string());
                println!(
                    "{key}\t{}\t{}\t{section}",
                    format_media_label(key),
                    media_kind(key)
                );
            }
        }
        OutputFormat::Json => {
            let rows: Vec<_> = args
                .keys
                .iter()
                .map(|key| {
                    json!({
                        "key": key,
                        "label": format_media_label(key),
                        "kind": media_kind(key),
                        "section": SectionKey::from_media_key(key),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}
