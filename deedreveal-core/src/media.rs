//! Media key helpers
//!
//! Labels, kind detection and content-addressed URI rewriting for listing
//! media. All functions are pure and locale independent.

use serde::Serialize;

use crate::section::SectionKey;

/// Public gateway used when none is configured.
pub const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io/ipfs";

const IPFS_SCHEME: &str = "ipfs://";

const VIDEO_EXTENSIONS: &[&str] = &[
    ".mp4", ".webm", ".mov", ".m4v", ".ogv", ".mkv", ".avi", ".m3u8",
];
const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg", ".avif"];
const DOCUMENT_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx", ".txt", ".md"];

/// Broad category of a media asset, used to pick a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Playable video
    Video,
    /// Still image
    Image,
    /// Viewable document
    Document,
    /// Anything else
    Other,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Video => "video",
            Self::Image => "image",
            Self::Document => "document",
            Self::Other => "other",
        })
    }
}

/// Turns an internal media key into a display label.
///
/// `section_1_virtual_tour.mp4` becomes `Virtual Tour` and
/// `floorPlan-v2.pdf` becomes `Floor Plan V2`.
#[must_use]
pub fn format_media_label(media_key: &str) -> String {
    let trimmed = media_key.trim();
    let without_section =
        SectionKey::media_key_prefix_len(trimmed).map_or(trimmed, |len| &trimmed[len..]);
    let stem = strip_extension(without_section);

    let label = split_words(stem)
        .iter()
        .map(String::as_str)
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    if label.is_empty() {
        trimmed.to_string()
    } else {
        label
    }
}

/// Whether a media key names a video.
///
/// Matches known video extensions or a standalone `video` word in the key.
#[must_use]
pub fn is_video_key(media_key: &str) -> bool {
    let normalized = normalize_key(media_key);
    has_extension(&normalized, VIDEO_EXTENSIONS) || has_word(&normalized, "video")
}

/// Classifies a media key.
#[must_use]
pub fn media_kind(media_key: &str) -> MediaKind {
    let normalized = normalize_key(media_key);
    if is_video_key(media_key) {
        MediaKind::Video
    } else if has_extension(&normalized, IMAGE_EXTENSIONS) || has_word(&normalized, "image") {
        MediaKind::Image
    } else if has_extension(&normalized, DOCUMENT_EXTENSIONS) {
        MediaKind::Document
    } else {
        MediaKind::Other
    }
}

/// Whether `uri` uses the `ipfs://` scheme.
#[must_use]
pub fn is_content_addressed(uri: &str) -> bool {
    uri.get(..IPFS_SCHEME.len())
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case(IPFS_SCHEME))
}

/// Rewrites an `ipfs://` URI through [`DEFAULT_IPFS_GATEWAY`].
#[must_use]
pub fn ipfs_to_http(uri: &str) -> String {
    ipfs_to_http_with_gateway(uri, DEFAULT_IPFS_GATEWAY)
}

/// Rewrites an `ipfs://` URI through `gateway`.
///
/// `ipfs://<cid>/<path>` becomes `<gateway>/<cid>/<path>`. A redundant
/// `ipfs/` segment after the scheme is dropped. Anything that is not an
/// `ipfs://` URI is returned unchanged.
#[must_use]
pub fn ipfs_to_http_with_gateway(uri: &str, gateway: &str) -> String {
    if !is_content_addressed(uri) {
        return uri.to_string();
    }

    let path = uri[IPFS_SCHEME.len()..].trim_start_matches('/');
    let path = path.strip_prefix("ipfs/").unwrap_or(path);
    format!("{}/{path}", gateway.trim_end_matches('/'))
}

fn normalize_key(key: &str) -> String {
    let key = key.trim();
    let end = key.find(['?', '#']).unwrap_or(key.len());
    key[..end].to_ascii_lowercase()
}

fn has_extension(normalized: &str, extensions: &[&str]) -> bool {
    extensions.iter().any(|ext| normalized.ends_with(ext))
}

fn has_word(normalized: &str, word: &str) -> bool {
    normalized
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|token| token == word)
}

/// Drops a trailing `.ext` of 1 to 5 alphanumerics.
fn strip_extension(key: &str) -> &str {
    match key.rfind('.') {
        Some(dot) if dot > 0 => {
            let ext = &key[dot + 1..];
            if (1..=5).contains(&ext.len()) && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
                &key[..dot]
            } else {
                key
            }
        }
        _ => key,
    }
}

/// Splits on separators and lower-to-upper camel-case boundaries.
fn split_words(s: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in s.chars() {
        if matches!(c, '_' | '-' | '.' | '/') || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if prev_lower && c.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        let mut out = String::with_capacity(word.len());
        out.push(first.to_ascii_uppercase());
        out.push_str(chars.as_str());
        out
    })
}
