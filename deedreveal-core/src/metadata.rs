//! Listing metadata and its JSON boundary
//!
//! Metadata arrives as untyped JSON from a content-addressed gateway. It is
//! parsed once, here, into immutable values. The parser is tolerant: an
//! item that is missing its section, key or URI is dropped and recorded in
//! [`ParsedMetadata::skipped`] instead of failing the whole document, so a
//! listing page can always render whatever survived.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::MetadataError;
use crate::section::SectionKey;

/// Media key under which a top-level `image` field is stored.
pub const COVER_IMAGE_KEY: &str = "image";

/// A single listing attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trait {
    /// Attribute name, e.g. `"bedrooms"`
    pub key: String,
    /// Display value
    pub value: String,
    /// Section that gates this attribute
    pub section: SectionKey,
}

/// A media asset (photo, video, tour) attached to a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Media key as it appears in the metadata document
    pub key: String,
    /// Asset URI, often `ipfs://`
    pub uri: String,
    /// Section that gates this asset
    pub section: SectionKey,
}

/// A document (deed, inspection report, disclosure) attached to a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentItem {
    /// Display name
    pub name: String,
    /// Document URI
    pub uri: String,
    /// Section that gates this document
    pub section: SectionKey,
    /// Declared MIME type, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Full metadata record for one auction listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionMetadata {
    /// Listing name
    pub name: String,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Attributes in document order
    #[serde(default)]
    pub traits: Vec<Trait>,
    /// Media assets keyed by media key, in document order
    #[serde(default)]
    pub media: IndexMap<String, MediaItem>,
    /// Documents in document order
    #[serde(default)]
    pub documents: Vec<DocumentItem>,
}

/// An item dropped while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedItem {
    /// Where in the document the item was, e.g. `traits[2]` or `media.tour`
    pub location: String,
    /// Why it was dropped
    pub reason: String,
}

impl SkippedItem {
    fn new(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            reason: reason.into(),
        }
    }
}

/// Result of parsing a metadata document.
#[derive(Debug, Clone, Default)]
pub struct ParsedMetadata {
    /// Everything that parsed cleanly
    pub metadata: AuctionMetadata,
    /// Items that were dropped
    pub skipped: Vec<SkippedItem>,
}

impl AuctionMetadata {
    /// Parses raw bytes as a metadata document.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError`] only when the bytes are not JSON or the
    /// root is not an object. Malformed items are skipped, not rejected.
    pub fn from_json_slice(bytes: &[u8]) -> Result<ParsedMetadata, MetadataError> {
        let value: Value = serde_json::from_slice(bytes)?;
        if !value.is_object() {
            return Err(MetadataError::NotAnObject {
                found: json_type(&value),
            });
        }
        Ok(Self::from_json(&value))
    }

    /// Builds metadata from an already-decoded JSON value. Never fails.
    ///
    /// A non-object value yields empty metadata with a single skipped entry.
    #[must_use]
    pub fn from_json(value: &Value) -> ParsedMetadata {
        let mut skipped = Vec::new();

        let Some(root) = value.as_object() else {
            skipped.push(SkippedItem::new(
                "$",
                format!("expected object, got {}", json_type(value)),
            ));
            return ParsedMetadata {
                metadata: Self::default(),
                skipped,
            };
        };

        let name = root
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let description = root
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string);

        let traits = parse_traits(root, &mut skipped);
        let media = parse_media(root, &mut skipped);
        let documents = parse_documents(root, &mut skipped);

        ParsedMetadata {
            metadata: Self {
                name,
                description,
                traits,
                media,
                documents,
            },
            skipped,
        }
    }

    /// Total number of traits, media items and documents.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.traits.len() + self.media.len() + self.documents.len()
    }
}

fn parse_traits(root: &Map<String, Value>, skipped: &mut Vec<SkippedItem>) -> Vec<Trait> {
    let (field, list) = match (root.get("traits"), root.get("attributes")) {
        (Some(list), _) => ("traits", list),
        (None, Some(list)) => ("attributes", list),
        (None, None) => return Vec::new(),
    };

    let Some(items) = list.as_array() else {
        skipped.push(SkippedItem::new(field, "expected an array"));
        return Vec::new();
    };

    let mut traits = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let location = format!("{field}[{i}]");
        let Some(obj) = item.as_object() else {
            skipped.push(SkippedItem::new(location, "expected an object"));
            continue;
        };

        let Some(key) = first_str(obj, &["key", "trait_type"]) else {
            skipped.push(SkippedItem::new(location, "missing key"));
            continue;
        };
        let Some(value) = obj.get("value").and_then(display_value) else {
            skipped.push(SkippedItem::new(location, "missing value"));
            continue;
        };
        let section = match obj.get("section").map(section_value) {
            Some(Ok(section)) => section,
            Some(Err(reason)) => {
                skipped.push(SkippedItem::new(location, reason));
                continue;
            }
            None => {
                skipped.push(SkippedItem::new(location, "missing section"));
                continue;
            }
        };

        traits.push(Trait {
            key: key.to_string(),
            value,
            section,
        });
    }
    traits
}

fn parse_media(
    root: &Map<String, Value>,
    skipped: &mut Vec<SkippedItem>,
) -> IndexMap<String, MediaItem> {
    let mut media = IndexMap::new();

    if let Some(image) = root.get("image").and_then(Value::as_str) {
        if !image.trim().is_empty() {
            media.insert(
                COVER_IMAGE_KEY.to_string(),
                MediaItem {
                    key: COVER_IMAGE_KEY.to_string(),
                    uri: image.to_string(),
                    section: SectionKey::Section0,
                },
            );
        }
    }

    let Some(entries) = root.get("media") else {
        return media;
    };
    let Some(entries) = entries.as_object() else {
        skipped.push(SkippedItem::new("media", "expected an object"));
        return media;
    };

    for (key, entry) in entries {
        let location = format!("media.{key}");
        if media.contains_key(key) {
            skipped.push(SkippedItem::new(location, "key collides with the top-level image"));
            continue;
        }
        let (uri, explicit_section) = match entry {
            Value::String(uri) => (Some(uri.as_str()), None),
            Value::Object(obj) => (
                first_str(obj, &["uri", "url"]),
                obj.get("section").map(section_value),
            ),
            other => {
                skipped.push(SkippedItem::new(
                    location,
                    format!("expected string or object, got {}", json_type(other)),
                ));
                continue;
            }
        };

        let Some(uri) = uri.filter(|u| !u.trim().is_empty()) else {
            skipped.push(SkippedItem::new(location, "missing uri"));
            continue;
        };

        let section = match explicit_section {
            Some(Ok(section)) => section,
            Some(Err(reason)) => {
                skipped.push(SkippedItem::new(location, reason));
                continue;
            }
            None => {
                if let Some(section) = SectionKey::from_media_key(key) {
                    section
                } else {
                    skipped.push(SkippedItem::new(
                        location,
                        "key has no section prefix and no explicit section",
                    ));
                    continue;
                }
            }
        };

        media.insert(
            key.clone(),
            MediaItem {
                key: key.clone(),
                uri: uri.to_string(),
                section,
            },
        );
    }

    media
}

fn parse_documents(root: &Map<String, Value>, skipped: &mut Vec<SkippedItem>) -> Vec<DocumentItem> {
    let Some(list) = root.get("documents") else {
        return Vec::new();
    };
    let Some(items) = list.as_array() else {
        skipped.push(SkippedItem::new("documents", "expected an array"));
        return Vec::new();
    };

    let mut documents = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let location = format!("documents[{i}]");
        let Some(obj) = item.as_object() else {
            skipped.push(SkippedItem::new(location, "expected an object"));
            continue;
        };

        let Some(uri) = first_str(obj, &["uri", "url"]) else {
            skipped.push(SkippedItem::new(location, "missing uri"));
            continue;
        };
        let section = match obj.get("section").map(section_value) {
            Some(Ok(section)) => section,
            Some(Err(reason)) => {
                skipped.push(SkippedItem::new(location, reason));
                continue;
            }
            None => {
                skipped.push(SkippedItem::new(location, "missing section"));
                continue;
            }
        };
        let name = first_str(obj, &["name", "title"]).unwrap_or(uri);

        documents.push(DocumentItem {
            name: name.to_string(),
            uri: uri.to_string(),
            section,
            mime_type: first_str(obj, &["mime_type", "mimeType"]).map(str::to_string),
        });
    }
    documents
}

/// Returns the first non-empty string among `fields`.
fn first_str<'a>(obj: &'a Map<String, Value>, fields: &[&str]) -> Option<&'a str> {
    fields
        .iter()
        .filter_map(|field| obj.get(*field).and_then(Value::as_str))
        .find(|s| !s.trim().is_empty())
}

/// Renders a trait value for display. Null, arrays and objects have none.
fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Interprets a `section` field: `"section_k"`, `"k"` or the integer `k`.
fn section_value(value: &Value) -> Result<SectionKey, String> {
    match value {
        Value::String(s) => s.parse().map_err(|e| format!("{e}")),
        Value::Number(n) => n
            .as_u64()
            .and_then(|k| usize::try_from(k).ok())
            .and_then(SectionKey::from_index)
            .ok_or_else(|| format!("unknown section '{n}'")),
        other => Err(format!("invalid section type {}", json_type(other))),
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
