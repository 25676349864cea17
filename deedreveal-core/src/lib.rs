//! `deedreveal` Core - phase-gated listing metadata
//!
//! Pure, synchronous building blocks shared by the `deedreveal` CLI and
//! HTTP API:
//!
//! - [`section`]: the ordered section/phase lookup table
//! - [`metadata`]: listing metadata values and their tolerant JSON boundary
//! - [`reveal`]: which traits, media and documents a phase unlocks
//! - [`media`]: media labels, kind detection and gateway rewriting
//! - [`amount`]: parsing and formatting of human-entered token amounts
//!
//! Nothing in this crate performs I/O.

pub mod amount;
pub mod error;
pub mod media;
pub mod metadata;
pub mod reveal;
pub mod section;

pub use metadata::{AuctionMetadata, DocumentItem, MediaItem, ParsedMetadata, SkippedItem, Trait};
pub use reveal::{RevealMode, RevealView, SectionView, is_section_revealed};
pub use section::{Phase, SectionKey, TOTAL_PHASES};

/// Version of the core library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
