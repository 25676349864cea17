//! `deedreveal` - phased metadata reveal for real-estate auctions
//!
//! This library wires the pure reveal engine in `deedreveal-core` to its
//! collaborators: configuration, metadata retrieval, terminal rendering
//! and the HTTP API used by the marketplace frontend.

pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod observability;
pub mod render;
pub mod server;
