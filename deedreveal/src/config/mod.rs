//! Configuration
//!
//! `deedreveal` reads an optional YAML file, then applies `DEEDREVEAL_*`
//! environment overrides, then validates. CLI flags are applied last by
//! the individual commands and validated again.

pub mod loader;
pub mod schema;

pub use loader::{ConfigLoader, LoadResult, LoadWarning, validate};
pub use schema::AppConfig;
