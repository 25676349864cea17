//! Observability
//!
//! Structured logging for `deedreveal` commands and the HTTP API.

pub mod logging;

pub use logging::{LogFormat, init_logging};
