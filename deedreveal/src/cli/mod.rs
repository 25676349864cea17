//! Command-line interface
//!
//! Argument definitions and command handlers for the `deedreveal` binary.

pub mod args;
pub mod commands;
