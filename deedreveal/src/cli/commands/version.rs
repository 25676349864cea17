//! Version information display

use serde_json::json;

use crate::cli::args::{OutputFormat, VersionArgs};

/// Print version and build information.
pub fn run(args: &VersionArgs) {
    let name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");
    let core = deedreveal_core::VERSION;

    match args.format {
        OutputFormat::Human => {
            println!("{name} {version} (core {core})");
        }
        OutputFormat::Json => {
            println!(
                "{}",
                json!({ "name": name, "version": version, "core_version": core })
            );
        }
    }
}
