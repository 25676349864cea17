//! Shell completion generation

use std::fs::File;
use std::io::{self, Write};

use clap::CommandFactory;

use crate::cli::args::{Cli, CompletionsArgs};
use crate::error::DeedRevealError;

/// Writes a completion script to `--output`, or stdout when omitted.
///
/// # Errors
///
/// Returns [`DeedRevealError::Io`] if the output file cannot be created
/// or written.
pub fn run(args: &CompletionsArgs) -> Result<(), DeedRevealError> {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();

    match &args.output {
        Some(path) => {
            let mut file = File::create(path)?;
            clap_complete::generate(args.shell, &mut cmd, bin, &mut file);
            file.flush()?;
            tracing::info!(shell = %args.shell, path = %path.display(), "wrote completions");
        }
        None => clap_complete::generate(args.shell, &mut cmd, bin, &mut io::stdout()),
    }
    Ok(())
}
