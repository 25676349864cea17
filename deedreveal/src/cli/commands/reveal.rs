//! `reveal` command
//!
//! Fetches a listing's metadata and prints the sections visible at a phase.

use deedreveal_core::{RevealView, SectionKey};

use crate::cli::args::{OutputFormat, RevealArgs};
use crate::cli::commands::revalidate;
use crate::config::AppConfig;
use crate::error::DeedRevealError;
use crate::fetch::{MetadataFetcher, MetadataSource};
use crate::render::{render_human, resolve_uris};

/// Computes and prints a reveal view.
///
/// # Errors
///
/// Returns a config error for a bad `--gateway`, a section error for an
/// unknown `--section`, a fetch error if the metadata cannot be retrieved,
/// or a metadata error if the document is unusable.
pub async fn run(args: &RevealArgs, mut config: AppConfig) -> Result<(), DeedRevealError> {
    let section = args
        .section
        .as_deref()
        .map(str::parse::<SectionKey>)
        .transpose()?;

    if let Some(gateway) = &args.gateway {
        config.gateway.clone_from(gateway);
        revalidate(&config)?;
    }

    let fetcher = MetadataFetcher::new(&config)?;
    let source = MetadataSource::parse(&args.source);
    tracing::info!(%source, phase = args.phase, "revealing listing");

    let parsed = fetcher
        .fetch(&source)
        .await
        .map_err(DeedRevealError::from_fetch)?;
    let mut view = RevealView::compute(&parsed.metadata, args.phase, args.mode);
    if let Some(section) = section {
        view.sections.retain(|s| s.section == section);
    }
    if args.resolve {
        resolve_uris(&mut view, fetcher.gateway());
    }

    match args.format {
        OutputFormat::Human => print!("{}", render_human(&view)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
    }
    Ok(())
}
