use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::sync::Arc;

use whotouched::ScanError;
use whotouched::cli::{Cli, OutputFormat};
use whotouched::repository::scanner::VerboseProgress;
use whotouched::repository::{GitReader, Scanner};
use whotouched::view::{render_json, render_text};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp_millis()
        .init();

    let reader = GitReader::open(&cli.repo_path)
        .with_context(|| format!("Could not open repository: {}", cli.repo_path.display()))?;
    log::info!("Opened repository at {}", reader.path().display());

    let scanner = Scanner::new(reader, cli.scan_options())
        .with_progress(Arc::new(VerboseProgress::new(!cli.quiet)))
        .profiling(cli.profile);

    let report = match scanner.scan(&cli.criteria()).await {
        Ok(report) => report,
        Err(ScanError::NoMatchingBranches { pattern }) => {
            eprintln!("No branches match {}", pattern);
            return Ok(());
        }
        Err(err) => return Err(err).context("Scan failed"),
    };
    log::info!(
        "{} matching commits ({} commits read)",
        report.len(),
        scanner.reader().cached_commits()
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        OutputFormat::Text => render_text(&report, &mut out)?,
        OutputFormat::Json => render_json(&report, &mut out)?,
    }
    out.flush()?;

    Ok(())
}
