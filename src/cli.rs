use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use time::OffsetDateTime;

use crate::repository::{FilterCriteria, ScanOptions};
use crate::repository::scanner::DEFAULT_CONCURRENCY;
use crate::util::parse_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "whotouched",
    about = "Report who changed which files, on which branches, in a time window"
)]
pub struct Cli {
    /// Path to the git repository
    #[arg(default_value = ".")]
    pub repo_path: PathBuf,

    /// Remote whose branches are scanned
    #[arg(long, default_value = "origin")]
    pub remote: String,

    /// Scan local branches instead of a remote's
    #[arg(long, conflicts_with = "remote")]
    pub local: bool,

    /// Author e-mails to report (default: everyone)
    #[arg(long, num_args = 1..)]
    pub owners: Vec<String>,

    /// Include branches matching any of these regexes
    #[arg(long, num_args = 1..)]
    pub branches: Vec<String>,

    /// Exclude branches matching any of these regexes
    #[arg(long = "no-branches", num_args = 1..)]
    pub no_branches: Vec<String>,

    /// Include changed files matching any of these regexes
    #[arg(long, num_args = 1..)]
    pub files: Vec<String>,

    /// Exclude changed files matching any of these regexes
    #[arg(long = "no-files", num_args = 1..)]
    pub no_files: Vec<String>,

    /// Changes on or after this date, YYYY-MM-DD
    #[arg(long = "after-date", value_parser = parse_date)]
    pub after_date: Option<OffsetDateTime>,

    /// Changes before this date, YYYY-MM-DD
    #[arg(long = "before-date", value_parser = parse_date)]
    pub before_date: Option<OffsetDateTime>,

    /// Number of branches walked in parallel
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
    pub jobs: usize,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,

    /// Log per-phase timings
    #[arg(long)]
    pub profile: bool,

    /// Log level on stderr (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub logging: log::LevelFilter,
}

impl Cli {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            owners: self.owners.clone(),
            branches: self.branches.clone(),
            exclude_branches: self.no_branches.clone(),
            files: self.files.clone(),
            exclude_files: self.no_files.clone(),
            after: self.after_date,
            before: self.before_date,
        }
    }

    /// Effective log filter; `--profile` needs at least `info` to show timings
    pub fn log_level(&self) -> log::LevelFilter {
        if self.profile {
            self.logging.max(log::LevelFilter::Info)
        } else {
            self.logging
        }
    }

    pub fn scan_options(&self) -> ScanOptions {
        let options = if self.local {
            ScanOptions::local()
        } else {
            ScanOptions::remote(self.remote.clone())
        };
        options.max_concurrency(self.jobs)
    }
}
