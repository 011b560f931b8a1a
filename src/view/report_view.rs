use std::io::{self, Write};

use crate::model::Report;
use crate::util::{format_timestamp, truncate};

const AUTHOR_WIDTH: usize = 32;

/// Plain-text report: one header line per commit, then its files indented
pub fn render_text(report: &Report, out: &mut impl Write) -> io::Result<()> {
    for record in report.records() {
        let branches: Vec<&str> = record.branches.iter().map(String::as_str).collect();
        writeln!(
            out,
            "{}  {}  {:<width$}  [{}]",
            format_timestamp(record.timestamp),
            record.commit.short(),
            truncate(&record.author, AUTHOR_WIDTH),
            branches.join(", "),
            width = AUTHOR_WIDTH,
        )?;
        for file in &record.files {
            writeln!(out, "    {}", file)?;
        }
    }
    Ok(())
}

/// Pretty-printed JSON array of records
pub fn render_json(report: &Report, out: &mut impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)
}
