//! Droptable - Headless output
//!
//! Writes a projection to any writer, as a tab-delimited table in the input
//! format or as a JSON array.

use std::io::Write;

use anyhow::{Context, Result};
use csv::{QuoteStyle, WriterBuilder};

use crate::data::Row;
use crate::parser::{NAME_COLUMN, PERCENT_COLUMN};

/// Output format for `--print`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Tsv,
    Json,
}

pub fn write_rows<W: Write>(
    rows: &[&Row],
    location_column: &str,
    format: OutputFormat,
    out: W,
) -> Result<()> {
    match format {
        OutputFormat::Tsv => write_tsv(rows, location_column, out),
        OutputFormat::Json => write_json(rows, out),
    }
}

/// Rows as TSV with the input header; percentages keep two decimals.
pub fn write_tsv<W: Write>(rows: &[&Row], location_column: &str, out: W) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Never)
        .from_writer(out);

    writer
        .write_record([NAME_COLUMN, location_column, PERCENT_COLUMN])
        .with_context(|| "Failed to write header")?;
    for row in rows {
        writer
            .write_record([
                row.name.as_str(),
                row.location.as_str(),
                row.percent_display().as_str(),
            ])
            .with_context(|| format!("Failed to write row '{}'", row.name))?;
    }
    writer.flush()?;
    Ok(())
}

/// Rows as a pretty-printed JSON array
pub fn write_json<W: Write>(rows: &[&Row], mut out: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, rows).with_context(|| "Failed to serialize rows")?;
    writeln!(out)?;
    Ok(())
}
