use crate::core::models::review::AssignmentRecord;
use serde::Serialize;
use std::io::{self, Write};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Toml,
    Csv,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "csv" => Ok(Self::Csv),
            other => Err(format!(
                "Unknown report format '{}'. Expected 'toml' or 'csv'.",
                other
            )),
        }
    }
}

#[derive(Serialize)]
struct ReportFile<'a> {
    reviews: &'a [AssignmentRecord],
}

/// Writes the given review records in the requested format.
///
/// TOML output is a `[[reviews]]` array of tables; CSV output has a
/// `reviewer,reviewee,artifact` header row followed by one row per record.
pub fn write_report<W: Write>(
    records: &[AssignmentRecord],
    format: ReportFormat,
    writer: &mut W,
) -> Result<(), ReportError> {
    match format {
        ReportFormat::Toml => {
            let content = toml::to_string(&ReportFile { reviews: records })?;
            writer.write_all(content.as_bytes())?;
        }
        ReportFormat::Csv => {
            let mut csv_writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(&mut *writer);
            csv_writer.write_record(["reviewer", "reviewee", "artifact"])?;
            for record in records {
                csv_writer.serialize(record)?;
            }
            csv_writer.flush()?;
        }
    }
    writer.flush()?;
    Ok(())
}
