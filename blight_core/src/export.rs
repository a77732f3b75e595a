use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use blight_schema::{encode_export, encode_export_json, ExportRecord};
use thiserror::Error;

use crate::aggregator::SpreadResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Bincode,
}

#[derive(Debug, Error)]
#[error("unknown output format {0:?}, expected \"json\" or \"bincode\"")]
pub struct UnknownFormat(pub String);

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "bincode" | "bin" => Ok(Self::Bincode),
            _ => Err(UnknownFormat(value.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Bincode => f.write_str("bincode"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode result as JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to encode result as bincode: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("failed to write result: {0}")]
    Io(#[from] io::Error),
}

/// Result entries as wire records, sorted by coordinate.
pub fn export_records(result: &SpreadResult) -> Vec<ExportRecord> {
    result
        .sorted_entries()
        .into_iter()
        .map(|(coordinate, probabilities)| ExportRecord::new(coordinate, probabilities))
        .collect()
}

pub fn encode_result(result: &SpreadResult, format: OutputFormat) -> Result<Vec<u8>, ExportError> {
    let records = export_records(result);
    let bytes = match format {
        OutputFormat::Json => encode_export_json(&records)?.into_bytes(),
        OutputFormat::Bincode => encode_export(&records)?,
    };
    Ok(bytes)
}

/// Encode the whole result before writing, so a failed encode writes nothing.
pub fn write_result<W: Write>(
    writer: &mut W,
    result: &SpreadResult,
    format: OutputFormat,
) -> Result<(), ExportError> {
    let bytes = encode_result(result, format)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
