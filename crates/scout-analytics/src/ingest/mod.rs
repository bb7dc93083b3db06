mod parser;

use crate::scoring::{Observation, SchemaError, ScoringSchema};
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read scouting data: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid observation CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scoring schema rejected: {0}")]
    Schema(#[from] SchemaError),
    #[error("observation CSV is missing the '{0}' column")]
    MissingColumn(&'static str),
    #[error("row {row}: '{value}' is not a valid {column}")]
    InvalidRow {
        row: usize,
        column: &'static str,
        value: String,
    },
}

pub fn load_schema<P: AsRef<Path>>(path: P) -> Result<ScoringSchema, IngestError> {
    let file = std::fs::File::open(path)?;
    load_schema_from_reader(file)
}

/// Parses and validates a scoring schema document.
pub fn load_schema_from_reader<R: Read>(reader: R) -> Result<ScoringSchema, IngestError> {
    let schema: ScoringSchema = serde_json::from_reader(reader)?;
    schema.validate()?;
    debug!(elements = schema.element_count(), "loaded scoring schema");
    Ok(schema)
}

/// Encoding of an observation export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
}

impl SourceFormat {
    /// `.json` files are JSON; everything else is read as CSV.
    pub fn for_path(path: &Path) -> Self {
        let is_json = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(|extension| extension.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::Json
        } else {
            Self::Csv
        }
    }
}

pub struct ObservationImporter;

impl ObservationImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Observation>, IngestError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        Self::from_format(file, SourceFormat::for_path(path))
    }

    pub fn from_format<R: Read>(
        reader: R,
        format: SourceFormat,
    ) -> Result<Vec<Observation>, IngestError> {
        match format {
            SourceFormat::Csv => Self::from_reader(reader),
            SourceFormat::Json => Self::from_json_reader(reader),
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Observation>, IngestError> {
        let observations = parser::parse_csv(reader)?;
        debug!(rows = observations.len(), "imported observations from CSV");
        Ok(observations)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Vec<Observation>, IngestError> {
        let observations: Vec<Observation> = serde_json::from_reader(reader)?;
        debug!(rows = observations.len(), "imported observations from JSON");
        Ok(observations)
    }
}
