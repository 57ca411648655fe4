//! Brewery sample records and their CSV import.

pub mod domain;
mod parser;

pub use domain::{
    AromaProfile, Clarity, Conformity, LightExposure, Priority, QualityAssessment, RiskLevel,
    Sample, SampleId, StabilityChecks, StorageConditions,
};

use std::io::Read;
use std::path::Path;

use parser::{SampleRow, REQUIRED_COLUMNS};

#[derive(Debug, thiserror::Error)]
pub enum SampleImportError {
    #[error("failed to read sample export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid sample CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("sample export is missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("line {line}: invalid {column} value '{value}'")]
    InvalidValue {
        line: usize,
        column: &'static str,
        value: String,
    },
}

/// Reads sample catalog exports into typed [`Sample`] records.
pub struct SampleCsvImporter;

impl SampleCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Sample>, SampleImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Sample>, SampleImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        if let Some(missing) = REQUIRED_COLUMNS
            .into_iter()
            .find(|column| !headers.iter().any(|header| header == *column))
        {
            return Err(SampleImportError::MissingColumn(missing));
        }

        let mut samples = Vec::new();
        for (offset, row) in csv_reader.deserialize::<SampleRow>().enumerate() {
            samples.push(row?.into_sample(offset + 2)?);
        }

        Ok(samples)
    }
}
