use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use super::domain::{
    Clarity, Conformity, LightExposure, Priority, QualityAssessment, RiskLevel, Sample, SampleId,
    StorageConditions,
};
use super::SampleImportError;
use crate::workflows::ordering::engine::parse_timestamp;

pub(crate) const REQUIRED_COLUMNS: [&str; 4] = ["id", "code", "production_date", "type"];

#[derive(Debug, Deserialize)]
pub(crate) struct SampleRow {
    id: String,
    code: String,
    #[serde(default)]
    description: String,
    production_date: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    expiration_date: Option<String>,
    #[serde(default)]
    batch: String,
    #[serde(rename = "type")]
    sample_type: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    priority: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    quality_score: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    quality_conformity: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    alcohol_content: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    bitterness: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    color: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    temperature: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    clarity: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    storage_temperature: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    storage_humidity: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    storage_light: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    risk_level: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    last_tested: Option<String>,
}

impl SampleRow {
    /// Converts a row into a typed sample. `line` is 1-based and counts the header.
    pub(crate) fn into_sample(self, line: usize) -> Result<Sample, SampleImportError> {
        let production_date = required_date(&self.production_date, line, "production_date")?;
        let expiration_date = optional(self.expiration_date, line, "expiration_date", parse_date)?;
        let priority = optional(self.priority, line, "priority", Priority::parse)?;
        let quality_score = optional(self.quality_score, line, "quality_score", parse_number)?;
        let conformity = optional(
            self.quality_conformity,
            line,
            "quality_conformity",
            Conformity::parse,
        )?;

        let quality = quality_score.map(|score| QualityAssessment {
            score,
            conformity: conformity.unwrap_or(Conformity::Pending),
            last_evaluation: None,
        });

        // Storage needs both readings; light defaults to protected.
        let storage_temperature =
            optional(self.storage_temperature, line, "storage_temperature", parse_number)?;
        let storage_humidity =
            optional(self.storage_humidity, line, "storage_humidity", parse_number)?;
        let storage_light = optional(self.storage_light, line, "storage_light", LightExposure::parse)?;
        let storage_conditions = storage_temperature.zip(storage_humidity).map(
            |(temperature, humidity)| StorageConditions {
                temperature,
                humidity,
                light: storage_light.unwrap_or(LightExposure::Protected),
            },
        );

        Ok(Sample {
            id: SampleId(self.id),
            code: self.code,
            description: self.description,
            production_date,
            expiration_date,
            batch: self.batch,
            sample_type: self.sample_type,
            priority,
            quality,
            alcohol_content: optional(self.alcohol_content, line, "alcohol_content", parse_number)?,
            bitterness: optional(self.bitterness, line, "bitterness", parse_number)?,
            color: optional(self.color, line, "color", parse_number)?,
            temperature: optional(self.temperature, line, "temperature", parse_number)?,
            clarity: optional(self.clarity, line, "clarity", Clarity::parse)?,
            aroma: None,
            stability: None,
            storage_conditions,
            risk_level: optional(self.risk_level, line, "risk_level", RiskLevel::parse)?,
            last_tested: optional(self.last_tested, line, "last_tested", parse_date)?,
            test_frequency: None,
            cost_per_unit: None,
            available_quantity: None,
        })
    }
}

fn required_date(
    raw: &str,
    line: usize,
    column: &'static str,
) -> Result<NaiveDate, SampleImportError> {
    parse_date(raw).ok_or_else(|| SampleImportError::InvalidValue {
        line,
        column,
        value: raw.to_string(),
    })
}

fn optional<T>(
    raw: Option<String>,
    line: usize,
    column: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, SampleImportError> {
    match raw {
        None => Ok(None),
        Some(value) => parse(&value)
            .map(Some)
            .ok_or(SampleImportError::InvalidValue {
                line,
                column,
                value,
            }),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    parse_timestamp(raw).map(|timestamp| timestamp.date_naive())
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
