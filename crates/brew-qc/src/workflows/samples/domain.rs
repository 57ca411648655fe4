use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::workflows::ordering::Extractable;

/// Identifier wrapper for tasting samples.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleId(pub String);

/// Brewery sample as delivered by the sample catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub id: SampleId,
    pub code: String,
    #[serde(default)]
    pub description: String,
    pub production_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
    #[serde(default)]
    pub batch: String,
    #[serde(rename = "type")]
    pub sample_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityAssessment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alcohol_content: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitterness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarity: Option<Clarity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aroma: Option<AromaProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stability: Option<StabilityChecks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_conditions: Option<StorageConditions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_tested: Option<NaiveDate>,
    /// Days between routine tests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_frequency: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_unit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_quantity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub score: f64,
    pub conformity: Conformity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_evaluation: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AromaProfile {
    pub intensity: f64,
    pub quality: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StabilityChecks {
    pub microbiological: bool,
    pub physical: bool,
    pub chemical: bool,
}

/// Cellar conditions the sample is kept under; temperature in °C, humidity in %.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StorageConditions {
    pub temperature: f64,
    pub humidity: f64,
    pub light: LightExposure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightExposure {
    Protected,
    Exposed,
}

impl LightExposure {
    pub const fn label(self) -> &'static str {
        match self {
            LightExposure::Protected => "protected",
            LightExposure::Exposed => "exposed",
        }
    }

    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "protected" => Some(Self::Protected),
            "exposed" => Some(Self::Exposed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const fn label(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conformity {
    Conforming,
    NonConforming,
    Pending,
}

impl Conformity {
    pub const fn label(self) -> &'static str {
        match self {
            Conformity::Conforming => "conforming",
            Conformity::NonConforming => "non_conforming",
            Conformity::Pending => "pending",
        }
    }

    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "conforming" => Some(Self::Conforming),
            "non_conforming" => Some(Self::NonConforming),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clarity {
    Clear,
    Hazy,
    Opaque,
}

impl Clarity {
    pub const fn label(self) -> &'static str {
        match self {
            Clarity::Clear => "clear",
            Clarity::Hazy => "hazy",
            Clarity::Opaque => "opaque",
        }
    }

    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "clear" => Some(Self::Clear),
            "hazy" => Some(Self::Hazy),
            "opaque" => Some(Self::Opaque),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

fn date_value(date: NaiveDate) -> Value {
    Value::from(date.format("%Y-%m-%d").to_string())
}

impl Extractable for Sample {
    fn item_id(&self) -> String {
        self.id.0.clone()
    }

    fn field(&self, path: &str) -> Option<Value> {
        let value = match path {
            "id" => Some(Value::from(self.id.0.as_str())),
            "code" => Some(Value::from(self.code.as_str())),
            "description" => Some(Value::from(self.description.as_str())),
            "production_date" => Some(date_value(self.production_date)),
            "expiration_date" => self.expiration_date.map(date_value),
            "batch" => Some(Value::from(self.batch.as_str())),
            "type" => Some(Value::from(self.sample_type.as_str())),
            "priority" => self.priority.map(|priority| Value::from(priority.label())),
            "quality.score" => self.quality.as_ref().map(|quality| Value::from(quality.score)),
            "quality.conformity" => self
                .quality
                .as_ref()
                .map(|quality| Value::from(quality.conformity.label())),
            "quality.last_evaluation" => self
                .quality
                .as_ref()
                .and_then(|quality| quality.last_evaluation)
                .map(date_value),
            "alcohol_content" => self.alcohol_content.map(Value::from),
            "bitterness" => self.bitterness.map(Value::from),
            "color" => self.color.map(Value::from),
            "temperature" => self.temperature.map(Value::from),
            "clarity" => self.clarity.map(|clarity| Value::from(clarity.label())),
            "aroma.intensity" => self.aroma.map(|aroma| Value::from(aroma.intensity)),
            "aroma.quality" => self.aroma.map(|aroma| Value::from(aroma.quality)),
            "stability.microbiological" => self
                .stability
                .map(|checks| Value::from(checks.microbiological)),
            "stability.physical" => self.stability.map(|checks| Value::from(checks.physical)),
            "stability.chemical" => self.stability.map(|checks| Value::from(checks.chemical)),
            "storage_conditions.temperature" => self
                .storage_conditions
                .map(|storage| Value::from(storage.temperature)),
            "storage_conditions.humidity" => self
                .storage_conditions
                .map(|storage| Value::from(storage.humidity)),
            "storage_conditions.light" => self
                .storage_conditions
                .map(|storage| Value::from(storage.light.label())),
            "risk_level" => self.risk_level.map(|risk| Value::from(risk.label())),
            "last_tested" => self.last_tested.map(date_value),
            "test_frequency" => self.test_frequency.map(Value::from),
            "cost_per_unit" => self.cost_per_unit.map(Value::from),
            "available_quantity" => self.available_quantity.map(Value::from),
            _ => None,
        };
        value.filter(|value| !value.is_null())
    }
}
