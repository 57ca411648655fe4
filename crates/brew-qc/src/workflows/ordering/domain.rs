use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for ordering criteria.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CriterionId(pub String);

impl fmt::Display for CriterionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for ordering configurations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConfigurationId(pub String);

impl fmt::Display for ConfigurationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Value family a criterion reads from a sample; each kind has its own normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    Numeric,
    Date,
    Enum,
    Boolean,
}

impl CriterionKind {
    pub const fn label(self) -> &'static str {
        match self {
            CriterionKind::Numeric => "numeric",
            CriterionKind::Date => "date",
            CriterionKind::Enum => "enum",
            CriterionKind::Boolean => "boolean",
        }
    }
}

/// Whether a normalized score is used as-is or inverted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Applies the direction to a 0-100 score. `Desc` inverts the normalized value.
    pub fn apply(self, score: f64) -> f64 {
        match self {
            SortDirection::Asc => score,
            SortDirection::Desc => 100.0 - score,
        }
    }
}

/// Optional bounds and fallback used while normalizing raw values.
///
/// For date criteria `max` is the recency window in days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<f64>,
}

/// One weighted, typed scoring rule addressing a field on each sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: CriterionId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "type")]
    pub kind: CriterionKind,
    pub weight: i32,
    #[serde(default)]
    pub direction: SortDirection,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub data_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalization: Option<NormalizationConfig>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn active_by_default() -> bool {
    true
}

impl Criterion {
    /// Active, ascending criterion with weight 1 and no normalization bounds.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: CriterionKind,
        data_path: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: CriterionId(id.into()),
            name: name.into(),
            description: String::new(),
            kind,
            weight: 1,
            direction: SortDirection::Asc,
            is_active: true,
            options: Vec::new(),
            data_path: data_path.into(),
            normalization: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    pub fn direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn bounds(mut self, min: f64, max: f64) -> Self {
        let config = self.normalization.get_or_insert_with(Default::default);
        config.min = Some(min);
        config.max = Some(max);
        self
    }

    /// Recency window for date criteria, in days.
    pub fn window_days(mut self, days: f64) -> Self {
        self.normalization.get_or_insert_with(Default::default).max = Some(days);
        self
    }

    pub fn default_value(mut self, value: f64) -> Self {
        self.normalization
            .get_or_insert_with(Default::default)
            .default_value = Some(value);
        self
    }
}

/// Session family a configuration is intended for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionScope {
    Routine,
    Extra,
    All,
}

impl SessionScope {
    pub const fn label(self) -> &'static str {
        match self {
            SessionScope::Routine => "routine",
            SessionScope::Extra => "extra",
            SessionScope::All => "all",
        }
    }
}

/// Named collection of criteria used for one ranking run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderingConfiguration {
    pub id: ConfigurationId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub criteria: Vec<Criterion>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<SessionScope>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

pub(crate) const PREVIEW_CONFIGURATION_ID: &str = "preview";
pub(crate) const PREVIEW_SCOPE_ID: &str = "preview";
pub(crate) const SYSTEM_ACTOR: &str = "system";

impl OrderingConfiguration {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        criteria: Vec<Criterion>,
        created_by: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ConfigurationId(id.into()),
            name: name.into(),
            description: String::new(),
            criteria,
            is_default: false,
            scope: None,
            created_by: created_by.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Unpersisted wrapper around a bare criteria list, used by previews.
    pub fn ephemeral(criteria: Vec<Criterion>, now: DateTime<Utc>) -> Self {
        Self {
            id: ConfigurationId(PREVIEW_CONFIGURATION_ID.to_string()),
            name: "Preview".to_string(),
            description: "Temporary preview configuration".to_string(),
            criteria,
            is_default: false,
            scope: None,
            created_by: SYSTEM_ACTOR.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn active_criteria(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria.iter().filter(|criterion| criterion.is_active)
    }

    pub fn total_active_weight(&self) -> i64 {
        self.active_criteria()
            .map(|criterion| i64::from(criterion.weight))
            .sum()
    }

    /// Whether the configuration is meant for sessions of the given scope.
    pub fn serves(&self, scope: SessionScope) -> bool {
        match self.scope {
            Some(SessionScope::All) => true,
            Some(own) => own == scope,
            None => false,
        }
    }
}
