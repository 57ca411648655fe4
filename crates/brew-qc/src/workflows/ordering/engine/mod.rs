mod normalize;
mod ranking;
mod scoring;
mod validation;

pub use validation::OrderingError;

pub(crate) use normalize::parse_timestamp;

use std::panic::{self, AssertUnwindSafe};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};

use super::domain::{
    ConfigurationId, Criterion, CriterionId, OrderingConfiguration, PREVIEW_SCOPE_ID,
    SYSTEM_ACTOR,
};
use super::extract::Extractable;

/// Stateless ranking engine. Safe to share across threads; every call is independent.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleOrderingEngine;

impl SampleOrderingEngine {
    pub fn new() -> Self {
        Self
    }

    /// Strict ranking: validation errors are returned unchanged and nothing is scored.
    pub fn rank<T>(
        &self,
        items: &[T],
        configuration: &OrderingConfiguration,
        scope_id: &str,
        actor_id: &str,
    ) -> Result<OrderingResult<T>, OrderingError>
    where
        T: Extractable + Clone,
    {
        self.rank_at(items, configuration, scope_id, actor_id, Utc::now())
    }

    /// Same as [`rank`](Self::rank) with an explicit clock for date criteria and stamping.
    pub fn rank_at<T>(
        &self,
        items: &[T],
        configuration: &OrderingConfiguration,
        scope_id: &str,
        actor_id: &str,
        now: DateTime<Utc>,
    ) -> Result<OrderingResult<T>, OrderingError>
    where
        T: Extractable + Clone,
    {
        let plan = validation::validate(items, configuration)?;
        debug!(
            configuration_id = %configuration.id,
            items = items.len(),
            active_criteria = plan.active.len(),
            total_weight = plan.total_weight,
            "ranking samples"
        );

        let scores = items
            .iter()
            .map(|item| scoring::score_item(item, &plan, now))
            .collect();

        let (ordered_items, scores) = ranking::rank(scores)
            .into_iter()
            .map(|ranked| (items[ranked.index].clone(), ranked.score))
            .unzip();

        Ok(OrderingResult {
            configuration_id: configuration.id.clone(),
            scope_id: scope_id.to_string(),
            ordered_items,
            scores,
            applied_at: now,
            generated_by: actor_id.to_string(),
        })
    }

    /// Lenient ranking for live editors. Never fails: any validation error or panic
    /// degrades to the input order with zero scores.
    pub fn preview<T>(&self, items: &[T], criteria: &[Criterion]) -> Vec<PreviewEntry<T>>
    where
        T: Extractable + Clone,
    {
        self.preview_at(items, criteria, Utc::now())
    }

    pub fn preview_at<T>(
        &self,
        items: &[T],
        criteria: &[Criterion],
        now: DateTime<Utc>,
    ) -> Vec<PreviewEntry<T>>
    where
        T: Extractable + Clone,
    {
        let configuration = OrderingConfiguration::ephemeral(criteria.to_vec(), now);
        let attempt = panic::catch_unwind(AssertUnwindSafe(|| {
            self.rank_at(items, &configuration, PREVIEW_SCOPE_ID, SYSTEM_ACTOR, now)
        }));

        match attempt {
            Ok(Ok(result)) => result
                .ordered_items
                .into_iter()
                .zip(result.scores)
                .map(|(item, score)| PreviewEntry {
                    item,
                    score: score.total_score,
                    position: score.final_position,
                })
                .collect(),
            Ok(Err(err)) => {
                warn!(error = %err, kind = err.kind(), "preview ordering rejected; keeping input order");
                input_order(items)
            }
            Err(_) => {
                error!("preview ordering panicked; keeping input order");
                input_order(items)
            }
        }
    }
}

/// Degraded preview: items in caller order, all scored 0.
pub(crate) fn input_order<T: Clone>(items: &[T]) -> Vec<PreviewEntry<T>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| PreviewEntry {
            item: item.clone(),
            score: 0.0,
            position: index + 1,
        })
        .collect()
}

/// Audit record of one criterion's contribution to a sample's total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub criterion_id: CriterionId,
    pub raw_value: Option<Value>,
    pub normalized_value: f64,
    pub weighted_score: f64,
}

/// Composite score for one sample together with its breakdown and final position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleScore {
    pub item_id: String,
    pub total_score: f64,
    pub criteria_scores: Vec<CriterionScore>,
    pub final_position: usize,
}

impl SampleScore {
    /// One line per criterion, suitable for audit logs and CLI output.
    pub fn explain(&self) -> Vec<String> {
        self.criteria_scores
            .iter()
            .map(|score| {
                let raw = score
                    .raw_value
                    .as_ref()
                    .map(Value::to_string)
                    .unwrap_or_else(|| "absent".to_string());
                format!(
                    "{}: raw {} -> normalized {:.2} -> weighted {:.2}",
                    score.criterion_id, raw, score.normalized_value, score.weighted_score
                )
            })
            .collect()
    }
}

/// Output of one strict ranking run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderingResult<T> {
    pub configuration_id: ConfigurationId,
    pub scope_id: String,
    pub ordered_items: Vec<T>,
    pub scores: Vec<SampleScore>,
    pub applied_at: DateTime<Utc>,
    pub generated_by: String,
}

impl<T> OrderingResult<T> {
    /// Ranked items paired with their scores, best first.
    pub fn ranked(&self) -> impl Iterator<Item = (&T, &SampleScore)> {
        self.ordered_items.iter().zip(self.scores.iter())
    }
}

/// One row of a preview ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewEntry<T> {
    pub item: T,
    pub score: f64,
    pub position: usize,
}
