use chrono::{DateTime, Utc};

use super::super::domain::Criterion;
use super::super::extract::Extractable;
use super::normalize::{clamp_score, normalize};
use super::validation::ScoringPlan;
use super::{CriterionScore, SampleScore};

pub(crate) fn score_criterion<T: Extractable>(
    item: &T,
    criterion: &Criterion,
    total_active_weight: f64,
    now: DateTime<Utc>,
) -> CriterionScore {
    let raw_value = item.field(&criterion.data_path);
    let normalized_value = normalize(raw_value.as_ref(), criterion, now);
    let weighted_score = normalized_value * f64::from(criterion.weight) / total_active_weight;

    CriterionScore {
        criterion_id: criterion.id.clone(),
        raw_value,
        normalized_value,
        weighted_score,
    }
}

/// Scores one item against every active criterion. `final_position` stays 0 until ranking.
pub(crate) fn score_item<T: Extractable>(
    item: &T,
    plan: &ScoringPlan<'_>,
    now: DateTime<Utc>,
) -> SampleScore {
    let criteria_scores: Vec<CriterionScore> = plan
        .active
        .iter()
        .map(|criterion| score_criterion(item, criterion, plan.total_weight, now))
        .collect();

    // Float summation can land a hair outside the scale.
    let total_score = clamp_score(
        criteria_scores
            .iter()
            .map(|score| score.weighted_score)
            .sum::<f64>(),
    );

    SampleScore {
        item_id: item.item_id(),
        total_score,
        criteria_scores,
        final_position: 0,
    }
}
