use proptest::prelude::*;
use serde_json::{json, Value};

use super::common::{now, score_and_flag_configuration};
use crate::workflows::ordering::domain::{
    Criterion, CriterionKind, OrderingConfiguration, SortDirection,
};
use crate::workflows::ordering::engine::SampleOrderingEngine;

fn samples(values: &[(f64, bool)]) -> Vec<Value> {
    values
        .iter()
        .enumerate()
        .map(|(index, (score, flag))| json!({ "id": format!("s-{index}"), "score": score, "flag": flag }))
        .collect()
}

fn single_numeric(direction: SortDirection) -> OrderingConfiguration {
    OrderingConfiguration::new(
        "cfg-numeric",
        "Numeric",
        vec![Criterion::new("c-score", "Score", CriterionKind::Numeric, "score")
            .weight(100)
            .bounds(0.0, 100.0)
            .direction(direction)],
        "qa",
    )
}

proptest! {
    #[test]
    fn totals_stay_on_scale(values in prop::collection::vec((-500.0..500.0f64, any::<bool>()), 1..24)) {
        let items = samples(&values);
        let result = SampleOrderingEngine::new()
            .rank_at(&items, &score_and_flag_configuration(), "s", "qa", now())
            .expect("valid configuration");

        for score in &result.scores {
            prop_assert!((0.0..=100.0).contains(&score.total_score));
        }
    }

    #[test]
    fn ranking_is_a_descending_permutation(values in prop::collection::vec((0.0..100.0f64, any::<bool>()), 1..24)) {
        let items = samples(&values);
        let result = SampleOrderingEngine::new()
            .rank_at(&items, &score_and_flag_configuration(), "s", "qa", now())
            .expect("valid configuration");

        prop_assert_eq!(result.ordered_items.len(), items.len());
        let positions: Vec<usize> = result.scores.iter().map(|score| score.final_position).collect();
        let expected: Vec<usize> = (1..=items.len()).collect();
        prop_assert_eq!(positions, expected);

        let mut seen: Vec<String> = result.scores.iter().map(|score| score.item_id.clone()).collect();
        seen.sort();
        let mut original: Vec<String> = (0..items.len()).map(|index| format!("s-{index}")).collect();
        original.sort();
        prop_assert_eq!(seen, original);

        for pair in result.scores.windows(2) {
            prop_assert!(pair[0].total_score >= pair[1].total_score);
        }
    }

    #[test]
    fn direction_orders_numeric_values(low in 0.0..50.0f64, high in 50.0..100.0f64) {
        prop_assume!(low < high);
        let items = samples(&[(low, false), (high, false)]);
        let engine = SampleOrderingEngine::new();

        let ascending = engine
            .rank_at(&items, &single_numeric(SortDirection::Asc), "s", "qa", now())
            .expect("valid configuration");
        let descending = engine
            .rank_at(&items, &single_numeric(SortDirection::Desc), "s", "qa", now())
            .expect("valid configuration");

        prop_assert_eq!(ascending.scores[0].item_id.as_str(), "s-1");
        prop_assert_eq!(descending.scores[0].item_id.as_str(), "s-0");
    }

    #[test]
    fn preview_never_drops_items(values in prop::collection::vec((-50.0..150.0f64, any::<bool>()), 0..16), weight in -20i32..200) {
        let items = samples(&values);
        let criteria = vec![Criterion::new("c-score", "Score", CriterionKind::Numeric, "score").weight(weight)];

        let entries = SampleOrderingEngine::new().preview_at(&items, &criteria, now());

        prop_assert_eq!(entries.len(), items.len());
        for (offset, entry) in entries.iter().enumerate() {
            prop_assert_eq!(entry.position, offset + 1);
        }
    }
}
