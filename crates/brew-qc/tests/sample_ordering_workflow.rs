use std::io::Cursor;
use std::sync::{Arc, Mutex};

use brew_qc::workflows::ordering::{
    ConfigurationId, ConfigurationRepository, Criterion, CriterionKind, OrderingConfiguration,
    OrderingError, OrderingResult, OrderingResultStore, OrderingService, RepositoryError,
    ResultStoreError, SampleOrderingEngine, SessionScope, SortDirection, ROUTINE_DEFAULT_ID,
};
use brew_qc::workflows::samples::{Sample, SampleCsvImporter};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

const EXPORT: &str = "\
id,code,description,production_date,batch,type,priority,quality_score,quality_conformity
s-1,IPA-01,Hazy IPA,2025-09-28,B-11,IPA,high,92.5,conforming
s-2,LAG-02,Helles,2025-09-16,B-12,Lager,,84.0,conforming
s-3,POR-03,Robust porter,2025-08-15,B-13,Porter,low,71.0,pending
";

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 9, 0, 0).unwrap()
}

fn imported() -> Vec<Sample> {
    SampleCsvImporter::from_reader(Cursor::new(EXPORT)).expect("export imports")
}

fn sample_ids(samples: &[Sample]) -> Vec<&str> {
    samples.iter().map(|sample| sample.id.0.as_str()).collect()
}

#[test]
fn routine_default_ranks_imported_samples() {
    let samples = imported();

    let result = SampleOrderingEngine::new()
        .rank_at(
            &samples,
            &OrderingConfiguration::routine_default(),
            "tasting-2025-10-01",
            "panel-lead",
            now(),
        )
        .expect("routine ranking succeeds");

    assert_eq!(sample_ids(&result.ordered_items), vec!["s-3", "s-2", "s-1"]);
    let totals: Vec<f64> = result.scores.iter().map(|score| score.total_score).collect();
    assert_eq!(totals, vec![100.0, 42.5, 4.0]);
    assert_eq!(
        result.configuration_id,
        ConfigurationId(ROUTINE_DEFAULT_ID.to_string())
    );
}

#[test]
fn typed_and_json_samples_rank_identically() {
    let samples = imported();
    let as_json: Vec<Value> = samples
        .iter()
        .map(|sample| serde_json::to_value(sample).expect("sample serializes"))
        .collect();
    let configuration = OrderingConfiguration::new(
        "quality-first",
        "Quality first",
        vec![
            Criterion::new("quality", "Quality", CriterionKind::Numeric, "quality.score")
                .weight(70)
                .bounds(60.0, 100.0),
            Criterion::new("recency", "Recency", CriterionKind::Date, "production_date")
                .weight(30)
                .window_days(60.0),
        ],
        "qa",
    );
    let engine = SampleOrderingEngine::new();

    let typed = engine
        .rank_at(&samples, &configuration, "s", "qa", now())
        .expect("typed ranking");
    let untyped = engine
        .rank_at(&as_json, &configuration, "s", "qa", now())
        .expect("json ranking");

    assert_eq!(typed.scores, untyped.scores);
    assert_eq!(sample_ids(&typed.ordered_items), vec!["s-1", "s-2", "s-3"]);
}

#[test]
fn descending_numeric_prefers_lower_values() {
    let samples = imported();
    let configuration = OrderingConfiguration::new(
        "needs-attention",
        "Needs attention",
        vec![
            Criterion::new("quality", "Quality", CriterionKind::Numeric, "quality.score")
                .weight(100)
                .bounds(0.0, 100.0)
                .direction(SortDirection::Desc),
        ],
        "qa",
    );

    let result = SampleOrderingEngine::new()
        .rank_at(&samples, &configuration, "s", "qa", now())
        .expect("ranking succeeds");

    assert_eq!(sample_ids(&result.ordered_items), vec!["s-3", "s-2", "s-1"]);
}

#[test]
fn preview_tolerates_invalid_weights() {
    let samples = imported();
    let criteria = vec![
        Criterion::new("quality", "Quality", CriterionKind::Numeric, "quality.score").weight(0),
    ];

    let engine = SampleOrderingEngine::new();
    let error = engine
        .rank_at(
            &samples,
            &OrderingConfiguration::new("draft", "Draft", criteria.clone(), "qa"),
            "s",
            "qa",
            now(),
        )
        .expect_err("zero weight rejected");
    assert_eq!(error, OrderingError::NoActiveCriteria);

    let preview = engine.preview_at(&samples, &criteria, now());
    let order: Vec<&str> = preview.iter().map(|entry| entry.item.id.0.as_str()).collect();
    assert_eq!(order, vec!["s-1", "s-2", "s-3"]);
    assert!(preview.iter().all(|entry| entry.score == 0.0));
}

#[derive(Default)]
struct VecConfigurations(Mutex<Vec<OrderingConfiguration>>);

impl ConfigurationRepository for VecConfigurations {
    fn insert(
        &self,
        configuration: OrderingConfiguration,
    ) -> Result<OrderingConfiguration, RepositoryError> {
        let mut guard = self.0.lock().expect("mutex poisoned");
        if guard.iter().any(|existing| existing.id == configuration.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(configuration.clone());
        Ok(configuration)
    }

    fn upsert(&self, configuration: OrderingConfiguration) -> Result<(), RepositoryError> {
        let mut guard = self.0.lock().expect("mutex poisoned");
        guard.retain(|existing| existing.id != configuration.id);
        guard.push(configuration);
        Ok(())
    }

    fn fetch(
        &self,
        id: &ConfigurationId,
    ) -> Result<Option<OrderingConfiguration>, RepositoryError> {
        let guard = self.0.lock().expect("mutex poisoned");
        Ok(guard.iter().find(|existing| &existing.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<OrderingConfiguration>, RepositoryError> {
        Ok(self.0.lock().expect("mutex poisoned").clone())
    }
}

#[derive(Default)]
struct LastResult(Mutex<Option<OrderingResult<Value>>>);

impl OrderingResultStore for LastResult {
    fn record(&self, result: OrderingResult<Value>) -> Result<(), ResultStoreError> {
        *self.0.lock().expect("mutex poisoned") = Some(result);
        Ok(())
    }

    fn latest(&self, scope_id: &str) -> Result<Option<OrderingResult<Value>>, ResultStoreError> {
        let guard = self.0.lock().expect("mutex poisoned");
        Ok(guard
            .as_ref()
            .filter(|result| result.scope_id == scope_id)
            .cloned())
    }
}

#[test]
fn service_ranks_routine_sessions_with_the_default() {
    let service = OrderingService::new(
        Arc::new(VecConfigurations::default()),
        Arc::new(LastResult::default()),
    );
    service
        .register(OrderingConfiguration::routine_default())
        .expect("default registered");
    let items: Vec<Value> = imported()
        .iter()
        .map(|sample| serde_json::to_value(sample).expect("sample serializes"))
        .collect();

    let result = service
        .rank_with_default(SessionScope::Routine, &items, "tasting-7", "panel-lead")
        .expect("ranked");

    assert_eq!(result.ordered_items.len(), 3);
    assert_eq!(result.scores[0].final_position, 1);
    let latest = service.latest_result("tasting-7").expect("recorded");
    assert_eq!(latest.scope_id, "tasting-7");
    assert_eq!(latest.generated_by, "panel-lead");
}
