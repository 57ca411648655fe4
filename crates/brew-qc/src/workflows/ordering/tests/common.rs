use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use crate::workflows::ordering::domain::{
    ConfigurationId, Criterion, CriterionKind, OrderingConfiguration, SessionScope,
};
use crate::workflows::ordering::engine::OrderingResult;
use crate::workflows::ordering::repository::{
    ConfigurationRepository, OrderingResultStore, RepositoryError, ResultStoreError,
};
use crate::workflows::ordering::service::OrderingService;

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 9, 0, 0).unwrap()
}

/// Numeric score 0..100 and a boolean flag, equally weighted.
pub(super) fn score_and_flag_criteria() -> Vec<Criterion> {
    vec![
        Criterion::new("c-score", "Score", CriterionKind::Numeric, "score")
            .weight(50)
            .bounds(0.0, 100.0),
        Criterion::new("c-flag", "Flag", CriterionKind::Boolean, "flag").weight(50),
    ]
}

pub(super) fn score_and_flag_configuration() -> OrderingConfiguration {
    OrderingConfiguration::new("cfg-score-flag", "Score and flag", score_and_flag_criteria(), "qa")
}

pub(super) fn sample(id: &str, score: f64, flag: bool) -> Value {
    json!({ "id": id, "score": score, "flag": flag })
}

pub(super) fn brewery_samples() -> Vec<Value> {
    vec![
        json!({
            "id": "s-porter",
            "code": "POR-11",
            "production_date": "2025-08-15",
            "type": "Porter",
            "priority": "low",
            "quality": { "score": 71.0, "conformity": "pending" },
        }),
        json!({
            "id": "s-ipa",
            "code": "IPA-07",
            "production_date": "2025-09-28",
            "type": "IPA",
            "priority": "high",
            "quality": { "score": 92.5, "conformity": "conforming" },
        }),
        json!({
            "id": "s-lager",
            "code": "LAG-03",
            "production_date": "2025-09-16",
            "type": "Lager",
            "quality": { "score": 84.0, "conformity": "conforming" },
        }),
    ]
}

pub(super) fn ids<'a, I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Value>,
{
    items
        .into_iter()
        .map(|item| item["id"].as_str().unwrap_or_default().to_string())
        .collect()
}

pub(super) fn scoped_default(id: &str, scope: Option<SessionScope>) -> OrderingConfiguration {
    let mut configuration = OrderingConfiguration::new(id, id, score_and_flag_criteria(), "qa");
    configuration.is_default = true;
    configuration.scope = scope;
    configuration
}

#[derive(Default, Clone)]
pub(super) struct MemoryConfigurations {
    records: Arc<Mutex<BTreeMap<ConfigurationId, OrderingConfiguration>>>,
}

impl ConfigurationRepository for MemoryConfigurations {
    fn insert(
        &self,
        configuration: OrderingConfiguration,
    ) -> Result<OrderingConfiguration, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&configuration.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(configuration.id.clone(), configuration.clone());
        Ok(configuration)
    }

    fn upsert(&self, configuration: OrderingConfiguration) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(configuration.id.clone(), configuration);
        Ok(())
    }

    fn fetch(
        &self,
        id: &ConfigurationId,
    ) -> Result<Option<OrderingConfiguration>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<OrderingConfiguration>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

pub(super) struct UnavailableConfigurations;

impl ConfigurationRepository for UnavailableConfigurations {
    fn insert(
        &self,
        _configuration: OrderingConfiguration,
    ) -> Result<OrderingConfiguration, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn upsert(&self, _configuration: OrderingConfiguration) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn fetch(
        &self,
        _id: &ConfigurationId,
    ) -> Result<Option<OrderingConfiguration>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn list(&self) -> Result<Vec<OrderingConfiguration>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryResults {
    results: Arc<Mutex<HashMap<String, Vec<OrderingResult<Value>>>>>,
}

impl MemoryResults {
    pub(super) fn recorded(&self, scope_id: &str) -> usize {
        self.results
            .lock()
            .expect("results mutex poisoned")
            .get(scope_id)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl OrderingResultStore for MemoryResults {
    fn record(&self, result: OrderingResult<Value>) -> Result<(), ResultStoreError> {
        let mut guard = self.results.lock().expect("results mutex poisoned");
        guard.entry(result.scope_id.clone()).or_default().push(result);
        Ok(())
    }

    fn latest(&self, scope_id: &str) -> Result<Option<OrderingResult<Value>>, ResultStoreError> {
        let guard = self.results.lock().expect("results mutex poisoned");
        Ok(guard
            .get(scope_id)
            .and_then(|results| results.last().cloned()))
    }
}

pub(super) fn build_service() -> (
    OrderingService<MemoryConfigurations, MemoryResults>,
    MemoryConfigurations,
    MemoryResults,
) {
    let configurations = MemoryConfigurations::default();
    let results = MemoryResults::default();
    let service = OrderingService::new(Arc::new(configurations.clone()), Arc::new(results.clone()));
    (service, configurations, results)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
