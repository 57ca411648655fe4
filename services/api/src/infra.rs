use brew_qc::config::OrderingSettings;
use brew_qc::error::AppError;
use brew_qc::workflows::ordering::{
    ConfigurationId, ConfigurationRepository, OrderingConfiguration, OrderingResult,
    OrderingResultStore, OrderingService, RepositoryError, ResultStoreError,
};
use brew_qc::workflows::samples::SampleCsvImporter;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

pub(crate) type AppOrderingService =
    OrderingService<InMemoryConfigurationRepository, InMemoryResultStore>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryConfigurationRepository {
    records: Arc<Mutex<BTreeMap<ConfigurationId, OrderingConfiguration>>>,
}

impl ConfigurationRepository for InMemoryConfigurationRepository {
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

/// Keeps the most recent ranking runs per scope, oldest evicted first.
#[derive(Clone)]
pub(crate) struct InMemoryResultStore {
    history: usize,
    results: Arc<Mutex<HashMap<String, VecDeque<OrderingResult<Value>>>>>,
}

impl InMemoryResultStore {
    pub(crate) fn with_history(history: usize) -> Self {
        Self {
            history: history.max(1),
            results: Arc::default(),
        }
    }

    #[cfg(test)]
    pub(crate) fn retained(&self, scope_id: &str) -> usize {
        self.results
            .lock()
            .expect("result store mutex poisoned")
            .get(scope_id)
            .map(VecDeque::len)
            .unwrap_or(0)
    }
}

impl OrderingResultStore for InMemoryResultStore {
    fn record(&self, result: OrderingResult<Value>) -> Result<(), ResultStoreError> {
        let mut guard = self.results.lock().expect("result store mutex poisoned");
        let runs = guard.entry(result.scope_id.clone()).or_default();
        runs.push_back(result);
        while runs.len() > self.history {
            runs.pop_front();
        }
        Ok(())
    }

    fn latest(&self, scope_id: &str) -> Result<Option<OrderingResult<Value>>, ResultStoreError> {
        let guard = self.results.lock().expect("result store mutex poisoned");
        Ok(guard.get(scope_id).and_then(|runs| runs.back().cloned()))
    }
}

/// Builds the ordering service with the routine default and any catalog entries seeded.
///
/// Catalog entries replace the built-in default when they reuse its id.
pub(crate) fn ordering_service(
    settings: &OrderingSettings,
) -> Result<Arc<AppOrderingService>, AppError> {
    let service = OrderingService::new(
        Arc::new(InMemoryConfigurationRepository::default()),
        Arc::new(InMemoryResultStore::with_history(settings.result_history)),
    );

    service.register(OrderingConfiguration::routine_default())?;
    if let Some(path) = &settings.catalog_path {
        let catalog = load_catalog(path)?;
        info!(path = %path.display(), configurations = catalog.len(), "seeding ordering catalog");
        for configuration in catalog {
            service.save(configuration)?;
        }
    }

    Ok(Arc::new(service))
}

/// Reads a JSON array of ordering configurations.
pub(crate) fn load_catalog(path: &Path) -> Result<Vec<OrderingConfiguration>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Reads a single ordering configuration.
pub(crate) fn load_configuration(path: &Path) -> Result<OrderingConfiguration, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Loads items to rank. `.csv` exports go through the sample importer; anything else is read
/// as a JSON array of objects.
pub(crate) fn load_items(path: &Path) -> Result<Vec<Value>, AppError> {
    let is_csv = path
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("csv"));

    if is_csv {
        let samples = SampleCsvImporter::from_path(path)?;
        return samples
            .iter()
            .map(|sample| serde_json::to_value(sample).map_err(AppError::from))
            .collect();
    }

    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
