use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use super::domain::{ConfigurationId, Criterion, OrderingConfiguration, SessionScope};
use super::engine::{
    self, OrderingError, OrderingResult, PreviewEntry, SampleOrderingEngine,
};
use super::repository::{
    ConfigurationRepository, OrderingResultStore, RepositoryError, ResultStoreError,
};

/// Service composing the configuration repository, the result store, and the engine.
pub struct OrderingService<R, S> {
    repository: Arc<R>,
    results: Arc<S>,
    engine: SampleOrderingEngine,
}

impl<R, S> OrderingService<R, S>
where
    R: ConfigurationRepository + 'static,
    S: OrderingResultStore + 'static,
{
    pub fn new(repository: Arc<R>, results: Arc<S>) -> Self {
        Self {
            repository,
            results,
            engine: SampleOrderingEngine::new(),
        }
    }

    /// Register a new configuration; duplicates are rejected.
    pub fn register(
        &self,
        configuration: OrderingConfiguration,
    ) -> Result<OrderingConfiguration, OrderingServiceError> {
        let stored = self.repository.insert(configuration)?;
        info!(configuration_id = %stored.id, "ordering configuration registered");
        Ok(stored)
    }

    /// Create or replace a configuration, refreshing its `updated_at` stamp.
    pub fn save(
        &self,
        mut configuration: OrderingConfiguration,
    ) -> Result<OrderingConfiguration, OrderingServiceError> {
        configuration.updated_at = Utc::now();
        self.repository.upsert(configuration.clone())?;
        Ok(configuration)
    }

    pub fn configuration(
        &self,
        id: &ConfigurationId,
    ) -> Result<OrderingConfiguration, OrderingServiceError> {
        let configuration = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(configuration)
    }

    pub fn configurations(&self) -> Result<Vec<OrderingConfiguration>, OrderingServiceError> {
        Ok(self.repository.list()?)
    }

    /// Resolve the default configuration for a session scope.
    ///
    /// A default scoped exactly to `scope` wins over one scoped `all`, which wins over an
    /// unscoped default.
    pub fn default_for(
        &self,
        scope: SessionScope,
    ) -> Result<OrderingConfiguration, OrderingServiceError> {
        let defaults: Vec<OrderingConfiguration> = self
            .repository
            .list()?
            .into_iter()
            .filter(|configuration| configuration.is_default)
            .collect();

        let exact = defaults
            .iter()
            .position(|configuration| configuration.scope == Some(scope));
        let shared = defaults
            .iter()
            .position(|configuration| configuration.serves(scope));

        exact
            .or(shared)
            .or_else(|| (!defaults.is_empty()).then_some(0))
            .and_then(|index| defaults.into_iter().nth(index))
            .ok_or(OrderingServiceError::Repository(RepositoryError::NotFound))
    }

    /// Rank items with a stored configuration and record the result for the scope.
    pub fn rank(
        &self,
        configuration_id: &ConfigurationId,
        items: &[Value],
        scope_id: &str,
        actor_id: &str,
    ) -> Result<OrderingResult<Value>, OrderingServiceError> {
        let configuration = self.configuration(configuration_id)?;
        self.rank_with(&configuration, items, scope_id, actor_id)
    }

    /// Rank items with the default configuration for a session scope.
    pub fn rank_with_default(
        &self,
        session_scope: SessionScope,
        items: &[Value],
        scope_id: &str,
        actor_id: &str,
    ) -> Result<OrderingResult<Value>, OrderingServiceError> {
        let configuration = self.default_for(session_scope)?;
        self.rank_with(&configuration, items, scope_id, actor_id)
    }

    /// Rank items with an inline configuration and record the result for the scope.
    pub fn rank_with(
        &self,
        configuration: &OrderingConfiguration,
        items: &[Value],
        scope_id: &str,
        actor_id: &str,
    ) -> Result<OrderingResult<Value>, OrderingServiceError> {
        let result = self
            .engine
            .rank(items, configuration, scope_id, actor_id)?;
        self.results.record(result.clone())?;
        info!(
            configuration_id = %result.configuration_id,
            scope_id,
            items = result.ordered_items.len(),
            "ordering result recorded"
        );
        Ok(result)
    }

    /// Preview an unsaved criteria list. Never fails and never records anything.
    pub fn preview(&self, items: &[Value], criteria: &[Criterion]) -> Vec<PreviewEntry<Value>> {
        self.engine.preview(items, criteria)
    }

    /// Preview criteria exactly as an editor sent them. Drafts that do not parse as criteria
    /// keep the input order with zero scores.
    pub fn preview_draft(&self, items: &[Value], criteria: &[Value]) -> Vec<PreviewEntry<Value>> {
        match serde_json::from_value::<Vec<Criterion>>(Value::Array(criteria.to_vec())) {
            Ok(criteria) => self.preview(items, &criteria),
            Err(err) => {
                warn!(error = %err, "preview criteria not parseable; keeping input order");
                engine::input_order(items)
            }
        }
    }

    pub fn latest_result(
        &self,
        scope_id: &str,
    ) -> Result<OrderingResult<Value>, OrderingServiceError> {
        let result = self
            .results
            .latest(scope_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(result)
    }
}

/// Error raised by the ordering service.
#[derive(Debug, thiserror::Error)]
pub enum OrderingServiceError {
    #[error(transparent)]
    Ordering(#[from] OrderingError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Store(#[from] ResultStoreError),
}
