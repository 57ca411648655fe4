use serde_json::Value;

use super::domain::{ConfigurationId, OrderingConfiguration};
use super::engine::OrderingResult;

/// Storage abstraction for authored configurations.
pub trait ConfigurationRepository: Send + Sync {
    fn insert(
        &self,
        configuration: OrderingConfiguration,
    ) -> Result<OrderingConfiguration, RepositoryError>;
    fn upsert(&self, configuration: OrderingConfiguration) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ConfigurationId)
        -> Result<Option<OrderingConfiguration>, RepositoryError>;
    fn list(&self) -> Result<Vec<OrderingConfiguration>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Sink for completed ranking runs, keyed by the scope (session) they were produced for.
pub trait OrderingResultStore: Send + Sync {
    fn record(&self, result: OrderingResult<Value>) -> Result<(), ResultStoreError>;
    fn latest(&self, scope_id: &str) -> Result<Option<OrderingResult<Value>>, ResultStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ResultStoreError {
    #[error("result store unavailable: {0}")]
    Unavailable(String),
}
