//! Sample ordering: weighted multi-criterion ranking of tasting samples.
//!
//! The engine itself is pure and stateless. The service and router wrap it with storage
//! collaborators supplied by the embedding application.

mod catalog;
pub mod domain;
pub(crate) mod engine;
pub mod extract;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::ROUTINE_DEFAULT_ID;
pub use domain::{
    ConfigurationId, Criterion, CriterionId, CriterionKind, NormalizationConfig,
    OrderingConfiguration, SessionScope, SortDirection,
};
pub use engine::{
    CriterionScore, OrderingError, OrderingResult, PreviewEntry, SampleOrderingEngine,
    SampleScore,
};
pub use extract::{extract, Extractable};
pub use repository::{
    ConfigurationRepository, OrderingResultStore, RepositoryError, ResultStoreError,
};
pub use router::{ordering_router, PreviewRequest, RankRequest};
pub use service::{OrderingService, OrderingServiceError};
