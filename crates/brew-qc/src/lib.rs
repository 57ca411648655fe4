//! Quality-control tooling for brewery tasting sessions.
//!
//! The crate centres on the sample ordering engine: a weighted, multi-criterion ranking of
//! tasting samples with an auditable score breakdown per sample. Configuration, telemetry,
//! and the HTTP router live alongside it so services can embed the whole stack.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
