use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::domain::{ConfigurationId, OrderingConfiguration, SessionScope};
use super::repository::{ConfigurationRepository, OrderingResultStore, RepositoryError};
use super::service::{OrderingService, OrderingServiceError};

/// Body of a strict ranking request.
///
/// The configuration is resolved from, in order: the inline `configuration`, the stored
/// `configuration_id`, or the default for `session_scope`.
#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub scope_id: String,
    pub actor_id: String,
    #[serde(default)]
    pub configuration_id: Option<ConfigurationId>,
    #[serde(default)]
    pub configuration: Option<OrderingConfiguration>,
    #[serde(default)]
    pub session_scope: Option<SessionScope>,
    pub items: Vec<Value>,
}

/// Body of a preview request. Criteria stay untyped so half-edited drafts still preview.
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub criteria: Vec<Value>,
    #[serde(default)]
    pub items: Vec<Value>,
}

/// Router builder exposing ordering configuration and ranking endpoints.
pub fn ordering_router<R, S>(service: Arc<OrderingService<R, S>>) -> Router
where
    R: ConfigurationRepository + 'static,
    S: OrderingResultStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/ordering/configurations",
            get(list_configurations_handler::<R, S>).post(register_configuration_handler::<R, S>),
        )
        .route(
            "/api/v1/ordering/configurations/:configuration_id",
            get(configuration_handler::<R, S>),
        )
        .route("/api/v1/ordering/rank", post(rank_handler::<R, S>))
        .route("/api/v1/ordering/preview", post(preview_handler::<R, S>))
        .route(
            "/api/v1/ordering/results/:scope_id",
            get(latest_result_handler::<R, S>),
        )
        .with_state(service)
}

pub(crate) async fn list_configurations_handler<R, S>(
    State(service): State<Arc<OrderingService<R, S>>>,
) -> Response
where
    R: ConfigurationRepository + 'static,
    S: OrderingResultStore + 'static,
{
    match service.configurations() {
        Ok(configurations) => (StatusCode::OK, Json(configurations)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn register_configuration_handler<R, S>(
    State(service): State<Arc<OrderingService<R, S>>>,
    Json(configuration): Json<OrderingConfiguration>,
) -> Response
where
    R: ConfigurationRepository + 'static,
    S: OrderingResultStore + 'static,
{
    match service.register(configuration) {
        Ok(stored) => (StatusCode::CREATED, Json(stored)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn configuration_handler<R, S>(
    State(service): State<Arc<OrderingService<R, S>>>,
    Path(configuration_id): Path<String>,
) -> Response
where
    R: ConfigurationRepository + 'static,
    S: OrderingResultStore + 'static,
{
    match service.configuration(&ConfigurationId(configuration_id)) {
        Ok(configuration) => (StatusCode::OK, Json(configuration)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn rank_handler<R, S>(
    State(service): State<Arc<OrderingService<R, S>>>,
    Json(request): Json<RankRequest>,
) -> Response
where
    R: ConfigurationRepository + 'static,
    S: OrderingResultStore + 'static,
{
    let RankRequest {
        scope_id,
        actor_id,
        configuration_id,
        configuration,
        session_scope,
        items,
    } = request;

    let outcome = match (configuration, configuration_id) {
        (Some(configuration), _) => service.rank_with(&configuration, &items, &scope_id, &actor_id),
        (None, Some(id)) => service.rank(&id, &items, &scope_id, &actor_id),
        (None, None) => service.rank_with_default(
            session_scope.unwrap_or(SessionScope::All),
            &items,
            &scope_id,
            &actor_id,
        ),
    };

    match outcome {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn preview_handler<R, S>(
    State(service): State<Arc<OrderingService<R, S>>>,
    Json(request): Json<PreviewRequest>,
) -> Response
where
    R: ConfigurationRepository + 'static,
    S: OrderingResultStore + 'static,
{
    let entries = service.preview_draft(&request.items, &request.criteria);
    (StatusCode::OK, Json(entries)).into_response()
}

pub(crate) async fn latest_result_handler<R, S>(
    State(service): State<Arc<OrderingService<R, S>>>,
    Path(scope_id): Path<String>,
) -> Response
where
    R: ConfigurationRepository + 'static,
    S: OrderingResultStore + 'static,
{
    match service.latest_result(&scope_id) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: OrderingServiceError) -> Response {
    let (status, payload) = match &error {
        OrderingServiceError::Ordering(ordering) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "error": ordering.to_string(), "kind": ordering.kind() }),
        ),
        OrderingServiceError::Repository(RepositoryError::NotFound) => (
            StatusCode::NOT_FOUND,
            json!({ "error": "ordering record not found" }),
        ),
        OrderingServiceError::Repository(RepositoryError::Conflict) => (
            StatusCode::CONFLICT,
            json!({ "error": "ordering configuration already exists" }),
        ),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": other.to_string() }),
        ),
    };
    (status, Json(payload)).into_response()
}
