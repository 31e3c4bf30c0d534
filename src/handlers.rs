use crate::errors::AppError;
use crate::models::{ClientRecord, NewClient, OnboardParams};
use crate::offers::Locale;
use crate::pipeline::OnboardingPipeline;
use crate::store::ClientStore;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Shared application state injected into handlers.
pub struct AppState<S> {
    /// Onboarding pipeline, owning the client store.
    pub pipeline: OnboardingPipeline<S>,
}

impl<S: ClientStore> AppState<S> {
    pub fn new(pipeline: OnboardingPipeline<S>) -> Self {
        Self { pipeline }
    }
}

/// Health check endpoint.
///
/// Returns the service status and version.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "client-onboarding",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /api/v1/clients
///
/// Validates, scores and stores a new client. An unparseable body or query is
/// reported as a validation failure, same as a missing field. A body that could
/// not be read at all (e.g. over the size limit) keeps its own status.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `params` - Optional `lang` override for the offer message.
/// * `payload` - The submitted client attributes.
///
/// # Returns
///
/// * `Result<(StatusCode, Json<ClientRecord>), AppError>` - 201 with the record, or an error.
pub async fn onboard_client<S: ClientStore>(
    State(state): State<Arc<AppState<S>>>,
    params: Result<Query<OnboardParams>, QueryRejection>,
    payload: Result<Json<NewClient>, JsonRejection>,
) -> Result<(StatusCode, Json<ClientRecord>), AppError> {
    let Query(params) =
        params.map_err(|rejection| AppError::ValidationError(rejection.body_text()))?;
    let Json(payload) = payload.map_err(body_rejection)?;

    let locale = match params.lang.as_deref() {
        Some(lang) => lang.parse::<Locale>().map_err(AppError::ValidationError)?,
        None => state.pipeline.locale(),
    };

    tracing::info!("POST /clients - locale {}", locale);

    let record = state.pipeline.onboard_with_locale(payload, locale).await?;

    Ok((StatusCode::CREATED, Json(record)))
}

fn body_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::BytesRejection(rejection) => AppError::RequestRejected {
            status: rejection.status(),
            message: rejection.body_text(),
        },
        other => AppError::ValidationError(other.body_text()),
    }
}

/// GET /api/v1/clients
///
/// Lists every client, most recently created first.
pub async fn list_clients<S: ClientStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<ClientRecord>>, AppError> {
    let clients = state.pipeline.list_clients().await?;
    tracing::debug!("GET /clients - {} record(s)", clients.len());
    Ok(Json(clients))
}

/// GET /api/v1/clients/:id
pub async fn get_client<S: ClientStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClientRecord>, AppError> {
    tracing::info!("GET /clients/{}", id);
    let client = state.pipeline.find_client(id).await?;
    Ok(Json(client))
}
