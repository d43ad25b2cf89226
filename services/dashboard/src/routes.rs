use crate::infra::{AppState, ReportState};
use account_insight::error::AppError;
use account_insight::workflows::account_report::{AccountDirectory, ReportEnvelope};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct AccountReportRequest {
    #[serde(default)]
    pub(crate) online_id: Option<String>,
}

pub(crate) fn with_report_routes<D>(state: ReportState<D>) -> Router
where
    D: AccountDirectory + 'static,
{
    Router::new()
        .route(
            "/api/v1/accounts/report",
            post(account_report_endpoint::<D>),
        )
        .with_state(state)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Report failures are domain outcomes and travel as `ok: false` with 200;
/// only a missing online id or credential changes the status code.
pub(crate) async fn account_report_endpoint<D>(
    State(state): State<ReportState<D>>,
    Json(payload): Json<AccountReportRequest>,
) -> Result<(StatusCode, Json<ReportEnvelope>), AppError>
where
    D: AccountDirectory + 'static,
{
    let online_id = payload
        .online_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty());
    let Some(online_id) = online_id else {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(ReportEnvelope::failed("online id is required")),
        ));
    };

    let credential = state.credential.clone().ok_or(AppError::MissingCredential)?;
    let builder = Arc::clone(&state.builder);

    // Directory sessions are blocking; keep them off the async workers.
    let result = tokio::task::spawn_blocking(move || builder.build(&online_id, &credential))
        .await
        .map_err(std::io::Error::from)?;

    Ok((StatusCode::OK, Json(ReportEnvelope::from(result))))
}
