use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    dispatch::{
        DispatchError, DispatchReport, FilterSpec, ValidationReport, dispatch_from_store,
        validate_from_store,
    },
    startup::AppState,
};

#[derive(Deserialize)]
pub struct BulkEmailData {
    subject: String,
    content: String,
    filters: Option<FilterSpec>,
}

#[derive(Deserialize)]
pub struct BulkValidationData {
    filters: Option<FilterSpec>,
}

#[derive(Serialize)]
pub struct BulkEmailResponse {
    message: String,
    #[serde(flatten)]
    report: DispatchReport,
}

#[tracing::instrument(
    name = "Sending a bulk email",
    skip(payload, app_state),
    fields(subject = %payload.subject, filters = ?payload.filters)
)]
pub async fn send_bulk_email(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<BulkEmailData>,
) -> Result<Json<BulkEmailResponse>, DispatchError> {
    let report = dispatch_from_store(
        app_state.store.as_ref(),
        &app_state.email_client,
        payload.filters.as_ref(),
        &payload.subject,
        &payload.content,
    )
    .await?;

    Ok(Json(BulkEmailResponse {
        message: report.summary(),
        report,
    }))
}

#[tracing::instrument(
    name = "Validating a bulk email",
    skip(payload, app_state),
    fields(filters = ?payload.filters)
)]
pub async fn validate_bulk_email(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<BulkValidationData>,
) -> Result<Json<ValidationReport>, DispatchError> {
    let report = validate_from_store(
        app_state.store.as_ref(),
        payload.filters.as_ref(),
        &app_state.preview,
    )
    .await?;

    Ok(Json(report))
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        tracing::error!("{}", self);
        match self {
            DispatchError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE.into_response(),
            DispatchError::MalformedFilter(e) => (StatusCode::BAD_REQUEST, e).into_response(),
        }
    }
}
