use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    domain::NewRecipient,
    notifications::{
        ConvocatoriaDetails, NotificationResult, send_convocatoria_chosen, send_welcome,
    },
    startup::AppState,
};

#[derive(Deserialize)]
pub struct WelcomeData {
    name: String,
    email: String,
}

impl TryFrom<WelcomeData> for NewRecipient {
    type Error = String;

    fn try_from(value: WelcomeData) -> Result<Self, Self::Error> {
        NewRecipient::parse(value.name, value.email)
    }
}

#[derive(Deserialize)]
pub struct ConvocatoriaData {
    user_name: String,
    user_email: String,
    #[serde(flatten)]
    details: ConvocatoriaDetails,
}

#[tracing::instrument(
    name = "Sending a welcome notification",
    skip(payload, app_state),
    fields(
        recipient_name = %payload.name,
        recipient_email = %payload.email
    )
)]
pub async fn welcome(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<WelcomeData>,
) -> Result<Json<NotificationResult>, NotificationError> {
    let recipient: NewRecipient = payload
        .try_into()
        .map_err(NotificationError::InvalidRecipient)?;

    Ok(Json(send_welcome(&app_state.email_client, &recipient).await))
}

/// Signup hook called by the auth service.
///
/// Same as [`welcome`], but an invalid name or email answers 422.
#[tracing::instrument(
    name = "Sending a welcome notification for a new user",
    skip(payload, app_state),
    fields(
        recipient_name = %payload.name,
        recipient_email = %payload.email
    )
)]
pub async fn user_created(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<WelcomeData>,
) -> Result<Json<NotificationResult>, NotificationError> {
    let recipient: NewRecipient = payload
        .try_into()
        .map_err(NotificationError::UnprocessableRecipient)?;

    Ok(Json(send_welcome(&app_state.email_client, &recipient).await))
}

#[tracing::instrument(
    name = "Sending a convocatoria chosen notification",
    skip(payload, app_state),
    fields(
        recipient_name = %payload.user_name,
        recipient_email = %payload.user_email,
        convocatoria = %payload.details.title
    )
)]
pub async fn convocatoria_chosen(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<ConvocatoriaData>,
) -> Result<Json<NotificationResult>, NotificationError> {
    let recipient = NewRecipient::parse(payload.user_name, payload.user_email)
        .map_err(NotificationError::InvalidRecipient)?;

    Ok(Json(
        send_convocatoria_chosen(&app_state.email_client, &recipient, &payload.details).await,
    ))
}

#[derive(thiserror::Error, Debug)]
pub enum NotificationError {
    #[error("invalid recipient, {0}")]
    InvalidRecipient(String),
    #[error("unprocessable recipient, {0}")]
    UnprocessableRecipient(String),
}

impl IntoResponse for NotificationError {
    fn into_response(self) -> Response {
        match self {
            NotificationError::InvalidRecipient(e) => {
                tracing::error!("{}", e);
                (StatusCode::BAD_REQUEST, e).into_response()
            }
            NotificationError::UnprocessableRecipient(e) => {
                tracing::error!("{}", e);
                (StatusCode::UNPROCESSABLE_ENTITY, e).into_response()
            }
        }
    }
}
