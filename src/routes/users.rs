use std::{collections::BTreeSet, sync::Arc};

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    dispatch::{DispatchError, FilterSpec, resolve},
    domain::{Recipient, Role},
    recipient_store::StoreError,
    startup::AppState,
};

#[derive(Deserialize, Debug)]
pub struct UsersQuery {
    role: Option<Role>,
    email_domain: Option<String>,
    limit: Option<usize>,
}

impl From<UsersQuery> for FilterSpec {
    fn from(query: UsersQuery) -> Self {
        FilterSpec {
            roles: query.role.map(|role| BTreeSet::from([role])),
            email_domains: query.email_domain.map(|domain| vec![domain]),
            exclude_ids: None,
        }
    }
}

#[tracing::instrument(name = "Listing users", skip(app_state))]
pub async fn list_users(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<UsersQuery>,
) -> Result<Json<Vec<Recipient>>, UserError> {
    let limit = query.limit;
    let filter = FilterSpec::from(query);
    filter.check()?;

    let all = app_state.store.get_all().await?;
    let mut users = resolve(&all, Some(&filter));
    // A zero limit means no limit.
    if let Some(limit) = limit.filter(|&limit| limit > 0) {
        users.truncate(limit);
    }
    Ok(Json(users))
}

#[tracing::instrument(name = "Fetching a user", skip(app_state))]
pub async fn get_user(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Recipient>, UserError> {
    app_state
        .store
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or(UserError::NotFound(id))
}

#[derive(thiserror::Error, Debug)]
pub enum UserError {
    #[error("couldn't read users, {0}")]
    Unavailable(#[from] StoreError),
    #[error(transparent)]
    InvalidFilter(#[from] DispatchError),
    #[error("user {0} not found")]
    NotFound(i64),
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        match self {
            UserError::Unavailable(e) => {
                tracing::error!("{}", e);
                StatusCode::SERVICE_UNAVAILABLE.into_response()
            }
            UserError::InvalidFilter(e) => e.into_response(),
            UserError::NotFound(id) => {
                tracing::info!(user_id = id, "User not found");
                StatusCode::NOT_FOUND.into_response()
            }
        }
    }
}
