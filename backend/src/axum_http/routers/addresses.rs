use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use hometaste::domain::value_objects::delivery_address::RawAddressFields;

use crate::axum_http::{
    error_responses::AppError, extractors::AuthenticatedClient, http_serve::AppState,
};

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(list_addresses).post(submit_address))
        .with_state(state)
}

pub async fn list_addresses(
    State(_state): State<Arc<AppState>>,
    client: AuthenticatedClient,
) -> Result<impl IntoResponse, AppError> {
    let addresses = client
        .context
        .address_intake
        .list_addresses(&client.identity)
        .await?;

    Ok(Json(addresses))
}

/// Saves the address and captures it as the start of a subscription flow.
pub async fn submit_address(
    State(_state): State<Arc<AppState>>,
    client: AuthenticatedClient,
    Json(raw): Json<RawAddressFields>,
) -> Result<impl IntoResponse, AppError> {
    let context = &client.context;
    let _submission = context
        .try_begin_submission()
        .ok_or_else(|| AppError::Conflict("a submission is already in progress".to_string()))?;

    let stored = context
        .address_intake
        .submit(Some(&client.identity), raw)
        .await?;
    context.flow.lock().await.capture_address(stored.id)?;

    Ok((StatusCode::CREATED, Json(stored)))
}
