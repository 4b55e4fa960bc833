use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::axum_http::{
    error_responses::AppError, extractors::AuthenticatedClient, http_serve::AppState,
};

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/:chef_id", get(chef_profile))
        .with_state(state)
}

pub async fn chef_profile(
    State(_state): State<Arc<AppState>>,
    client: AuthenticatedClient,
    Path(chef_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let profile = client.context.chef_profiles.get_profile(chef_id).await?;
    Ok(Json(profile))
}
