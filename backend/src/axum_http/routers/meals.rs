use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;

use crate::axum_http::{
    error_responses::AppError, extractors::AuthenticatedClient, http_serve::AppState,
};

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new().route("/", get(list_meals)).with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub struct MealFilter {
    pub cuisine: Option<String>,
}

pub async fn list_meals(
    State(_state): State<Arc<AppState>>,
    client: AuthenticatedClient,
    Query(filter): Query<MealFilter>,
) -> Result<impl IntoResponse, AppError> {
    let meals = client
        .context
        .meal_catalog
        .list(filter.cuisine.as_deref())
        .await?;

    Ok(Json(meals))
}
