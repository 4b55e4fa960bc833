use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use hometaste::domain::value_objects::identity::Identity;
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use crate::{
    axum_http::{error_responses::AppError, extractors::MaybeClient, http_serve::AppState},
    usecases::session_resolver::Resolution,
};

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/sign-in", get(sign_in))
        .route("/callback", post(callback))
        .route("/sign-out", post(sign_out))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct CallbackRequest {
    pub redirect_url: String,
}

#[derive(Debug, Serialize)]
pub struct CallbackResponse {
    pub authenticated: bool,
    pub redirect_to: &'static str,
    pub identity: Option<Identity>,
    pub error: Option<String>,
}

impl From<Resolution> for CallbackResponse {
    fn from(resolution: Resolution) -> Self {
        Self {
            authenticated: resolution.identity().is_some(),
            redirect_to: resolution.redirect_target().as_path(),
            error: resolution.failure().map(ToString::to_string),
            identity: match resolution {
                Resolution::Authenticated(identity) => Some(identity),
                Resolution::Unauthenticated(_) => None,
            },
        }
    }
}

pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    let (jar, context) = state.sessions.find_or_create(jar).await;
    let authorize_url = context
        .session_resolver
        .sign_in_url(state.oauth_provider, &state.callback_url)?;

    Ok((jar, Redirect::to(authorize_url.as_str())))
}

/// Resolves a redirect URL captured by the browser, fragment included.
pub async fn callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<CallbackRequest>,
) -> Result<Response, AppError> {
    let redirect_url = Url::parse(&request.redirect_url)
        .map_err(|err| AppError::BadRequest(format!("redirect_url is not a URL: {}", err)))?;

    let (jar, context) = state.sessions.find_or_create(jar).await;
    let resolution = context.session_resolver.resolve_redirect(&redirect_url).await;

    let status = match resolution.failure() {
        None if resolution.identity().is_some() => StatusCode::OK,
        None => StatusCode::UNAUTHORIZED,
        Some(failure) => failure.status_code(),
    };

    Ok((status, jar, Json(CallbackResponse::from(resolution))).into_response())
}

pub async fn sign_out(client: MaybeClient) -> Result<StatusCode, AppError> {
    if let Some(context) = client.context {
        context.flow.lock().await.abandon();
        context.session_resolver.sign_out().await?;
        info!(client_id = %context.id, "auth: client signed out");
    }

    Ok(StatusCode::NO_CONTENT)
}
