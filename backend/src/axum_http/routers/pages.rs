//! Page routes of the app shell. Each page answers with the JSON document the
//! screen renders from, or a `303 See Other` when the guard turns it away.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, RawQuery, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use axum_extra::extract::cookie::CookieJar;
use hometaste::domain::value_objects::{
    plans::plan_catalog,
    routes::{AppRoute, RouteAccess},
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::axum_http::{error_responses::AppError, extractors::MaybeClient, http_serve::AppState};

const SIGN_IN_PATH: &str = "/api/v1/auth/sign-in";

/// Fragments never reach the server; this page moves them into the query
/// and reloads, or falls back to the login page.
const CALLBACK_PAGE: &str = r#"<!doctype html>
<html>
  <head><meta charset="utf-8"><title>Signing in</title></head>
  <body>
    <p>Signing you in...</p>
    <script>
      (function () {
        var fragment = window.location.hash.replace(/^#/, "");
        if (fragment) {
          window.location.replace(window.location.pathname + "?" + fragment);
        } else {
          window.location.replace("/login");
        }
      })();
    </script>
  </body>
</html>
"#;

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/login", get(login))
        .route("/subscriptions", get(subscriptions))
        .route("/chef/:chef_id", get(chef))
        .route("/auth/callback", get(auth_callback))
        .with_state(state)
}

fn admit(route: AppRoute, client: MaybeClient) -> Result<MaybeClient, Redirect> {
    match route.guard(client.is_authenticated()) {
        RouteAccess::Allow => Ok(client),
        RouteAccess::RedirectTo(path) => Err(Redirect::to(path)),
    }
}

fn to_login() -> Response {
    Redirect::to(AppRoute::Login.path().as_str()).into_response()
}

pub async fn home(
    State(_state): State<Arc<AppState>>,
    client: MaybeClient,
) -> Result<Response, AppError> {
    let MaybeClient { context, identity } = match admit(AppRoute::Home, client) {
        Ok(admitted) => admitted,
        Err(redirect) => return Ok(redirect.into_response()),
    };
    let Some(context) = context else {
        return Ok(to_login());
    };

    let meals = context.meal_catalog.list(None).await?;
    Ok(Json(json!({
        "route": AppRoute::Home.path(),
        "identity": identity,
        "meals": meals,
        "plans": plan_catalog(),
    }))
    .into_response())
}

pub async fn login(client: MaybeClient) -> Response {
    match admit(AppRoute::Login, client) {
        Ok(_) => Json(json!({
            "route": AppRoute::Login.path(),
            "sign_in_url": SIGN_IN_PATH,
        }))
        .into_response(),
        Err(redirect) => redirect.into_response(),
    }
}

pub async fn subscriptions(
    State(_state): State<Arc<AppState>>,
    client: MaybeClient,
) -> Result<Response, AppError> {
    let MaybeClient { context, identity } = match admit(AppRoute::Subscriptions, client) {
        Ok(admitted) => admitted,
        Err(redirect) => return Ok(redirect.into_response()),
    };
    let (Some(context), Some(identity)) = (context, identity) else {
        return Ok(to_login());
    };

    let subscriptions = context
        .subscription_builder
        .list_subscriptions(&identity)
        .await?;
    Ok(Json(json!({
        "route": AppRoute::Subscriptions.path(),
        "identity": identity,
        "subscriptions": subscriptions,
    }))
    .into_response())
}

pub async fn chef(
    State(_state): State<Arc<AppState>>,
    client: MaybeClient,
    Path(chef_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let route = AppRoute::Chef(chef_id);
    let Some(context) = (match admit(route, client) {
        Ok(admitted) => admitted.context,
        Err(redirect) => return Ok(redirect.into_response()),
    }) else {
        return Ok(to_login());
    };

    let profile = context.chef_profiles.get_profile(chef_id).await?;
    Ok(Json(json!({
        "route": route.path(),
        "chef": profile,
    }))
    .into_response())
}

/// Always reachable. Tokens in the query resolve here; otherwise the browser
/// gets the fragment-forwarding page.
pub async fn auth_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    RawQuery(query): RawQuery,
) -> Response {
    let Some(query) = query.filter(|query| !query.is_empty()) else {
        return Html(CALLBACK_PAGE).into_response();
    };

    let (jar, context) = state.sessions.find_or_create(jar).await;
    let resolution = context.session_resolver.resolve_parts(None, Some(&query)).await;
    let target = resolution.redirect_target();
    info!(
        client_id = %context.id,
        authenticated = resolution.identity().is_some(),
        redirect_to = target.as_path(),
        "pages: auth callback resolved"
    );

    (jar, Redirect::to(target.as_path())).into_response()
}
