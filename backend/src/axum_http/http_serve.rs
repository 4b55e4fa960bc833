use crate::{
    axum_http::{client_sessions::ClientSessions, default_routers, routers},
    config::config_model::{BackendServer, DotEnvyConfig},
};
use anyhow::{Context, Result};
use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use hometaste::{
    domain::value_objects::enums::oauth_providers::OAuthProvider,
    infra::supabase::{SupabaseClient, SupabaseConfig},
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use url::Url;

const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

pub struct AppState {
    pub sessions: ClientSessions,
    pub oauth_provider: OAuthProvider,
    pub callback_url: Url,
    pub public_url: Url,
}

impl AppState {
    pub fn from_config(config: &DotEnvyConfig) -> Result<Self> {
        let supabase = SupabaseClient::new(SupabaseConfig::new(
            config.supabase.project_url.clone(),
            config.supabase.anon_key.clone(),
        ))?;

        let oauth_provider = OAuthProvider::from_str(&config.app.oauth_provider)
            .with_context(|| format!("OAUTH_PROVIDER={} is not supported", config.app.oauth_provider))?;

        Ok(Self {
            sessions: ClientSessions::new(
                Arc::new(supabase),
                config.supabase.jwt_secret.clone(),
                Duration::from_secs(config.app.pending_session_ttl_secs),
                config.stage.is_production(),
            ),
            oauth_provider,
            callback_url: config.app.callback_url()?,
            public_url: config.app.public_url.clone(),
        })
    }
}

pub fn build_router(state: Arc<AppState>, server: &BackendServer) -> Result<Router> {
    let allowed_origin = state
        .public_url
        .origin()
        .ascii_serialization()
        .parse()
        .context("APP_PUBLIC_URL has no usable origin")?;

    let app = Router::new()
        .fallback(default_routers::not_found)
        .merge(routers::pages::routes(Arc::clone(&state)))
        .nest("/api/v1/auth", routers::auth::routes(Arc::clone(&state)))
        .nest("/api/v1/addresses", routers::addresses::routes(Arc::clone(&state)))
        .nest(
            "/api/v1/subscriptions",
            routers::subscriptions::routes(Arc::clone(&state)),
        )
        .nest("/api/v1/meals", routers::meals::routes(Arc::clone(&state)))
        .nest("/api/v1/chefs", routers::chefs::routes(Arc::clone(&state)))
        .nest("/api/v1/plans", routers::plans::routes())
        .route("/api/v1/health-check", get(default_routers::health_check))
        .layer(TimeoutLayer::new(Duration::from_secs(server.timeout)))
        .layer(RequestBodyLimitLayer::new(
            (server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::DELETE])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(AllowOrigin::exact(allowed_origin))
                .allow_credentials(true),
        )
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

pub async fn start(config: Arc<DotEnvyConfig>) -> Result<()> {
    let state = Arc::new(AppState::from_config(&config)?);
    let app = build_router(Arc::clone(&state), &config.backend_server)?;

    let pruner = tokio::spawn(prune_pending_sessions(Arc::clone(&state)));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.backend_server.port));
    let listener = TcpListener::bind(addr).await?;

    info!(
        stage = %config.stage,
        callback_url = %state.callback_url,
        "Server is running on port {}",
        config.backend_server.port
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pruner.abort();
    state.sessions.unmount_all().await;

    Ok(())
}

async fn prune_pending_sessions(state: Arc<AppState>) {
    let mut ticker = tokio::time::interval(PRUNE_INTERVAL);
    loop {
        ticker.tick().await;
        state.sessions.prune_pending().await;
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
