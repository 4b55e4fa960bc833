use std::sync::Arc;

use anyhow::Result as AnyResult;
use axum::http::StatusCode;
use hometaste::domain::{
    repositories::auth::AuthBackend,
    value_objects::{
        enums::oauth_providers::OAuthProvider,
        identity::Identity,
        redirect::{RedirectError, RedirectPayload, RedirectTarget, parse_redirect, parse_redirect_parts},
    },
};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::auth::validate_supabase_jwt;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthExchangeFailure {
    #[error("malformed redirect: {0}")]
    Malformed(#[from] RedirectError),
    #[error("access token failed verification: {0}")]
    Verification(String),
    #[error("token exchange rejected: {0}")]
    Rejected(String),
    #[error("persisted session unavailable: {0}")]
    SessionLookup(String),
}

impl AuthExchangeFailure {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthExchangeFailure::Malformed(_) => StatusCode::BAD_REQUEST,
            AuthExchangeFailure::Verification(_) | AuthExchangeFailure::Rejected(_) => {
                StatusCode::UNAUTHORIZED
            }
            AuthExchangeFailure::SessionLookup(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Outcome of reconciling a redirect or the persisted session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Authenticated(Identity),
    Unauthenticated(Option<AuthExchangeFailure>),
}

impl Resolution {
    pub fn redirect_target(&self) -> RedirectTarget {
        match self {
            Resolution::Authenticated(_) => RedirectTarget::Home,
            Resolution::Unauthenticated(_) => RedirectTarget::Login,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Resolution::Authenticated(identity) => Some(identity),
            Resolution::Unauthenticated(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&AuthExchangeFailure> {
        match self {
            Resolution::Unauthenticated(failure) => failure.as_ref(),
            Resolution::Authenticated(_) => None,
        }
    }
}

pub struct SessionResolver<A>
where
    A: AuthBackend + ?Sized + 'static,
{
    auth: Arc<A>,
    jwt_secret: Option<String>,
}

impl<A> SessionResolver<A>
where
    A: AuthBackend + ?Sized + 'static,
{
    pub fn new(auth: Arc<A>, jwt_secret: Option<String>) -> Self {
        Self { auth, jwt_secret }
    }

    /// Exchanges `payload` for a session, or adopts the persisted one when
    /// there is no payload.
    pub async fn resolve(&self, payload: Option<RedirectPayload>) -> Resolution {
        match payload {
            Some(payload) => self.exchange(payload).await,
            None => self.adopt_persisted().await,
        }
    }

    pub async fn resolve_redirect(&self, url: &Url) -> Resolution {
        match parse_redirect(url) {
            Ok(payload) => self.resolve(payload).await,
            Err(err) => Self::malformed(err),
        }
    }

    pub async fn resolve_parts(&self, fragment: Option<&str>, query: Option<&str>) -> Resolution {
        match parse_redirect_parts(fragment, query) {
            Ok(payload) => self.resolve(payload).await,
            Err(err) => Self::malformed(err),
        }
    }

    pub fn sign_in_url(&self, provider: OAuthProvider, redirect_to: &Url) -> AnyResult<Url> {
        info!(%provider, "session_resolver: starting oauth sign-in");
        self.auth.sign_in_with_oauth(provider, redirect_to)
    }

    pub async fn sign_out(&self) -> AnyResult<()> {
        self.auth.sign_out().await
    }

    async fn exchange(&self, payload: RedirectPayload) -> Resolution {
        if let Some(secret) = self.jwt_secret.as_deref() {
            if let Err(err) = validate_supabase_jwt(&payload.access_token, secret) {
                warn!(error = %err, "session_resolver: access token failed local verification");
                return Resolution::Unauthenticated(Some(AuthExchangeFailure::Verification(
                    err.to_string(),
                )));
            }
        }

        match self.auth.set_session(payload).await {
            Ok(session) => {
                info!(
                    user_id = %session.identity.user_id,
                    "session_resolver: redirect exchanged for session"
                );
                Resolution::Authenticated(session.identity)
            }
            Err(err) => {
                warn!(error = ?err, "session_resolver: token exchange rejected");
                Resolution::Unauthenticated(Some(AuthExchangeFailure::Rejected(format!(
                    "{:#}",
                    err
                ))))
            }
        }
    }

    async fn adopt_persisted(&self) -> Resolution {
        match self.auth.get_session().await {
            Ok(Some(session)) => Resolution::Authenticated(session.identity),
            Ok(None) => Resolution::Unauthenticated(None),
            Err(err) => {
                warn!(error = ?err, "session_resolver: persisted session lookup failed");
                Resolution::Unauthenticated(Some(AuthExchangeFailure::SessionLookup(format!(
                    "{:#}",
                    err
                ))))
            }
        }
    }

    fn malformed(err: RedirectError) -> Resolution {
        warn!(error = %err, "session_resolver: malformed redirect");
        Resolution::Unauthenticated(Some(AuthExchangeFailure::Malformed(err)))
    }
}
