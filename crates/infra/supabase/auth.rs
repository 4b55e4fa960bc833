use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{info, warn};
use url::Url;

use super::client::{GoTrueUser, SupabaseApiError, SupabaseClient, TokenResponse};
use crate::domain::{
    repositories::auth::AuthBackend,
    session_events::{SessionEvent, SessionEvents, SessionHandler, SessionSubscription},
    value_objects::{
        enums::oauth_providers::OAuthProvider, identity::Session, redirect::RedirectPayload,
    },
};

/// Lifetime assumed for tokens that carry no readable `exp`.
const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// GoTrue auth client for a single browser: owns that browser's persisted
/// session and its session-change notifications.
pub struct SupabaseAuth {
    client: Arc<SupabaseClient>,
    session: RwLock<Option<Session>>,
    events: SessionEvents,
}

impl SupabaseAuth {
    pub fn new(client: Arc<SupabaseClient>) -> Self {
        Self {
            client,
            session: RwLock::new(None),
            events: SessionEvents::new(),
        }
    }

    /// Bearer for table calls; `None` falls back to the anon key.
    pub async fn access_token(&self) -> Option<String> {
        match self.get_session().await {
            Ok(session) => session.map(|session| session.access_token),
            Err(err) => {
                warn!(error = ?err, "supabase_auth: session lookup failed");
                None
            }
        }
    }

    /// Persisted session past its expiry with no way to renew it.
    pub async fn is_session_dead_at(&self, now: DateTime<Utc>) -> bool {
        self.session
            .read()
            .await
            .as_ref()
            .is_some_and(|session| session.is_expired_at(now) && session.refresh_token.is_none())
    }

    async fn exchange(&self, tokens: RedirectPayload) -> Result<Session> {
        let RedirectPayload {
            access_token,
            refresh_token,
        } = tokens;

        match self.client.get_user(&access_token).await {
            Ok(user) => Ok(session_from_user(access_token, refresh_token, user)),
            Err(err) => {
                let rejected = err
                    .downcast_ref::<SupabaseApiError>()
                    .is_some_and(SupabaseApiError::is_auth_rejection);

                match refresh_token.as_deref() {
                    Some(refresh_token) if rejected => {
                        warn!(error = %err, "supabase_auth: access token rejected, trying refresh");
                        let tokens = self
                            .client
                            .refresh_session(refresh_token)
                            .await
                            .context("access token rejected and refresh failed")?;
                        Ok(session_from_tokens(tokens))
                    }
                    _ => Err(err.context("access token exchange failed")),
                }
            }
        }
    }

    async fn refresh_expired(&self) -> Option<Session> {
        let mut guard = self.session.write().await;

        // Another caller may have refreshed while we waited for the lock.
        let session = guard.clone()?;
        if !session.is_expired_at(Utc::now()) {
            return Some(session);
        }

        let user_id = session.identity.user_id;
        let refreshed = match session.refresh_token.as_deref() {
            Some(refresh_token) => match self.client.refresh_session(refresh_token).await {
                Ok(tokens) => Some(session_from_tokens(tokens)),
                Err(err) => {
                    warn!(%user_id, error = ?err, "supabase_auth: refresh failed, signing out");
                    None
                }
            },
            None => {
                info!(%user_id, "supabase_auth: session expired without refresh token");
                None
            }
        };

        *guard = refreshed.clone();
        drop(guard);

        match &refreshed {
            Some(session) => self
                .events
                .emit(&SessionEvent::TokenRefreshed(session.identity.clone())),
            None => self.events.emit(&SessionEvent::SignedOut),
        }

        refreshed
    }
}

#[async_trait]
impl AuthBackend for SupabaseAuth {
    async fn get_session(&self) -> Result<Option<Session>> {
        let current = self.session.read().await.clone();
        match current {
            None => Ok(None),
            Some(session) if !session.is_expired_at(Utc::now()) => Ok(Some(session)),
            Some(_) => Ok(self.refresh_expired().await),
        }
    }

    async fn set_session(&self, tokens: RedirectPayload) -> Result<Session> {
        let session = match self.exchange(tokens).await {
            Ok(session) => session,
            Err(err) => {
                // A failed callback ends whatever session this client had.
                if let Some(previous) = self.session.write().await.take() {
                    info!(
                        user_id = %previous.identity.user_id,
                        "supabase_auth: exchange failed, previous session dropped"
                    );
                    self.events.emit(&SessionEvent::SignedOut);
                }
                return Err(err);
            }
        };

        *self.session.write().await = Some(session.clone());
        info!(user_id = %session.identity.user_id, "supabase_auth: session established");
        self.events
            .emit(&SessionEvent::SignedIn(session.identity.clone()));

        Ok(session)
    }

    fn on_session_change(&self, handler: SessionHandler) -> SessionSubscription {
        self.events.subscribe(handler)
    }

    fn sign_in_with_oauth(&self, provider: OAuthProvider, redirect_to: &Url) -> Result<Url> {
        self.client.authorize_url(provider, redirect_to)
    }

    async fn sign_out(&self) -> Result<()> {
        let previous = self.session.write().await.take();

        if let Some(session) = previous {
            // The local session is gone either way; a failed revoke only means
            // the token lives until its natural expiry.
            if let Err(err) = self.client.logout(&session.access_token).await {
                warn!(
                    user_id = %session.identity.user_id,
                    error = ?err,
                    "supabase_auth: remote logout failed"
                );
            }
            info!(user_id = %session.identity.user_id, "supabase_auth: signed out");
        }

        self.events.emit(&SessionEvent::SignedOut);
        Ok(())
    }
}

fn session_from_user(
    access_token: String,
    refresh_token: Option<String>,
    user: GoTrueUser,
) -> Session {
    let expires_at = token_expiry(&access_token).unwrap_or_else(default_expiry);
    Session {
        access_token,
        refresh_token,
        expires_at,
        identity: user.into(),
    }
}

fn session_from_tokens(tokens: TokenResponse) -> Session {
    let expires_at = tokens
        .expires_at
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
        .or_else(|| {
            tokens
                .expires_in
                .map(|secs| Utc::now() + Duration::seconds(secs))
        })
        .or_else(|| token_expiry(&tokens.access_token))
        .unwrap_or_else(default_expiry);

    Session {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token.filter(|token| !token.is_empty()),
        expires_at,
        identity: tokens.user.into(),
    }
}

fn default_expiry() -> DateTime<Utc> {
    Utc::now() + Duration::seconds(DEFAULT_TOKEN_TTL_SECS)
}

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: Option<i64>,
}

/// Reads `exp` without checking the signature; GoTrue remains the authority
/// on whether the token is valid.
fn token_expiry(access_token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<ExpiryClaims>(access_token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    Utc.timestamp_opt(data.claims.exp?, 0).single()
}
