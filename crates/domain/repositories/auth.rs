use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use url::Url;

use crate::domain::{
    session_events::{SessionHandler, SessionSubscription},
    value_objects::{
        enums::oauth_providers::OAuthProvider, identity::Session, redirect::RedirectPayload,
    },
};

/// Hosted auth service as seen by one client.
#[automock]
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Current persisted session, refreshed when it has expired.
    async fn get_session(&self) -> Result<Option<Session>>;

    /// Exchanges redirect tokens for a session and persists it.
    async fn set_session(&self, tokens: RedirectPayload) -> Result<Session>;

    fn on_session_change(&self, handler: SessionHandler) -> SessionSubscription;

    /// URL the browser must visit to start the OAuth dance.
    fn sign_in_with_oauth(&self, provider: OAuthProvider, redirect_to: &Url) -> Result<Url>;

    async fn sign_out(&self) -> Result<()>;
}
