use std::{convert::Infallible, sync::Arc};

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use hometaste::domain::value_objects::identity::Identity;

use super::{client_sessions::ClientContext, error_responses::AppError, http_serve::AppState};

/// Client context whose session resolves to a signed-in identity.
pub struct AuthenticatedClient {
    pub context: Arc<ClientContext>,
    pub identity: Identity,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthenticatedClient {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let client = MaybeClient::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});

        match client {
            MaybeClient {
                context: Some(context),
                identity: Some(identity),
            } => Ok(AuthenticatedClient { context, identity }),
            _ => Err(AppError::Unauthorized),
        }
    }
}

/// Whatever the cookie names, signed in or not.
pub struct MaybeClient {
    pub context: Option<Arc<ClientContext>>,
    pub identity: Option<Identity>,
}

impl MaybeClient {
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for MaybeClient {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(context) = state.sessions.find(&jar).await else {
            return Ok(MaybeClient {
                context: None,
                identity: None,
            });
        };

        // Adopting the persisted session refreshes it when it has expired.
        let identity = context
            .session_resolver
            .resolve(None)
            .await
            .identity()
            .cloned();

        Ok(MaybeClient {
            context: Some(context),
            identity,
        })
    }
}
