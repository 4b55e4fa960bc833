use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{RequestBuilder, Response, StatusCode, header::AUTHORIZATION};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::domain::value_objects::{enums::oauth_providers::OAuthProvider, identity::Identity};

const APIKEY_HEADER: &str = "apikey";
const BODY_PREVIEW_CHARS: usize = 512;

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub project_url: String,
    pub anon_key: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl SupabaseConfig {
    pub fn new(project_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            project_url: project_url.into(),
            anon_key: anon_key.into(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
        }
    }
}

/// Non-2xx answer from GoTrue or PostgREST.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{action} failed (status {status}, code {code}): {message}")]
pub struct SupabaseApiError {
    pub action: &'static str,
    pub status: u16,
    pub code: String,
    pub message: String,
}

impl SupabaseApiError {
    /// The service refused the credentials rather than failing.
    pub fn is_auth_rejection(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED.as_u16()
            || self.status == StatusCode::FORBIDDEN.as_u16()
    }
}

/// `GET /auth/v1/user` body, trimmed to what the app reads.
#[derive(Debug, Clone, Deserialize)]
pub struct GoTrueUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<GoTrueUser> for Identity {
    fn from(user: GoTrueUser) -> Self {
        let display_name = user
            .user_metadata
            .full_name
            .or(user.user_metadata.name)
            .filter(|name| !name.trim().is_empty());

        Self {
            user_id: user.id,
            display_name,
            email: user.email.filter(|email| !email.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: GoTrueUser,
}

/// Shared HTTP plumbing for the Supabase project. Cheap to share behind `Arc`.
pub struct SupabaseClient {
    http: reqwest::Client,
    project_url: Url,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig) -> Result<Self> {
        let project_url = normalize_project_url(&config.project_url)?;

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("failed to build Supabase http client")?;

        Ok(Self {
            http,
            project_url,
            anon_key: config.anon_key,
        })
    }

    pub fn project_url(&self) -> &Url {
        &self.project_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        self.project_url
            .join(path.trim_start_matches('/'))
            .with_context(|| format!("invalid Supabase endpoint path {}", path))
    }

    /// Attaches `apikey` and the bearer; anonymous calls use the anon key as bearer.
    pub(crate) fn authorized(&self, request: RequestBuilder, access_token: Option<&str>) -> RequestBuilder {
        let bearer = access_token.unwrap_or(&self.anon_key);
        request
            .header(APIKEY_HEADER, &self.anon_key)
            .header(AUTHORIZATION, format!("Bearer {}", bearer))
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub async fn get_user(&self, access_token: &str) -> Result<GoTrueUser> {
        let url = self.endpoint("auth/v1/user")?;
        debug!("supabase: fetching user for access token");

        let response = self
            .authorized(self.http.get(url), Some(access_token))
            .send()
            .await
            .context("failed to reach Supabase auth (get user)")?;

        let response = ensure_success(response, "get user").await?;
        response
            .json::<GoTrueUser>()
            .await
            .context("failed to decode Supabase user")
    }

    pub async fn refresh_session(&self, refresh_token: &str) -> Result<TokenResponse> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut()
            .append_pair("grant_type", "refresh_token");
        debug!("supabase: refreshing session");

        let response = self
            .authorized(self.http.post(url), None)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .context("failed to reach Supabase auth (refresh session)")?;

        let response = ensure_success(response, "refresh session").await?;
        response
            .json::<TokenResponse>()
            .await
            .context("failed to decode Supabase token response")
    }

    pub async fn logout(&self, access_token: &str) -> Result<()> {
        let url = self.endpoint("auth/v1/logout")?;

        let response = self
            .authorized(self.http.post(url), Some(access_token))
            .send()
            .await
            .context("failed to reach Supabase auth (logout)")?;

        ensure_success(response, "logout").await?;
        Ok(())
    }

    pub fn authorize_url(&self, provider: OAuthProvider, redirect_to: &Url) -> Result<Url> {
        let mut url = self.endpoint("auth/v1/authorize")?;
        url.query_pairs_mut()
            .append_pair("provider", provider.as_str())
            .append_pair("redirect_to", redirect_to.as_str());
        Ok(url)
    }
}

fn normalize_project_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Supabase project url is empty"));
    }

    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };

    Url::parse(&with_slash).with_context(|| format!("invalid Supabase project url {}", trimmed))
}

/// Passes 2xx responses through and turns anything else into [`SupabaseApiError`].
pub(crate) async fn ensure_success(response: Response, action: &'static str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(api_error(action, status, &body).into())
}

fn api_error(action: &'static str, status: StatusCode, body: &str) -> SupabaseApiError {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let field = |keys: &[&str]| -> Option<String> {
        let value = parsed.as_ref()?;
        keys.iter().find_map(|key| match value.get(*key)? {
            serde_json::Value::String(text) if !text.is_empty() => Some(text.clone()),
            serde_json::Value::Number(number) => Some(number.to_string()),
            _ => None,
        })
    };

    let code = field(&["error_code", "error", "code"]).unwrap_or_else(|| "unknown".to_string());
    let message = field(&["msg", "message", "error_description"]).unwrap_or_else(|| {
        // Keep a short preview of the response body for debugging.
        let preview = body.trim().chars().take(BODY_PREVIEW_CHARS).collect::<String>();
        if preview.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("no response body")
                .to_string()
        } else {
            preview
        }
    });

    SupabaseApiError {
        action,
        status: status.as_u16(),
        code,
        message,
    }
}
