//! OAuth redirect parsing.
//!
//! The provider hands tokens back either in the URL fragment (implicit flow)
//! or in the query string. Both are read here and only here; the fragment
//! wins whenever it carries a token or an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::{Url, form_urlencoded};

/// Tokens carried by a completed OAuth redirect.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectPayload {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for RedirectPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedirectPayload")
            .field("access_token", &"<redacted>")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RedirectError {
    #[error("provider returned an error: {0}")]
    Provider(String),
    #[error("redirect carries an empty access token")]
    EmptyAccessToken,
}

/// Where the caller goes once resolution finishes.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum RedirectTarget {
    Home,
    Login,
}

impl RedirectTarget {
    pub fn as_path(&self) -> &'static str {
        match self {
            RedirectTarget::Home => "/",
            RedirectTarget::Login => "/login",
        }
    }
}

pub fn parse_redirect(url: &Url) -> Result<Option<RedirectPayload>, RedirectError> {
    parse_redirect_parts(url.fragment(), url.query())
}

/// Same as [`parse_redirect`] for callers that only hold the raw parts.
pub fn parse_redirect_parts(
    fragment: Option<&str>,
    query: Option<&str>,
) -> Result<Option<RedirectPayload>, RedirectError> {
    let fragment = fragment.map(RedirectParams::parse);
    let query = query.map(RedirectParams::parse);

    let selected = fragment
        .filter(RedirectParams::is_redirect)
        .or_else(|| query.filter(RedirectParams::is_redirect));

    match selected {
        Some(params) => params.into_payload().map(Some),
        None => Ok(None),
    }
}

#[derive(Debug, Default)]
struct RedirectParams {
    access_token: Option<String>,
    refresh_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

impl RedirectParams {
    fn parse(raw: &str) -> Self {
        let raw = raw.trim_start_matches(['#', '?']);
        let mut params = RedirectParams::default();

        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            let value = value.trim().to_string();
            match key.as_ref() {
                "access_token" => params.access_token = Some(value),
                "refresh_token" => params.refresh_token = Some(value),
                "error" => params.error = Some(value),
                "error_description" => params.error_description = Some(value),
                _ => {}
            }
        }

        params
    }

    fn is_redirect(&self) -> bool {
        self.access_token.is_some() || self.error.is_some()
    }

    fn into_payload(self) -> Result<RedirectPayload, RedirectError> {
        if let Some(error) = self.error {
            let detail = self
                .error_description
                .filter(|description| !description.is_empty())
                .unwrap_or(error);
            return Err(RedirectError::Provider(detail));
        }

        let access_token = self
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or(RedirectError::EmptyAccessToken)?;

        Ok(RedirectPayload {
            access_token,
            refresh_token: self.refresh_token.filter(|token| !token.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<Option<RedirectPayload>, RedirectError> {
        parse_redirect(&Url::parse(raw).unwrap())
    }

    #[test]
    fn fragment_tokens_are_extracted() {
        let payload = parse(
            "https://hometaste.in/auth/callback#access_token=abc&expires_in=3600&refresh_token=r1&token_type=bearer",
        )
        .unwrap()
        .unwrap();
        assert_eq!(payload.access_token, "abc");
        assert_eq!(payload.refresh_token.as_deref(), Some("r1"));
    }

    #[test]
    fn query_tokens_are_extracted_when_fragment_is_absent() {
        let payload = parse("https://hometaste.in/auth/callback?access_token=q1")
            .unwrap()
            .unwrap();
        assert_eq!(payload.access_token, "q1");
        assert_eq!(payload.refresh_token, None);
    }

    #[test]
    fn fragment_wins_over_query() {
        let payload = parse(
            "https://hometaste.in/auth/callback?access_token=from-query#access_token=from-fragment",
        )
        .unwrap()
        .unwrap();
        assert_eq!(payload.access_token, "from-fragment");
    }

    #[test]
    fn unrelated_fragment_falls_through_to_query() {
        let payload = parse("https://hometaste.in/auth/callback?access_token=q1#section")
            .unwrap()
            .unwrap();
        assert_eq!(payload.access_token, "q1");
    }

    #[test]
    fn no_tokens_means_no_payload() {
        assert_eq!(parse("https://hometaste.in/auth/callback").unwrap(), None);
        assert_eq!(
            parse("https://hometaste.in/auth/callback?next=%2F#").unwrap(),
            None
        );
    }

    #[test]
    fn provider_error_is_reported_with_description() {
        let err = parse(
            "https://hometaste.in/auth/callback#error=access_denied&error_description=User+denied+access",
        )
        .unwrap_err();
        assert_eq!(err, RedirectError::Provider("User denied access".to_string()));

        let err = parse("https://hometaste.in/auth/callback?error=server_error").unwrap_err();
        assert_eq!(err, RedirectError::Provider("server_error".to_string()));
    }

    #[test]
    fn empty_access_token_is_malformed() {
        let err = parse("https://hometaste.in/auth/callback#access_token=&refresh_token=r1")
            .unwrap_err();
        assert_eq!(err, RedirectError::EmptyAccessToken);
    }

    #[test]
    fn empty_refresh_token_is_dropped() {
        let payload = parse_redirect_parts(Some("#access_token=a&refresh_token="), None)
            .unwrap()
            .unwrap();
        assert_eq!(payload.refresh_token, None);
    }

    #[test]
    fn redirect_targets_map_to_routes() {
        assert_eq!(RedirectTarget::Home.as_path(), "/");
        assert_eq!(RedirectTarget::Login.as_path(), "/login");
    }
}
