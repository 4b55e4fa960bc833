use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fallback display name stored on subscriptions.
pub const ANONYMOUS_USER_NAME: &str = "Anonymous";

/// The signed-in user as resolved from a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl Identity {
    pub fn display_name_or_anonymous(&self) -> String {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(ANONYMOUS_USER_NAME)
            .to_string()
    }
}

/// Persisted client session. Tokens never leave the process in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub identity: Identity,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("expires_at", &self.expires_at)
            .field("identity", &self.identity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn identity(display_name: Option<&str>) -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            display_name: display_name.map(str::to_string),
            email: None,
        }
    }

    #[test]
    fn blank_display_name_falls_back_to_anonymous() {
        assert_eq!(identity(None).display_name_or_anonymous(), "Anonymous");
        assert_eq!(identity(Some("  ")).display_name_or_anonymous(), "Anonymous");
        assert_eq!(
            identity(Some("Riya Sen")).display_name_or_anonymous(),
            "Riya Sen"
        );
    }

    #[test]
    fn debug_output_redacts_tokens() {
        let session = Session {
            access_token: "secret-access".to_string(),
            refresh_token: Some("secret-refresh".to_string()),
            expires_at: Utc::now() + Duration::hours(1),
            identity: identity(None),
        };
        let rendered = format!("{:?}", session);
        assert!(!rendered.contains("secret-access"));
        assert!(!rendered.contains("secret-refresh"));
        assert!(!session.is_expired_at(Utc::now()));
    }
}
