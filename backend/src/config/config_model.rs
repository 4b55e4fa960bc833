use url::Url;

use super::stage::Stage;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub backend_server: BackendServer,
    pub supabase: Supabase,
    pub app: App,
    pub stage: Stage,
}

#[derive(Debug, Clone)]
pub struct BackendServer {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Clone)]
pub struct Supabase {
    pub project_url: String,
    pub anon_key: String,
    pub jwt_secret: Option<String>,
}

impl std::fmt::Debug for Supabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supabase")
            .field("project_url", &self.project_url)
            .field("anon_key", &"<redacted>")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct App {
    pub public_url: Url,
    pub oauth_provider: String,
    pub pending_session_ttl_secs: u64,
}

impl App {
    /// Where the OAuth provider sends the browser back to.
    pub fn callback_url(&self) -> anyhow::Result<Url> {
        Ok(self.public_url.join("auth/callback")?)
    }
}
