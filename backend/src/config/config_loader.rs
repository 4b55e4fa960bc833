use anyhow::{Context, Result};
use url::Url;

use super::{
    config_model::{App, BackendServer, DotEnvyConfig, Supabase},
    stage::Stage,
};

const DEFAULT_OAUTH_PROVIDER: &str = "google";
const DEFAULT_PENDING_SESSION_TTL_SECS: u64 = 600;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let backend_server = BackendServer {
        port: required("SERVER_PORT_BACKEND")?.parse()?,
        body_limit: required("SERVER_BODY_LIMIT")?.parse()?,
        timeout: required("SERVER_TIMEOUT")?.parse()?,
    };

    let supabase = Supabase {
        project_url: required("SUPABASE_PROJECT_URL")?,
        anon_key: required("SUPABASE_ANON_KEY")?,
        jwt_secret: optional("SUPABASE_JWT_SECRET"),
    };

    let public_url = required("APP_PUBLIC_URL")?;
    let app = App {
        public_url: parse_public_url(&public_url)?,
        oauth_provider: optional("OAUTH_PROVIDER")
            .unwrap_or_else(|| DEFAULT_OAUTH_PROVIDER.to_string()),
        pending_session_ttl_secs: match optional("PENDING_SESSION_TTL_SECS") {
            Some(raw) => raw.parse().context("PENDING_SESSION_TTL_SECS is invalid")?,
            None => DEFAULT_PENDING_SESSION_TTL_SECS,
        },
    };

    Ok(DotEnvyConfig {
        backend_server,
        supabase,
        app,
        stage: get_stage(),
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or("".to_string());
    Stage::try_from(&stage_str).unwrap_or_default()
}

fn required(key: &str) -> Result<String> {
    optional(key).with_context(|| format!("{} is invalid", key))
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Base for `join`, so it always ends with a slash.
fn parse_public_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw).context("APP_PUBLIC_URL is invalid")?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
