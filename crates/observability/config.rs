use std::env;
use tracing::Level;

#[derive(Clone)]
pub(crate) struct ServiceContext {
    pub(crate) service_name: String,
    pub(crate) environment: String,
    pub(crate) component: String,
}

#[derive(Clone)]
pub(crate) struct ObservabilityConfig {
    pub(crate) service_context: ServiceContext,
    pub(crate) default_level: String,
    /// Parse problems, logged once tracing is up.
    pub(crate) warnings: Vec<String>,
}

impl ObservabilityConfig {
    pub(crate) fn from_env(component: &str) -> Self {
        Self::from_values(
            component,
            env_string("SERVICE_NAME"),
            env_string("STAGE"),
            env_string("LOG_LEVEL"),
        )
    }

    fn from_values(
        component: &str,
        service_name: Option<String>,
        stage: Option<String>,
        log_level: Option<String>,
    ) -> Self {
        let component = component.trim().to_string();
        let mut warnings = Vec::new();

        let service_name = service_name
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| component.clone());

        let environment = stage
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        let default_level = match log_level.filter(|v| !v.is_empty()) {
            None => Level::INFO,
            Some(raw) => raw.parse::<Level>().unwrap_or_else(|_| {
                warnings.push(format!("LOG_LEVEL={raw} is not a level; using info"));
                Level::INFO
            }),
        };

        Self {
            service_context: ServiceContext {
                service_name,
                environment,
                component,
            },
            default_level: default_level.to_string().to_lowercase(),
            warnings,
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string())
}
