use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub paging: PagingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagingConfig {
    /// Hard cap applied to client-supplied limits. None disables capping.
    pub max_limit: Option<i64>,
    pub debug_logging: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("PAGING_MAX_LIMIT") {
            self.paging.max_limit = v.parse().ok();
        }
        if let Ok(v) = env::var("PAGING_DEBUG_LOGGING") {
            self.paging.debug_logging = v.parse().unwrap_or(self.paging.debug_logging);
        }
        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            paging: PagingConfig {
                max_limit: Some(1000),
                debug_logging: true,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            paging: PagingConfig {
                max_limit: Some(500),
                debug_logging: false,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            paging: PagingConfig {
                max_limit: Some(100),
                debug_logging: false,
            },
        }
    }
}

pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

/// Convenience accessor for the config singleton
pub fn config() -> &'static AppConfig {
    &CONFIG
}
