//! Environment-based API configuration.

use std::env;

use deskhive_core::AppError;
use url::Url;

/// Runtime configuration for the API process.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Postgres connection string.
    pub database_url: String,
    /// Base URL of the external identity provider.
    pub identity_provider_url: String,
    /// Allowed browser origin.
    pub frontend_url: String,
    /// Bind host.
    pub api_host: String,
    /// Bind port.
    pub api_port: u16,
    /// Whether session cookies require HTTPS.
    pub cookie_secure: bool,
}

impl ApiConfig {
    /// Loads and validates configuration from the environment.
    pub fn load() -> Result<Self, AppError> {
        let database_url = required_env("DATABASE_URL")?;

        let identity_provider_url = required_env("IDENTITY_PROVIDER_URL")?;
        Url::parse(&identity_provider_url).map_err(|error| {
            AppError::Validation(format!("invalid IDENTITY_PROVIDER_URL: {error}"))
        })?;

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|_| "false".to_owned())
            .eq_ignore_ascii_case("true");

        Ok(Self {
            database_url,
            identity_provider_url,
            frontend_url,
            api_host,
            api_port,
            cookie_secure,
        })
    }
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}
