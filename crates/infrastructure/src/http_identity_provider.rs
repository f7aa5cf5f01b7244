//! HTTP adapter for the external identity provider.

use async_trait::async_trait;
use serde::Deserialize;

use deskhive_application::IdentityProvider;
use deskhive_core::{AppError, AppResult, PrincipalClaims};

/// Verifies bearer tokens against the provider's userinfo endpoint.
///
/// An invalid token maps to `Unauthorized`; a transport failure or provider
/// outage maps to `Unavailable` so callers can tell a denied login from a
/// retryable one.
#[derive(Clone)]
pub struct HttpIdentityProvider {
    http_client: reqwest::Client,
    userinfo_url: String,
}

impl HttpIdentityProvider {
    /// Creates a provider adapter for the given base URL.
    #[must_use]
    pub fn new(http_client: reqwest::Client, base_url: &str) -> Self {
        Self {
            http_client,
            userinfo_url: format!("{}/userinfo", base_url.trim_end_matches('/')),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    sub: String,
    name: String,
    email: Option<String>,
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify_token(&self, token: &str) -> AppResult<PrincipalClaims> {
        let response = self
            .http_client
            .get(&self.userinfo_url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|error| {
                tracing::warn!(error = %error, "identity provider transport failure");
                AppError::Unavailable("identity provider unreachable".to_owned())
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AppError::Unauthorized("invalid credential".to_owned()));
        }
        if !status.is_success() {
            tracing::warn!(status = %status, "identity provider returned an error status");
            return Err(AppError::Unavailable(format!(
                "identity provider responded with status {status}"
            )));
        }

        let userinfo: UserInfoResponse = response.json().await.map_err(|error| {
            AppError::Internal(format!("failed to decode identity provider response: {error}"))
        })?;

        Ok(PrincipalClaims::new(
            userinfo.sub,
            userinfo.name,
            userinfo.email,
        ))
    }
}
