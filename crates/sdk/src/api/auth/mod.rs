use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::{http::HttpClient, types::ApiResult};
use crate::token_store::TokenPair;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of the refresh call: the backend wants the expired access token
/// alongside the refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(rename = "accessToken")]
    pub access_token: String,

    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct AuthApi {
    client: Arc<HttpClient>,
}

impl AuthApi {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Exchanges credentials for a token pair and persists it, establishing
    /// the session every other API call rides on.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<TokenPair> {
        let request =
            LoginRequest { username: username.to_string(), password: password.to_string() };

        let pair: TokenPair = self.client.post_unauthenticated("auth/login", &request).await?;
        self.client.token_store().set(&pair)?;
        info!("session established for {}", username);

        Ok(pair)
    }

    /// Drops the persisted session.
    pub fn logout(&self) -> ApiResult<()> {
        self.client.token_store().clear()?;
        Ok(())
    }

    /// The currently persisted token pair. Whether it is still accepted by
    /// the backend is only known once a request is made.
    pub fn session(&self) -> TokenPair {
        self.client.token_store().get()
    }
}
