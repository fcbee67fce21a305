use thiserror::Error;

use crate::token_store::TokenStoreError;

#[derive(Error, Debug)]
pub enum ApiSdkError {
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Refresh(#[from] RefreshError),

    #[error("Token store error: {0}")]
    TokenStore(#[from] TokenStoreError),
}

pub type ApiResult<T> = Result<T, ApiSdkError>;

/// Outcome of a failed refresh cycle.
///
/// Cloneable so the one failure can be delivered to every caller that
/// joined the cycle.
#[derive(Error, Debug, Clone)]
#[error("Token refresh failed: {0}")]
pub struct RefreshError(pub String);
