use thiserror::Error;

use crate::validation::ValidationError;

/// Errors that can occur during authentication operations
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("SDK API error: {0}")]
    SdkApi(#[from] cardback::ApiSdkError),

    #[error("Token store error: {0}")]
    TokenStore(#[from] cardback::TokenStoreError),

    #[error("Terminal interaction failed: {0}")]
    Terminal(#[from] dialoguer::Error),
}

/// Errors that can occur during card operations
#[derive(Error, Debug)]
pub enum CardError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("SDK API error: {0}")]
    SdkApi(#[from] cardback::ApiSdkError),
}

/// Errors that can occur during transaction operations
#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),

    #[error("SDK API error: {0}")]
    SdkApi(#[from] cardback::ApiSdkError),
}
