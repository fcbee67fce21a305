use thiserror::Error;

use crate::commands::error::{AuthError, CardError, TransactionError};

/// Top-level CLI error that composes all module-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    // Module-specific errors
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Card error: {0}")]
    Card(#[from] CardError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),

    // SDK errors (for interoperability)
    #[error("SDK API error: {0}")]
    SdkApi(#[from] cardback::ApiSdkError),

    #[error("Token store error: {0}")]
    TokenStore(#[from] cardback::TokenStoreError),

    // Generic/fallback errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Terminal interaction error: {0}")]
    Terminal(#[from] dialoguer::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

// Convert string errors
impl From<String> for CliError {
    fn from(err: String) -> Self {
        CliError::Internal(err)
    }
}

impl From<&str> for CliError {
    fn from(err: &str) -> Self {
        CliError::Internal(err.to_string())
    }
}
