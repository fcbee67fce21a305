mod api;
mod logger;
mod token_store;

use std::sync::Arc;

use crate::api::http::HttpClient;

pub use api::{
    ApiResult, ApiSdkError, RefreshError,
    auth::{AuthApi, LoginRequest},
    card::{Card, CardApi, CardId, CreateCardRequest},
    refresh::{RefreshCoordinator, RefreshTicket},
    transaction::{
        CreateTransactionRequest, Transaction, TransactionApi, TransactionFilter, TransactionId,
    },
};
pub use logger::{setup_info_logger, setup_logger};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenPair, TokenStore, TokenStoreError};

#[derive(Clone)]
pub struct CreateClientConfig {
    pub server_url: String,

    /// Token persistence backend. Defaults to the file-backed store under
    /// the user's home directory.
    pub token_store: Option<Arc<dyn TokenStore>>,
}

pub struct Client {
    pub auth: AuthApi,
    pub cards: CardApi,
    pub transactions: TransactionApi,
}

impl Client {
    /// Create a new client instance; all three resource APIs share one
    /// HTTP access layer and one refresh coordinator.
    pub fn new(config: CreateClientConfig) -> Self {
        let token_store: Arc<dyn TokenStore> =
            config.token_store.unwrap_or_else(|| Arc::new(FileTokenStore::new()));
        let client = Arc::new(HttpClient::new(config.server_url, token_store));

        Self {
            auth: AuthApi::new(Arc::clone(&client)),
            cards: CardApi::new(Arc::clone(&client)),
            transactions: TransactionApi::new(Arc::clone(&client)),
        }
    }
}

pub fn create_client(config: CreateClientConfig) -> Client {
    Client::new(config)
}
