use std::{fmt::Display, str::FromStr, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::card::CardId;
use crate::api::{http::HttpClient, types::ApiResult};

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TransactionId(Uuid);

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TransactionId {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(TransactionId(Uuid::from_str(value)?))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Transaction {
    /// The unique identifier for the transaction
    pub id: TransactionId,

    /// The card the transaction was recorded against
    #[serde(rename = "cardId")]
    pub card_id: CardId,

    /// Amount in currency units
    pub amount: f64,

    /// Three-letter currency code
    pub currency: String,

    pub description: String,

    /// Backend-owned lifecycle state, displayed verbatim
    pub status: String,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(rename = "cardId")]
    pub card_id: CardId,

    pub amount: f64,

    pub currency: String,

    pub description: String,
}

/// Optional time window for transaction listings, sent as `from`/`to`
/// query parameters in RFC 3339 form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct TransactionApi {
    client: Arc<HttpClient>,
}

impl TransactionApi {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    pub async fn get_all(&self, filter: &TransactionFilter) -> ApiResult<Vec<Transaction>> {
        self.client.get_with_query("transactions", filter).await
    }

    pub async fn create(&self, transaction: &CreateTransactionRequest) -> ApiResult<Transaction> {
        self.client.post("transactions", transaction).await
    }
}
