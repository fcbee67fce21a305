use std::{fmt::Display, str::FromStr, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::transaction::Transaction;
use crate::api::{http::HttpClient, types::ApiResult};

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CardId(Uuid);

impl Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CardId {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(CardId(Uuid::from_str(value)?))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Card {
    /// The unique identifier for the card
    pub id: CardId,

    /// The card network brand, e.g. Visa
    pub brand: String,

    /// The last four digits of the card number
    pub last4: String,

    /// The user-chosen display name
    pub nickname: String,

    /// The card registration time
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCardRequest {
    pub brand: String,

    pub last4: String,

    /// Opaque vault token referencing the full card number held by the
    /// backend. The client never sees the number itself.
    pub token: String,

    pub nickname: String,
}

#[derive(Clone)]
pub struct CardApi {
    client: Arc<HttpClient>,
}

impl CardApi {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    pub async fn get_all(&self) -> ApiResult<Vec<Card>> {
        self.client.get("cards").await
    }

    pub async fn create(&self, card: &CreateCardRequest) -> ApiResult<Card> {
        self.client.post("cards", card).await
    }

    pub async fn delete(&self, id: &CardId) -> ApiResult<()> {
        self.client.delete_status(&format!("cards/{}", id)).await
    }

    /// Transaction history recorded against one card.
    pub async fn get_transactions(&self, id: &CardId) -> ApiResult<Vec<Transaction>> {
        self.client.get(&format!("cards/{}/transactions", id)).await
    }
}
