pub mod auth;
pub mod card;
pub mod http;
pub mod refresh;
pub mod transaction;
mod types;

pub use types::{ApiResult, ApiSdkError, RefreshError};
