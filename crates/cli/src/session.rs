use std::env;

use cardback::{Client, CreateClientConfig};
use tracing::debug;

use crate::error::CliError;
use crate::print_error_message;

const DEFAULT_API_URL: &str = "http://localhost:5256";

fn api_url() -> String {
    env::var("CARDBACK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

pub fn build_client() -> Client {
    let server_url = api_url();
    debug!("using backend at {}", server_url);
    Client::new(CreateClientConfig { server_url, token_store: None })
}

/// Commands that hit protected endpoints need a stored session first; the
/// HTTP layer can recover from an expired token but not from no token.
pub fn check_session(client: &Client) -> Result<(), CliError> {
    let session = client.auth.session();
    if session.access_token.is_none() || session.refresh_token.is_none() {
        print_error_message("No session found. Run 'cardback login' first.");
        return Err(CliError::Authentication("not logged in".to_string()));
    }

    Ok(())
}
