use cardback::Client;
use dialoguer::{Input, Password};

use crate::commands::error::AuthError;
use crate::console::{print_success_message, print_warn_message};

/// Prompts for whatever credentials were not passed on the command line,
/// then exchanges them for a stored session.
pub async fn handle_login(username: Option<&str>, client: &Client) -> Result<(), AuthError> {
    let username = match username {
        Some(name) => name.to_string(),
        None => Input::new().with_prompt("Username").interact_text()?,
    };
    let password: String = Password::new().with_prompt("Password").interact()?;

    client.auth.login(&username, &password).await?;
    print_success_message(&format!("Logged in as {}.", username));

    Ok(())
}

pub fn handle_logout(client: &Client) -> Result<(), AuthError> {
    client.auth.logout()?;
    print_success_message("Session cleared.");

    Ok(())
}

/// Shows whether a session is stored. The tokens are opaque; whether the
/// backend still accepts them is only known once a request is made.
pub fn handle_status(client: &Client) {
    let session = client.auth.session();
    if session.access_token.is_some() && session.refresh_token.is_some() {
        print_success_message("✅ Session tokens stored.");
        println!("Validity is determined by the backend on the next request.");
    } else {
        print_warn_message("❌ No session stored.");
        println!("Run 'cardback login' to authenticate.");
    }
}
