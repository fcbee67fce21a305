use cardback::setup_info_logger;
use clap::Parser;

use crate::cli_interface::{Cli, Commands};
use crate::commands::{auth, card, tx};
use crate::error::CliError;
use crate::session::{build_client, check_session};

mod cli_interface;
mod commands;
mod console;
mod error;
mod session;
mod validation;

pub use console::{print_error_message, print_success_message};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    setup_info_logger();

    match &cli.command {
        Commands::Login { username } => {
            let client = build_client();
            auth::handle_login(username.as_deref(), &client).await?;
        }
        Commands::Logout => {
            let client = build_client();
            auth::handle_logout(&client)?;
        }
        Commands::Status => {
            let client = build_client();
            auth::handle_status(&client);
        }
        Commands::Card { command } => {
            let client = build_client();
            check_session(&client)?;

            card::handle_card(command, &client).await?;
        }
        Commands::Tx { command } => {
            let client = build_client();
            check_session(&client)?;

            tx::handle_tx(command, &client).await?;
        }
    }

    Ok(())
}
