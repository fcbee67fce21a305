use clap::{Parser, Subcommand};

use crate::commands::{card::CardCommand, tx::TxCommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session token pair
    Login {
        /// optional - username to log in as, prompted for when omitted.
        #[clap(long, short)]
        username: Option<String>,
    },
    /// Drop the stored session
    Logout,
    /// Show whether a session is stored
    Status,
    /// Manage payment cards
    Card {
        #[command(subcommand)]
        command: CardCommand,
    },
    /// Record and list transactions
    Tx {
        #[command(subcommand)]
        command: TxCommand,
    },
}
