use cardback::{Card, CardId, Client, CreateCardRequest};
use clap::{Args, Subcommand};

use crate::commands::error::CardError;
use crate::console::{print_success_message, print_table};
use crate::validation::validate_last4;

#[derive(Subcommand)]
pub enum CardCommand {
    /// List all registered cards
    List,
    /// Register a new card
    Create(CreateCardArgs),
    /// Delete a card
    Delete {
        /// The unique identifier of the card
        id: CardId,
    },
    /// Show the transaction history of a card
    History {
        /// The unique identifier of the card
        id: CardId,
    },
}

#[derive(Args)]
pub struct CreateCardArgs {
    /// Card network brand, e.g. Visa
    #[arg(long)]
    pub brand: String,

    /// Last four digits of the card number
    #[arg(long)]
    pub last4: String,

    /// Vault token referencing the full card number
    #[arg(long)]
    pub token: String,

    /// Display name for the card
    #[arg(long)]
    pub nickname: String,
}

pub async fn handle_card(command: &CardCommand, client: &Client) -> Result<(), CardError> {
    match command {
        CardCommand::List => handle_list(client).await,
        CardCommand::Create(args) => handle_create(args, client).await,
        CardCommand::Delete { id } => handle_delete(id, client).await,
        CardCommand::History { id } => handle_history(id, client).await,
    }
}

async fn handle_list(client: &Client) -> Result<(), CardError> {
    let cards = client.cards.get_all().await?;
    log_cards(&cards);

    Ok(())
}

fn log_cards(cards: &[Card]) {
    if cards.is_empty() {
        println!("No cards yet.");
        return;
    }

    let mut rows = Vec::new();
    for card in cards.iter() {
        rows.push(vec![
            card.id.to_string(),
            card.brand.clone(),
            card.last4.clone(),
            card.nickname.clone(),
            card.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }

    let headers = vec!["Id", "Brand", "Last4", "Nickname", "Created"];

    let title = format!("{} Cards:", cards.len());
    print_table(headers, rows, Some(&title));
}

async fn handle_create(args: &CreateCardArgs, client: &Client) -> Result<(), CardError> {
    let last4 = validate_last4(&args.last4)?;

    let card = client
        .cards
        .create(&CreateCardRequest {
            brand: args.brand.clone(),
            last4,
            token: args.token.clone(),
            nickname: args.nickname.clone(),
        })
        .await?;

    println!("\n✅  Card registered successfully!");
    println!("┌─────────────────────────────────────────────────");
    println!("│ Id:        {}", card.id);
    println!("│ Brand:     {}", card.brand);
    println!("│ Last4:     {}", card.last4);
    println!("│ Nickname:  {}", card.nickname);
    println!("└─────────────────────────────────────────────────");
    println!("\nUse 'cardback card history {}' to see its transactions.", card.id);

    Ok(())
}

async fn handle_delete(id: &CardId, client: &Client) -> Result<(), CardError> {
    client.cards.delete(id).await?;
    print_success_message(&format!("Card {} deleted.", id));

    Ok(())
}

async fn handle_history(id: &CardId, client: &Client) -> Result<(), CardError> {
    let transactions = client.cards.get_transactions(id).await?;
    crate::commands::tx::log_transactions(&transactions);

    Ok(())
}
