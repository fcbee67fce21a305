use cardback::{CardId, Client, CreateTransactionRequest, Transaction, TransactionFilter};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};

use crate::commands::error::TransactionError;
use crate::console::{print_success_message, print_table};
use crate::validation::{validate_amount, validate_currency};

#[derive(Subcommand)]
pub enum TxCommand {
    /// List transactions, optionally within a time window
    List(ListArgs),
    /// Record a new transaction against a card
    Create(CreateTransactionArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Only include transactions at or after this RFC 3339 timestamp
    #[arg(long)]
    pub from: Option<String>,

    /// Only include transactions at or before this RFC 3339 timestamp
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Args)]
pub struct CreateTransactionArgs {
    /// The card to record the transaction against
    #[arg(long)]
    pub card: CardId,

    /// Amount in currency units, e.g. 120.50
    #[arg(long)]
    pub amount: String,

    /// Three-letter currency code, e.g. COP
    #[arg(long)]
    pub currency: String,

    /// Free-form description
    #[arg(long)]
    pub description: String,
}

pub async fn handle_tx(command: &TxCommand, client: &Client) -> Result<(), TransactionError> {
    match command {
        TxCommand::List(args) => handle_list(args, client).await,
        TxCommand::Create(args) => handle_create(args, client).await,
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

async fn handle_list(args: &ListArgs, client: &Client) -> Result<(), TransactionError> {
    let filter = TransactionFilter {
        from: args.from.as_deref().map(parse_timestamp).transpose()?,
        to: args.to.as_deref().map(parse_timestamp).transpose()?,
    };

    let transactions = client.transactions.get_all(&filter).await?;
    log_transactions(&transactions);

    Ok(())
}

pub fn log_transactions(transactions: &[Transaction]) {
    if transactions.is_empty() {
        println!("No transactions found.");
        return;
    }

    let mut rows = Vec::new();
    for transaction in transactions.iter() {
        rows.push(vec![
            transaction.id.to_string(),
            transaction.card_id.to_string(),
            format!("{:.2} {}", transaction.amount, transaction.currency),
            transaction.description.clone(),
            transaction.status.clone(),
            transaction.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }

    let headers = vec!["Id", "Card", "Amount", "Description", "Status", "Created"];

    let title = format!("{} Transactions:", transactions.len());
    print_table(headers, rows, Some(&title));
}

async fn handle_create(args: &CreateTransactionArgs, client: &Client) -> Result<(), TransactionError> {
    let amount = validate_amount(&args.amount)?;
    let currency = validate_currency(&args.currency)?;

    let transaction = client
        .transactions
        .create(&CreateTransactionRequest {
            card_id: args.card,
            amount,
            currency,
            description: args.description.clone(),
        })
        .await?;

    print_success_message(&format!(
        "Transaction {} recorded: {:.2} {} on card {}.",
        transaction.id, transaction.amount, transaction.currency, transaction.card_id
    ));

    Ok(())
}
