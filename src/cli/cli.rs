mod cli_config;
use cli_config::CliConfig;

use ledger_store::{LedgerStore, Rehydration, Transaction, Amount,
    backend::JsonStore,
    ledger::Applied};

use std::path::PathBuf;
use anyhow::Context;
use chrono::{DateTime, Utc};
use colored::Colorize;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(version, about, propagate_version = true)]
struct Cli {
    /// Path to the configuration file
    #[clap(short, long, value_parser, default_value = "ledger.toml")]
    config: PathBuf,

    /// Directory holding the ledger, overrides the configured one
    #[clap(long, value_parser)]
    data_dir: Option<PathBuf>,

    /// Action to perform
    #[clap(subcommand)]
    action: Subcommands,
}

#[derive(Debug, Subcommand)]
enum Subcommands {
    /// Display the current balance
    Balance,
    /// List all transactions
    List,
    /// Record a new transaction
    Add(AddTransaction),
    /// Remove every transaction and reset the balance
    Clear,
    /// Reload the stored ledger and report its consistency
    Check,
}

#[derive(Args, Debug)]
struct AddTransaction {
    /// Unique id of the transaction
    #[clap(short, long, value_parser)]
    id: String,

    /// Signed amount, negative for debits
    #[clap(short, long, value_parser, allow_hyphen_values = true)]
    amount: Amount,

    #[clap(short, long, value_parser)]
    title: String,

    /// RFC 3339 timestamp, defaults to now
    #[clap(short, long, value_parser)]
    date: Option<DateTime<Utc>>,
}

impl AddTransaction {
    fn into_transaction(self) -> Transaction {
        let date = self.date.unwrap_or_else(Utc::now);
        Transaction::new(self.id, self.amount, date, &self.title)
    }
}

fn colored_amount(amount: Amount) -> colored::ColoredString {
    let color = if amount < 0.0 {
        colored::ColoredString::bright_red
    } else if amount > 0.0 {
        colored::ColoredString::green
    } else {
        colored::ColoredString::normal
    };
    color(format!("{:.2}", amount).white())
}

fn print_rehydration(outcome: Rehydration) {
    match outcome {
        Rehydration::Empty => println!("{}", "No stored ledger".dimmed()),
        Rehydration::Restored { transactions } =>
            println!("{}: {} transactions", "Consistent".green(), transactions),
        Rehydration::Repaired { stored, calculated } =>
            println!("{}: stored balance {} rebuilt as {}", "Repaired".yellow(), stored, calculated),
        Rehydration::Discarded =>
            println!("{}: stored ledger was unreadable and has been ignored", "Discarded".bright_red()),
        Rehydration::Unavailable =>
            println!("{}: storage could not be read", "Unavailable".bright_red()),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Cli::parse();

    let config = CliConfig::read(&args.config)?;
    let dir = args.data_dir.unwrap_or(config.storage.dir);
    let mut store = LedgerStore::open(JsonStore::new(&dir), config.ledger);

    match args.action {
        Subcommands::Balance => {
            println!("{}: {}", "Balance".bold(), colored_amount(store.balance()));
        },
        Subcommands::List => {
            for t in store.transactions() {
                println!("{}", t);
            }
        },
        Subcommands::Add(add) => {
            let transaction = add.into_transaction();
            let id = transaction.id.clone();
            let kind = if transaction.is_credit() { "credit".green() } else { "debit".bright_red() };
            match store.append_transaction(transaction)
                .with_context(|| format!("failed to record transaction {}", id))? {
                Applied::Appended => println!("Recorded {} {}", kind, id),
                Applied::Ignored => println!("{} already recorded, ignored", id),
            }
            println!("{}: {}", "Balance".bold(), colored_amount(store.balance()));
        },
        Subcommands::Clear => {
            store.clear_ledger().context("failed to clear ledger")?;
            println!("Ledger cleared");
        },
        Subcommands::Check => {
            print_rehydration(store.last_rehydration());
            println!("{}: {}", "Balance".bold(), colored_amount(store.balance()));
        },
    }

    Ok(())
}
