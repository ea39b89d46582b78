//! # CLI Interface
//!
//! `wallet-cli` argument structure (clap derive). Every wallet and auth
//! operation is a subcommand; the session token persists between runs in
//! the token file.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use wallet_client::domains::wallet::models::{parse_amount, AmountContext, SortBy, SortOrder};
use wallet_client::logging::LogFormat;
use wallet_client::shared::config::{DEFAULT_API_URL, DEFAULT_TOKEN_PATH};

/// Command-line client for the wallet service.
#[derive(Parser, Debug)]
#[command(name = "wallet-cli", about = "Wallet service client", version, propagate_version = true)]
pub struct WalletCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Wallet service base URL.
    #[arg(long, global = true, env = "WALLET_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// File holding the session token between runs.
    #[arg(long, global = true, env = "WALLET_TOKEN_PATH", default_value = DEFAULT_TOKEN_PATH)]
    pub token_path: PathBuf,

    /// Currency symbol used in CSV exports.
    #[arg(long, global = true, default_value = "₹")]
    pub currency: String,

    /// Log output format (pretty or json).
    #[arg(long, global = true, env = "WALLET_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,

    /// Default log filter when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "wallet_client=warn,wallet_cli=info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session token.
    Login { username: String, password: String },
    /// Create an account (log in afterwards).
    Register {
        username: String,
        password: String,
        email: String,
    },
    /// Forget the stored session token.
    Logout,
    /// List your wallets.
    Wallets,
    /// Create a wallet.
    CreateWallet {
        name: String,
        /// Initial balance (up to 4 decimal places).
        #[arg(long, default_value = "0", allow_hyphen_values = true, value_parser = parse_balance_arg)]
        balance: f64,
    },
    /// Show one wallet.
    Wallet { wallet_id: String },
    /// Record a credit (positive) or debit (negative).
    Transact(TransactArgs),
    /// List transactions of a wallet.
    Transactions(ListArgs),
    /// Download the transaction statement PDF.
    ExportPdf {
        wallet_id: String,
        #[arg(long, short = 'o')]
        output: PathBuf,
    },
    /// Write transactions as CSV.
    ExportCsv {
        #[command(flatten)]
        list: ListArgs,
        /// Output file; stdout when omitted.
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Run the in-memory wallet service.
    #[cfg(feature = "mock-server")]
    MockServer {
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: String,
    },
}

#[derive(Args, Debug)]
pub struct TransactArgs {
    pub wallet_id: String,

    /// Signed amount, e.g. `250.5` or `-20`.
    #[arg(allow_hyphen_values = true, value_parser = parse_transaction_arg)]
    pub amount: f64,

    pub description: String,

    /// Reuse a key when retrying the same transaction.
    #[arg(long)]
    pub idempotency_key: Option<String>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    pub wallet_id: String,

    /// Zero-based page number.
    #[arg(long, default_value_t = 0)]
    pub page: u32,

    #[arg(long, default_value_t = 10)]
    pub page_size: u32,

    /// `date` or `amount`.
    #[arg(long, default_value = "date", value_parser = parse_sort_by)]
    pub sort_by: SortBy,

    /// `asc` or `desc`.
    #[arg(long, default_value = "desc", value_parser = parse_sort_order)]
    pub sort_order: SortOrder,
}

fn parse_transaction_arg(s: &str) -> Result<f64, String> {
    parse_number_arg(s, AmountContext::Transaction, "Amount")
}

fn parse_balance_arg(s: &str) -> Result<f64, String> {
    parse_number_arg(s, AmountContext::Balance, "Balance")
}

fn parse_number_arg(s: &str, context: AmountContext, label: &str) -> Result<f64, String> {
    parse_amount(s, context).map_err(|rejection| rejection.message(label))?;
    s.trim().parse::<f64>().map_err(|e| e.to_string())
}

fn parse_sort_by(s: &str) -> Result<SortBy, String> {
    match s.to_lowercase().as_str() {
        "date" => Ok(SortBy::Date),
        "amount" => Ok(SortBy::Amount),
        other => Err(format!("unknown sort field: {}", other)),
    }
}

fn parse_sort_order(s: &str) -> Result<SortOrder, String> {
    match s.to_lowercase().as_str() {
        "asc" => Ok(SortOrder::Asc),
        "desc" => Ok(SortOrder::Desc),
        other => Err(format!("unknown sort order: {}", other)),
    }
}
