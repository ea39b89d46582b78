//! # wallet-cli
//!
//! Entry point: parses arguments, initializes logging, builds the
//! application state and runs one subcommand.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;

use cli::{Commands, ListArgs, WalletCli};
use wallet_client::domains::wallet::models::{
    TransactOptions, TransactionInput, TransactionQuery, WalletSetupInput,
};
use wallet_client::logging;
use wallet_client::shared::config::ClientConfig;
use wallet_client::shared::errors::ClientError;
use wallet_client::shared::services::AppState;
use wallet_client::shared::utils::IdempotencyKey;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = WalletCli::parse();
    logging::init_logging(&cli.global.log_level, cli.global.log_format)?;

    let config = ClientConfig::new(&cli.global.api_url)?
        .with_token_path(cli.global.token_path.clone())
        .with_currency_symbol(cli.global.currency.clone());
    let app_state = AppState::new(config);

    // 세션 만료 / 권한 에러 알림 출력
    app_state.session.subscribe(|event| {
        eprintln!("[auth] {}", event.message());
    });

    run(&app_state, cli.command).await.map_err(report)
}

async fn run(app_state: &AppState, command: Commands) -> Result<(), CommandError> {
    let auth = &app_state.auth_state.auth_service;
    let wallets = &app_state.wallet_state.wallet_service;

    match command {
        Commands::Login { username, password } => {
            let user = auth.login(&username, &password).await?;
            let name = user.and_then(|u| u.username).unwrap_or(username);
            println!("Logged in as {}", name);
        }
        Commands::Register {
            username,
            password,
            email,
        } => {
            auth.register(&username, &password, &email).await?;
            println!("Registered {}. Log in to continue.", username);
        }
        Commands::Logout => {
            auth.logout();
            println!("Logged out");
        }
        Commands::Wallets => print_json(&wallets.list_wallets().await?)?,
        Commands::CreateWallet { name, balance } => {
            let wallet = wallets
                .create_wallet(&WalletSetupInput {
                    name,
                    initial_balance: Some(balance),
                })
                .await?;
            print_json(&wallet)?;
        }
        Commands::Wallet { wallet_id } => print_json(&wallets.get_wallet(&wallet_id).await?)?,
        Commands::Transact(args) => {
            let options = match args.idempotency_key {
                Some(key) => TransactOptions::with_idempotency_key(IdempotencyKey::from_string(key)),
                None => TransactOptions::default(),
            };
            let input = TransactionInput::new(args.amount, args.description);
            let response = wallets
                .create_transaction(&args.wallet_id, &input, options)
                .await?;
            print_json(&response)?;
        }
        Commands::Transactions(list) => {
            let page = wallets
                .list_transactions(&list.wallet_id, &query_for(&list))
                .await?;
            print_json(&page)?;
        }
        Commands::ExportPdf { wallet_id, output } => {
            let bytes = wallets.export_transactions_pdf(&wallet_id).await?;
            std::fs::write(&output, &bytes)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Saved {} bytes to {}", bytes.len(), output.display());
        }
        Commands::ExportCsv { list, output } => {
            let page = wallets
                .list_transactions(&list.wallet_id, &query_for(&list))
                .await?;
            match output {
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    wallets.export_transactions_csv(&page.transactions, file)?;
                    println!("Exported {} transactions to {}", page.transactions.len(), path.display());
                }
                None => wallets.export_transactions_csv(&page.transactions, std::io::stdout().lock())?,
            }
        }
        #[cfg(feature = "mock-server")]
        Commands::MockServer { bind } => run_mock_server(&bind).await?,
    }
    Ok(())
}

fn query_for(list: &ListArgs) -> TransactionQuery {
    TransactionQuery::page(list.page, list.page_size).sorted(list.sort_by, list.sort_order)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// 명령 실행 에러: 클라이언트 에러는 필드별로 출력
#[derive(Debug, thiserror::Error)]
enum CommandError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn report(error: CommandError) -> anyhow::Error {
    match error {
        CommandError::Client(err) => {
            for detail in err.field_errors() {
                if detail.field.is_empty() {
                    eprintln!("  - {}", detail.message);
                } else {
                    eprintln!("  - {}: {}", detail.field, detail.message);
                }
            }
            anyhow::anyhow!(err.user_message())
        }
        CommandError::Other(err) => err,
    }
}

#[cfg(feature = "mock-server")]
async fn run_mock_server(bind: &str) -> Result<()> {
    use wallet_client::mock_server::{MockServer, MockState, DEFAULT_PASSWORD, DEFAULT_USERNAME};

    let server = MockServer::bind(bind, MockState::new()).await?;
    println!("Mock wallet service on {}", server.base_url);
    println!("Demo account: {} / {}", DEFAULT_USERNAME, DEFAULT_PASSWORD);
    server.wait().await
}
