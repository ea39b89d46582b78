use crate::domains::wallet::models::Transaction;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

pub const CSV_HEADERS: [&str; 5] = ["Date", "Type", "Amount", "Balance", "Description"];

/// 거래 내역 CSV 내보내기
/// Writes transactions as CSV: `Date,Type,Amount,Balance,Description`.
///
/// Dates are `dd/mm/yyyy`, money is `{symbol}{value:.4}`.
pub fn write_transactions_csv<W: Write>(
    writer: W,
    transactions: &[Transaction],
    currency_symbol: &str,
) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADERS)?;

    for tx in transactions {
        csv.write_record([
            tx.date.format("%d/%m/%Y").to_string(),
            tx.transaction_type.as_str().to_string(),
            format!("{}{:.4}", currency_symbol, tx.amount),
            format!("{}{:.4}", currency_symbol, tx.balance),
            tx.description.clone(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// 메모리 버퍼로 CSV 생성
pub fn transactions_to_csv(transactions: &[Transaction], currency_symbol: &str) -> Result<String> {
    let mut buffer = Vec::new();
    write_transactions_csv(&mut buffer, transactions, currency_symbol)?;
    String::from_utf8(buffer).context("CSV output was not valid UTF-8")
}

/// 파일로 저장
pub fn export_transactions_csv(
    path: &Path,
    transactions: &[Transaction],
    currency_symbol: &str,
) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_transactions_csv(file, transactions, currency_symbol)?;
    tracing::info!(path = %path.display(), rows = transactions.len(), "transactions exported to CSV");
    Ok(())
}
