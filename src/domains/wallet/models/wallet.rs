use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 지갑
/// Wallet as returned by the wallet service.
///
/// The balance is authoritative only on the service; the client refetches
/// after every transaction instead of adjusting it locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    #[serde(alias = "_id")]
    pub id: String,

    pub name: String,

    #[serde(with = "crate::shared::utils::money")]
    pub balance: Decimal,

    /// 생성 시각
    /// Creation timestamp
    #[serde(alias = "createdAt")]
    pub date: DateTime<Utc>,
}

/// 지갑 생성 요청
/// Create wallet request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWalletRequest {
    pub name: String,

    /// 초기 잔액 (0 허용)
    /// Initial balance (zero allowed)
    #[serde(rename = "initialBalance", with = "crate::shared::utils::money")]
    pub initial_balance: Decimal,
}

/// 지갑 생성 입력 (검증 전)
/// Raw wallet setup input, validated before dispatch
#[derive(Debug, Clone)]
pub struct WalletSetupInput {
    pub name: String,
    pub initial_balance: Option<f64>,
}
