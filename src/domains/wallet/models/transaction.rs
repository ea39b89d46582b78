use crate::domains::wallet::models::amount::TransactionType;
use crate::shared::utils::IdempotencyKey;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 거래 내역
/// Transaction (immutable once created)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(alias = "_id")]
    pub id: String,

    /// 소속 지갑 ID (역참조)
    #[serde(rename = "walletId")]
    pub wallet_id: String,

    /// 부호 있는 금액 (양수: 입금, 음수: 출금)
    #[serde(with = "crate::shared::utils::money")]
    pub amount: Decimal,

    /// 거래 후 잔액
    /// Balance snapshot after this transaction
    #[serde(with = "crate::shared::utils::money")]
    pub balance: Decimal,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    pub description: String,

    #[serde(alias = "createdAt")]
    pub date: DateTime<Utc>,
}

/// 거래 생성 입력 (사용자 입력 그대로)
/// Raw user input for a new transaction
#[derive(Debug, Clone, Default)]
pub struct TransactionInput {
    /// 없으면 `required` 에러
    pub amount: Option<f64>,
    pub description: String,
}

impl TransactionInput {
    pub fn new(amount: f64, description: impl Into<String>) -> Self {
        Self {
            amount: Some(amount),
            description: description.into(),
        }
    }
}

/// 검증을 통과한 거래
/// Transaction that passed local validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTransaction {
    pub wallet_id: String,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    /// 앞뒤 공백 제거됨
    pub description: String,
}

impl NormalizedTransaction {
    pub fn to_request(&self) -> TransactionRequest {
        TransactionRequest {
            amount: self.amount,
            description: self.description.clone(),
        }
    }
}

/// 거래 생성 요청 (wire)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRequest {
    #[serde(with = "crate::shared::utils::money")]
    pub amount: Decimal,
    pub description: String,
}

/// 거래 생성 응답
/// Transact response: new balance plus the created transaction id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResponse {
    #[serde(with = "crate::shared::utils::money")]
    pub balance: Decimal,

    #[serde(rename = "transactionId")]
    pub transaction_id: String,
}

/// 거래 생성 옵션
#[derive(Debug, Clone, Default)]
pub struct TransactOptions {
    /// 호출자 재시도 루프에서 같은 키를 재사용할 때 지정.
    /// None 이면 요청마다 새 키를 생성한다.
    pub idempotency_key: Option<IdempotencyKey>,
}

impl TransactOptions {
    pub fn with_idempotency_key(key: IdempotencyKey) -> Self {
        Self {
            idempotency_key: Some(key),
        }
    }
}

/// 정렬 기준
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Date,
    Amount,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Date => "date",
            SortBy::Amount => "amount",
        }
    }
}

/// 정렬 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// 거래 목록 조회 파라미터
/// Paging and sorting for the transaction list (defaults: 0, 10, date, desc)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    pub skip: u32,
    pub limit: u32,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

pub const DEFAULT_PAGE_SIZE: u32 = 10;

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_SIZE,
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl TransactionQuery {
    /// 페이지 번호(0부터)와 크기로 생성
    pub fn page(page: u32, page_size: u32) -> Self {
        Self {
            skip: page.saturating_mul(page_size),
            limit: page_size,
            ..Self::default()
        }
    }

    pub fn sorted(mut self, sort_by: SortBy, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("skip", self.skip.to_string()),
            ("limit", self.limit.to_string()),
            ("sortBy", self.sort_by.as_str().to_string()),
            ("sortOrder", self.sort_order.as_str().to_string()),
        ]
    }
}

/// 거래 목록 응답
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionsPage {
    pub transactions: Vec<Transaction>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_transaction_wire_format() {
        let json = r#"{
            "id": "t-1",
            "walletId": "w-1",
            "amount": -20.5,
            "balance": 79.5,
            "type": "DEBIT",
            "description": "groceries",
            "date": "2024-03-01T10:00:00Z"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();

        assert_eq!(tx.wallet_id, "w-1");
        assert_eq!(tx.amount, Decimal::from_str("-20.5").unwrap());
        assert_eq!(tx.transaction_type, TransactionType::Debit);
    }

    #[test]
    fn test_request_sends_plain_numbers() {
        let request = TransactionRequest {
            amount: Decimal::from_str("12.3456").unwrap(),
            description: "rent".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"amount":12.3456,"description":"rent"}"#
        );
    }

    #[test]
    fn test_query_defaults_and_paging() {
        let query = TransactionQuery::default();
        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("skip", "0".to_string()),
                ("limit", "10".to_string()),
                ("sortBy", "date".to_string()),
                ("sortOrder", "desc".to_string()),
            ]
        );

        let third_page = TransactionQuery::page(2, 25).sorted(SortBy::Amount, SortOrder::Asc);
        assert_eq!(third_page.skip, 50);
        assert_eq!(third_page.sort_by.as_str(), "amount");
    }
}
