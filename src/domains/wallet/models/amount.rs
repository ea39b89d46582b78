use crate::shared::errors::ValidationCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// 소수점 이하 최대 자릿수
pub const MAX_FRACTION_DIGITS: usize = 4;

/// 허용 최대 절대값: 999,999,999.9999
pub fn max_amount() -> Decimal {
    Decimal::new(9_999_999_999_999, 4)
}

/// 금액이 쓰이는 맥락
/// Zero is only rejected for transaction amounts; a wallet may hold 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountContext {
    Transaction,
    Balance,
}

/// 거래 유형 (금액 부호로 결정)
/// Transaction type, derived from the amount sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Credit,
    Debit,
}

impl TransactionType {
    pub fn from_amount(amount: Decimal) -> Self {
        if amount.is_sign_negative() && !amount.is_zero() {
            TransactionType::Debit
        } else {
            TransactionType::Credit
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Credit => "CREDIT",
            TransactionType::Debit => "DEBIT",
        }
    }
}

/// 정규화된 금액
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedAmount {
    pub value: Decimal,
    pub transaction_type: TransactionType,
}

/// 금액 거절 사유
/// Why a raw amount was rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountRejection {
    #[error("not a finite number")]
    InvalidNumber,

    #[error("more than 4 decimal places")]
    PrecisionExceeded,

    #[error("absolute value exceeds 999,999,999.9999")]
    OutOfRange,

    #[error("amount is zero")]
    ZeroAmount,
}

impl AmountRejection {
    pub fn code(&self) -> ValidationCode {
        match self {
            AmountRejection::InvalidNumber => ValidationCode::InvalidNumber,
            AmountRejection::PrecisionExceeded => ValidationCode::PrecisionExceeded,
            AmountRejection::OutOfRange => ValidationCode::OutOfRange,
            AmountRejection::ZeroAmount => ValidationCode::ZeroAmount,
        }
    }

    /// 폼 필드 옆에 표시할 메시지 (`label` 예: "Amount", "Balance")
    pub fn message(&self, label: &str) -> String {
        match self {
            AmountRejection::InvalidNumber => "Please enter a valid number".to_string(),
            AmountRejection::PrecisionExceeded => {
                format!("{} can have up to {} decimal places", label, MAX_FRACTION_DIGITS)
            }
            AmountRejection::OutOfRange => format!("{} cannot exceed 999,999,999.9999", label),
            AmountRejection::ZeroAmount => format!("{} must not be zero", label),
        }
    }
}

/// 숫자 입력 정규화
/// Normalizes a raw numeric input.
///
/// Rules, in order: finite, at most 4 fractional digits (checked on the
/// shortest text form, so `12.3456` passes and `0.1 + 0.2` does not),
/// within ±999,999,999.9999, and non-zero for transaction amounts. Excess
/// precision is rejected, never rounded away.
pub fn normalize(raw: f64, context: AmountContext) -> Result<NormalizedAmount, AmountRejection> {
    if !raw.is_finite() {
        return Err(AmountRejection::InvalidNumber);
    }

    let text = raw.to_string();
    if fraction_digits(&text) > MAX_FRACTION_DIGITS {
        return Err(AmountRejection::PrecisionExceeded);
    }

    // 28자리를 넘는 정수부는 Decimal 로 표현 불가 → 범위 초과
    let value = Decimal::from_str(&text).map_err(|_| AmountRejection::OutOfRange)?;
    normalize_decimal(value, context)
}

/// 이미 Decimal 인 값 정규화 (같은 규칙)
pub fn normalize_decimal(
    value: Decimal,
    context: AmountContext,
) -> Result<NormalizedAmount, AmountRejection> {
    let value = value.normalize();
    if value.scale() as usize > MAX_FRACTION_DIGITS {
        return Err(AmountRejection::PrecisionExceeded);
    }
    if value.abs() > max_amount() {
        return Err(AmountRejection::OutOfRange);
    }
    if context == AmountContext::Transaction && value.is_zero() {
        return Err(AmountRejection::ZeroAmount);
    }

    Ok(NormalizedAmount {
        value,
        transaction_type: TransactionType::from_amount(value),
    })
}

/// 텍스트 입력 정규화 (CLI, 폼 입력)
pub fn parse_amount(text: &str, context: AmountContext) -> Result<NormalizedAmount, AmountRejection> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AmountRejection::InvalidNumber);
    }

    let plain = text.trim_start_matches(['+', '-']);
    let is_plain_decimal = !plain.is_empty()
        && plain.chars().all(|c| c.is_ascii_digit() || c == '.')
        && plain.matches('.').count() <= 1
        && plain != ".";

    if is_plain_decimal {
        if fraction_digits(text) > MAX_FRACTION_DIGITS {
            return Err(AmountRejection::PrecisionExceeded);
        }
        return match Decimal::from_str(text) {
            Ok(value) => normalize_decimal(value, context),
            Err(_) => Err(AmountRejection::OutOfRange),
        };
    }

    // 지수 표기 등은 f64 로 해석
    match text.parse::<f64>() {
        Ok(raw) => normalize(raw, context),
        Err(_) => Err(AmountRejection::InvalidNumber),
    }
}

/// 소수부 자릿수 (끝의 0 제외)
fn fraction_digits(text: &str) -> usize {
    text.split_once('.')
        .map(|(_, fraction)| fraction.trim_end_matches('0').len())
        .unwrap_or(0)
}
