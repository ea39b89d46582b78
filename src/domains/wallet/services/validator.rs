use crate::domains::wallet::models::{
    normalize, AmountContext, NormalizedTransaction, TransactionInput, TransactionType,
    WalletSetupInput, CreateWalletRequest,
};
use crate::shared::errors::{ClientError, ValidationCode, ValidationError, ValidationErrors};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// 설명 최대 길이 (문자 수)
pub const MAX_DESCRIPTION_CHARS: usize = 200;
pub const MIN_WALLET_NAME_CHARS: usize = 2;
pub const MAX_WALLET_NAME_CHARS: usize = 50;

/// 최신 잔액 조회 협력자
/// Collaborator that reads a wallet's current balance from the service
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn current_balance(&self, wallet_id: &str) -> Result<Decimal, ClientError>;
}

/// 거래 검증
/// Transaction Validator
///
/// 모든 규칙을 평가하고 실패한 항목을 전부 `details` 에 모은다
/// (첫 번째 실패에서 멈추지 않음).
///
/// 규칙:
/// 1. walletId 필수
/// 2. amount 필수 (0도 "존재"로 취급하고 zero_amount 로 거절)
/// 3. 금액 정규화 (invalid_number / precision_exceeded / out_of_range / zero_amount)
/// 4. 설명: 공백 제거 후 비어있지 않음, 200자 이하
/// 5. 출금(음수)은 |amount| <= 현재 잔액
pub fn validate_transaction(
    wallet_id: &str,
    current_balance: Decimal,
    input: &TransactionInput,
) -> Result<NormalizedTransaction, ValidationError> {
    let mut errors = ValidationErrors::new();

    if wallet_id.trim().is_empty() {
        errors.push("walletId", ValidationCode::Required, "Wallet ID is required");
    }

    let amount = match input.amount {
        None => {
            errors.push("amount", ValidationCode::Required, "Amount is required");
            None
        }
        Some(raw) => match normalize(raw, AmountContext::Transaction) {
            Ok(amount) => Some(amount),
            Err(rejection) => {
                errors.push("amount", rejection.code(), rejection.message("Amount"));
                None
            }
        },
    };

    let description = input.description.trim();
    if description.is_empty() {
        errors.push("description", ValidationCode::EmptyDescription, "Description is required");
    } else if description.chars().count() > MAX_DESCRIPTION_CHARS {
        errors.push(
            "description",
            ValidationCode::DescriptionTooLong,
            format!("Description must not exceed {} characters", MAX_DESCRIPTION_CHARS),
        );
    }

    if let Some(amount) = amount {
        if amount.transaction_type == TransactionType::Debit && amount.value.abs() > current_balance {
            errors.push(
                "amount",
                ValidationCode::InsufficientBalance,
                insufficient_balance_message(amount.value.abs(), current_balance),
            );
        }
    }

    match amount {
        Some(amount) if errors.is_empty() => Ok(NormalizedTransaction {
            wallet_id: wallet_id.trim().to_string(),
            amount: amount.value,
            transaction_type: amount.transaction_type,
            description: description.to_string(),
        }),
        // amount 가 None 이면 이미 에러가 기록되어 있음
        _ => Err(errors.into_error()),
    }
}

/// 최신 잔액을 조회한 뒤 검증
/// Reads the balance through `source` immediately before validating.
///
/// The read-then-decide window is unavoidable; the service re-checks and its
/// verdict wins.
pub async fn validate_with_fresh_balance(
    source: &dyn BalanceSource,
    wallet_id: &str,
    input: &TransactionInput,
) -> Result<NormalizedTransaction, ClientError> {
    // 유효한 출금일 때만 잔액을 읽음 (다른 필드 오류가 있어도 잔액 부족까지 함께 수집)
    let is_debit = input
        .amount
        .and_then(|raw| normalize(raw, AmountContext::Transaction).ok())
        .is_some_and(|amount| amount.transaction_type == TransactionType::Debit);

    let balance = if is_debit && !wallet_id.trim().is_empty() {
        let balance = source.current_balance(wallet_id).await?;
        tracing::debug!(wallet_id, %balance, "fresh balance read before transaction");
        balance
    } else {
        balance_without_read()
    };

    validate_transaction(wallet_id, balance, input).map_err(ClientError::Validation)
}

/// 잔액 부족 메시지 (시도 금액과 현재 잔액 포함)
pub fn insufficient_balance_message(attempted: Decimal, balance: Decimal) -> String {
    format!(
        "Insufficient balance: attempted debit of {:.4} exceeds current balance of {:.4}",
        attempted, balance
    )
}

/// 서버가 잔액 부족으로 거절한 경우 → 로컬 insufficient_balance 와 동일하게 취급
/// Maps a service-side insufficient-funds rejection onto the local error.
pub fn remap_remote_insufficient_balance(
    error: ClientError,
    attempted: Decimal,
    balance_hint: Option<Decimal>,
) -> ClientError {
    let is_insufficient = match &error {
        ClientError::Api(api) if (400..500).contains(&api.status) => {
            api.message.to_lowercase().contains("insufficient")
                || api
                    .details
                    .iter()
                    .any(|d| d.message.to_lowercase().contains("insufficient"))
        }
        _ => false,
    };
    if !is_insufficient {
        return error;
    }

    let message = match balance_hint {
        Some(balance) => insufficient_balance_message(attempted, balance),
        None => format!(
            "Insufficient balance: attempted debit of {:.4} was rejected by the wallet service",
            attempted
        ),
    };
    ClientError::Validation(ValidationError::single(
        "amount",
        ValidationCode::InsufficientBalance,
        message,
    ))
}

/// 지갑 생성 검증 (이름 2~50자, 초기 잔액 0 이상)
pub fn validate_wallet_setup(input: &WalletSetupInput) -> Result<CreateWalletRequest, ValidationError> {
    let mut errors = ValidationErrors::new();

    let name = input.name.trim();
    let name_len = name.chars().count();
    if name.is_empty() {
        errors.push("name", ValidationCode::Required, "Wallet name is required");
    } else if name_len < MIN_WALLET_NAME_CHARS {
        errors.push(
            "name",
            ValidationCode::InvalidLength,
            format!("Name must be at least {} characters", MIN_WALLET_NAME_CHARS),
        );
    } else if name_len > MAX_WALLET_NAME_CHARS {
        errors.push(
            "name",
            ValidationCode::InvalidLength,
            format!("Name must not exceed {} characters", MAX_WALLET_NAME_CHARS),
        );
    }

    let balance = match input.initial_balance {
        None => {
            errors.push("balance", ValidationCode::Required, "Initial balance is required");
            None
        }
        Some(raw) => match normalize(raw, AmountContext::Balance) {
            Ok(amount) if amount.value.is_sign_negative() && !amount.value.is_zero() => {
                errors.push(
                    "balance",
                    ValidationCode::NegativeBalance,
                    "Initial balance must not be negative",
                );
                None
            }
            Ok(amount) => Some(amount.value),
            Err(rejection) => {
                errors.push("balance", rejection.code(), rejection.message("Balance"));
                None
            }
        },
    };

    errors.finish(|| CreateWalletRequest {
        name: name.to_string(),
        initial_balance: balance.unwrap_or_default(),
    })
}

/// 잔액을 읽지 않는 경우 (입금, 금액 오류) 의 상한
fn balance_without_read() -> Decimal {
    crate::domains::wallet::models::max_amount()
}
