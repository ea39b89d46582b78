use serde::{Deserialize, Serialize};
use std::fmt;

/// 검증 실패 사유 코드
/// Machine-readable reason attached to a field error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationCode {
    Required,
    InvalidNumber,
    PrecisionExceeded,
    OutOfRange,
    ZeroAmount,
    NegativeBalance,
    EmptyDescription,
    DescriptionTooLong,
    InsufficientBalance,
    InvalidLength,
    InvalidEmail,
}

impl ValidationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationCode::Required => "required",
            ValidationCode::InvalidNumber => "invalid_number",
            ValidationCode::PrecisionExceeded => "precision_exceeded",
            ValidationCode::OutOfRange => "out_of_range",
            ValidationCode::ZeroAmount => "zero_amount",
            ValidationCode::NegativeBalance => "negative_balance",
            ValidationCode::EmptyDescription => "empty_description",
            ValidationCode::DescriptionTooLong => "description_too_long",
            ValidationCode::InsufficientBalance => "insufficient_balance",
            ValidationCode::InvalidLength => "invalid_length",
            ValidationCode::InvalidEmail => "invalid_email",
        }
    }
}

/// 필드 단위 에러
/// Single `{field, message}` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ValidationCode>,
}

impl FieldError {
    pub fn new(field: impl Into<String>, code: ValidationCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: Some(code),
        }
    }

    /// 서버에서 받은 에러 (코드 없음)
    /// Field error reported by the remote service, which carries no code
    pub fn remote(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: None,
        }
    }
}

/// 검증 에러
/// Validation failure surfaced to callers.
///
/// Serializes to the same shape the wallet service uses for its own
/// validation failures:
///
/// ```json
/// { "status": "fail", "category": "ValidationError",
///   "details": [{ "field": "amount", "message": "..." }] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// 항상 "fail"
    pub status: String,
    pub category: String,
    pub details: Vec<FieldError>,
}

pub const VALIDATION_STATUS: &str = "fail";
pub const VALIDATION_CATEGORY: &str = "ValidationError";

impl ValidationError {
    pub fn new(details: Vec<FieldError>) -> Self {
        Self {
            status: VALIDATION_STATUS.to_string(),
            category: VALIDATION_CATEGORY.to_string(),
            details,
        }
    }

    pub fn single(field: impl Into<String>, code: ValidationCode, message: impl Into<String>) -> Self {
        Self::new(vec![FieldError::new(field, code, message)])
    }

    /// 특정 코드가 포함되어 있는지 확인
    pub fn has_code(&self, code: ValidationCode) -> bool {
        self.details.iter().any(|d| d.code == Some(code))
    }

    /// 특정 필드의 첫 번째 메시지
    /// First message reported for `field`, if any
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.details
            .iter()
            .find(|d| d.field == field)
            .map(|d| d.message.as_str())
    }

    pub fn codes(&self) -> Vec<ValidationCode> {
        self.details.iter().filter_map(|d| d.code).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.details.first() {
            Some(first) if self.details.len() == 1 => write!(f, "{}: {}", first.field, first.message),
            Some(first) => write!(
                f,
                "{}: {} (and {} more)",
                first.field,
                first.message,
                self.details.len() - 1
            ),
            None => write!(f, "validation failed"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// 검증 에러 수집기
/// Accumulates field errors so every failing rule is reported at once.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    details: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, code: ValidationCode, message: impl Into<String>) {
        self.details.push(FieldError::new(field, code, message));
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    pub fn into_error(self) -> ValidationError {
        ValidationError::new(self.details)
    }

    /// 에러가 없으면 `value`를 반환
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationError> {
        if self.details.is_empty() {
            Ok(value())
        } else {
            Err(ValidationError::new(self.details))
        }
    }
}
