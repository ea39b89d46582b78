use thiserror::Error;
use crate::shared::errors::validation_error::{FieldError, ValidationError};

/// 기본 에러 메시지 (서버 응답에서 메시지를 찾지 못한 경우)
/// Fallback used when the response body carries no usable message
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";

/// 세션 만료 기본 메시지
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please login again.";

/// 클라이언트 에러
/// Every failure surfaced by the wallet client is one of these kinds.
#[derive(Error, Debug)]
pub enum ClientError {
    /// 로컬 검증 실패 (네트워크 호출 없음)
    /// Local pre-flight validation failure; never reached the network
    #[error("Validation failed: {0}")]
    Validation(ValidationError),

    /// 401: 토큰이 없거나 만료됨
    /// Token invalid or expired
    #[error("Authentication failed: {message}")]
    Authentication {
        message: String,
        /// 요청 생성 시점의 세션 세대
        /// Session generation captured when the request was built
        session_generation: u64,
    },

    /// 403: 인증은 되었으나 권한 없음
    /// Authenticated but forbidden
    #[error("Forbidden: {message}")]
    Authorization { message: String },

    /// 그 외 HTTP 에러
    /// Any other non-success response
    #[error("API error ({}): {}", .0.status, .0.message)]
    Api(ApiError),

    /// 서버에 도달하지 못함 (오프라인, 전송 타임아웃 등)
    /// Request never reached the server
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),
}

impl ClientError {
    /// 사용자에게 보여줄 메시지
    /// Message suitable for display next to the form that failed
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(err) => err
                .details
                .first()
                .map(|d| d.message.clone())
                .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
            ClientError::Authentication { .. } => SESSION_EXPIRED_MESSAGE.to_string(),
            ClientError::Authorization { message } => message.clone(),
            ClientError::Api(err) => err.message.clone(),
            ClientError::Network(err) => format!("Network error: {}", err),
        }
    }

    /// 필드별 에러 목록 (로컬 검증 또는 서버 검증)
    /// Field-level errors, whether detected locally or by the service
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ClientError::Validation(err) => &err.details,
            ClientError::Api(err) => &err.details,
            _ => &[],
        }
    }

    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            ClientError::Validation(err) => Some(err),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Authentication { .. } => Some(401),
            ClientError::Authorization { .. } => Some(403),
            ClientError::Api(err) => Some(err.status),
            _ => None,
        }
    }
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Validation(err)
    }
}

/// API 에러 상세
/// Non-success response kept for inspection
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: u16,
    /// 가장 구체적인 메시지 (details → message → error → 기본값)
    pub message: String,
    pub details: Vec<FieldError>,
    /// 원본 응답 본문
    /// Raw response body
    pub body: String,
}

impl ApiError {
    /// 원본 본문을 JSON으로 파싱 (실패 시 None)
    pub fn body_json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }
}
