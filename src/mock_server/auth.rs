use crate::mock_server::state::{MockState, MockUser};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    Json,
};
use serde_json::{json, Value};

/// 인증된 사용자 (Bearer 토큰에서 추출)
/// Caller resolved from the `Authorization: Bearer <token>` header
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub MockUser);

#[async_trait]
impl FromRequestParts<MockState> for AuthenticatedUser {
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &MockState,
    ) -> Result<Self, Self::Rejection> {
        let unauthorized = |message: &str| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "status": "fail", "message": message })),
            )
        };

        // 1. Authorization 헤더
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| unauthorized("Missing authorization header"))?
            .to_str()
            .map_err(|_| unauthorized("Invalid authorization header"))?;

        // 2. "Bearer <token>"
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Invalid authorization format"))?;

        // 3. 토큰 조회
        state
            .user_for_token(token)
            .map(AuthenticatedUser)
            .ok_or_else(|| unauthorized("Invalid or expired token"))
    }
}
