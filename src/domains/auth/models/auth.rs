use serde::{Deserialize, Serialize};

// 로그인 요청 모델
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// 회원가입 요청 모델
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// 사용자 정보
/// User info returned alongside the login token.
///
/// The wallet service does not guarantee a user shape, so every field is
/// optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

// 로그인 응답 모델
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token
    pub token: String,

    #[serde(default)]
    pub user: Option<UserInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_without_user() {
        let response: LoginResponse = serde_json::from_str(r#"{"token":"abc"}"#).unwrap();
        assert_eq!(response.token, "abc");
        assert!(response.user.is_none());
    }

    #[test]
    fn test_user_info_accepts_mongo_id() {
        let user: UserInfo = serde_json::from_str(r#"{"_id":"u1","username":"test"}"#).unwrap();
        assert_eq!(user.id.as_deref(), Some("u1"));
        assert_eq!(user.email, None);
    }
}
