use crate::domains::auth::models::{LoginResponse, UserInfo};
use crate::domains::auth::services::validator::{validate_credentials, validate_registration};
use crate::shared::clients::ApiClient;
use crate::shared::errors::{ClientError, DEFAULT_ERROR_MESSAGE};
use crate::shared::session::SessionContext;

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";
pub const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed";

// 인증 서비스
// 역할: 로그인/회원가입/로그아웃 facade
// AuthService: login, register and logout against the wallet service
//
// 인증 엔드포인트의 401은 세션 만료가 아니라 잘못된 자격 증명이므로
// 브로드캐스트하지 않는다 (ApiClient 가 Api 에러로 분류).
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
    session: SessionContext,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        let session = client.session().clone();
        Self { client, session }
    }

    // 로그인
    // 성공 시 토큰을 세션에 저장 (영속화 포함)
    pub async fn login(&self, username: &str, password: &str) -> Result<Option<UserInfo>, ClientError> {
        // 1. 입력 검증
        let request = validate_credentials(username, password)?;

        // 2. 전송
        let endpoint = self.client.config().endpoints.login.clone();
        let response: LoginResponse = self
            .client
            .post_json(&endpoint, &request, None)
            .await
            .map_err(|e| with_fallback_message(e, LOGIN_FAILED_MESSAGE))?;

        // 3. 세션 토큰 교체
        self.session.set_token(response.token);
        tracing::info!(username = %request.username, "logged in");
        Ok(response.user)
    }

    // 회원가입
    // 토큰은 받지 않음, 이후 로그인 필요
    pub async fn register(&self, username: &str, password: &str, email: &str) -> Result<(), ClientError> {
        let request = validate_registration(username, password, email)?;

        let endpoint = self.client.config().endpoints.register.clone();
        self.client
            .post_unit(&endpoint, &request)
            .await
            .map_err(|e| with_fallback_message(e, REGISTRATION_FAILED_MESSAGE))?;

        tracing::info!(username = %request.username, "registered");
        Ok(())
    }

    /// 로그아웃 (브로드캐스트 없음)
    pub fn logout(&self) {
        self.session.logout();
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}

/// 서버 메시지를 찾지 못한 경우 작업별 기본 메시지로 교체
fn with_fallback_message(error: ClientError, fallback: &str) -> ClientError {
    match error {
        ClientError::Api(mut api) if api.message == DEFAULT_ERROR_MESSAGE => {
            api.message = fallback.to_string();
            ClientError::Api(api)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::errors::ApiError;

    #[test]
    fn test_fallback_only_replaces_default_message() {
        let generic = ClientError::Api(ApiError {
            status: 500,
            message: DEFAULT_ERROR_MESSAGE.to_string(),
            details: vec![],
            body: String::new(),
        });
        assert_eq!(
            with_fallback_message(generic, LOGIN_FAILED_MESSAGE).user_message(),
            LOGIN_FAILED_MESSAGE
        );

        let specific = ClientError::Api(ApiError {
            status: 401,
            message: "Invalid credentials".to_string(),
            details: vec![],
            body: String::new(),
        });
        assert_eq!(
            with_fallback_message(specific, LOGIN_FAILED_MESSAGE).user_message(),
            "Invalid credentials"
        );
    }
}
