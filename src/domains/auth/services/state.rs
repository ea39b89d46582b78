// Auth domain state
// 인증 도메인 상태
use crate::domains::auth::services::AuthService;
use crate::shared::clients::ApiClient;

/// Auth domain state
/// 인증 도메인에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct AuthState {
    pub auth_service: AuthService,
}

impl AuthState {
    pub fn new(client: ApiClient) -> Self {
        Self {
            auth_service: AuthService::new(client),
        }
    }
}
