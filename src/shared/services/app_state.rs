use crate::domains::auth::services::state::AuthState;
use crate::domains::wallet::services::state::WalletState;
use crate::shared::clients::ApiClient;
use crate::shared::config::ClientConfig;
use crate::shared::session::{FileTokenStore, MemoryTokenStore, SessionContext, TokenStore};
use std::sync::Arc;

/// Application state (combines all domain states)
/// 애플리케이션 상태 (모든 도메인 상태를 조합)
///
/// 전역 상태 없이 이 객체 하나를 호출자에게 전달한다.
/// 세션, ApiClient 는 모든 도메인이 공유 (clone 은 같은 세션을 가리킴).
#[derive(Clone)]
pub struct AppState {
    pub config: ClientConfig,
    pub session: SessionContext,
    pub client: ApiClient,
    pub auth_state: AuthState,
    pub wallet_state: WalletState,
}

impl AppState {
    /// 설정에 따라 토큰 저장소 선택 (token_path 있으면 파일, 없으면 메모리)
    pub fn new(config: ClientConfig) -> Self {
        let store: Arc<dyn TokenStore> = match &config.token_path {
            Some(path) => Arc::new(FileTokenStore::new(path.clone())),
            None => Arc::new(MemoryTokenStore::new()),
        };
        Self::with_store(config, store)
    }

    /// 토큰 저장소를 직접 지정
    pub fn with_store(config: ClientConfig, store: Arc<dyn TokenStore>) -> Self {
        // 1. 세션 (저장된 토큰 복원)
        let session = SessionContext::new(store);

        // 2. 공유 클라이언트
        let client = ApiClient::new(config.clone(), session.clone());

        // 3. 각 도메인 State 생성
        let auth_state = AuthState::new(client.clone());
        let wallet_state = WalletState::new(client.clone());

        tracing::debug!(base_url = %config.base_url, "application state initialized");

        Self {
            config,
            session,
            client,
            auth_state,
            wallet_state,
        }
    }
}
