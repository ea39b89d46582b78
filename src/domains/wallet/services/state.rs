// Wallet domain state
// 지갑 도메인 상태
use crate::domains::wallet::services::WalletService;
use crate::shared::clients::ApiClient;

/// Wallet domain state
/// 지갑 화면/명령에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct WalletState {
    pub wallet_service: WalletService,
}

impl WalletState {
    /// WalletState 생성 (공유 ApiClient 필요)
    pub fn new(client: ApiClient) -> Self {
        Self {
            wallet_service: WalletService::new(client),
        }
    }
}
