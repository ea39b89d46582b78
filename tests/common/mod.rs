// =====================================================
// 통합 테스트 공통 헬퍼
// =====================================================
// 목적: 모의 지갑 서비스를 띄우고 그 주소를 가리키는 AppState 를 만든다.
//
// 사용법:
// ```rust
// mod common;
// use common::*;
//
// #[tokio::test]
// async fn test_something() {
//     let ctx = setup_logged_in().await;
//     // 테스트 코드...
// }
// ```
// =====================================================
#![allow(dead_code)]

use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use wallet_client::domains::wallet::models::Wallet;
use wallet_client::mock_server::{MockServer, MockState, DEFAULT_PASSWORD, DEFAULT_USERNAME};
use wallet_client::shared::config::ClientConfig;
use wallet_client::shared::services::AppState;
use wallet_client::shared::session::AuthEvent;

pub struct TestContext {
    pub server: MockServer,
    pub app: AppState,
    /// 브로드캐스트 기록
    pub events: Arc<Mutex<Vec<AuthEvent>>>,
}

impl TestContext {
    pub fn mock(&self) -> &MockState {
        &self.server.state
    }

    pub fn events(&self) -> Vec<AuthEvent> {
        self.events.lock().clone()
    }

    /// 테스트 사용자 소유 지갑 생성 (모의 서버에 직접)
    pub fn seed_wallet(&self, name: &str, balance: &str) -> Wallet {
        let user = self
            .mock()
            .login(DEFAULT_USERNAME, DEFAULT_PASSWORD)
            .expect("default user exists")
            .1;
        self.mock().create_wallet(&user.id, name, dec(balance))
    }
}

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).expect("valid decimal literal")
}

/// 테스트 전 초기화 (로그인 전)
pub async fn setup() -> TestContext {
    let server = MockServer::spawn(MockState::new())
        .await
        .expect("Failed to start mock wallet service");
    let config = ClientConfig::new(&server.base_url).expect("valid base url");
    let app = AppState::new(config);

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    app.session.subscribe(move |event| sink.lock().push(event.clone()));

    TestContext { server, app, events }
}

/// 기본 사용자로 로그인된 상태
pub async fn setup_logged_in() -> TestContext {
    let ctx = setup().await;
    ctx.app
        .auth_state
        .auth_service
        .login(DEFAULT_USERNAME, DEFAULT_PASSWORD)
        .await
        .expect("Failed to log in");
    ctx
}
