// =====================================================
// 요청 클라이언트 통합 테스트
// =====================================================
#![cfg(feature = "mock-server")]

mod common;
use common::*;

use wallet_client::domains::wallet::models::Wallet;
use wallet_client::shared::clients::ApiClient;
use wallet_client::shared::config::ClientConfig;
use wallet_client::shared::errors::ClientError;
use wallet_client::shared::session::SessionContext;

/// 테스트: 토큰이 있으면 Bearer 헤더 첨부
#[tokio::test]
async fn test_attaches_bearer_token() {
    let ctx = setup_logged_in().await;
    let token = ctx.app.session.token().unwrap();

    let _: Vec<Wallet> = ctx.app.client.get_json("/wallet", &[]).await.unwrap();

    let last = ctx.mock().recorded_requests().pop().unwrap();
    assert_eq!(last.path, "/wallet");
    assert_eq!(last.authorization, Some(format!("Bearer {}", token)));
}

/// 테스트: 토큰 없이 보호된 엔드포인트 → Authentication 에러
#[tokio::test]
async fn test_missing_token_is_classified_as_authentication() {
    let ctx = setup().await;

    let err = ctx
        .app
        .client
        .get_json::<Vec<Wallet>>("/wallet", &[])
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(ctx.mock().recorded_requests()[0].authorization.is_none());
}

/// 테스트: 서버에 도달하지 못하면 Network 에러, 세션 변화 없음
#[tokio::test]
async fn test_unreachable_service_is_network_error() {
    // 포트를 잡았다가 바로 놓아서 아무도 듣지 않는 주소 확보
    let base_url = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let session = SessionContext::in_memory();
    session.set_token("t");
    let client = ApiClient::new(ClientConfig::new(&base_url).unwrap(), session.clone());

    let err = client.get_bytes("/wallet").await.unwrap_err();

    assert!(matches!(err, ClientError::Network(_)));
    session.observe(&err);
    assert!(session.is_authenticated());
}
