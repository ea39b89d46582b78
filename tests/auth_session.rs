// =====================================================
// 인증 / 세션 통합 테스트
// =====================================================
#![cfg(feature = "mock-server")]

mod common;
use common::*;
use std::sync::Arc;
use wallet_client::domains::wallet::models::WalletSetupInput;
use wallet_client::mock_server::{DEFAULT_PASSWORD, DEFAULT_USERNAME};
use wallet_client::shared::config::ClientConfig;
use wallet_client::shared::errors::{ClientError, ValidationCode, SESSION_EXPIRED_MESSAGE};
use wallet_client::shared::services::AppState;
use wallet_client::shared::session::{AuthEvent, FileTokenStore, TokenStore};

/// 테스트: 로그인 성공 시 토큰 저장
#[tokio::test]
async fn test_login_stores_token() {
    let ctx = setup().await;
    assert!(!ctx.app.session.is_authenticated());

    let user = ctx
        .app
        .auth_state
        .auth_service
        .login(DEFAULT_USERNAME, DEFAULT_PASSWORD)
        .await
        .unwrap();

    assert_eq!(user.and_then(|u| u.username).as_deref(), Some(DEFAULT_USERNAME));
    assert!(ctx.app.session.is_authenticated());
    assert!(ctx.events().is_empty());
}

/// 테스트: 잘못된 자격 증명 → 401 이지만 브로드캐스트 없음
#[tokio::test]
async fn test_bad_credentials_do_not_broadcast() {
    let ctx = setup().await;

    let err = ctx
        .app
        .auth_state
        .auth_service
        .login(DEFAULT_USERNAME, "wrong")
        .await
        .unwrap_err();

    match err {
        ClientError::Api(api) => {
            assert_eq!(api.status, 401);
            assert_eq!(api.message, "Invalid username or password");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
    assert!(ctx.events().is_empty());
    assert!(!ctx.app.session.is_authenticated());
}

/// 테스트: 로그인 입력 검증은 네트워크 호출 없이 실패
#[tokio::test]
async fn test_empty_credentials_fail_locally() {
    let ctx = setup().await;

    let err = ctx.app.auth_state.auth_service.login("", "").await.unwrap_err();

    assert!(err.as_validation().unwrap().has_code(ValidationCode::Required));
    assert_eq!(ctx.mock().request_count("POST", "/auth/login"), 0);
}

/// 테스트: 만료된 토큰 → 토큰 삭제 + 정확히 한 번 브로드캐스트
#[tokio::test]
async fn test_expired_session_clears_token_and_broadcasts_once() {
    let ctx = setup_logged_in().await;
    ctx.mock().revoke_all_tokens();

    let err = ctx.app.wallet_state.wallet_service.list_wallets().await.unwrap_err();

    assert!(matches!(err, ClientError::Authentication { .. }));
    assert!(!ctx.app.session.is_authenticated());
    assert_eq!(
        ctx.events(),
        vec![AuthEvent::SessionExpired {
            message: SESSION_EXPIRED_MESSAGE.to_string()
        }]
    );
}

/// 테스트: 동시에 여러 요청이 401 → 브로드캐스트는 한 번
#[tokio::test]
async fn test_concurrent_unauthorized_broadcast_once() {
    let ctx = setup_logged_in().await;
    let wallet = ctx.seed_wallet("Main", "10");
    ctx.mock().revoke_all_tokens();

    let service = &ctx.app.wallet_state.wallet_service;
    let (a, b, c) = tokio::join!(
        service.list_wallets(),
        service.get_wallet(&wallet.id),
        service.list_wallets(),
    );

    assert!(a.is_err() && b.is_err() && c.is_err());
    assert_eq!(ctx.events().len(), 1);
}

/// 테스트: 만료 후 다시 로그인하면 늦게 도착한 401이 새 토큰을 지우지 않음
#[tokio::test]
async fn test_stale_unauthorized_does_not_clear_new_login() {
    let ctx = setup_logged_in().await;
    let stale_generation = ctx.app.session.generation();

    ctx.app
        .auth_state
        .auth_service
        .login(DEFAULT_USERNAME, DEFAULT_PASSWORD)
        .await
        .unwrap();

    let expired = ctx.app.session.expire(stale_generation);

    assert!(!expired);
    assert!(ctx.app.session.is_authenticated());
    assert!(ctx.events().is_empty());
}

/// 테스트: 다른 사용자 지갑 접근 → 403 알림, 토큰 유지
#[tokio::test]
async fn test_forbidden_broadcasts_auth_error() {
    let ctx = setup_logged_in().await;
    let stranger = ctx.mock().add_user("stranger", "pw", "s@example.com").unwrap();
    let foreign = ctx.mock().create_wallet(&stranger.id, "Theirs", dec("1"));

    let err = ctx
        .app
        .wallet_state
        .wallet_service
        .get_wallet(&foreign.id)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Authorization { .. }));
    assert!(ctx.app.session.is_authenticated());
    assert_eq!(
        ctx.events(),
        vec![AuthEvent::AuthError {
            message: "You do not have access to this wallet".to_string()
        }]
    );
}

/// 테스트: 로그아웃은 브로드캐스트하지 않음
#[tokio::test]
async fn test_logout_is_silent() {
    let ctx = setup_logged_in().await;

    ctx.app.auth_state.auth_service.logout();

    assert!(!ctx.app.session.is_authenticated());
    assert!(ctx.events().is_empty());
}

/// 테스트: 회원가입 후 새 계정으로 로그인
#[tokio::test]
async fn test_register_then_login() {
    let ctx = setup().await;
    let auth = &ctx.app.auth_state.auth_service;

    auth.register("newbie", "secret", "newbie@example.com").await.unwrap();
    auth.login("newbie", "secret").await.unwrap();
    assert!(ctx.app.session.is_authenticated());

    let duplicate = auth
        .register("newbie", "secret", "newbie@example.com")
        .await
        .unwrap_err();
    assert_eq!(duplicate.user_message(), "Username already exists");
}

/// 테스트: 토큰 파일로 세션 유지 (다음 실행에서 복원)
#[tokio::test]
async fn test_file_token_survives_restart() {
    let ctx = setup().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let config = ClientConfig::new(&ctx.server.base_url)
        .unwrap()
        .with_token_path(&path);
    let first = AppState::new(config.clone());
    first
        .auth_state
        .auth_service
        .login(DEFAULT_USERNAME, DEFAULT_PASSWORD)
        .await
        .unwrap();

    let second = AppState::new(config);
    assert!(second.session.is_authenticated());
    let wallet = second
        .wallet_state
        .wallet_service
        .create_wallet(&WalletSetupInput {
            name: "Restored".to_string(),
            initial_balance: Some(0.0),
        })
        .await
        .unwrap();
    assert_eq!(wallet.name, "Restored");

    // 만료 시 파일에서도 삭제
    ctx.mock().revoke_all_tokens();
    second.wallet_state.wallet_service.list_wallets().await.unwrap_err();
    let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&path));
    assert_eq!(store.load().unwrap(), None);
}
