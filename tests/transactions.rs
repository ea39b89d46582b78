// =====================================================
// 거래 통합 테스트
// =====================================================
#![cfg(feature = "mock-server")]

mod common;
use common::*;
use wallet_client::domains::wallet::models::{
    NormalizedTransaction, SortBy, SortOrder, TransactOptions, TransactionInput, TransactionQuery,
    TransactionType,
};
use wallet_client::shared::errors::{ClientError, ValidationCode};
use wallet_client::shared::utils::{generate_key, IdempotencyKey};

/// 테스트: 입금 후 잔액 갱신, 목록에 CREDIT 으로 표시
#[tokio::test]
async fn test_credit_round_trip() {
    let ctx = setup_logged_in().await;
    let wallet = ctx.seed_wallet("Main", "100");
    let service = &ctx.app.wallet_state.wallet_service;

    let response = service
        .create_transaction(
            &wallet.id,
            &TransactionInput::new(12.3456, "salary"),
            TransactOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(response.balance, dec("112.3456"));

    let refreshed = service.get_wallet(&wallet.id).await.unwrap();
    assert_eq!(refreshed.balance, dec("112.3456"));

    let page = service
        .list_transactions(&wallet.id, &TransactionQuery::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    let tx = &page.transactions[0];
    assert_eq!(tx.id, response.transaction_id);
    assert_eq!(tx.amount, dec("12.3456"));
    assert_eq!(tx.transaction_type, TransactionType::Credit);
    assert_eq!(tx.description, "salary");
}

/// 테스트: 잔액 전부 출금 가능, 초과 출금은 로컬에서 거절 (transact 호출 없음)
#[tokio::test]
async fn test_debit_limits_checked_against_fresh_balance() {
    let ctx = setup_logged_in().await;
    let wallet = ctx.seed_wallet("Main", "50");
    let service = &ctx.app.wallet_state.wallet_service;

    let err = service
        .create_transaction(
            &wallet.id,
            &TransactionInput::new(-50.0001, "too much"),
            TransactOptions::default(),
        )
        .await
        .unwrap_err();
    let validation = err.as_validation().expect("validation error");
    assert!(validation.has_code(ValidationCode::InsufficientBalance));
    assert_eq!(ctx.mock().request_count("POST", "/wallet/transact"), 0);

    let response = service
        .create_transaction(
            &wallet.id,
            &TransactionInput::new(-50.0, "everything"),
            TransactOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(response.balance, dec("0"));
}

/// 테스트: 다른 곳에서 잔액이 바뀐 경우에도 최신 잔액으로 검증
#[tokio::test]
async fn test_uses_balance_read_at_submit_time() {
    let ctx = setup_logged_in().await;
    let wallet = ctx.seed_wallet("Main", "100");
    ctx.mock().set_balance(&wallet.id, dec("10"));

    let err = ctx
        .app
        .wallet_state
        .wallet_service
        .create_transaction(
            &wallet.id,
            &TransactionInput::new(-20.0, "stale view"),
            TransactOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(err.as_validation().unwrap().has_code(ValidationCode::InsufficientBalance));
}

/// 테스트: 입력 오류는 잔액 조회도 하지 않음
#[tokio::test]
async fn test_invalid_input_makes_no_network_call() {
    let ctx = setup_logged_in().await;
    let wallet = ctx.seed_wallet("Main", "100");
    let before = ctx.mock().recorded_requests().len();

    let err = ctx
        .app
        .wallet_state
        .wallet_service
        .create_transaction(
            &wallet.id,
            &TransactionInput::new(1.23456, " "),
            TransactOptions::default(),
        )
        .await
        .unwrap_err();

    let validation = err.as_validation().unwrap();
    assert_eq!(
        validation.codes(),
        vec![ValidationCode::PrecisionExceeded, ValidationCode::EmptyDescription]
    );
    assert_eq!(ctx.mock().recorded_requests().len(), before);
}

/// 테스트: 설명 오류가 있어도 잔액 부족까지 함께 보고 (transact 호출 없음)
#[tokio::test]
async fn test_insufficient_balance_collected_with_other_errors() {
    let ctx = setup_logged_in().await;
    let wallet = ctx.seed_wallet("Main", "10");

    let err = ctx
        .app
        .wallet_state
        .wallet_service
        .create_transaction(
            &wallet.id,
            &TransactionInput::new(-1000.0, "   "),
            TransactOptions::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err.as_validation().unwrap().codes(),
        vec![ValidationCode::EmptyDescription, ValidationCode::InsufficientBalance]
    );
    assert_eq!(ctx.mock().request_count("POST", "/wallet/transact"), 0);
}

/// 테스트: 서버 측 잔액 부족 거절 → 같은 검증 에러로 변환
#[tokio::test]
async fn test_remote_insufficient_balance_maps_to_validation() {
    let ctx = setup_logged_in().await;
    let wallet = ctx.seed_wallet("Main", "5");

    let err = ctx
        .app
        .wallet_state
        .wallet_service
        .submit_transaction(
            &NormalizedTransaction {
                wallet_id: wallet.id.clone(),
                amount: dec("-6"),
                transaction_type: TransactionType::Debit,
                description: "race".to_string(),
            },
            TransactOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
    assert!(err.as_validation().unwrap().has_code(ValidationCode::InsufficientBalance));
}

/// 테스트: 모든 거래 요청에 UUID v4 멱등성 키, 요청마다 다른 키
#[tokio::test]
async fn test_each_transaction_carries_fresh_idempotency_key() {
    let ctx = setup_logged_in().await;
    let wallet = ctx.seed_wallet("Main", "0");
    let service = &ctx.app.wallet_state.wallet_service;

    for _ in 0..2 {
        service
            .create_transaction(&wallet.id, &TransactionInput::new(1.0, "x"), TransactOptions::default())
            .await
            .unwrap();
    }

    let keys: Vec<String> = ctx
        .mock()
        .recorded_requests()
        .into_iter()
        .filter(|r| r.method == "POST" && r.path.starts_with("/wallet/transact/"))
        .map(|r| r.idempotency_key.expect("Idempotency-Key header"))
        .collect();
    assert_eq!(keys.len(), 2);
    assert_ne!(keys[0], keys[1]);
    assert!(keys.iter().all(|k| IdempotencyKey::from_string(k.clone()).is_uuid_v4()));

    // GET 요청에는 키가 없음
    assert!(ctx
        .mock()
        .recorded_requests()
        .iter()
        .filter(|r| r.method == "GET")
        .all(|r| r.idempotency_key.is_none()));
}

/// 테스트: 같은 키로 재시도하면 한 번만 기록
#[tokio::test]
async fn test_retry_with_same_key_is_deduplicated() {
    let ctx = setup_logged_in().await;
    let wallet = ctx.seed_wallet("Main", "0");
    let service = &ctx.app.wallet_state.wallet_service;
    let key = generate_key();

    let first = service
        .create_transaction(
            &wallet.id,
            &TransactionInput::new(10.0, "retry"),
            TransactOptions::with_idempotency_key(key.clone()),
        )
        .await
        .unwrap();
    let second = service
        .create_transaction(
            &wallet.id,
            &TransactionInput::new(10.0, "retry"),
            TransactOptions::with_idempotency_key(key),
        )
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(service.get_wallet(&wallet.id).await.unwrap().balance, dec("10"));
}

/// 테스트: 페이지, 정렬
#[tokio::test]
async fn test_paging_and_sorting() {
    let ctx = setup_logged_in().await;
    let wallet = ctx.seed_wallet("Main", "0");
    let service = &ctx.app.wallet_state.wallet_service;

    for (amount, description) in [(5.0, "a"), (20.0, "b"), (1.5, "c")] {
        service
            .create_transaction(&wallet.id, &TransactionInput::new(amount, description), TransactOptions::default())
            .await
            .unwrap();
    }

    // 기본: 최신 순
    let newest_first = service
        .list_transactions(&wallet.id, &TransactionQuery::default())
        .await
        .unwrap();
    let order: Vec<&str> = newest_first.transactions.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(order, vec!["c", "b", "a"]);

    // 금액 오름차순, 페이지 크기 2
    let query = TransactionQuery::page(0, 2).sorted(SortBy::Amount, SortOrder::Asc);
    let first_page = service.list_transactions(&wallet.id, &query).await.unwrap();
    assert_eq!(first_page.total, 3);
    let amounts: Vec<_> = first_page.transactions.iter().map(|t| t.amount).collect();
    assert_eq!(amounts, vec![dec("1.5"), dec("5")]);

    let query = TransactionQuery::page(1, 2).sorted(SortBy::Amount, SortOrder::Asc);
    let second_page = service.list_transactions(&wallet.id, &query).await.unwrap();
    assert_eq!(second_page.transactions.len(), 1);
    assert_eq!(second_page.transactions[0].amount, dec("20"));
}

/// 테스트: CSV 내보내기
#[tokio::test]
async fn test_csv_export_uses_configured_symbol() {
    let ctx = setup_logged_in().await;
    let wallet = ctx.seed_wallet("Main", "0");
    let service = &ctx.app.wallet_state.wallet_service;
    service
        .create_transaction(&wallet.id, &TransactionInput::new(2.5, "tea"), TransactOptions::default())
        .await
        .unwrap();

    let page = service
        .list_transactions(&wallet.id, &TransactionQuery::default())
        .await
        .unwrap();
    let mut buffer = Vec::new();
    service.export_transactions_csv(&page.transactions, &mut buffer).unwrap();

    let csv = String::from_utf8(buffer).unwrap();
    let row = csv.lines().nth(1).unwrap();
    assert!(row.ends_with(",CREDIT,₹2.5000,₹2.5000,tea"), "{}", row);
}
