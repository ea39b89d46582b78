// Mock wallet service routes
// 모의 지갑 서비스 라우터
use crate::mock_server::handlers;
use crate::mock_server::state::{MockState, RecordedRequest};
use crate::shared::utils::IDEMPOTENCY_HEADER;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};

/// Create auth router
fn create_auth_router() -> Router<MockState> {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/register", post(handlers::register))
}

/// Create wallet router
fn create_wallet_router() -> Router<MockState> {
    Router::new()
        .route("/", post(handlers::create_wallet).get(handlers::list_wallets))
        .route("/:id", get(handlers::get_wallet))
        .route("/transact/:wallet_id", post(handlers::transact))
        .route("/transactions/:wallet_id", get(handlers::list_transactions))
        .route("/transactions/:wallet_id/pdf", get(handlers::transactions_pdf))
}

/// 메인 라우터 (모든 요청을 기록)
pub fn create_router(state: MockState) -> Router {
    Router::new()
        .nest("/auth", create_auth_router())
        .nest("/wallet", create_wallet_router())
        .layer(middleware::from_fn_with_state(state.clone(), record_request))
        .with_state(state)
}

async fn record_request(State(state): State<MockState>, request: Request, next: Next) -> Response {
    // 헤더 차용은 await 전에 끝나야 함 (Body 는 !Sync)
    let recorded = {
        let header = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        RecordedRequest {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            idempotency_key: header(IDEMPOTENCY_HEADER),
            authorization: header(AUTHORIZATION.as_str()),
        }
    };
    state.record_request(recorded);
    next.run(request).await
}
