use crate::domains::wallet::models::{
    normalize_decimal, AmountContext, SortBy, SortOrder, Transaction, TransactionsPage,
    DEFAULT_PAGE_SIZE,
};
use crate::mock_server::auth::AuthenticatedUser;
use crate::mock_server::state::{MockState, TransactFailure, WalletAccess};
use crate::shared::utils::money::decimal_from_f64;
use crate::shared::utils::IDEMPOTENCY_HEADER;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

type HandlerError = (StatusCode, Json<Value>);
type HandlerResult<T> = Result<T, HandlerError>;

fn fail(status: StatusCode, message: &str) -> HandlerError {
    (status, Json(json!({ "status": "fail", "message": message })))
}

/// 검증 실패 응답: `{status, category, details[]}`
fn validation_fail(details: Vec<(&str, String)>) -> HandlerError {
    let details: Vec<Value> = details
        .into_iter()
        .map(|(field, message)| json!({ "field": field, "message": message }))
        .collect();
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "status": "fail", "category": "ValidationError", "details": details })),
    )
}

fn access_error(access: WalletAccess) -> HandlerError {
    match access {
        WalletAccess::NotFound => fail(StatusCode::NOT_FOUND, "Wallet not found"),
        WalletAccess::Forbidden => fail(StatusCode::FORBIDDEN, "You do not have access to this wallet"),
    }
}

fn text_field<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field).and_then(Value::as_str).map(str::trim).filter(|s| !s.is_empty())
}

fn money_field(body: &Value, field: &str) -> Option<Result<Decimal, String>> {
    let value = body.get(field)?;
    Some(match value.as_f64() {
        Some(v) => decimal_from_f64(v),
        None => Err(format!("{} must be a number", field)),
    })
}

/// 로그인
pub async fn login(
    State(state): State<MockState>,
    Json(body): Json<Value>,
) -> HandlerResult<Json<Value>> {
    let username = text_field(&body, "username").unwrap_or_default();
    let password = body.get("password").and_then(Value::as_str).unwrap_or_default();

    let (token, user) = state
        .login(username, password)
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Invalid username or password"))?;

    Ok(Json(json!({
        "token": token,
        "user": { "id": user.id, "username": user.username, "email": user.email },
    })))
}

/// 회원가입
pub async fn register(
    State(state): State<MockState>,
    Json(body): Json<Value>,
) -> HandlerResult<(StatusCode, Json<Value>)> {
    let mut details = Vec::new();
    let username = text_field(&body, "username");
    let password = text_field(&body, "password");
    let email = text_field(&body, "email");
    if username.is_none() {
        details.push(("username", "Username is required".to_string()));
    }
    if password.is_none() {
        details.push(("password", "Password is required".to_string()));
    }
    if email.is_none() {
        details.push(("email", "Email is required".to_string()));
    }

    match (username, password, email) {
        (Some(username), Some(password), Some(email)) => {
            state
                .add_user(username, password, email)
                .ok_or_else(|| fail(StatusCode::CONFLICT, "Username already exists"))?;
            Ok((
                StatusCode::CREATED,
                Json(json!({ "message": "User registered successfully" })),
            ))
        }
        _ => Err(validation_fail(details)),
    }
}

/// 지갑 생성
pub async fn create_wallet(
    State(state): State<MockState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(body): Json<Value>,
) -> HandlerResult<Response> {
    let mut details = Vec::new();

    let name = text_field(&body, "name");
    if name.is_none() {
        details.push(("name", "Name is required".to_string()));
    }

    let balance = match money_field(&body, "initialBalance") {
        None => Some(Decimal::ZERO),
        Some(Ok(value)) if value.is_sign_negative() && !value.is_zero() => {
            details.push(("initialBalance", "Initial balance cannot be negative".to_string()));
            None
        }
        Some(Ok(value)) => match normalize_decimal(value, AmountContext::Balance) {
            Ok(amount) => Some(amount.value),
            Err(rejection) => {
                details.push(("initialBalance", rejection.message("Initial balance")));
                None
            }
        },
        Some(Err(message)) => {
            details.push(("initialBalance", message));
            None
        }
    };

    match (name, balance) {
        (Some(name), Some(balance)) if details.is_empty() => {
            let wallet = state.create_wallet(&user.id, name, balance);
            Ok((StatusCode::CREATED, Json(wallet)).into_response())
        }
        _ => Err(validation_fail(details)),
    }
}

/// 지갑 목록
pub async fn list_wallets(
    State(state): State<MockState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Response {
    Json(state.wallets_for(&user.id)).into_response()
}

/// 지갑 조회
pub async fn get_wallet(
    State(state): State<MockState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(wallet_id): Path<String>,
) -> HandlerResult<Response> {
    let wallet = state.wallet_for(&user.id, &wallet_id).map_err(access_error)?;
    Ok(Json(wallet).into_response())
}

/// 거래 기록 (Idempotency-Key 로 중복 제거)
pub async fn transact(
    State(state): State<MockState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(wallet_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> HandlerResult<Response> {
    let mut details = Vec::new();

    let amount = match money_field(&body, "amount") {
        None => {
            details.push(("amount", "Amount is required".to_string()));
            None
        }
        Some(Ok(value)) => match normalize_decimal(value, AmountContext::Transaction) {
            Ok(amount) => Some(amount.value),
            Err(rejection) => {
                details.push(("amount", rejection.message("Amount")));
                None
            }
        },
        Some(Err(message)) => {
            details.push(("amount", message));
            None
        }
    };

    let description = text_field(&body, "description");
    match description {
        None => details.push(("description", "Description is required".to_string())),
        Some(d) if d.chars().count() > 200 => {
            details.push(("description", "Description must not exceed 200 characters".to_string()))
        }
        Some(_) => {}
    }

    let (amount, description) = match (amount, description) {
        (Some(amount), Some(description)) if details.is_empty() => (amount, description),
        _ => return Err(validation_fail(details)),
    };

    let key = headers
        .get(IDEMPOTENCY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty());

    let response = state
        .transact(&user.id, &wallet_id, amount, description, key)
        .map_err(|failure| match failure {
            TransactFailure::Access(access) => access_error(access),
            TransactFailure::InsufficientBalance => {
                fail(StatusCode::BAD_REQUEST, "Insufficient balance")
            }
        })?;

    Ok(Json(response).into_response())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(default)]
    pub skip: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub sort_by: Option<SortBy>,
    #[serde(default)]
    pub sort_order: Option<SortOrder>,
}

/// 거래 목록 (정렬 후 skip/limit)
pub async fn list_transactions(
    State(state): State<MockState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(wallet_id): Path<String>,
    Query(params): Query<ListParams>,
) -> HandlerResult<Response> {
    let mut items = state
        .transactions_for(&user.id, &wallet_id)
        .map_err(access_error)?;

    let sort_by = params.sort_by.unwrap_or_default();
    let sort_order = params.sort_order.unwrap_or_default();
    items.sort_by(|(seq_a, a), (seq_b, b)| {
        let ordering = match sort_by {
            SortBy::Date => a.date.cmp(&b.date).then(seq_a.cmp(seq_b)),
            SortBy::Amount => a.amount.cmp(&b.amount).then(seq_a.cmp(seq_b)),
        };
        match sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    let total = items.len() as u64;
    let skip = params.skip.unwrap_or(0);
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE as usize);
    let transactions: Vec<Transaction> = items
        .into_iter()
        .skip(skip)
        .take(limit)
        .map(|(_, tx)| tx)
        .collect();

    Ok(Json(TransactionsPage { transactions, total }).into_response())
}

/// 거래 내역 PDF
pub async fn transactions_pdf(
    State(state): State<MockState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(wallet_id): Path<String>,
) -> HandlerResult<Response> {
    let wallet = state.wallet_for(&user.id, &wallet_id).map_err(access_error)?;
    let items = state
        .transactions_for(&user.id, &wallet_id)
        .map_err(access_error)?;

    let mut document = String::from("%PDF-1.4\n");
    document.push_str(&format!("% Statement for {} ({})\n", wallet.name, wallet.id));
    for (_, tx) in &items {
        document.push_str(&format!(
            "% {} {} {} {} {}\n",
            tx.date.format("%d/%m/%Y"),
            tx.transaction_type.as_str(),
            tx.amount,
            tx.balance,
            tx.description
        ));
    }
    document.push_str("%%EOF\n");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"transactions-{}.pdf\"", wallet.id),
            ),
        ],
        document.into_bytes(),
    )
        .into_response())
}
