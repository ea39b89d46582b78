use crate::domains::wallet::models::{Transaction, TransactionResponse, TransactionType, Wallet};
use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

pub const DEFAULT_USERNAME: &str = "test";
pub const DEFAULT_PASSWORD: &str = "test123";
pub const DEFAULT_EMAIL: &str = "test@example.com";

/// 등록된 사용자
#[derive(Debug, Clone)]
pub struct MockUser {
    pub id: String,
    pub username: String,
    pub password: String,
    pub email: String,
}

/// 수신한 요청 기록 (테스트 검증용)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub idempotency_key: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Debug, Clone)]
struct StoredWallet {
    wallet: Wallet,
    owner_id: String,
}

#[derive(Debug, Clone)]
struct StoredTransaction {
    transaction: Transaction,
    /// 같은 시각에 생성된 거래의 정렬 순서
    sequence: u64,
}

#[derive(Debug, Default)]
struct MockStore {
    users: HashMap<String, MockUser>,
    tokens: HashMap<String, String>,
    wallets: HashMap<String, StoredWallet>,
    wallet_order: Vec<String>,
    transactions: HashMap<String, Vec<StoredTransaction>>,
    /// (user id, wallet id, idempotency key) → 최초 응답
    idempotent_responses: HashMap<(String, String, String), TransactionResponse>,
    next_sequence: u64,
    requests: Vec<RecordedRequest>,
}

/// 지갑 조회 실패 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletAccess {
    NotFound,
    Forbidden,
}

/// 거래 기록 실패 사유
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactFailure {
    Access(WalletAccess),
    InsufficientBalance,
}

/// 인메모리 지갑 서비스 상태
/// In-memory store backing the mock wallet service.
///
/// Cloning shares the same store, so tests keep a handle and poke at it
/// while the server runs.
#[derive(Clone)]
pub struct MockState {
    store: Arc<Mutex<MockStore>>,
}

impl Default for MockState {
    fn default() -> Self {
        Self::new()
    }
}

impl MockState {
    /// 기본 사용자(test / test123)가 등록된 상태
    pub fn new() -> Self {
        let state = Self {
            store: Arc::new(Mutex::new(MockStore::default())),
        };
        state.add_user(DEFAULT_USERNAME, DEFAULT_PASSWORD, DEFAULT_EMAIL);
        state
    }

    /// 사용자 등록, 이미 있으면 `None`
    pub fn add_user(&self, username: &str, password: &str, email: &str) -> Option<MockUser> {
        let mut store = self.store.lock();
        if store.users.contains_key(username) {
            return None;
        }
        let user = MockUser {
            id: Uuid::new_v4().simple().to_string(),
            username: username.to_string(),
            password: password.to_string(),
            email: email.to_string(),
        };
        store.users.insert(username.to_string(), user.clone());
        Some(user)
    }

    /// 자격 증명 확인 후 새 토큰 발급
    pub fn login(&self, username: &str, password: &str) -> Option<(String, MockUser)> {
        let mut store = self.store.lock();
        let user = store.users.get(username).filter(|u| u.password == password)?.clone();
        let token = Uuid::new_v4().simple().to_string();
        store.tokens.insert(token.clone(), user.id.clone());
        Some((token, user))
    }

    /// 테스트용: 로그인 절차 없이 토큰 발급
    pub fn issue_token(&self, username: &str) -> Option<String> {
        let mut store = self.store.lock();
        let user_id = store.users.get(username)?.id.clone();
        let token = Uuid::new_v4().simple().to_string();
        store.tokens.insert(token.clone(), user_id);
        Some(token)
    }

    pub fn user_for_token(&self, token: &str) -> Option<MockUser> {
        let store = self.store.lock();
        let user_id = store.tokens.get(token)?;
        store.users.values().find(|u| &u.id == user_id).cloned()
    }

    /// 발급된 모든 토큰 무효화 (세션 만료 시뮬레이션)
    pub fn revoke_all_tokens(&self) {
        self.store.lock().tokens.clear();
    }

    pub fn create_wallet(&self, owner_id: &str, name: &str, initial_balance: Decimal) -> Wallet {
        let mut store = self.store.lock();
        let wallet = Wallet {
            id: Uuid::new_v4().simple().to_string(),
            name: name.to_string(),
            balance: initial_balance,
            date: Utc::now(),
        };
        store.wallet_order.push(wallet.id.clone());
        store.wallets.insert(
            wallet.id.clone(),
            StoredWallet {
                wallet: wallet.clone(),
                owner_id: owner_id.to_string(),
            },
        );
        wallet
    }

    pub fn wallets_for(&self, owner_id: &str) -> Vec<Wallet> {
        let store = self.store.lock();
        store
            .wallet_order
            .iter()
            .filter_map(|id| store.wallets.get(id))
            .filter(|w| w.owner_id == owner_id)
            .map(|w| w.wallet.clone())
            .collect()
    }

    pub fn wallet_for(&self, owner_id: &str, wallet_id: &str) -> Result<Wallet, WalletAccess> {
        let store = self.store.lock();
        Self::owned_wallet(&store, owner_id, wallet_id).map(|w| w.wallet.clone())
    }

    /// 테스트용: 잔액 직접 변경 (다른 클라이언트의 동시 출금 시뮬레이션)
    pub fn set_balance(&self, wallet_id: &str, balance: Decimal) -> bool {
        let mut store = self.store.lock();
        match store.wallets.get_mut(wallet_id) {
            Some(stored) => {
                stored.wallet.balance = balance;
                true
            }
            None => false,
        }
    }

    /// 거래 기록. 같은 멱등성 키로 다시 오면 최초 응답을 그대로 돌려준다.
    pub fn transact(
        &self,
        owner_id: &str,
        wallet_id: &str,
        amount: Decimal,
        description: &str,
        idempotency_key: Option<&str>,
    ) -> Result<TransactionResponse, TransactFailure> {
        let mut store = self.store.lock();
        Self::owned_wallet(&store, owner_id, wallet_id).map_err(TransactFailure::Access)?;

        let dedup_key = idempotency_key
            .map(|key| (owner_id.to_string(), wallet_id.to_string(), key.to_string()));
        if let Some(previous) = dedup_key
            .as_ref()
            .and_then(|k| store.idempotent_responses.get(k))
        {
            tracing::debug!(wallet_id, "replaying idempotent transaction");
            return Ok(previous.clone());
        }

        let sequence = store.next_sequence;
        store.next_sequence += 1;

        let stored = store
            .wallets
            .get_mut(wallet_id)
            .ok_or(TransactFailure::Access(WalletAccess::NotFound))?;
        let new_balance = stored.wallet.balance + amount;
        if new_balance.is_sign_negative() && !new_balance.is_zero() {
            return Err(TransactFailure::InsufficientBalance);
        }
        stored.wallet.balance = new_balance;

        let transaction = Transaction {
            id: Uuid::new_v4().simple().to_string(),
            wallet_id: wallet_id.to_string(),
            amount,
            balance: new_balance,
            transaction_type: TransactionType::from_amount(amount),
            description: description.to_string(),
            date: Utc::now(),
        };
        let response = TransactionResponse {
            balance: new_balance,
            transaction_id: transaction.id.clone(),
        };

        store
            .transactions
            .entry(wallet_id.to_string())
            .or_default()
            .push(StoredTransaction {
                transaction,
                sequence,
            });
        if let Some(key) = dedup_key {
            store.idempotent_responses.insert(key, response.clone());
        }
        Ok(response)
    }

    /// 거래 목록 (오래된 순, 정렬/페이지는 호출자가 처리)
    pub fn transactions_for(
        &self,
        owner_id: &str,
        wallet_id: &str,
    ) -> Result<Vec<(u64, Transaction)>, WalletAccess> {
        let store = self.store.lock();
        Self::owned_wallet(&store, owner_id, wallet_id)?;
        Ok(store
            .transactions
            .get(wallet_id)
            .map(|items| {
                items
                    .iter()
                    .map(|s| (s.sequence, s.transaction.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    pub fn record_request(&self, request: RecordedRequest) {
        self.store.lock().requests.push(request);
    }

    pub fn recorded_requests(&self) -> Vec<RecordedRequest> {
        self.store.lock().requests.clone()
    }

    /// 특정 경로로 들어온 요청 수
    pub fn request_count(&self, method: &str, path_prefix: &str) -> usize {
        self.store
            .lock()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path.starts_with(path_prefix))
            .count()
    }

    fn owned_wallet<'a>(
        store: &'a MockStore,
        owner_id: &str,
        wallet_id: &str,
    ) -> Result<&'a StoredWallet, WalletAccess> {
        let stored = store.wallets.get(wallet_id).ok_or(WalletAccess::NotFound)?;
        if stored.owner_id != owner_id {
            return Err(WalletAccess::Forbidden);
        }
        Ok(stored)
    }
}
