use crate::shared::errors::{ClientError, SESSION_EXPIRED_MESSAGE};
use crate::shared::session::broadcaster::{AuthEventBroadcaster, SubscriptionId, AuthEvent};
use crate::shared::session::token_store::{MemoryTokenStore, TokenStore};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

/// 세션 상태
struct SessionState {
    token: Option<String>,
    /// 토큰이 바뀔 때마다 증가 (로그인, 로그아웃, 만료)
    generation: u64,
    updated_at: DateTime<Utc>,
}

/// 요청 생성 시점의 세션 정보
/// Session view captured when a request is built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub token: Option<String>,
    pub generation: u64,
}

/// 세션 컨텍스트
/// Session Context
///
/// 역할:
/// - 현재 bearer 토큰 보관 및 영속화 (TokenStore)
/// - 인증 이벤트 브로드캐스터 소유
/// - 401/403 분류 결과를 받아 토큰 삭제 + 알림
///
/// 순서 규칙: 토큰을 바꾸는 모든 변경은 세대(generation)를 올린다. 401 응답은
/// 요청을 만들 때 캡처한 세대가 아직 현재 세대일 때만 세션을 만료시킨다.
/// 따라서 늦게 도착한 401이 새 로그인 토큰을 지우거나, 로그아웃으로 지운 토큰을
/// 되살릴 수 없다.
#[derive(Clone)]
pub struct SessionContext {
    state: Arc<RwLock<SessionState>>,
    store: Arc<dyn TokenStore>,
    broadcaster: AuthEventBroadcaster,
}

impl SessionContext {
    /// 저장소에서 토큰을 읽어 세션 생성
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let token = match store.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load stored session token");
                None
            }
        };
        tracing::info!(
            token = if token.is_some() { "present" } else { "absent" },
            "session loaded"
        );

        Self {
            state: Arc::new(RwLock::new(SessionState {
                token,
                generation: 0,
                updated_at: Utc::now(),
            })),
            store,
            broadcaster: AuthEventBroadcaster::new(),
        }
    }

    /// 메모리 전용 세션
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    pub fn broadcaster(&self) -> &AuthEventBroadcaster {
        &self.broadcaster
    }

    /// 편의 메서드: 브로드캐스터 구독
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&AuthEvent) + Send + Sync + 'static,
    {
        self.broadcaster.subscribe(listener)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read();
        SessionSnapshot {
            token: state.token.clone(),
            generation: state.generation,
        }
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().token.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.state.read().updated_at
    }

    /// 로그인 성공 시 토큰 설정
    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        let mut state = self.state.write();
        if let Err(e) = self.store.save(&token) {
            tracing::warn!(error = %e, "failed to persist session token");
        }
        state.token = Some(token);
        state.generation += 1;
        state.updated_at = Utc::now();
        tracing::info!(generation = state.generation, "session token updated");
    }

    /// 명시적 로그아웃 (브로드캐스트 없음)
    pub fn logout(&self) {
        let mut state = self.state.write();
        self.clear_locked(&mut state);
        tracing::info!(generation = state.generation, "session cleared by logout");
    }

    /// 401 처리: `generation`이 현재 세대일 때만 토큰 삭제 후 세션 만료 알림.
    /// Returns whether the session was actually expired.
    pub fn expire(&self, generation: u64) -> bool {
        {
            let mut state = self.state.write();
            if state.generation != generation {
                tracing::debug!(
                    stale = generation,
                    current = state.generation,
                    "ignoring 401 from a superseded session"
                );
                return false;
            }
            self.clear_locked(&mut state);
            tracing::info!(generation = state.generation, "session expired");
        }

        self.broadcaster.notify_session_expired(SESSION_EXPIRED_MESSAGE);
        true
    }

    /// 403 처리: 권한 에러 알림
    pub fn forbidden(&self, message: &str) {
        tracing::warn!(message, "request forbidden");
        self.broadcaster.notify_auth_error(message);
    }

    /// 분류된 에러를 받아 세션 부수효과 적용
    /// Applies the session side effects of a classified error.
    pub fn observe(&self, error: &ClientError) {
        match error {
            ClientError::Authentication { session_generation, .. } => {
                self.expire(*session_generation);
            }
            ClientError::Authorization { message } => self.forbidden(message),
            _ => {}
        }
    }

    fn clear_locked(&self, state: &mut SessionState) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to clear persisted session token");
        }
        state.token = None;
        state.generation += 1;
        state.updated_at = Utc::now();
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("SessionContext")
            .field("authenticated", &state.token.is_some())
            .field("generation", &state.generation)
            .finish()
    }
}
