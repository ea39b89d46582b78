use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// 인증 이벤트
/// Notification published when the service rejects the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// 401: 세션 만료 (토큰 삭제 후 발행)
    SessionExpired { message: String },
    /// 403: 권한 없음
    AuthError { message: String },
}

impl AuthEvent {
    pub fn message(&self) -> &str {
        match self {
            AuthEvent::SessionExpired { message } | AuthEvent::AuthError { message } => message,
        }
    }
}

/// 구독 핸들 (구독 해제용)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&AuthEvent) + Send + Sync>;

/// 인증 에러 브로드캐스터
/// Auth-Error Broadcaster
///
/// 구독자 목록을 가진 단순 옵저버. 알림은 구독 순서대로 동기 호출되며,
/// 구독자가 없을 때 발행된 알림은 버려진다 (큐잉 없음).
#[derive(Clone, Default)]
pub struct AuthEventBroadcaster {
    listeners: Arc<Mutex<Vec<(SubscriptionId, Listener)>>>,
    next_id: Arc<AtomicU64>,
}

impl AuthEventBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&AuthEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// 구독 해제. 이미 해제된 경우 false
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn notify_session_expired(&self, message: impl Into<String>) {
        self.publish(AuthEvent::SessionExpired { message: message.into() });
    }

    pub fn notify_auth_error(&self, message: impl Into<String>) {
        self.publish(AuthEvent::AuthError { message: message.into() });
    }

    fn publish(&self, event: AuthEvent) {
        // 락을 잡은 채로 콜백을 호출하지 않음 (콜백이 세션에 재진입할 수 있음)
        let snapshot: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        if snapshot.is_empty() {
            tracing::debug!(?event, "auth event dropped: no subscribers");
            return;
        }

        for listener in snapshot {
            listener(&event);
        }
    }
}

impl std::fmt::Debug for AuthEventBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthEventBroadcaster")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
