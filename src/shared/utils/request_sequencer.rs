/// 요청 순서 관리자
/// Request Sequencer
///
/// 같은 리소스(예: 지갑 하나)에 대해 요청이 겹칠 때, 가장 마지막에 시작한
/// 요청의 응답만 유효하게 취급한다. 응답이 도착하는 순서와 무관하다.
///
/// 각 요청은 시작할 때 티켓(세대 번호)을 받고, 응답을 받은 뒤 그 티켓이 여전히
/// 최신인지 확인한다.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// 요청 티켓
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    key: String,
    generation: u64,
}

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    latest: Arc<Mutex<HashMap<String, u64>>>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 새 요청 시작: 해당 리소스의 세대를 올리고 티켓 발급
    pub fn begin(&self, key: &str) -> RequestTicket {
        let mut latest = self.latest.lock();
        let counter = latest.entry(key.to_string()).or_insert(0);
        *counter += 1;
        RequestTicket {
            key: key.to_string(),
            generation: *counter,
        }
    }

    /// 티켓이 아직 최신인지 확인
    pub fn is_latest(&self, ticket: &RequestTicket) -> bool {
        self.latest.lock().get(&ticket.key).copied() == Some(ticket.generation)
    }

    /// `fut`를 실행하고, 그 사이 더 새로운 요청이 시작되었으면 `None`
    /// Runs `fut`; yields `None` when a newer request for `key` began meanwhile.
    pub async fn run_latest<F, T, E>(&self, key: &str, fut: F) -> Result<Option<T>, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        let ticket = self.begin(key);
        let value = fut.await?;
        if self.is_latest(&ticket) {
            Ok(Some(value))
        } else {
            tracing::debug!(key, generation = ticket.generation, "discarding superseded response");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let sequencer = RequestSequencer::new();
        let first = sequencer.begin("wallet:1");
        let second = sequencer.begin("wallet:1");

        assert_eq!((first.generation(), second.generation()), (1, 2));
        assert!(!sequencer.is_latest(&first));
        assert!(sequencer.is_latest(&second));
    }

    #[test]
    fn test_keys_are_independent() {
        let sequencer = RequestSequencer::new();
        let a = sequencer.begin("wallet:a");
        let _b = sequencer.begin("wallet:b");
        assert!(sequencer.is_latest(&a));
    }

    #[tokio::test]
    async fn test_slow_stale_response_is_dropped() {
        let sequencer = RequestSequencer::new();
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

        let slow = {
            let sequencer = sequencer.clone();
            tokio::spawn(async move {
                sequencer
                    .run_latest("wallet:1", async move {
                        let _ = release_rx.await;
                        Ok::<_, ()>("stale")
                    })
                    .await
            })
        };

        // 느린 요청이 티켓을 받을 때까지 대기
        while sequencer.latest.lock().get("wallet:1").is_none() {
            tokio::task::yield_now().await;
        }

        let fresh = sequencer
            .run_latest("wallet:1", async { Ok::<_, ()>("fresh") })
            .await
            .unwrap();
        assert_eq!(fresh, Some("fresh"));

        release_tx.send(()).unwrap();
        assert_eq!(slow.await.unwrap().unwrap(), None);
    }
}
