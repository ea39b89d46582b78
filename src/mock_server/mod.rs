//! 모의 지갑 서비스
//! In-memory wallet service speaking the same HTTP contract as the real
//! backend. Used by the integration tests and by `wallet-cli mock-server`.

pub mod auth;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::*;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// 실행 중인 모의 서버 (drop 시 종료)
pub struct MockServer {
    pub base_url: String,
    pub addr: SocketAddr,
    pub state: MockState,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// 임의 포트(127.0.0.1:0)에서 시작
    pub async fn spawn(state: MockState) -> Result<Self> {
        Self::bind("127.0.0.1:0", state).await
    }

    pub async fn bind(addr: &str, state: MockState) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind mock wallet service on {}", addr))?;
        let addr = listener.local_addr()?;
        let app = create_router(state.clone());

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "mock wallet service stopped");
            }
        });

        tracing::info!(%addr, "mock wallet service listening");
        Ok(Self {
            base_url: format!("http://{}", addr),
            addr,
            state,
            handle,
        })
    }

    /// 종료될 때까지 대기 (CLI 용)
    pub async fn wait(mut self) -> Result<()> {
        (&mut self.handle).await.context("mock wallet service task failed")
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
