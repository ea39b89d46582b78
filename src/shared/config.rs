// =====================================================
// ClientConfig - 지갑 서비스 접속 설정
// =====================================================
// 환경 변수:
//   WALLET_API_URL     - 서비스 base URL (기본값: DEFAULT_API_URL)
//   WALLET_TOKEN_PATH  - 세션 토큰 파일 경로 (기본값: ./.wallet-session.json)
// =====================================================

use anyhow::{Context, Result};
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://wallet-service-backend-f1j0.onrender.com";
pub const DEFAULT_TOKEN_PATH: &str = ".wallet-session.json";

/// 엔드포인트 경로
/// Endpoint paths, relative to the base URL
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub login: String,
    pub register: String,
    pub wallets: String,
    pub transactions: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login: "/auth/login".to_string(),
            register: "/auth/register".to_string(),
            wallets: "/wallet".to_string(),
            transactions: "/wallet/transactions".to_string(),
        }
    }
}

impl Endpoints {
    pub fn wallet(&self, id: &str) -> String {
        format!("{}/{}", self.wallets, id)
    }

    pub fn transact(&self, wallet_id: &str) -> String {
        format!("{}/transact/{}", self.wallets, wallet_id)
    }

    pub fn wallet_transactions(&self, wallet_id: &str) -> String {
        format!("{}/{}", self.transactions, wallet_id)
    }

    pub fn transactions_pdf(&self, wallet_id: &str) -> String {
        format!("{}/{}/pdf", self.transactions, wallet_id)
    }

    /// 인증 엔드포인트 여부 (401/403 브로드캐스트 제외 대상)
    pub fn is_auth_path(&self, path: &str) -> bool {
        path == self.login || path == self.register
    }
}

/// 클라이언트 설정
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub endpoints: Endpoints,
    /// 토큰 파일 경로 (None이면 메모리에만 보관)
    pub token_path: Option<PathBuf>,
    /// CSV 내보내기 통화 기호
    pub currency_symbol: String,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid wallet service URL: {}", base_url))?;

        Ok(Self {
            base_url,
            endpoints: Endpoints::default(),
            token_path: None,
            currency_symbol: "₹".to_string(),
        })
    }

    /// 환경 변수에서 설정 읽기
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup("WALLET_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let token_path = lookup("WALLET_TOKEN_PATH").unwrap_or_else(|| DEFAULT_TOKEN_PATH.to_string());

        let mut config = Self::new(&base_url)?;
        config.token_path = Some(PathBuf::from(token_path));
        Ok(config)
    }

    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = Some(path.into());
        self
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    /// base URL + 경로
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}
