use crate::domains::wallet::models::{
    CreateWalletRequest, NormalizedTransaction, TransactOptions, Transaction, TransactionInput,
    TransactionQuery, TransactionResponse, TransactionsPage, Wallet, WalletSetupInput,
};
use crate::domains::wallet::services::export::write_transactions_csv;
use crate::domains::wallet::services::validator::{
    remap_remote_insufficient_balance, validate_wallet_setup, validate_with_fresh_balance,
    BalanceSource,
};
use crate::shared::clients::ApiClient;
use crate::shared::errors::ClientError;
use crate::shared::session::SessionContext;
use crate::shared::utils::RequestSequencer;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::io::Write;

/// 지갑 서비스
/// 역할: 지갑 서비스 API 호출 facade
/// WalletService: wallet operations against the remote wallet service
///
/// 모든 호출은 실패 시 `SessionContext::observe` 를 거친다. 401은 세션 만료,
/// 403은 권한 에러 알림으로 이어진다.
#[derive(Clone)]
pub struct WalletService {
    client: ApiClient,
    session: SessionContext,
    sequencer: RequestSequencer,
}

impl WalletService {
    pub fn new(client: ApiClient) -> Self {
        let session = client.session().clone();
        Self {
            client,
            session,
            sequencer: RequestSequencer::new(),
        }
    }

    /// 새 지갑 생성
    /// Create wallet (validated locally first)
    pub async fn create_wallet(&self, input: &WalletSetupInput) -> Result<Wallet, ClientError> {
        let request = validate_wallet_setup(input)?;
        self.create_wallet_unchecked(&request).await
    }

    /// 검증 없이 바로 전송 (이미 검증된 요청)
    pub async fn create_wallet_unchecked(
        &self,
        request: &CreateWalletRequest,
    ) -> Result<Wallet, ClientError> {
        let endpoint = self.client.config().endpoints.wallets.clone();
        let wallet: Wallet = self
            .client
            .post_json(&endpoint, request, None)
            .await
            .inspect_err(|e| self.session.observe(e))?;

        tracing::info!(wallet_id = %wallet.id, name = %wallet.name, "wallet created");
        Ok(wallet)
    }

    /// 사용자의 모든 지갑 조회
    /// List wallets owned by the current user
    pub async fn list_wallets(&self) -> Result<Vec<Wallet>, ClientError> {
        let endpoint = self.client.config().endpoints.wallets.clone();
        self.client
            .get_json(&endpoint, &[])
            .await
            .inspect_err(|e| self.session.observe(e))
    }

    /// 지갑 조회 (ID로)
    /// Get wallet by ID
    pub async fn get_wallet(&self, wallet_id: &str) -> Result<Wallet, ClientError> {
        let endpoint = self.client.config().endpoints.wallet(wallet_id);
        self.client
            .get_json(&endpoint, &[])
            .await
            .inspect_err(|e| self.session.observe(e))
    }

    /// 지갑 조회, 더 최근 조회가 시작되었으면 `None`
    /// Fetches a wallet; a response superseded by a newer fetch of the same
    /// wallet is dropped.
    pub async fn fetch_wallet_latest(&self, wallet_id: &str) -> Result<Option<Wallet>, ClientError> {
        let key = format!("wallet:{}", wallet_id);
        self.sequencer.run_latest(&key, self.get_wallet(wallet_id)).await
    }

    /// 거래 생성
    /// Create transaction
    ///
    /// 1. 지갑을 새로 조회해 현재 잔액 확인
    /// 2. 로컬 검증 (실패 시 네트워크 호출 없음)
    /// 3. 멱등성 키와 함께 전송
    /// 4. 서버의 잔액 부족 거절은 로컬 검증 에러로 변환
    pub async fn create_transaction(
        &self,
        wallet_id: &str,
        input: &TransactionInput,
        options: TransactOptions,
    ) -> Result<TransactionResponse, ClientError> {
        // 1~2. 최신 잔액으로 검증
        let normalized = validate_with_fresh_balance(self, wallet_id, input).await?;

        // 3. 전송
        self.submit_transaction(&normalized, options).await
    }

    /// 검증된 거래 전송
    pub async fn submit_transaction(
        &self,
        transaction: &NormalizedTransaction,
        options: TransactOptions,
    ) -> Result<TransactionResponse, ClientError> {
        let endpoint = self.client.config().endpoints.transact(&transaction.wallet_id);
        let result: Result<TransactionResponse, ClientError> = self
            .client
            .post_json(&endpoint, &transaction.to_request(), options.idempotency_key)
            .await
            .inspect_err(|e| self.session.observe(e));

        match result {
            Ok(response) => {
                tracing::info!(
                    wallet_id = %transaction.wallet_id,
                    transaction_id = %response.transaction_id,
                    transaction_type = transaction.transaction_type.as_str(),
                    amount = %transaction.amount,
                    balance = %response.balance,
                    "transaction recorded"
                );
                Ok(response)
            }
            // 4. 서버 측 잔액 부족
            Err(e) => Err(remap_remote_insufficient_balance(
                e,
                transaction.amount.abs(),
                None,
            )),
        }
    }

    /// 거래 목록 조회 (페이지, 정렬)
    /// List transactions for a wallet
    pub async fn list_transactions(
        &self,
        wallet_id: &str,
        query: &TransactionQuery,
    ) -> Result<TransactionsPage, ClientError> {
        let endpoint = self.client.config().endpoints.wallet_transactions(wallet_id);
        self.client
            .get_json(&endpoint, &query.to_query_pairs())
            .await
            .inspect_err(|e| self.session.observe(e))
    }

    /// 거래 목록 조회, 같은 지갑에 대한 더 최근 조회가 있으면 `None`
    pub async fn list_transactions_latest(
        &self,
        wallet_id: &str,
        query: &TransactionQuery,
    ) -> Result<Option<TransactionsPage>, ClientError> {
        let key = format!("transactions:{}", wallet_id);
        self.sequencer
            .run_latest(&key, self.list_transactions(wallet_id, query))
            .await
    }

    /// 거래 내역 PDF 다운로드
    /// Downloads the transaction statement PDF as raw bytes
    pub async fn export_transactions_pdf(&self, wallet_id: &str) -> Result<Vec<u8>, ClientError> {
        let endpoint = self.client.config().endpoints.transactions_pdf(wallet_id);
        let bytes = self
            .client
            .get_bytes(&endpoint)
            .await
            .inspect_err(|e| self.session.observe(e))?;

        tracing::debug!(wallet_id, size = bytes.len(), "statement downloaded");
        Ok(bytes)
    }

    /// 거래 내역 CSV 내보내기 (설정된 통화 기호 사용)
    pub fn export_transactions_csv<W: Write>(
        &self,
        transactions: &[Transaction],
        writer: W,
    ) -> anyhow::Result<()> {
        write_transactions_csv(writer, transactions, &self.client.config().currency_symbol)
    }
}

#[async_trait]
impl BalanceSource for WalletService {
    async fn current_balance(&self, wallet_id: &str) -> Result<Decimal, ClientError> {
        Ok(self.get_wallet(wallet_id).await?.balance)
    }
}
