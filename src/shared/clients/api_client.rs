use crate::shared::config::ClientConfig;
use crate::shared::errors::{
    ApiError, ClientError, FieldError, DEFAULT_ERROR_MESSAGE, SESSION_EXPIRED_MESSAGE,
};
use crate::shared::session::{SessionContext, SessionSnapshot};
use crate::shared::utils::{generate_key, IdempotencyKey, IDEMPOTENCY_HEADER};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub const FORBIDDEN_MESSAGE: &str = "You do not have permission to perform this action";

// 지갑 서비스 HTTP 클라이언트
// 역할: axios 인스턴스 + 인터셉터 같은 것
// Authenticated request client for the wallet service
//
// 요청 단계: Bearer 토큰 첨부, 상태 변경 요청에는 Idempotency-Key 첨부
// 응답 단계: 성공은 그대로 통과, 실패는 ClientError 로 분류
//
// 세션 부수효과(토큰 삭제, 브로드캐스트)는 여기서 하지 않는다.
// 분류된 에러를 받은 facade 가 SessionContext::observe 를 호출한다.
#[derive(Clone)]
pub struct ApiClient {
    http_client: reqwest::Client,
    config: ClientConfig,
    session: SessionContext,
}

impl ApiClient {
    pub fn new(config: ClientConfig, session: SessionContext) -> Self {
        Self::with_http_client(reqwest::Client::new(), config, session)
    }

    pub fn with_http_client(
        http_client: reqwest::Client,
        config: ClientConfig,
        session: SessionContext,
    ) -> Self {
        Self {
            http_client,
            config,
            session,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// GET + JSON 응답
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let response = self
            .execute(Method::GET, path, None, |builder| builder.query(query))
            .await?;
        decode_json(response).await
    }

    /// POST + JSON 본문/응답. 상태 변경 요청이므로 멱등성 키가 항상 붙는다.
    pub async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        idempotency_key: Option<IdempotencyKey>,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .execute(Method::POST, path, idempotency_key, |builder| builder.json(body))
            .await?;
        decode_json(response).await
    }

    /// POST, 응답 본문 무시 (회원가입 등)
    pub async fn post_unit<B>(&self, path: &str, body: &B) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized,
    {
        self.execute(Method::POST, path, None, |builder| builder.json(body))
            .await?;
        Ok(())
    }

    /// GET + 바이너리 응답 (PDF 등)
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ClientError> {
        let response = self.execute(Method::GET, path, None, |builder| builder).await?;
        let bytes = response.bytes().await.map_err(ClientError::Network)?;
        Ok(bytes.to_vec())
    }

    /// 요청 전송 + 응답 분류
    /// Builds, sends and classifies one request.
    pub async fn execute<F>(
        &self,
        method: Method,
        path: &str,
        idempotency_key: Option<IdempotencyKey>,
        configure: F,
    ) -> Result<reqwest::Response, ClientError>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let snapshot = self.session.snapshot();
        let key = is_mutating(&method).then(|| idempotency_key.unwrap_or_else(generate_key));
        let builder = self.build_request(method.clone(), path, &snapshot, key.as_ref());
        let builder = configure(builder);

        tracing::debug!(
            %method,
            path,
            authenticated = snapshot.token.is_some(),
            idempotency_key = key.as_ref().map(IdempotencyKey::as_str),
            "sending request"
        );

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(%method, path, error = %e, "request did not reach the wallet service");
            ClientError::Network(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = body_or_empty(response.text().await, &method, path);
        let error = classify_failure(
            status,
            body,
            self.config.endpoints.is_auth_path(path),
            snapshot.generation,
        );
        tracing::warn!(%method, path, status = status.as_u16(), error = %error, "request failed");
        Err(error)
    }

    fn build_request(
        &self,
        method: Method,
        path: &str,
        snapshot: &SessionSnapshot,
        key: Option<&IdempotencyKey>,
    ) -> RequestBuilder {
        let url = self.config.url_for(path);
        let mut builder = self
            .http_client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = &snapshot.token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(key) = key {
            builder = builder.header(IDEMPOTENCY_HEADER, key.as_str());
        }
        builder
    }
}

/// 에러 응답 본문 (읽기 실패 시 경고 후 빈 본문으로 분류 진행)
fn body_or_empty<E: std::fmt::Display>(body: Result<String, E>, method: &Method, path: &str) -> String {
    body.unwrap_or_else(|e| {
        tracing::warn!(%method, path, error = %e, "failed to read error response body");
        String::new()
    })
}

/// 상태를 변경하는 HTTP 메서드인지
pub fn is_mutating(method: &Method) -> bool {
    [Method::POST, Method::PUT, Method::PATCH, Method::DELETE].contains(method)
}

/// 실패 응답 분류
/// Maps a non-success response to the client error taxonomy.
///
/// Auth endpoints (login/register) never produce `Authentication` or
/// `Authorization`: a 401 there means bad credentials, not an expired
/// session, and must not trigger the expiry broadcast.
pub fn classify_failure(
    status: StatusCode,
    body: String,
    auth_endpoint: bool,
    session_generation: u64,
) -> ClientError {
    let parsed: Option<Value> = serde_json::from_str(&body).ok();
    let details = parsed.as_ref().map(extract_details).unwrap_or_default();
    let message = parsed.as_ref().and_then(extract_message);

    if !auth_endpoint && status == StatusCode::UNAUTHORIZED {
        return ClientError::Authentication {
            message: message.unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.to_string()),
            session_generation,
        };
    }
    if !auth_endpoint && status == StatusCode::FORBIDDEN {
        return ClientError::Authorization {
            message: message.unwrap_or_else(|| FORBIDDEN_MESSAGE.to_string()),
        };
    }

    ClientError::Api(ApiError {
        status: status.as_u16(),
        message: message.unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
        details,
        body,
    })
}

/// 메시지 우선순위: details[0].message → message → error
fn extract_message(body: &Value) -> Option<String> {
    let non_empty = |v: Option<&Value>| {
        v.and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    non_empty(body.pointer("/details/0/message"))
        .or_else(|| non_empty(body.get("message")))
        .or_else(|| non_empty(body.get("error")))
}

fn extract_details(body: &Value) -> Vec<FieldError> {
    body.get("details")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let message = item.get("message")?.as_str()?;
                    let field = item.get("field").and_then(Value::as_str).unwrap_or("");
                    Some(FieldError::remote(field, message))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// 성공 응답 디코딩. `{"data": ...}` 봉투로 감싼 응답도 허용.
async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(ClientError::Network)?;
    decode_body(status, &bytes)
}

pub fn decode_body<T: DeserializeOwned>(status: StatusCode, bytes: &[u8]) -> Result<T, ClientError> {
    let unexpected = |reason: String| {
        ClientError::Api(ApiError {
            status: status.as_u16(),
            message: format!("Unexpected response payload: {}", reason),
            details: Vec::new(),
            body: String::from_utf8_lossy(bytes).into_owned(),
        })
    };

    let value: Value = serde_json::from_slice(bytes).map_err(|e| unexpected(e.to_string()))?;

    if let Some(inner) = value.get("data") {
        if let Ok(decoded) = serde_json::from_value::<T>(inner.clone()) {
            return Ok(decoded);
        }
    }
    serde_json::from_value(value).map_err(|e| unexpected(e.to_string()))
}
