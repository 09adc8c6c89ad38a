//! Signed REST client for the KuCoin v1 API.

use core::fmt;
use std::time::Duration;

use agora_core::AgoraError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::convert;
use crate::dto::{
    Envelope, HistOrderResponse, ListQuery, OrderCancelResponse, OrderCreateRequest,
    OrderCreateResponse, OrderResponse, Pagination, SUCCESS_CODE, TradeResponse,
};

type HmacSha256 = Hmac<Sha256>;

pub(crate) const CONNECTOR: &str = "agora-kucoin";

/// Production REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.kucoin.com";

/// API key material. `Debug` never prints the secrets.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KucoinCredentials {
    /// `KC-API-KEY`.
    pub api_key: String,
    /// Secret used to sign requests.
    pub api_secret: String,
    /// Passphrase chosen when the key was created.
    pub api_passphrase: String,
}

impl KucoinCredentials {
    /// Bundle the three pieces of a KuCoin API key.
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        api_passphrase: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            api_passphrase: api_passphrase.into(),
        }
    }
}

impl fmt::Debug for KucoinCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KucoinCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .field("api_passphrase", &"***")
            .finish()
    }
}

/// Base64 HMAC-SHA256 of `payload` keyed by `secret`.
///
/// # Errors
/// Returns `InvalidArg` if the secret is rejected as an HMAC key.
pub fn sign(secret: &str, payload: &str) -> Result<String, AgoraError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AgoraError::invalid_arg(format!("api secret: {e}")))?;
    mac.update(payload.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// The string KuCoin expects to be signed: `timestamp + METHOD + endpoint + body`,
/// where `endpoint` includes the query string.
#[must_use]
pub fn prehash(timestamp_ms: i64, method: &Method, endpoint: &str, body: &str) -> String {
    format!("{timestamp_ms}{}{endpoint}{body}", method.as_str())
}

/// Thin typed wrapper over the endpoints the connector needs.
#[derive(Debug, Clone)]
pub struct KucoinClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<KucoinCredentials>,
}

impl KucoinClient {
    /// Build a client with its own HTTP connection pool.
    ///
    /// # Errors
    /// Returns `Other` if the HTTP client cannot be constructed.
    pub fn new(
        base_url: impl Into<String>,
        credentials: Option<KucoinCredentials>,
        timeout: Duration,
    ) -> Result<Self, AgoraError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AgoraError::Other(format!("http client: {e}")))?;
        Ok(Self::with_http(http, base_url, credentials))
    }

    /// Reuse an existing `reqwest::Client`.
    pub fn with_http(
        http: reqwest::Client,
        base_url: impl Into<String>,
        credentials: Option<KucoinCredentials>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// `GET /api/v1/orders?status=active`.
    ///
    /// # Errors
    /// Transport, API and decoding failures.
    pub async fn active_orders(
        &self,
        query: &ListQuery,
    ) -> Result<Pagination<OrderResponse>, AgoraError> {
        let mut pairs = vec![("status", "active".to_string())];
        pairs.extend(query.to_pairs());
        self.send(Method::GET, "/api/v1/orders", &pairs, None).await
    }

    /// `GET /api/v1/fills`, bounds in milliseconds.
    ///
    /// # Errors
    /// Transport, API and decoding failures.
    pub async fn fills(&self, query: &ListQuery) -> Result<Pagination<TradeResponse>, AgoraError> {
        self.send(Method::GET, "/api/v1/fills", &query.to_pairs(), None)
            .await
    }

    /// `GET /api/v1/hist-orders`, bounds in seconds.
    ///
    /// # Errors
    /// Transport, API and decoding failures.
    pub async fn hist_orders(
        &self,
        query: &ListQuery,
    ) -> Result<Pagination<HistOrderResponse>, AgoraError> {
        self.send(Method::GET, "/api/v1/hist-orders", &query.to_pairs(), None)
            .await
    }

    /// `POST /api/v1/orders`.
    ///
    /// # Errors
    /// Transport, API and decoding failures.
    pub async fn create_order(
        &self,
        req: &OrderCreateRequest,
    ) -> Result<OrderCreateResponse, AgoraError> {
        let body = serde_json::to_string(req)
            .map_err(|e| AgoraError::Data(format!("encode order: {e}")))?;
        self.send(Method::POST, "/api/v1/orders", &[], Some(body))
            .await
    }

    /// `DELETE /api/v1/orders/{orderId}`.
    ///
    /// # Errors
    /// `InvalidArg` for ids that are not a plain path segment, before any
    /// request; otherwise transport, API and decoding failures.
    pub async fn cancel_order(&self, order_id: &str) -> Result<OrderCancelResponse, AgoraError> {
        let path = format!("/api/v1/orders/{}", convert::order_id_segment(order_id)?);
        self.send(Method::DELETE, &path, &[], None).await
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "kucoin.request", skip(self, pairs, body))
    )]
    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        pairs: &[(&str, String)],
        body: Option<String>,
    ) -> Result<T, AgoraError> {
        let endpoint = if pairs.is_empty() {
            path.to_string()
        } else {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())))
                .finish();
            format!("{path}?{query}")
        };
        let body = body.unwrap_or_default();

        let mut req = self
            .http
            .request(method.clone(), format!("{}{endpoint}", self.base_url))
            .header("Content-Type", "application/json");

        if let Some(creds) = &self.credentials {
            let ts = chrono::Utc::now().timestamp_millis();
            let signature = sign(&creds.api_secret, &prehash(ts, &method, &endpoint, &body))?;
            let passphrase = sign(&creds.api_secret, &creds.api_passphrase)?;
            req = req
                .header("KC-API-KEY", &creds.api_key)
                .header("KC-API-SIGN", signature)
                .header("KC-API-TIMESTAMP", ts.to_string())
                .header("KC-API-PASSPHRASE", passphrase)
                .header("KC-API-KEY-VERSION", "2");
        }
        if !body.is_empty() {
            req = req.body(body);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| AgoraError::transport(CONNECTOR, format!("{endpoint}: {e}")))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| AgoraError::transport(CONNECTOR, format!("{endpoint}: {e}")))?;

        decode(status, &endpoint, &text)
    }
}

fn decode<T: DeserializeOwned>(
    status: StatusCode,
    endpoint: &str,
    text: &str,
) -> Result<T, AgoraError> {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            return Err(AgoraError::transport(
                CONNECTOR,
                format!("authentication rejected ({status}) for {endpoint}"),
            ));
        }
        StatusCode::TOO_MANY_REQUESTS => {
            return Err(AgoraError::transport(
                CONNECTOR,
                format!("rate limited on {endpoint}"),
            ));
        }
        s if s.is_server_error() => {
            return Err(AgoraError::transport(
                CONNECTOR,
                format!("server error {status} for {endpoint}"),
            ));
        }
        _ => {}
    }

    let envelope: Envelope<T> = match serde_json::from_str(text) {
        Ok(env) => env,
        Err(_) if !status.is_success() => {
            return Err(AgoraError::transport(
                CONNECTOR,
                format!("status {status} for {endpoint}"),
            ));
        }
        Err(e) => return Err(AgoraError::Data(format!("{endpoint}: {e}"))),
    };

    if envelope.code != SUCCESS_CODE {
        return Err(AgoraError::connector(
            CONNECTOR,
            format!(
                "code {}: {}",
                envelope.code,
                envelope.msg.as_deref().unwrap_or("no message")
            ),
        ));
    }
    envelope
        .data
        .ok_or_else(|| AgoraError::Data(format!("{endpoint}: missing data")))
}
