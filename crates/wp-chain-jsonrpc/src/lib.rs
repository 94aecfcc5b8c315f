use alloy_primitives::Address;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};
use wp_chain_client::abi::DEFAULT_CONTRACT_ADDRESS;
use wp_chain_client::{ChainError, RpcChainClient, RpcTransport};

mod watcher;

pub use watcher::spawn_watcher;

pub const RPC_URL_ENV: &str = "WAVE_PORTAL_RPC_URL";
pub const CONTRACT_ENV: &str = "WAVE_PORTAL_CONTRACT";
pub const POLL_MS_ENV: &str = "WAVE_PORTAL_POLL_MS";

const DEFAULT_POLL_MS: u64 = 1_000;

/// Where the wallet lives and which contract to talk to.
///
/// Reads `WAVE_PORTAL_RPC_URL`, `WAVE_PORTAL_CONTRACT` and
/// `WAVE_PORTAL_POLL_MS`. An unset endpoint means there is no wallet.
#[derive(Debug, Clone)]
pub struct JsonRpcConfig {
    pub endpoint: Option<String>,
    pub contract: Address,
    pub poll_interval: Duration,
}

impl JsonRpcConfig {
    pub fn from_env() -> Result<Self, ChainError> {
        let endpoint = std::env::var(RPC_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty());
        let contract = std::env::var(CONTRACT_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONTRACT_ADDRESS.to_owned());
        let poll_ms = std::env::var(POLL_MS_ENV)
            .map(|raw| parse_poll_ms(&raw))
            .unwrap_or(DEFAULT_POLL_MS);

        Ok(Self {
            endpoint,
            contract: parse_contract(&contract)?,
            poll_interval: Duration::from_millis(poll_ms),
        })
    }
}

/// Polling interval in milliseconds; zero and garbage fall back to the default.
fn parse_poll_ms(raw: &str) -> u64 {
    match raw.trim().parse::<u64>() {
        Ok(0) => {
            warn!("{POLL_MS_ENV} must be positive, using {DEFAULT_POLL_MS}");
            DEFAULT_POLL_MS
        }
        Ok(ms) => ms,
        Err(_) => {
            warn!("non-numeric {POLL_MS_ENV} '{raw}', using {DEFAULT_POLL_MS}");
            DEFAULT_POLL_MS
        }
    }
}

pub fn parse_contract(raw: &str) -> Result<Address, ChainError> {
    Address::from_str(raw.trim())
        .map_err(|err| ChainError::Decode(format!("invalid contract address '{raw}': {err}")))
}

/// Build a portal chain client for the configured endpoint.
pub fn connect(config: &JsonRpcConfig) -> Result<RpcChainClient<HttpTransport>, ChainError> {
    let endpoint = config.endpoint.as_deref().ok_or(ChainError::NoWallet)?;
    Ok(RpcChainClient::new(HttpTransport::new(endpoint), config.contract)
        .with_poll_interval(config.poll_interval))
}

/// JSON-RPC 2.0 over HTTP, for nodes and wallet bridges that hold unlocked
/// accounts.
#[derive(Clone)]
pub struct HttpTransport {
    endpoint: String,
    http: reqwest::Client,
    next_id: Arc<AtomicU64>,
}

impl HttpTransport {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_owned(),
            http: reqwest::Client::new(),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

// ── JSON-RPC envelope ────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

impl RpcResponse {
    fn into_result(self) -> Result<Value, ChainError> {
        if let Some(err) = self.error {
            return Err(ChainError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        Ok(self.result.unwrap_or(Value::Null))
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let body = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        debug!(method, id = body.id, "json-rpc request");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                if err.is_connect() {
                    warn!("wallet endpoint {} unreachable: {}", self.endpoint, err);
                    ChainError::NoWallet
                } else {
                    ChainError::Transport(err.to_string())
                }
            })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        // Some nodes answer RPC errors with a non-2xx status and a JSON body.
        match serde_json::from_str::<RpcResponse>(&text) {
            Ok(parsed) => parsed.into_result(),
            Err(_) if !status.is_success() => {
                Err(ChainError::Transport(format!("{method} HTTP {status}: {text}")))
            }
            Err(err) => Err(ChainError::Decode(format!("{method}: {err}"))),
        }
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
