use alloy_primitives::{Address, U256, hex};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info};
use wp_api_types::{NetworkName, TxHash, WalletAddress, WaveRecord};

use crate::abi::{getTotalWavesCall, getWavesCall, waveCall};
use crate::network::{network_name, parse_quantity};
use crate::{ChainClient, ChainError, PendingTx, RpcTransport, TxReceipt};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1_000);
/// Floor for receipt polling; a zero interval would spin on the node.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// WavePortal client over an EIP-1193 style request channel.
pub struct RpcChainClient<T> {
    transport: T,
    contract: Address,
    poll_interval: Duration,
}

impl<T: RpcTransport> RpcChainClient<T> {
    pub fn new(transport: T, contract: Address) -> Self {
        Self {
            transport,
            contract,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(MIN_POLL_INTERVAL);
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    pub async fn chain_id(&self) -> Result<u64, ChainError> {
        let raw = self.transport.request("eth_chainId", json!([])).await?;
        let raw = raw
            .as_str()
            .ok_or_else(|| ChainError::Decode(format!("eth_chainId returned {raw}")))?;
        parse_quantity(raw).ok_or_else(|| ChainError::Decode(format!("bad chain id {raw}")))
    }

    /// Send a wave from an explicit account instead of the wallet's first one.
    pub async fn send_wave_as(
        &self,
        from: &WalletAddress,
        message: &str,
    ) -> Result<PendingTx, ChainError> {
        let data = waveCall {
            _message: message.to_owned(),
        }
        .abi_encode();

        self.send_transaction(json!({
            "from": from.0,
            "to": self.contract.to_string(),
            "data": hex::encode_prefixed(data),
        }))
        .await
    }

    /// `eth_sendTransaction` with a caller-built transaction object.
    pub async fn send_transaction(&self, tx: Value) -> Result<PendingTx, ChainError> {
        let raw = self
            .transport
            .request("eth_sendTransaction", json!([tx]))
            .await?;
        let hash = raw
            .as_str()
            .ok_or_else(|| ChainError::Decode(format!("eth_sendTransaction returned {raw}")))?;
        info!("Mining... {hash}");
        Ok(PendingTx {
            hash: TxHash(hash.to_owned()),
        })
    }

    pub async fn receipt(&self, hash: &TxHash) -> Result<Option<TxReceipt>, ChainError> {
        let raw = self
            .transport
            .request("eth_getTransactionReceipt", json!([hash.0]))
            .await?;
        if raw.is_null() {
            return Ok(None);
        }
        parse_receipt(hash, &raw).map(Some)
    }

    pub async fn balance(&self, address: &WalletAddress) -> Result<U256, ChainError> {
        let raw = self
            .transport
            .request("eth_getBalance", json!([address.0, "latest"]))
            .await?;
        let raw = raw
            .as_str()
            .ok_or_else(|| ChainError::Decode(format!("eth_getBalance returned {raw}")))?;
        raw.parse::<U256>()
            .map_err(|err| ChainError::Decode(format!("bad balance {raw}: {err}")))
    }

    async fn call(&self, data: Vec<u8>) -> Result<Vec<u8>, ChainError> {
        let raw = self
            .transport
            .request(
                "eth_call",
                json!([
                    {
                        "to": self.contract.to_string(),
                        "data": hex::encode_prefixed(data),
                    },
                    "latest"
                ]),
            )
            .await?;
        let raw = raw
            .as_str()
            .ok_or_else(|| ChainError::Decode(format!("eth_call returned {raw}")))?;
        hex::decode(raw).map_err(|err| ChainError::Decode(format!("eth_call hex: {err}")))
    }

    async fn first_account(&self) -> Result<WalletAddress, ChainError> {
        self.accounts()
            .await?
            .into_iter()
            .next()
            .ok_or(ChainError::NoAccount)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl<T: RpcTransport> ChainClient for RpcChainClient<T> {
    async fn request_accounts(&self) -> Result<Vec<WalletAddress>, ChainError> {
        let raw = self
            .transport
            .request("eth_requestAccounts", json!([]))
            .await?;
        parse_accounts(&raw)
    }

    async fn accounts(&self) -> Result<Vec<WalletAddress>, ChainError> {
        let raw = self.transport.request("eth_accounts", json!([])).await?;
        parse_accounts(&raw)
    }

    async fn network(&self) -> Result<NetworkName, ChainError> {
        let chain_id = self.chain_id().await?;
        Ok(NetworkName(network_name(chain_id).to_owned()))
    }

    async fn send_wave(&self, message: &str) -> Result<PendingTx, ChainError> {
        let from = self.first_account().await?;
        self.send_wave_as(&from, message).await
    }

    async fn wait_for_confirmation(&self, pending: &PendingTx) -> Result<TxReceipt, ChainError> {
        loop {
            if let Some(receipt) = self.receipt(&pending.hash).await? {
                if !receipt.success {
                    return Err(ChainError::Reverted(receipt.hash));
                }
                info!("Mined -- {}", receipt.hash);
                return Ok(receipt);
            }
            debug!("receipt for {} not available yet", pending.hash);
            self.transport.sleep(self.poll_interval).await;
        }
    }

    async fn get_waves(&self) -> Result<Vec<WaveRecord>, ChainError> {
        let output = self.call(getWavesCall {}.abi_encode()).await?;
        let decoded = getWavesCall::abi_decode_returns(&output, true)
            .map_err(|err| ChainError::Decode(format!("getWaves: {err}")))?;

        Ok(decoded
            .waves
            .into_iter()
            .map(|wave| WaveRecord {
                waver: WalletAddress(wave.waver.to_string()),
                message: wave.message,
                timestamp: wave.timestamp.saturating_to::<u64>(),
            })
            .collect())
    }

    async fn total_waves(&self) -> Result<u64, ChainError> {
        let output = self.call(getTotalWavesCall {}.abi_encode()).await?;
        let decoded = getTotalWavesCall::abi_decode_returns(&output, true)
            .map_err(|err| ChainError::Decode(format!("getTotalWaves: {err}")))?;
        Ok(decoded.total.saturating_to::<u64>())
    }
}

fn parse_accounts(raw: &Value) -> Result<Vec<WalletAddress>, ChainError> {
    let Some(items) = raw.as_array() else {
        return Err(ChainError::Decode(format!("expected account list, got {raw}")));
    };

    Ok(items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|account| !account.is_empty())
        .map(|account| WalletAddress(account.to_owned()))
        .collect())
}

fn parse_receipt(hash: &TxHash, raw: &Value) -> Result<TxReceipt, ChainError> {
    let status = raw.get("status").and_then(Value::as_str);
    // Pre-Byzantium receipts carry no status; treat them as successful.
    let success = status.map(|s| parse_quantity(s) == Some(1)).unwrap_or(true);

    Ok(TxReceipt {
        hash: raw
            .get("transactionHash")
            .and_then(Value::as_str)
            .map(|h| TxHash(h.to_owned()))
            .unwrap_or_else(|| hash.clone()),
        block_number: raw
            .get("blockNumber")
            .and_then(Value::as_str)
            .and_then(parse_quantity),
        success,
        contract_address: raw
            .get("contractAddress")
            .and_then(Value::as_str)
            .map(|a| WalletAddress(a.to_owned())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::Wave;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Answers requests from a fixed script, in order.
    #[derive(Default)]
    struct ScriptedTransport {
        script: Mutex<VecDeque<(&'static str, Result<Value, ChainError>)>>,
        seen: Mutex<Vec<(String, Value)>>,
        sleeps: Mutex<usize>,
    }

    impl ScriptedTransport {
        fn push(&self, method: &'static str, reply: Result<Value, ChainError>) {
            self.script.lock().unwrap().push_back((method, reply));
        }

        fn seen(&self) -> Vec<(String, Value)> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RpcTransport for ScriptedTransport {
        async fn request(&self, method: &str, params: Value) -> Result<Value, ChainError> {
            self.seen.lock().unwrap().push((method.to_owned(), params));
            let (expected, reply) = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected request");
            assert_eq!(expected, method);
            reply
        }

        async fn sleep(&self, _duration: Duration) {
            *self.sleeps.lock().unwrap() += 1;
        }
    }

    fn client() -> RpcChainClient<ScriptedTransport> {
        RpcChainClient::new(ScriptedTransport::default(), Address::repeat_byte(0x11))
    }

    #[tokio::test]
    async fn get_waves_decodes_contract_output() {
        let client = client();
        let encoded = getWavesCall::abi_encode_returns(&(vec![
            Wave {
                waver: Address::repeat_byte(0xaa),
                message: "hi".to_owned(),
                timestamp: U256::from(1_000u64),
            },
            Wave {
                waver: Address::repeat_byte(0xbb),
                message: "yo".to_owned(),
                timestamp: U256::from(1_001u64),
            },
        ],));
        client
            .transport()
            .push("eth_call", Ok(json!(hex::encode_prefixed(encoded))));

        let waves = client.get_waves().await.unwrap();

        assert_eq!(waves.len(), 2);
        assert_eq!(waves[0].message, "hi");
        assert_eq!(waves[0].timestamp, 1_000);
        assert_eq!(
            waves[1].waver.0.to_lowercase(),
            format!("0x{}", "bb".repeat(20))
        );

        let seen = client.transport().seen();
        let data = seen[0].1[0]["data"].as_str().unwrap().to_owned();
        assert_eq!(data, hex::encode_prefixed(getWavesCall::SELECTOR));
    }

    #[tokio::test]
    async fn send_wave_uses_first_account_and_waits_for_receipt() {
        let client = client();
        let transport = client.transport();
        transport.push("eth_accounts", Ok(json!(["0xabc", "0xdef"])));
        transport.push("eth_sendTransaction", Ok(json!("0xfeed")));
        transport.push("eth_getTransactionReceipt", Ok(Value::Null));
        transport.push(
            "eth_getTransactionReceipt",
            Ok(json!({ "transactionHash": "0xfeed", "blockNumber": "0x10", "status": "0x1" })),
        );

        let pending = client.send_wave("hola").await.unwrap();
        let receipt = client.wait_for_confirmation(&pending).await.unwrap();

        assert_eq!(receipt.block_number, Some(16));
        assert!(receipt.success);
        assert_eq!(*transport.sleeps.lock().unwrap(), 1);

        let seen = transport.seen();
        assert_eq!(seen[1].1[0]["from"], "0xabc");
        let data = seen[1].1[0]["data"].as_str().unwrap();
        assert!(data.starts_with(&hex::encode_prefixed(waveCall::SELECTOR)));
    }

    #[tokio::test]
    async fn reverted_receipt_is_an_error() {
        let client = client();
        client.transport().push(
            "eth_getTransactionReceipt",
            Ok(json!({ "transactionHash": "0xdead", "status": "0x0" })),
        );

        let err = client
            .wait_for_confirmation(&PendingTx {
                hash: TxHash("0xdead".to_owned()),
            })
            .await
            .unwrap_err();

        assert_eq!(err, ChainError::Reverted(TxHash("0xdead".to_owned())));
    }

    #[tokio::test]
    async fn send_wave_without_accounts_fails() {
        let client = client();
        client.transport().push("eth_accounts", Ok(json!([])));

        let err = client.send_wave("hola").await.unwrap_err();
        assert_eq!(err, ChainError::NoAccount);
    }

    #[tokio::test]
    async fn network_maps_chain_id() {
        let client = client();
        client.transport().push("eth_chainId", Ok(json!("0x4")));

        assert_eq!(client.network().await.unwrap().0, "rinkeby");
    }

    #[test]
    fn zero_poll_interval_is_raised_to_the_floor() {
        let client = client().with_poll_interval(Duration::ZERO);
        assert_eq!(client.poll_interval(), MIN_POLL_INTERVAL);
    }

    #[tokio::test]
    async fn blank_accounts_are_skipped() {
        let client = client();
        client.transport().push("eth_accounts", Ok(json!(["", "  ", "0xabc"])));

        let accounts = client.accounts().await.unwrap();
        assert_eq!(accounts, vec![WalletAddress("0xabc".to_owned())]);
    }

    #[tokio::test]
    async fn user_rejection_passes_through() {
        let client = client();
        client.transport().push("eth_accounts", Ok(json!(["0xabc"])));
        client.transport().push(
            "eth_sendTransaction",
            Err(ChainError::Rpc {
                code: 4001,
                message: "User denied transaction signature.".to_owned(),
            }),
        );

        let err = client.send_wave("hola").await.unwrap_err();
        assert!(err.is_user_rejection());
        assert_eq!(err.to_string(), "User denied transaction signature.");
    }
}
