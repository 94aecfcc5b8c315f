//! Wallet and chain access for the WavePortal contract.
//!
//! `ChainClient` is the seam the portal core is written against. The only
//! production implementation is [`RpcChainClient`], which speaks EIP-1193
//! style JSON-RPC over any [`RpcTransport`] (HTTP on native targets, the
//! injected `window.ethereum` object in the browser).

pub mod abi;
pub mod network;
mod rpc;

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use wp_api_types::{NetworkName, TxHash, WalletAddress, WaveRecord};

pub use network::network_name;
pub use rpc::{MIN_POLL_INTERVAL, RpcChainClient};

/// JSON-RPC error code wallets use when the user rejects a request.
pub const USER_REJECTED_CODE: i64 = 4001;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("Make sure you have a wallet installed!")]
    NoWallet,
    #[error("No authorized account found")]
    NoAccount,
    #[error("{message}")]
    Rpc { code: i64, message: String },
    #[error("transaction {0} reverted")]
    Reverted(TxHash),
    #[error("wallet transport failed: {0}")]
    Transport(String),
    #[error("unexpected wallet response: {0}")]
    Decode(String),
}

impl ChainError {
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, ChainError::Rpc { code, .. } if *code == USER_REJECTED_CODE)
    }
}

/// `Send + Sync` on native targets, nothing in the browser where wallet
/// futures wrap JS promises.
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSend: Send + Sync {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync> MaybeSend for T {}

#[cfg(target_arch = "wasm32")]
pub trait MaybeSend {}
#[cfg(target_arch = "wasm32")]
impl<T> MaybeSend for T {}

/// Handle for a broadcast transaction that may not be mined yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTx {
    pub hash: TxHash,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub hash: TxHash,
    pub block_number: Option<u64>,
    pub success: bool,
    pub contract_address: Option<WalletAddress>,
}

/// Notifications a wallet emits on its own initiative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    AccountsChanged(Vec<WalletAddress>),
    NetworkChanged {
        new: NetworkName,
        old: Option<NetworkName>,
    },
}

/// Raw request channel to a wallet or node.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait RpcTransport: MaybeSend {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ChainError>;

    /// Suspend between receipt polls.
    async fn sleep(&self, duration: Duration);
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait ChainClient: MaybeSend {
    /// Ask the wallet for account access, prompting the user if needed.
    async fn request_accounts(&self) -> Result<Vec<WalletAddress>, ChainError>;
    /// Accounts already authorized, without prompting.
    async fn accounts(&self) -> Result<Vec<WalletAddress>, ChainError>;
    async fn network(&self) -> Result<NetworkName, ChainError>;
    async fn send_wave(&self, message: &str) -> Result<PendingTx, ChainError>;
    async fn wait_for_confirmation(&self, pending: &PendingTx) -> Result<TxReceipt, ChainError>;
    async fn get_waves(&self) -> Result<Vec<WaveRecord>, ChainError>;
    async fn total_waves(&self) -> Result<u64, ChainError>;
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl<C: ChainClient + ?Sized> ChainClient for std::sync::Arc<C> {
    async fn request_accounts(&self) -> Result<Vec<WalletAddress>, ChainError> {
        (**self).request_accounts().await
    }

    async fn accounts(&self) -> Result<Vec<WalletAddress>, ChainError> {
        (**self).accounts().await
    }

    async fn network(&self) -> Result<NetworkName, ChainError> {
        (**self).network().await
    }

    async fn send_wave(&self, message: &str) -> Result<PendingTx, ChainError> {
        (**self).send_wave(message).await
    }

    async fn wait_for_confirmation(&self, pending: &PendingTx) -> Result<TxReceipt, ChainError> {
        (**self).wait_for_confirmation(pending).await
    }

    async fn get_waves(&self) -> Result<Vec<WaveRecord>, ChainError> {
        (**self).get_waves().await
    }

    async fn total_waves(&self) -> Result<u64, ChainError> {
        (**self).total_waves().await
    }
}
