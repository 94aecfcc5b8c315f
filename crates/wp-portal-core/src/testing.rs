//! In-memory wallet for unit tests.

use async_trait::async_trait;
use std::sync::Mutex;
use wp_api_types::{NetworkName, TxHash, WalletAddress, WaveRecord};
use wp_chain_client::{ChainClient, ChainError, PendingTx, TxReceipt};

pub(crate) struct MockChain {
    accounts: Vec<WalletAddress>,
    network: Result<String, ChainError>,
    waves: Mutex<Vec<WaveRecord>>,
    read_error: Option<ChainError>,
    send_error: Option<ChainError>,
    sent: Mutex<Vec<String>>,
    confirmations: Mutex<usize>,
    reads: Mutex<usize>,
}

impl Default for MockChain {
    fn default() -> Self {
        Self {
            accounts: Vec::new(),
            network: Ok("rinkeby".to_owned()),
            waves: Mutex::new(Vec::new()),
            read_error: None,
            send_error: None,
            sent: Mutex::new(Vec::new()),
            confirmations: Mutex::new(0),
            reads: Mutex::new(0),
        }
    }
}

impl MockChain {
    pub(crate) fn with_accounts(mut self, accounts: &[&str]) -> Self {
        self.accounts = accounts
            .iter()
            .map(|a| WalletAddress((*a).to_owned()))
            .collect();
        self
    }

    pub(crate) fn with_network(mut self, network: &str) -> Self {
        self.network = Ok(network.to_owned());
        self
    }

    pub(crate) fn failing_network(mut self, err: ChainError) -> Self {
        self.network = Err(err);
        self
    }

    pub(crate) fn with_waves(self, waves: &[(&str, u64, &str)]) -> Self {
        *self.waves.lock().unwrap() = waves
            .iter()
            .map(|(waver, timestamp, message)| WaveRecord {
                waver: WalletAddress((*waver).to_owned()),
                message: (*message).to_owned(),
                timestamp: *timestamp,
            })
            .collect();
        self
    }

    pub(crate) fn failing_reads(mut self, err: ChainError) -> Self {
        self.read_error = Some(err);
        self
    }

    pub(crate) fn failing_sends(mut self, err: ChainError) -> Self {
        self.send_error = Some(err);
        self
    }

    pub(crate) fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub(crate) fn confirmations(&self) -> usize {
        *self.confirmations.lock().unwrap()
    }

    pub(crate) fn reads(&self) -> usize {
        *self.reads.lock().unwrap()
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn request_accounts(&self) -> Result<Vec<WalletAddress>, ChainError> {
        Ok(self.accounts.clone())
    }

    async fn accounts(&self) -> Result<Vec<WalletAddress>, ChainError> {
        Ok(self.accounts.clone())
    }

    async fn network(&self) -> Result<NetworkName, ChainError> {
        self.network.clone().map(NetworkName)
    }

    async fn send_wave(&self, message: &str) -> Result<PendingTx, ChainError> {
        if let Some(err) = &self.send_error {
            return Err(err.clone());
        }
        let sender = self.accounts.first().cloned().ok_or(ChainError::NoAccount)?;
        let mut sent = self.sent.lock().unwrap();
        sent.push(message.to_owned());
        let mut waves = self.waves.lock().unwrap();
        let timestamp = 1_000 + waves.len() as u64;
        waves.push(WaveRecord {
            waver: sender,
            message: message.to_owned(),
            timestamp,
        });
        Ok(PendingTx {
            hash: TxHash(format!("0x{:064x}", sent.len())),
        })
    }

    async fn wait_for_confirmation(&self, pending: &PendingTx) -> Result<TxReceipt, ChainError> {
        *self.confirmations.lock().unwrap() += 1;
        Ok(TxReceipt {
            hash: pending.hash.clone(),
            block_number: Some(1),
            success: true,
            contract_address: None,
        })
    }

    async fn get_waves(&self) -> Result<Vec<WaveRecord>, ChainError> {
        *self.reads.lock().unwrap() += 1;
        if let Some(err) = &self.read_error {
            return Err(err.clone());
        }
        Ok(self.waves.lock().unwrap().clone())
    }

    async fn total_waves(&self) -> Result<u64, ChainError> {
        Ok(self.waves.lock().unwrap().len() as u64)
    }
}
