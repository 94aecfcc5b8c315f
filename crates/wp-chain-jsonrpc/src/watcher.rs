//! Polls the wallet for account and network changes.
//!
//! An HTTP endpoint cannot push `accountsChanged` / `chainChanged` the way an
//! injected browser wallet does, so a background task compares successive
//! reads and emits the difference as `WalletEvent`s.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use wp_api_types::{NetworkName, WalletAddress};
use wp_chain_client::{ChainClient, MIN_POLL_INTERVAL, WalletEvent};

const EVENT_BUFFER: usize = 16;

/// Start polling. The task ends on the first tick after the receiver is
/// dropped.
///
/// Account changes are reported only after a first observation; the network
/// is reported on the first read with `old: None`, like ethers' `network`
/// event.
pub fn spawn_watcher<C>(
    client: Arc<C>,
    interval: Duration,
) -> (mpsc::Receiver<WalletEvent>, JoinHandle<()>)
where
    C: ChainClient + 'static,
{
    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    let handle = tokio::spawn(run(client, interval, tx));
    (rx, handle)
}

async fn run<C>(client: Arc<C>, interval: Duration, tx: mpsc::Sender<WalletEvent>)
where
    C: ChainClient + 'static,
{
    let mut last_accounts: Option<Vec<WalletAddress>> = None;
    let mut last_network: Option<NetworkName> = None;
    let mut ticker = tokio::time::interval(interval.max(MIN_POLL_INTERVAL));

    loop {
        ticker.tick().await;
        if tx.is_closed() {
            break;
        }

        match client.accounts().await {
            Ok(accounts) => {
                if last_accounts.as_ref() != Some(&accounts) {
                    let first = last_accounts.is_none();
                    last_accounts = Some(accounts.clone());
                    if !first && tx.send(WalletEvent::AccountsChanged(accounts)).await.is_err() {
                        break;
                    }
                }
            }
            Err(err) => warn!("wallet watcher: reading accounts failed: {}", err),
        }

        match client.network().await {
            Ok(network) => {
                if last_network.as_ref() != Some(&network) {
                    let event = WalletEvent::NetworkChanged {
                        new: network.clone(),
                        old: last_network.replace(network),
                    };
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
            }
            Err(err) => warn!("wallet watcher: reading network failed: {}", err),
        }
    }

    debug!("wallet watcher stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use wp_api_types::WaveRecord;
    use wp_chain_client::{ChainError, PendingTx, TxReceipt};

    /// Replays scripted reads, repeating the last one once exhausted.
    struct Replay {
        accounts: Mutex<VecDeque<Vec<WalletAddress>>>,
        networks: Mutex<VecDeque<&'static str>>,
    }

    fn next<T: Clone>(queue: &Mutex<VecDeque<T>>) -> T {
        let mut queue = queue.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        }
    }

    #[async_trait]
    impl ChainClient for Replay {
        async fn request_accounts(&self) -> Result<Vec<WalletAddress>, ChainError> {
            Ok(next(&self.accounts))
        }

        async fn accounts(&self) -> Result<Vec<WalletAddress>, ChainError> {
            Ok(next(&self.accounts))
        }

        async fn network(&self) -> Result<NetworkName, ChainError> {
            Ok(NetworkName(next(&self.networks).to_owned()))
        }

        async fn send_wave(&self, _message: &str) -> Result<PendingTx, ChainError> {
            unreachable!("watcher never sends")
        }

        async fn wait_for_confirmation(&self, _pending: &PendingTx) -> Result<TxReceipt, ChainError> {
            unreachable!("watcher never sends")
        }

        async fn get_waves(&self) -> Result<Vec<WaveRecord>, ChainError> {
            Ok(Vec::new())
        }

        async fn total_waves(&self) -> Result<u64, ChainError> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn emits_network_first_then_changes() {
        let alice = WalletAddress("0xa11ce".to_owned());
        let client = Arc::new(Replay {
            accounts: Mutex::new(VecDeque::from([vec![alice], Vec::new()])),
            networks: Mutex::new(VecDeque::from(["rinkeby", "rinkeby", "mainnet"])),
        });

        let (mut rx, handle) = spawn_watcher(client, Duration::from_millis(1));

        assert_eq!(
            rx.recv().await,
            Some(WalletEvent::NetworkChanged {
                new: NetworkName("rinkeby".to_owned()),
                old: None,
            })
        );
        assert_eq!(rx.recv().await, Some(WalletEvent::AccountsChanged(Vec::new())));
        assert_eq!(
            rx.recv().await,
            Some(WalletEvent::NetworkChanged {
                new: NetworkName("mainnet".to_owned()),
                old: Some(NetworkName("rinkeby".to_owned())),
            })
        );

        drop(rx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn zero_interval_still_polls() {
        let client = Arc::new(Replay {
            accounts: Mutex::new(VecDeque::from([Vec::new()])),
            networks: Mutex::new(VecDeque::from(["rinkeby"])),
        });

        let (mut rx, handle) = spawn_watcher(client, Duration::ZERO);

        assert_eq!(
            rx.recv().await,
            Some(WalletEvent::NetworkChanged {
                new: NetworkName("rinkeby".to_owned()),
                old: None,
            })
        );

        drop(rx);
        handle.await.unwrap();
    }
}
