//! Contract facade: the portal's view of the wallet and the WavePortal
//! contract.

use tracing::{debug, info};
use wp_api_types::{Message, MessageColumns, NetworkName, WalletAddress};
use wp_chain_client::{ChainClient, TxReceipt};

use crate::columns::to_columns;
use crate::PortalError;

/// Owns the wallet connection handle. A portal built with
/// [`WavePortal::without_wallet`] fails every operation with
/// [`PortalError::NoWallet`].
pub struct WavePortal<C> {
    client: Option<C>,
}

impl<C: ChainClient> WavePortal<C> {
    pub fn new(client: C) -> Self {
        Self {
            client: Some(client),
        }
    }

    pub fn without_wallet() -> Self {
        Self { client: None }
    }

    pub fn has_wallet(&self) -> bool {
        self.client.is_some()
    }

    pub fn client(&self) -> Result<&C, PortalError> {
        self.client.as_ref().ok_or(PortalError::NoWallet)
    }

    /// Ask the wallet for account access.
    pub async fn connect(&self) -> Result<WalletAddress, PortalError> {
        let accounts = self.client()?.request_accounts().await?;
        let account = accounts.into_iter().next().ok_or(PortalError::NoAccount)?;
        info!("connected account {}", account);
        Ok(account)
    }

    /// Already authorized account, if any. Never prompts.
    pub async fn current_account(&self) -> Result<Option<WalletAddress>, PortalError> {
        let accounts = self.client()?.accounts().await?;
        Ok(accounts.into_iter().next())
    }

    pub async fn current_network(&self) -> Result<NetworkName, PortalError> {
        Ok(self.client()?.network().await?)
    }

    /// All waves in on-chain order, shaped for display.
    pub async fn messages(&self) -> Result<Vec<Message>, PortalError> {
        let records = self.client()?.get_waves().await?;
        debug!("read {} waves", records.len());
        Ok(records
            .iter()
            .enumerate()
            .map(|(index, record)| Message::from_record(index, record))
            .collect())
    }

    /// All waves, dealt into the collage columns.
    pub async fn list_messages(&self) -> Result<MessageColumns, PortalError> {
        Ok(to_columns(self.messages().await?))
    }

    pub async fn total_waves(&self) -> Result<u64, PortalError> {
        Ok(self.client()?.total_waves().await?)
    }

    /// Send a wave and wait until it is mined.
    pub async fn submit_message(&self, text: &str) -> Result<TxReceipt, PortalError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PortalError::EmptyInput);
        }

        let client = self.client()?;
        let pending = client.send_wave(text).await?;
        let receipt = client.wait_for_confirmation(&pending).await?;
        info!(
            "wave {} confirmed in block {:?}",
            receipt.hash, receipt.block_number
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockChain;
    use wp_chain_client::ChainError;

    #[tokio::test]
    async fn without_wallet_every_operation_fails() {
        let portal = WavePortal::<MockChain>::without_wallet();

        assert_eq!(portal.connect().await, Err(PortalError::NoWallet));
        assert_eq!(portal.current_account().await, Err(PortalError::NoWallet));
        assert_eq!(portal.current_network().await, Err(PortalError::NoWallet));
        assert_eq!(portal.list_messages().await, Err(PortalError::NoWallet));
        assert_eq!(portal.submit_message("hi").await.unwrap_err(), PortalError::NoWallet);
    }

    #[tokio::test]
    async fn connect_without_accounts_is_no_account() {
        let portal = WavePortal::new(MockChain::default());
        assert_eq!(portal.connect().await, Err(PortalError::NoAccount));
    }

    #[tokio::test]
    async fn connect_returns_first_authorized_account() {
        let chain = MockChain::default().with_accounts(&["0xa11ce", "0xb0b"]);
        let portal = WavePortal::new(chain);

        assert_eq!(portal.connect().await.unwrap().0, "0xa11ce");
        assert_eq!(portal.current_account().await.unwrap().unwrap().0, "0xa11ce");
    }

    #[tokio::test]
    async fn blank_submission_never_reaches_the_wallet() {
        let portal = WavePortal::new(MockChain::default().with_accounts(&["0xa11ce"]));

        assert_eq!(portal.submit_message(" ").await.unwrap_err(), PortalError::EmptyInput);
        assert_eq!(portal.submit_message("\n\t").await.unwrap_err(), PortalError::EmptyInput);
        assert!(portal.client().unwrap().sent().is_empty());
    }

    #[tokio::test]
    async fn submission_sends_trimmed_text_and_waits() {
        let portal = WavePortal::new(MockChain::default().with_accounts(&["0xa11ce"]));

        let receipt = portal.submit_message("  hola mundo ").await.unwrap();

        assert!(receipt.success);
        assert_eq!(portal.client().unwrap().sent(), vec!["hola mundo".to_owned()]);
        assert_eq!(portal.client().unwrap().confirmations(), 1);
    }

    #[tokio::test]
    async fn provider_failure_surfaces() {
        let chain = MockChain::default()
            .with_accounts(&["0xa11ce"])
            .failing_sends(ChainError::Rpc {
                code: -32000,
                message: "insufficient funds".to_owned(),
            });
        let portal = WavePortal::new(chain);

        let err = portal.submit_message("hi").await.unwrap_err();
        assert_eq!(err.to_string(), "insufficient funds");
        assert!(matches!(err, PortalError::Provider(_)));
    }

    #[tokio::test]
    async fn list_messages_maps_and_partitions() {
        let chain = MockChain::default().with_waves(&[
            ("0xAA", 1000, "hi"),
            ("0xBB", 1001, "yo"),
            ("0xCC", 1002, "sup"),
            ("0xDD", 1003, "hey"),
            ("0xEE", 1004, "ok"),
        ]);
        let portal = WavePortal::new(chain);

        let columns = portal.list_messages().await.unwrap();

        let first: Vec<_> = columns[&0].iter().map(|m| m.message.as_str()).collect();
        assert_eq!(first, vec!["hi", "ok"]);
        assert_eq!(columns[&0][1].address, "0xEE");
        assert_eq!(columns[&0][1].date.timestamp(), 1004);
    }

    #[tokio::test]
    async fn read_failure_is_returned_not_swallowed() {
        let chain = MockChain::default().failing_reads(ChainError::Transport("boom".to_owned()));
        let portal = WavePortal::new(chain);

        let err = portal.list_messages().await.unwrap_err();
        assert_eq!(
            err,
            PortalError::Provider(ChainError::Transport("boom".to_owned()))
        );
    }
}
