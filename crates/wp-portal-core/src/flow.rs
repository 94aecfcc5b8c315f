//! Wave submission: composer → confirmation modal → transaction → refresh.
//!
//! The submit step is split into [`SubmissionFlow::begin_submit`] and
//! [`SubmissionFlow::finish_submit`] so a UI that keeps the flow behind a
//! `RefCell` can release it while the wallet call is pending.
//! [`SubmissionFlow::confirm`] runs the whole step for callers that own the
//! flow outright.

use tracing::{info, warn};
use wp_api_types::{MessageColumns, Severity};
use wp_chain_client::{ChainClient, TxReceipt};

use crate::modal::WALLET_POPUP_INFO;
use crate::{
    Composer, ComposerFeedback, ModalContent, Notification, PortalConfig, PortalError,
    SubmissionModal, WavePortal,
};

#[derive(Debug, Default)]
pub struct SubmissionFlow {
    config: PortalConfig,
    composer: Composer,
    modal: Option<SubmissionModal>,
    pending: Option<String>,
}

impl SubmissionFlow {
    pub fn new(config: PortalConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.composer.set_text(text);
    }

    pub fn feedback(&self) -> ComposerFeedback {
        self.composer.feedback(&self.config)
    }

    pub fn can_submit(&self) -> bool {
        self.composer.can_submit(&self.config)
    }

    pub fn modal(&self) -> Option<&SubmissionModal> {
        self.modal.as_ref()
    }

    pub fn is_locked(&self) -> bool {
        self.modal.as_ref().is_some_and(SubmissionModal::is_locked)
    }

    /// Open the confirmation modal for the current composer text.
    pub fn request_confirmation(&mut self) -> Result<&SubmissionModal, PortalError> {
        if self.is_locked() {
            return Err(PortalError::Busy);
        }
        let message = self.composer.trimmed().to_owned();
        if message.is_empty() {
            return Err(PortalError::EmptyInput);
        }

        let modal = SubmissionModal::open(ModalContent::confirm_wave(&message));
        self.pending = Some(message);
        Ok(self.modal.insert(modal))
    }

    /// Dismiss the modal. Returns `false` and keeps it open while locked.
    pub fn close_modal(&mut self) -> bool {
        match &self.modal {
            Some(modal) if !modal.can_close() => false,
            _ => {
                self.modal = None;
                self.pending = None;
                true
            }
        }
    }

    /// Lock the modal and hand out the text to send.
    pub fn begin_submit(&mut self) -> Result<String, PortalError> {
        let modal = self.modal.as_mut().ok_or(PortalError::EmptyInput)?;
        if modal.is_locked() {
            warn!("wave submission already in flight");
            return Err(PortalError::Busy);
        }
        let message = self.pending.clone().ok_or(PortalError::EmptyInput)?;

        modal.lock();
        modal.show_info(WALLET_POPUP_INFO, Severity::Info);
        Ok(message)
    }

    /// Apply the outcome of the transaction. On failure the modal stays open
    /// with the error and a notification is returned for the toast.
    pub fn finish_submit(
        &mut self,
        outcome: Result<TxReceipt, PortalError>,
    ) -> Option<Notification> {
        match outcome {
            Ok(receipt) => {
                info!("wave {} sent", receipt.hash);
                self.composer.clear();
                if let Some(modal) = self.modal.as_mut() {
                    modal.unlock();
                }
                self.close_modal();
                None
            }
            Err(err) => {
                warn!("wave failed: {}", err);
                if let Some(modal) = self.modal.as_mut() {
                    modal.show_info(err.to_string(), Severity::Error);
                    modal.unlock();
                }
                Some(Notification::from(&err))
            }
        }
    }

    /// Send the confirmed wave and, once mined, read the messages again.
    pub async fn confirm<C: ChainClient>(
        &mut self,
        portal: &WavePortal<C>,
    ) -> Result<MessageColumns, PortalError> {
        let message = self.begin_submit()?;
        let outcome = portal.submit_message(&message).await;
        let failure = outcome.as_ref().err().cloned();
        self.finish_submit(outcome);
        match failure {
            Some(err) => Err(err),
            None => portal.list_messages().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockChain;
    use wp_chain_client::ChainError;

    fn portal() -> WavePortal<MockChain> {
        WavePortal::new(MockChain::default().with_accounts(&["0xa11ce"]))
    }

    fn flow_with(text: &str) -> SubmissionFlow {
        let mut flow = SubmissionFlow::new(PortalConfig::default());
        flow.set_text(text);
        flow
    }

    #[test]
    fn confirmation_uses_trimmed_text() {
        let mut flow = flow_with("  hola  ");
        let modal = flow.request_confirmation().unwrap();
        assert!(modal.content().body.contains("\"hola\""));
        assert!(!modal.is_locked());
    }

    #[test]
    fn blank_text_never_opens_the_modal() {
        let mut flow = flow_with("   ");
        assert_eq!(flow.request_confirmation().unwrap_err(), PortalError::EmptyInput);
        assert!(flow.modal().is_none());
    }

    #[test]
    fn second_begin_is_refused_while_locked() {
        let mut flow = flow_with("hola");
        flow.request_confirmation().unwrap();

        assert_eq!(flow.begin_submit().unwrap(), "hola");
        assert_eq!(flow.begin_submit().unwrap_err(), PortalError::Busy);
        assert_eq!(flow.request_confirmation().unwrap_err(), PortalError::Busy);
        assert!(!flow.close_modal());

        let modal = flow.modal().unwrap();
        assert_eq!(modal.info(), Some((WALLET_POPUP_INFO, Severity::Info)));
    }

    #[test]
    fn failure_unlocks_and_offers_retry() {
        let mut flow = flow_with("hola");
        flow.request_confirmation().unwrap();
        flow.begin_submit().unwrap();

        let toast = flow
            .finish_submit(Err(PortalError::Provider(ChainError::Rpc {
                code: 4001,
                message: "User denied transaction signature.".to_owned(),
            })))
            .unwrap();

        assert_eq!(toast.title, "Error");
        let modal = flow.modal().unwrap();
        assert!(!modal.is_locked());
        assert!(modal.shows_retry());
        assert_eq!(flow.composer().text(), "hola");
        assert!(flow.close_modal());
    }

    #[tokio::test]
    async fn confirm_sends_clears_and_refreshes() {
        let portal = portal();
        let mut flow = flow_with(" hola ");
        flow.request_confirmation().unwrap();

        let columns = flow.confirm(&portal).await.unwrap();

        assert_eq!(portal.client().unwrap().sent(), vec!["hola".to_owned()]);
        assert_eq!(columns[&0][0].message, "hola");
        assert_eq!(portal.client().unwrap().reads(), 1);
        assert!(flow.modal().is_none());
        assert_eq!(flow.composer().text(), "");
    }

    #[tokio::test]
    async fn failed_confirm_skips_the_refresh() {
        let portal = WavePortal::new(
            MockChain::default()
                .with_accounts(&["0xa11ce"])
                .failing_sends(ChainError::Transport("offline".to_owned())),
        );
        let mut flow = flow_with("hola");
        flow.request_confirmation().unwrap();

        let err = flow.confirm(&portal).await.unwrap_err();

        assert!(matches!(err, PortalError::Provider(_)));
        assert_eq!(portal.client().unwrap().reads(), 0);
        assert!(!flow.is_locked());
        assert!(flow.modal().unwrap().shows_retry());
    }
}
