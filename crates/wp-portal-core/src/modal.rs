//! Confirmation and progress modal for a single wave submission.

use uuid::Uuid;
use wp_api_types::Severity;

pub const MODAL_TITLE: &str = "Wave at me";
pub const MODAL_ACTION: &str = "Let's go!";
pub const WALLET_POPUP_INFO: &str =
    "Your wallet will popup. Please, confirm the transaction and do not reload the page.";
pub const RETRY_LABEL: &str = "Retry?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalContent {
    pub title: String,
    pub body: String,
    pub action: String,
}

impl ModalContent {
    /// Confirmation text for sending `message`.
    pub fn confirm_wave(message: &str) -> Self {
        Self {
            title: MODAL_TITLE.to_owned(),
            body: format!(
                "You will have to afford the gas cost to send this wave \"{message}\". Are you sure?"
            ),
            action: MODAL_ACTION.to_owned(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionModal {
    id: Uuid,
    content: ModalContent,
    locked: bool,
    info: Option<(String, Severity)>,
}

impl SubmissionModal {
    pub fn open(content: ModalContent) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            locked: false,
            info: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn content(&self) -> &ModalContent {
        &self.content
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn info(&self) -> Option<(&str, Severity)> {
        self.info.as_ref().map(|(text, severity)| (text.as_str(), *severity))
    }

    pub fn show_info(&mut self, text: impl Into<String>, severity: Severity) {
        self.info = Some((text.into(), severity));
    }

    /// An error is showing, so the action reads as a retry.
    pub fn shows_retry(&self) -> bool {
        matches!(self.info, Some((_, Severity::Error)))
    }

    /// Whether the modal may be dismissed. Refused while a submission is in
    /// flight.
    pub fn can_close(&self) -> bool {
        !self.locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_text_quotes_the_message() {
        let content = ModalContent::confirm_wave("hola");
        assert_eq!(content.title, "Wave at me");
        assert_eq!(
            content.body,
            "You will have to afford the gas cost to send this wave \"hola\". Are you sure?"
        );
        assert_eq!(content.action, "Let's go!");
    }

    #[test]
    fn locked_modal_cannot_close() {
        let mut modal = SubmissionModal::open(ModalContent::confirm_wave("hola"));
        assert!(modal.can_close());

        modal.lock();
        assert!(!modal.can_close());

        modal.unlock();
        assert!(modal.can_close());
    }

    #[test]
    fn error_info_turns_on_retry() {
        let mut modal = SubmissionModal::open(ModalContent::confirm_wave("hola"));
        modal.show_info(WALLET_POPUP_INFO, Severity::Info);
        assert!(!modal.shows_retry());

        modal.show_info("User denied transaction signature.", Severity::Error);
        assert!(modal.shows_retry());
        assert_eq!(
            modal.info(),
            Some(("User denied transaction signature.", Severity::Error))
        );
    }

    #[test]
    fn each_modal_gets_its_own_id() {
        let a = SubmissionModal::open(ModalContent::confirm_wave("a"));
        let b = SubmissionModal::open(ModalContent::confirm_wave("a"));
        assert_ne!(a.id(), b.id());
    }
}
