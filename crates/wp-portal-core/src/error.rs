use thiserror::Error;
use wp_chain_client::ChainError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PortalError {
    #[error("Make sure you have a wallet installed!")]
    NoWallet,
    #[error("No authorized account found")]
    NoAccount,
    #[error("Empty values not allowed")]
    EmptyInput,
    #[error("Message is {length} characters long, the limit is {max}")]
    TooLong { length: usize, max: usize },
    #[error("Please, switch to {allowed} network.")]
    WrongNetwork { network: String, allowed: String },
    #[error("A wave is already on its way")]
    Busy,
    #[error(transparent)]
    Provider(ChainError),
}

impl From<ChainError> for PortalError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::NoWallet => PortalError::NoWallet,
            ChainError::NoAccount => PortalError::NoAccount,
            other => PortalError::Provider(other),
        }
    }
}
