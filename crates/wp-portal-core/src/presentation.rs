//! Copy and links shared by the terminal and browser renderings.

use wp_api_types::WalletAddress;

use crate::ConnectionSnapshot;

pub const CONNECT_LABEL: &str = "Connect a wallet";
pub const SUBMIT_LABEL: &str = "Wave at me!";
pub const COMPOSER_PLACEHOLDER: &str = "Show me some love!";

/// Explanatory cards shown while interaction is not allowed.
pub const CARDS: [(&str, &str); 3] = [
    (
        "Connect your wallet",
        "A wallet will let you sign transactions to send messages over the Ethereum network. \
         Need to have some ETH in order to pay the Gas required (~300K).",
    ),
    (
        "Write",
        "Send me a nice message! \"Hello World\" may be? Do you speak in spanish? \
         What about \"Hola Mundo!\".",
    ),
    (
        "Read",
        "Do not stop participating! Get into the code, send messages, or just read the \
         comments from all around the world!",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeColor {
    Red,
    Green,
}

impl BadgeColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeColor::Red => "red",
            BadgeColor::Green => "green",
        }
    }
}

/// Network badge, shown only once both account and network are known.
pub fn network_badge(snapshot: &ConnectionSnapshot) -> Option<(&str, BadgeColor)> {
    let network = snapshot.network.as_ref()?;
    snapshot.account.as_ref()?;
    let color = if snapshot.network_error {
        BadgeColor::Red
    } else {
        BadgeColor::Green
    };
    Some((network.0.as_str(), color))
}

pub fn explorer_url(account: &WalletAddress) -> String {
    format!("https://etherscan.io/address/{account}")
}

pub fn avatar_url(account: &WalletAddress) -> String {
    format!("https://www.gravatar.com/avatar/{account}?s=40&d=retro")
}
