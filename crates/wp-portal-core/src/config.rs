pub const NETWORK_ENV: &str = "WAVE_PORTAL_NETWORK";

pub const DEFAULT_ALLOWED_NETWORK: &str = "rinkeby";
pub const MAX_MESSAGE_CHARS: usize = 120;
pub const WARN_MESSAGE_CHARS: usize = 75;

/// Client-side portal settings.
///
/// The character limits are advisory; the contract accepts any length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    pub allowed_network: String,
    pub max_chars: usize,
    pub warn_chars: usize,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            allowed_network: DEFAULT_ALLOWED_NETWORK.to_owned(),
            max_chars: MAX_MESSAGE_CHARS,
            warn_chars: WARN_MESSAGE_CHARS,
        }
    }
}

impl PortalConfig {
    /// Defaults, with the allowed network overridable through
    /// `WAVE_PORTAL_NETWORK`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(network) = std::env::var(NETWORK_ENV) {
            if !network.trim().is_empty() {
                config.allowed_network = network.trim().to_owned();
            }
        }
        config
    }

    pub fn with_allowed_network(mut self, network: impl Into<String>) -> Self {
        self.allowed_network = network.into();
        self
    }

    /// Network name with its first letter capitalised, for user messages.
    pub fn network_label(&self) -> String {
        let mut chars = self.allowed_network.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}
