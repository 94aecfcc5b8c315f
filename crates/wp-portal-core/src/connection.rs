//! Wallet connection lifecycle.
//!
//! States: `Disconnected` → `Connecting` → `WrongNetwork` | `Ready`.
//! Wallet notifications and read results are fed in one at a time; each call
//! updates the state and returns the effects the presentation layer has to
//! carry out.

use tracing::{debug, info, warn};
use wp_api_types::{NetworkName, WalletAddress};
use wp_chain_client::{ChainClient, WalletEvent};

use crate::{Notification, PortalConfig, PortalError, WavePortal};

pub const CONNECTION_LOST: &str = "Connection lost: Need an account to continue.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    /// Account known, network read still outstanding.
    Connecting { account: WalletAddress },
    WrongNetwork {
        account: WalletAddress,
        network: NetworkName,
    },
    Ready {
        account: WalletAddress,
        network: NetworkName,
    },
}

impl ConnectionState {
    pub fn account(&self) -> Option<&WalletAddress> {
        match self {
            ConnectionState::Disconnected => None,
            ConnectionState::Connecting { account }
            | ConnectionState::WrongNetwork { account, .. }
            | ConnectionState::Ready { account, .. } => Some(account),
        }
    }

    pub fn network(&self) -> Option<&NetworkName> {
        match self {
            ConnectionState::Disconnected | ConnectionState::Connecting { .. } => None,
            ConnectionState::WrongNetwork { network, .. }
            | ConnectionState::Ready { network, .. } => Some(network),
        }
    }
}

/// Flat view of the state for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionSnapshot {
    pub account: Option<WalletAddress>,
    pub network: Option<NetworkName>,
    pub connected: bool,
    pub network_error: bool,
    pub interaction_allowed: bool,
}

impl ConnectionSnapshot {
    /// Derive the flags from an account and network pair.
    pub fn derive(
        account: Option<WalletAddress>,
        network: Option<NetworkName>,
        allowed_network: &str,
    ) -> Self {
        let account = account.filter(|a| !a.0.is_empty());
        let network = network.filter(|n| !n.0.is_empty());
        let connected = account.is_some() && network.is_some();
        let network_error = network.as_ref().is_some_and(|n| n.0 != allowed_network);
        Self {
            interaction_allowed: connected && !network_error,
            account,
            network,
            connected,
            network_error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEffect {
    Notify(Notification),
    /// Read the active network and feed it to [`ConnectionManager::network_resolved`].
    RefreshNetwork,
    /// Rebuild all state from the wallet, as on a fresh load.
    Reload,
    Render,
}

pub struct ConnectionManager {
    config: PortalConfig,
    state: ConnectionState,
    last_network: Option<NetworkName>,
}

impl ConnectionManager {
    pub fn new(config: PortalConfig) -> Self {
        Self {
            config,
            state: ConnectionState::Disconnected,
            last_network: None,
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    pub fn snapshot(&self) -> ConnectionSnapshot {
        ConnectionSnapshot::derive(
            self.state.account().cloned(),
            self.state.network().cloned(),
            &self.config.allowed_network,
        )
    }

    pub fn interaction_allowed(&self) -> bool {
        self.snapshot().interaction_allowed
    }

    /// Forget everything, ahead of a reload.
    pub fn reset(&mut self) {
        self.state = ConnectionState::Disconnected;
        self.last_network = None;
    }

    /// Apply one wallet notification.
    pub fn apply(&mut self, event: WalletEvent) -> Vec<ConnectionEffect> {
        debug!(?event, "wallet event");
        match event {
            WalletEvent::AccountsChanged(accounts) => match accounts
                .into_iter()
                .find(|account| !account.0.trim().is_empty())
            {
                Some(account) => self.account_found(account),
                None => self.account_lost(),
            },
            WalletEvent::NetworkChanged { new, old } => {
                if old.is_some() && new.0 == self.config.allowed_network {
                    info!("switched onto {}, reloading", new);
                    return vec![ConnectionEffect::Reload];
                }
                self.network_resolved(new)
            }
        }
    }

    /// Result of the silent account read done on load.
    pub fn account_loaded(&mut self, account: Option<WalletAddress>) -> Vec<ConnectionEffect> {
        match account {
            Some(account) => self.account_found(account),
            None => Vec::new(),
        }
    }

    pub fn account_found(&mut self, account: WalletAddress) -> Vec<ConnectionEffect> {
        if account.0.trim().is_empty() {
            debug!("ignoring blank account");
            return Vec::new();
        }
        if self.state.account() == Some(&account) {
            return Vec::new();
        }
        self.state = ConnectionState::Connecting { account };
        vec![ConnectionEffect::RefreshNetwork, ConnectionEffect::Render]
    }

    fn account_lost(&mut self) -> Vec<ConnectionEffect> {
        warn!("wallet reported no accounts");
        self.state = ConnectionState::Disconnected;
        vec![
            ConnectionEffect::Notify(Notification::error(CONNECTION_LOST)),
            ConnectionEffect::Render,
        ]
    }

    pub fn network_resolved(&mut self, network: NetworkName) -> Vec<ConnectionEffect> {
        self.last_network = Some(network.clone());

        let account = match &self.state {
            ConnectionState::Disconnected => return vec![ConnectionEffect::Render],
            ConnectionState::Connecting { account }
            | ConnectionState::WrongNetwork { account, .. }
            | ConnectionState::Ready { account, .. } => account.clone(),
        };

        if network.0 == self.config.allowed_network {
            self.state = ConnectionState::Ready { account, network };
            return vec![ConnectionEffect::Render];
        }

        let already_warned =
            matches!(&self.state, ConnectionState::WrongNetwork { network: n, .. } if *n == network);
        let warning = PortalError::WrongNetwork {
            network: network.0.clone(),
            allowed: self.config.network_label(),
        };
        self.state = ConnectionState::WrongNetwork { account, network };

        let mut effects = Vec::new();
        if !already_warned {
            effects.push(ConnectionEffect::Notify(Notification::from(&warning)));
        }
        effects.push(ConnectionEffect::Render);
        effects
    }

    pub fn network_failed(&mut self, err: &PortalError) -> Vec<ConnectionEffect> {
        warn!("reading network failed: {}", err);
        vec![ConnectionEffect::Notify(Notification::error(err.to_string()))]
    }

    /// Last network the wallet reported, even while disconnected.
    pub fn last_network(&self) -> Option<&NetworkName> {
        self.last_network.as_ref()
    }

    /// Load sequence: silent account read, then the network if an account
    /// is present. Returns the effects still left for the caller.
    pub async fn load<C: ChainClient>(&mut self, portal: &WavePortal<C>) -> Vec<ConnectionEffect> {
        self.reset();
        match portal.current_account().await {
            Ok(account) => {
                let effects = self.account_loaded(account);
                self.run_network_refresh(portal, effects).await
            }
            Err(err) => vec![
                ConnectionEffect::Notify(Notification::from(&err)),
                ConnectionEffect::Render,
            ],
        }
    }

    /// Explicit connect request from the user. A no-op when already connected.
    pub async fn connect<C: ChainClient>(&mut self, portal: &WavePortal<C>) -> Vec<ConnectionEffect> {
        if self.snapshot().connected {
            return Vec::new();
        }
        match portal.connect().await {
            Ok(account) => {
                let effects = self.account_found(account);
                self.run_network_refresh(portal, effects).await
            }
            Err(err) => vec![ConnectionEffect::Notify(Notification::from(&err))],
        }
    }

    pub async fn refresh_network<C: ChainClient>(
        &mut self,
        portal: &WavePortal<C>,
    ) -> Vec<ConnectionEffect> {
        match portal.current_network().await {
            Ok(network) => self.network_resolved(network),
            Err(err) => self.network_failed(&err),
        }
    }

    /// Carry out `RefreshNetwork` effects in place, passing the rest through.
    pub async fn run_network_refresh<C: ChainClient>(
        &mut self,
        portal: &WavePortal<C>,
        effects: Vec<ConnectionEffect>,
    ) -> Vec<ConnectionEffect> {
        let mut remaining = Vec::new();
        for effect in effects {
            match effect {
                ConnectionEffect::RefreshNetwork => {
                    remaining.extend(self.refresh_network(portal).await)
                }
                other => remaining.push(other),
            }
        }
        remaining
    }
}
