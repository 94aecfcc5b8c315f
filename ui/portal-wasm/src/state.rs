//! Global application state.
//!
//! `RefCell`-wrapped `thread_local!` storage (WASM is single-threaded).
//! Never hold a borrow across an `.await`: copy what the call needs out
//! first, then write the result back.

use std::cell::RefCell;
use std::rc::Rc;
use wp_chain_client::RpcChainClient;
use wp_portal_core::{Collage, ConnectionManager, PortalConfig, SubmissionFlow, WavePortal};

use crate::ethereum::BrowserTransport;

pub type Portal = WavePortal<RpcChainClient<BrowserTransport>>;

pub struct AppState {
    pub portal: Rc<Portal>,
    pub manager: ConnectionManager,
    pub collage: Collage,
    pub flow: SubmissionFlow,
    /// Waves are read once the composer first becomes reachable.
    pub waves_requested: bool,
}

impl AppState {
    fn new(portal: Portal, config: PortalConfig) -> Self {
        Self {
            portal: Rc::new(portal),
            manager: ConnectionManager::new(config.clone()),
            collage: Collage::default(),
            flow: SubmissionFlow::new(config),
            waves_requested: false,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(WavePortal::without_wallet(), PortalConfig::default())
    }
}

// ── Thread-local singleton ──

thread_local! {
    static STATE: RefCell<AppState> = RefCell::new(AppState::default());
}

pub fn with<F, R>(f: F) -> R
where
    F: FnOnce(&AppState) -> R,
{
    STATE.with(|s| f(&s.borrow()))
}

pub fn with_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut AppState) -> R,
{
    STATE.with(|s| f(&mut s.borrow_mut()))
}

// ── Convenience accessors ──

pub fn install(portal: Portal, config: PortalConfig) {
    with_mut(|s| *s = AppState::new(portal, config));
}

pub fn portal() -> Rc<Portal> {
    with(|s| s.portal.clone())
}
