//! Wave Portal browser frontend.
//!
//! Rust + WASM page over the injected wallet. `render` builds HTML fragments
//! and compiles everywhere; the DOM and wallet modules only exist on wasm32.

pub mod render;

#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod ethereum;
#[cfg(target_arch = "wasm32")]
pub mod events;
#[cfg(target_arch = "wasm32")]
pub mod portal_ops;
#[cfg(target_arch = "wasm32")]
pub mod state;

#[cfg(target_arch = "wasm32")]
mod entry {
    use alloy_primitives::Address;
    use wasm_bindgen::prelude::*;
    use wp_chain_client::RpcChainClient;
    use wp_chain_client::abi::DEFAULT_CONTRACT_ADDRESS;
    use wp_portal_core::{PortalConfig, WavePortal};

    use crate::ethereum::BrowserTransport;
    use crate::{dom, events, portal_ops, render, state};

    /// WASM entry point, called when the module is instantiated.
    #[wasm_bindgen(start)]
    pub async fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        init().await
    }

    async fn init() -> Result<(), JsValue> {
        let els = dom::Elements::bind()?;
        let config = PortalConfig::default();

        let contract: Address = DEFAULT_CONTRACT_ADDRESS
            .parse()
            .map_err(|err| JsValue::from_str(&format!("bad contract address: {err}")))?;

        match BrowserTransport::detect() {
            Some(transport) => {
                let wallet_events = transport
                    .subscribe()
                    .map_err(|err| JsValue::from_str(&err.to_string()));
                state::install(
                    WavePortal::new(RpcChainClient::new(transport, contract)),
                    config,
                );
                match wallet_events {
                    Ok(rx) => events::listen_wallet(&els, rx),
                    Err(err) => gloo_console::warn!(err),
                }
            }
            None => {
                gloo_console::warn!("no injected wallet found");
                state::install(WavePortal::without_wallet(), config);
            }
        }

        dom::set_inner_html(&els.cards, &render::cards_html());
        events::bind_events(&els);
        portal_ops::render_composer(&els);
        portal_ops::render_modal(&els);
        portal_ops::load(&els).await;

        Ok(())
    }
}
