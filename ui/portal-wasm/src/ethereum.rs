//! Injected wallet provider (`window.ethereum`).
//!
//! Requests go through the provider's EIP-1193 `request` method. Account and
//! chain notifications are forwarded as `WalletEvent`s into an unbounded
//! channel that a single local task drains.

use async_trait::async_trait;
use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use js_sys::{Function, Promise, Reflect};
use serde::Serialize;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use wp_api_types::{NetworkName, WalletAddress};
use wp_chain_client::network::parse_quantity;
use wp_chain_client::{ChainError, RpcTransport, WalletEvent, network_name};

#[derive(Clone)]
pub struct BrowserTransport {
    provider: JsValue,
}

impl BrowserTransport {
    /// The injected provider, if the browser has one.
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let provider = Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
        if provider.is_undefined() || provider.is_null() {
            return None;
        }
        Some(Self { provider })
    }

    fn method(&self, name: &str) -> Result<Function, ChainError> {
        Reflect::get(&self.provider, &JsValue::from_str(name))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
            .ok_or_else(|| ChainError::Transport(format!("provider has no {name}()")))
    }

    /// Forward `accountsChanged` / `chainChanged` into a channel.
    ///
    /// The current chain is read once up front and reported with no previous
    /// network, so every later change carries the one before it.
    pub fn subscribe(&self) -> Result<UnboundedReceiver<WalletEvent>, ChainError> {
        let (tx, rx) = unbounded();
        let last = Rc::new(RefCell::new(None::<NetworkName>));
        let on = self.method("on")?;

        {
            let tx = tx.clone();
            let cb = Closure::wrap(Box::new(move |accounts: JsValue| {
                let accounts: Vec<String> =
                    serde_wasm_bindgen::from_value(accounts).unwrap_or_default();
                let accounts = accounts.into_iter().map(WalletAddress).collect();
                let _ = tx.unbounded_send(WalletEvent::AccountsChanged(accounts));
            }) as Box<dyn FnMut(JsValue)>);
            on.call2(&self.provider, &JsValue::from_str("accountsChanged"), cb.as_ref())
                .map_err(js_error)?;
            cb.forget();
        }

        {
            let tx = tx.clone();
            let last = last.clone();
            let cb = Closure::wrap(Box::new(move |chain_id: JsValue| {
                if let Some(new) = chain_id.as_string().as_deref().and_then(chain_to_network) {
                    emit_network(&tx, &last, new);
                }
            }) as Box<dyn FnMut(JsValue)>);
            on.call2(&self.provider, &JsValue::from_str("chainChanged"), cb.as_ref())
                .map_err(js_error)?;
            cb.forget();
        }

        let transport = self.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match transport.request("eth_chainId", json!([])).await {
                Ok(Value::String(raw)) => {
                    if let Some(network) = chain_to_network(&raw) {
                        emit_network(&tx, &last, network);
                    }
                }
                Ok(other) => gloo_console::warn!(format!("eth_chainId returned {other}")),
                Err(err) => gloo_console::warn!(format!("reading chain id failed: {err}")),
            }
        });

        Ok(rx)
    }
}

fn chain_to_network(raw: &str) -> Option<NetworkName> {
    parse_quantity(raw).map(|id| NetworkName(network_name(id).to_owned()))
}

fn emit_network(
    tx: &UnboundedSender<WalletEvent>,
    last: &Rc<RefCell<Option<NetworkName>>>,
    new: NetworkName,
) {
    let old = last.borrow_mut().replace(new.clone());
    if old.as_ref() == Some(&new) {
        return;
    }
    let _ = tx.unbounded_send(WalletEvent::NetworkChanged { new, old });
}

/// Provider errors are plain objects with `code` and `message`.
fn js_error(err: JsValue) -> ChainError {
    let message = Reflect::get(&err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string());
    let code = Reflect::get(&err, &JsValue::from_str("code"))
        .ok()
        .and_then(|c| c.as_f64());
    match (code, message) {
        (Some(code), Some(message)) => ChainError::Rpc {
            code: code as i64,
            message,
        },
        (None, Some(message)) => ChainError::Transport(message),
        _ => ChainError::Transport(format!("{err:?}")),
    }
}

#[async_trait(?Send)]
impl RpcTransport for BrowserTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let args = json!({ "method": method, "params": params })
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|err| ChainError::Decode(err.to_string()))?;

        let promise = self
            .method("request")?
            .call1(&self.provider, &args)
            .map_err(js_error)?;
        let result = JsFuture::from(Promise::from(promise))
            .await
            .map_err(js_error)?;

        if result.is_undefined() || result.is_null() {
            return Ok(Value::Null);
        }
        serde_wasm_bindgen::from_value(result).map_err(|err| ChainError::Decode(err.to_string()))
    }

    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}
