//! Event binding.
//!
//! Wires the UI listeners and drains the wallet notification channel. Async
//! handlers are spawned with `wasm_bindgen_futures::spawn_local`.

use futures::StreamExt;
use futures::channel::mpsc::UnboundedReceiver;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wp_chain_client::WalletEvent;

use crate::dom::Elements;
use crate::portal_ops;
use crate::state;

/// Helper: attach async click handler to an element.
macro_rules! on_click_async {
    ($el:expr, $els:expr, $handler:expr) => {{
        let els = $els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let els2 = els.clone();
            wasm_bindgen_futures::spawn_local(async move {
                $handler(&els2).await;
            });
        }) as Box<dyn FnMut(_)>);
        let _ = $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref());
        cb.forget();
    }};
}

/// Helper: attach sync handler for `$event`.
macro_rules! on_event {
    ($el:expr, $event:expr, $els:expr, $handler:expr) => {{
        let els = $els.clone();
        let cb = Closure::wrap(Box::new(move |ev: web_sys::Event| {
            $handler(&els, ev);
        }) as Box<dyn FnMut(web_sys::Event)>);
        let _ = $el.add_event_listener_with_callback($event, cb.as_ref().unchecked_ref());
        cb.forget();
    }};
}

/// Bind all UI event listeners. Call once after init.
pub fn bind_events(els: &Elements) {
    // ── Header ──
    on_click_async!(els.connect_btn, els, portal_ops::on_connect);

    // ── Composer ──
    on_event!(els.composer, "input", els, |els: &Elements, _| {
        portal_ops::on_input(els)
    });
    on_event!(els.submit_btn, "click", els, |els: &Elements, _| {
        portal_ops::on_open_modal(els)
    });

    // ── Modal ──
    on_click_async!(els.modal_action, els, portal_ops::on_confirm);
    on_event!(els.modal_close, "click", els, |els: &Elements, _| {
        portal_ops::on_close_modal(els)
    });

    // ── Collage (delegated) ──
    on_event!(els.collage, "click", els, |els: &Elements, ev: web_sys::Event| {
        let id = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .and_then(|el| el.closest(".wave").ok().flatten())
            .and_then(|wave| wave.get_attribute("data-id"));
        if let Some(id) = id {
            portal_ops::on_select(els, &id);
        }
    });
    on_event!(els.detail, "click", els, |els: &Elements, _| {
        portal_ops::on_clear_selection(els)
    });
}

/// Apply wallet notifications one at a time, in arrival order.
pub fn listen_wallet(els: &Elements, mut events: UnboundedReceiver<WalletEvent>) {
    let els = els.clone();
    wasm_bindgen_futures::spawn_local(async move {
        while let Some(event) = events.next().await {
            let effects = state::with_mut(|s| s.manager.apply(event));
            portal_ops::run_effects(&els, effects);
        }
        gloo_console::warn!("wallet notifications closed");
    });
}
