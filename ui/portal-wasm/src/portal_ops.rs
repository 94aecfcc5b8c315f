//! Portal operations behind each user action and wallet notification.
//!
//! Each handler reads what it needs from `state`, awaits the wallet with no
//! borrow held, then writes the outcome back and re-renders.

use wp_api_types::Severity;
use wp_portal_core::modal::RETRY_LABEL;
use wp_portal_core::{ConnectionEffect, Notification, PortalError};

use crate::dom::{self, Elements};
use crate::render;
use crate::state;

// ── Effects ──

pub fn run_effects(els: &Elements, effects: Vec<ConnectionEffect>) {
    for effect in effects {
        match effect {
            ConnectionEffect::Notify(toast) => notify(els, &toast),
            ConnectionEffect::Render => render_connection(els),
            ConnectionEffect::RefreshNetwork => {
                let els = els.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    refresh_network(&els).await;
                });
            }
            ConnectionEffect::Reload => dom::reload_page(),
        }
    }
}

/// Show a toast and take it down after its duration.
pub fn notify(els: &Elements, toast: &Notification) {
    gloo_console::log!(format!("{}: {}", toast.title, toast.description));
    let Some(el) = dom::create_element("div") else {
        return;
    };
    dom::set_inner_html(&el, &render::toast_html(toast));
    let _ = els.toasts.append_child(&el);

    let duration = toast.duration;
    wasm_bindgen_futures::spawn_local(async move {
        gloo_timers::future::sleep(duration).await;
        el.remove();
    });
}

// ── Connection ──

/// Load sequence: silent account read, then network, then waves.
pub async fn load(els: &Elements) {
    let portal = state::portal();
    let effects = match portal.current_account().await {
        Ok(account) => state::with_mut(|s| s.manager.account_loaded(account)),
        Err(err) => vec![
            ConnectionEffect::Notify(Notification::from(&err)),
            ConnectionEffect::Render,
        ],
    };
    run_effects(els, effects);
}

pub async fn refresh_network(els: &Elements) {
    let portal = state::portal();
    let effects = match portal.current_network().await {
        Ok(network) => state::with_mut(|s| s.manager.network_resolved(network)),
        Err(err) => state::with_mut(|s| s.manager.network_failed(&err)),
    };
    run_effects(els, effects);
}

pub async fn on_connect(els: &Elements) {
    if state::with(|s| s.manager.snapshot().connected) {
        return;
    }
    let portal = state::portal();
    match portal.connect().await {
        Ok(account) => {
            let effects = state::with_mut(|s| s.manager.account_found(account));
            run_effects(els, effects);
        }
        Err(err) => notify(els, &Notification::from(&err)),
    }
}

pub fn render_connection(els: &Elements) {
    let snapshot = state::with(|s| s.manager.snapshot());

    dom::show(&els.connect_btn, !snapshot.connected);
    dom::set_inner_html(&els.account, &render::account_html(&snapshot));
    dom::show(&els.cards, !snapshot.interaction_allowed);
    dom::show(&els.composer_panel, snapshot.interaction_allowed);
    dom::show(&els.collage, snapshot.interaction_allowed);

    let first_time = state::with_mut(|s| {
        let first = snapshot.interaction_allowed && !s.waves_requested;
        s.waves_requested |= first;
        first
    });
    if first_time {
        let els = els.clone();
        wasm_bindgen_futures::spawn_local(async move {
            load_waves(&els).await;
        });
    }
}

// ── Collage ──

pub async fn load_waves(els: &Elements) {
    state::with_mut(|s| s.collage.start_loading());
    render_collage(els);

    let portal = state::portal();
    let result = portal.list_messages().await;
    let toast = state::with_mut(|s| s.collage.finish_loading(result));
    if let Some(toast) = toast {
        notify(els, &toast);
    }
    render_collage(els);
    let _ = els.composer.focus();
}

pub fn render_collage(els: &Elements) {
    let html = state::with(|s| {
        if s.collage.is_loading() {
            render::spinner_html().to_owned()
        } else {
            render::collage_html(s.collage.columns())
        }
    });
    dom::set_inner_html(&els.collage, &html);
    render_detail(els);
}

pub fn on_select(els: &Elements, id: &str) {
    state::with_mut(|s| {
        s.collage.select(id);
    });
    render_detail(els);
}

pub fn on_clear_selection(els: &Elements) {
    state::with_mut(|s| s.collage.clear_selection());
    render_detail(els);
}

fn render_detail(els: &Elements) {
    let html = state::with(|s| s.collage.selected_message().map(render::detail_html));
    dom::show(&els.detail, html.is_some());
    dom::set_inner_html(&els.detail, &html.unwrap_or_default());
}

// ── Composer & modal ──

pub fn on_input(els: &Elements) {
    let text = els.composer.value();
    state::with_mut(|s| s.flow.set_text(text));
    render_composer(els);
}

pub fn render_composer(els: &Elements) {
    let (text, feedback, can_submit) = state::with(|s| {
        (
            s.flow.composer().text().to_owned(),
            s.flow.feedback(),
            s.flow.can_submit(),
        )
    });
    if els.composer.value() != text {
        els.composer.set_value(&text);
    }
    dom::toggle_class(
        &els.composer,
        "invalid",
        feedback.empty_not_allowed || feedback.reached_max,
    );
    dom::set_inner_html(&els.composer_alert, &render::alert_html(&feedback));
    els.submit_btn.set_disabled(!can_submit);
}

pub fn on_open_modal(els: &Elements) {
    let opened = state::with_mut(|s| s.flow.request_confirmation().map(|_| ()));
    match opened {
        Ok(()) => render_modal(els),
        Err(err) => notify(els, &Notification::from(&err)),
    }
}

pub fn on_close_modal(els: &Elements) {
    if state::with_mut(|s| s.flow.close_modal()) {
        render_modal(els);
    }
}

pub async fn on_confirm(els: &Elements) {
    let message = match state::with_mut(|s| s.flow.begin_submit()) {
        Ok(message) => message,
        Err(PortalError::Busy) => return,
        Err(err) => {
            notify(els, &Notification::from(&err));
            return;
        }
    };
    render_modal(els);

    let portal = state::portal();
    let outcome = portal.submit_message(&message).await;
    let sent = outcome.is_ok();
    let toast = state::with_mut(|s| s.flow.finish_submit(outcome));

    if let Some(toast) = toast {
        notify(els, &toast);
    }
    render_modal(els);
    render_composer(els);
    if sent {
        load_waves(els).await;
    }
}

pub fn render_modal(els: &Elements) {
    let view = state::with(|s| {
        s.flow.modal().map(|modal| {
            (
                modal.content().clone(),
                modal.is_locked(),
                modal.info().map(|(text, severity)| (text.to_owned(), severity)),
                modal.shows_retry(),
            )
        })
    });

    let Some((content, locked, info, retry)) = view else {
        dom::toggle_class(&els.modal, "open", false);
        return;
    };

    dom::toggle_class(&els.modal, "open", true);
    dom::set_text(&els.modal_title, &content.title);
    dom::set_text(&els.modal_body, &content.body);
    match info {
        Some((text, severity)) => {
            dom::set_text(&els.modal_info, &text);
            dom::toggle_class(&els.modal_info, "error", severity == Severity::Error);
            dom::show(&els.modal_info, true);
        }
        None => dom::show(&els.modal_info, false),
    }
    let action = if retry { RETRY_LABEL } else { content.action.as_str() };
    els.modal_action.set_text_content(Some(action));
    els.modal_action.set_disabled(locked);
    dom::toggle_class(&els.modal_close, "disabled", locked);
}
