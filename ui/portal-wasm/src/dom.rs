//! DOM element bindings.
//!
//! All fields are resolved once at startup. Markup lives in `index.html`.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement};

// ── Helpers ──

pub fn window() -> Option<web_sys::Window> {
    web_sys::window()
}

fn doc() -> Option<Document> {
    window()?.document()
}

pub fn by_id(id: &str) -> Option<Element> {
    doc()?.get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn create_element(tag: &str) -> Option<Element> {
    doc()?.create_element(tag).ok()
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn set_inner_html(el: &Element, html: &str) {
    el.set_inner_html(html);
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn show(el: &Element, visible: bool) {
    toggle_class(el, "hidden", !visible);
}

pub fn reload_page() {
    if let Some(window) = window() {
        let _ = window.location().reload();
    }
}

// ── Elements struct ──

/// Every element the portal touches.
/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    // Header
    pub connect_btn: HtmlButtonElement,
    pub account: Element,

    // Landing cards / composer
    pub cards: Element,
    pub composer_panel: Element,
    pub composer: HtmlInputElement,
    pub composer_alert: Element,
    pub submit_btn: HtmlButtonElement,

    // Collage
    pub collage: Element,
    pub detail: Element,

    // Modal
    pub modal: Element,
    pub modal_title: Element,
    pub modal_body: Element,
    pub modal_info: Element,
    pub modal_action: HtmlButtonElement,
    pub modal_close: HtmlElement,

    // Toasts
    pub toasts: Element,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_typed {
    ($ty:ty, $id:expr) => {
        by_id_typed::<$ty>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

impl Elements {
    pub fn bind() -> Result<Self, JsValue> {
        Ok(Self {
            connect_btn: get_typed!(HtmlButtonElement, "connectBtn"),
            account: get_el!("account"),

            cards: get_el!("cards"),
            composer_panel: get_el!("composerPanel"),
            composer: get_typed!(HtmlInputElement, "composer"),
            composer_alert: get_el!("composerAlert"),
            submit_btn: get_typed!(HtmlButtonElement, "submitBtn"),

            collage: get_el!("collage"),
            detail: get_el!("detail"),

            modal: get_el!("modal"),
            modal_title: get_el!("modalTitle"),
            modal_body: get_el!("modalBody"),
            modal_info: get_el!("modalInfo"),
            modal_action: get_typed!(HtmlButtonElement, "modalAction"),
            modal_close: get_typed!(HtmlElement, "modalClose"),

            toasts: get_el!("toasts"),
        })
    }
}
