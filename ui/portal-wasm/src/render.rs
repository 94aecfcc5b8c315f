//! HTML fragments for the dynamic parts of the page.
//!
//! Pure string builders so they can be unit tested off the browser. The DOM
//! side only swaps `innerHTML` and toggles classes.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::fmt::Write as _;
use wp_api_types::{Message, MessageColumns};
use wp_portal_core::presentation::{CARDS, avatar_url, explorer_url, network_badge};
use wp_portal_core::{ComposerFeedback, ConnectionSnapshot, Notification};

/// Badge and avatar link for the header.
pub fn account_html(snapshot: &ConnectionSnapshot) -> String {
    let mut out = String::new();
    if let Some((network, color)) = network_badge(snapshot) {
        let _ = write!(
            out,
            r#"<span class="badge badge-{}">{}</span>"#,
            color.as_str(),
            text(network)
        );
    }
    if let Some(account) = &snapshot.account {
        let _ = write!(
            out,
            r#"<a class="avatar" href="{}" title="View on Etherscan"><img src="{}" alt="profilepic"></a>"#,
            attr(&explorer_url(account)),
            attr(&avatar_url(account)),
        );
    }
    out
}

pub fn cards_html() -> String {
    CARDS
        .iter()
        .map(|(title, body)| {
            format!(
                r#"<div class="card"><h3>{}</h3><p>{}</p></div>"#,
                text(title),
                text(body)
            )
        })
        .collect()
}

pub fn spinner_html() -> &'static str {
    r#"<div class="spinner" role="status"></div>"#
}

/// One column per present key; each wave carries its id for selection.
pub fn collage_html(columns: &MessageColumns) -> String {
    let mut out = String::new();
    for messages in columns.values() {
        out.push_str(r#"<div class="column">"#);
        for message in messages {
            let _ = write!(
                out,
                r#"<div class="wave" data-id="{}">{}</div>"#,
                attr(&message.id),
                text(&message.message)
            );
        }
        out.push_str("</div>");
    }
    out
}

pub fn detail_html(message: &Message) -> String {
    format!(
        r#"<dl class="detail"><dt>From</dt><dd>{}</dd><dt>Date</dt><dd>{}</dd><dt>Message</dt><dd>{}</dd></dl>"#,
        text(&message.address),
        message.date.format("%Y-%m-%d %H:%M:%S UTC"),
        text(&message.message)
    )
}

pub fn alert_html(feedback: &ComposerFeedback) -> String {
    match feedback.alert() {
        Some((severity, title, description)) => format!(
            r#"<div class="alert alert-{}"><strong>{}</strong> {}</div>"#,
            severity.as_str(),
            text(title),
            text(&description)
        ),
        None => String::new(),
    }
}

pub fn toast_html(toast: &Notification) -> String {
    format!(
        r#"<div class="toast toast-{}"><strong>{}</strong><p>{}</p></div>"#,
        toast.severity.as_str(),
        text(&toast.title),
        text(&toast.description)
    )
}
