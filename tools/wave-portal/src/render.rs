//! Plain-text rendering of portal state.

use std::fmt::Write as _;
use wp_api_types::{COLUMNS_AMOUNT, Message, MessageColumns, Severity};
use wp_portal_core::{
    ComposerFeedback, ConnectionSnapshot, Notification, PortalConfig, SubmissionModal,
};

use wp_portal_core::modal::RETRY_LABEL;
use wp_portal_core::presentation::{CARDS, network_badge};

pub fn notification(toast: &Notification) {
    let line = format!(
        "[{}] {}: {}",
        toast.severity.as_str(),
        toast.title,
        printable(&toast.description)
    );
    match toast.severity {
        Severity::Error | Severity::Warning => eprintln!("{line}"),
        Severity::Info | Severity::Success => println!("{line}"),
    }
}

pub fn status(snapshot: &ConnectionSnapshot, config: &PortalConfig) -> String {
    let mut out = String::new();
    match (&snapshot.account, &snapshot.network) {
        (None, _) => {
            let _ = writeln!(out, "wallet:  not connected (run `wave-portal connect`)");
        }
        (Some(account), None) => {
            let _ = writeln!(out, "account: {account}");
            let _ = writeln!(out, "network: resolving...");
        }
        (Some(account), Some(_)) => {
            let _ = writeln!(out, "account: {account}");
        }
    }
    if let Some((network, color)) = network_badge(snapshot) {
        let _ = writeln!(out, "network: {network} [{}]", color.as_str());
    }
    if snapshot.interaction_allowed {
        let _ = writeln!(out, "ready to wave on {}", config.allowed_network);
    } else {
        for (title, body) in CARDS {
            let _ = writeln!(out, "* {title}: {body}");
        }
    }
    out
}

/// Columns side by side, one wave per cell, truncated to `width`.
pub fn columns(columns: &MessageColumns, width: usize) -> String {
    if columns.is_empty() {
        return "no waves yet\n".to_owned();
    }

    let rows = columns.values().map(Vec::len).max().unwrap_or(0);
    let mut out = String::new();
    for row in 0..rows {
        for line in 0..2 {
            let cells: Vec<String> = (0..COLUMNS_AMOUNT)
                .map(|col| {
                    let text = columns
                        .get(&col)
                        .and_then(|messages| messages.get(row))
                        .map(|m| match line {
                            0 => printable(&m.message),
                            _ => format!("#{}", printable(&m.id)),
                        })
                        .unwrap_or_default();
                    fit(&text, width)
                })
                .collect();
            let _ = writeln!(out, "{}", cells.join(" | ").trim_end());
        }
        let _ = writeln!(out);
    }
    out
}

pub fn detail(message: &Message) -> String {
    format!(
        "from:    {}\ndate:    {}\nmessage: {}\n",
        printable(&message.address),
        message.date.format("%Y-%m-%d %H:%M:%S UTC"),
        printable(&message.message)
    )
}

pub fn feedback(feedback: &ComposerFeedback) -> Option<String> {
    let (severity, title, description) = feedback.alert()?;
    Some(format!("[{}] {} {}", severity.as_str(), title, description))
}

pub fn modal(modal: &SubmissionModal) -> String {
    let content = modal.content();
    let mut out = format!("== {} ==\n{}\n", content.title, content.body);
    if let Some((info, severity)) = modal.info() {
        let _ = writeln!(out, "[{}] {}", severity.as_str(), info);
    }
    let action = if modal.shows_retry() {
        RETRY_LABEL
    } else {
        content.action.as_str()
    };
    let _ = writeln!(out, "> {action}");
    out
}

/// Chain text with control characters (ESC, CR, ...) swapped for U+FFFD so
/// it cannot drive the terminal.
fn printable(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { char::REPLACEMENT_CHARACTER } else { c })
        .collect()
}

fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{text:<width$}")
    } else {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wp_api_types::{WalletAddress, WaveRecord};
    use wp_portal_core::{ModalContent, to_columns};

    fn message(index: usize, text: &str) -> Message {
        Message::from_record(
            index,
            &WaveRecord {
                waver: WalletAddress("0xAA".to_owned()),
                message: text.to_owned(),
                timestamp: 1_600_000_000,
            },
        )
    }

    #[test]
    fn status_shows_cards_until_interaction_is_allowed() {
        let config = PortalConfig::default();
        let snapshot = ConnectionSnapshot::derive(
            Some(WalletAddress("0xa".to_owned())),
            Some(wp_api_types::NetworkName("mainnet".to_owned())),
            "rinkeby",
        );

        let out = status(&snapshot, &config);
        assert!(out.contains("mainnet [red]"));
        assert!(out.contains("Connect your wallet"));

        let ready = ConnectionSnapshot::derive(
            Some(WalletAddress("0xa".to_owned())),
            Some(wp_api_types::NetworkName("rinkeby".to_owned())),
            "rinkeby",
        );
        let out = status(&ready, &config);
        assert!(out.contains("rinkeby [green]"));
        assert!(!out.contains("Connect your wallet"));
    }

    #[test]
    fn columns_lay_out_side_by_side() {
        let grid = to_columns((0..5).map(|i| message(i, &format!("m{i}"))).collect());
        let out = columns(&grid, 6);
        let first = out.lines().next().unwrap();
        assert_eq!(first, "m0     | m1     | m2     | m3");
        assert!(out.contains("m4"));
    }

    #[test]
    fn long_cells_are_truncated() {
        assert_eq!(fit("abcdefgh", 5), "abcd…");
        assert_eq!(fit("ab", 4), "ab  ");
    }

    #[test]
    fn detail_formats_date_in_utc() {
        let out = detail(&message(0, "hola"));
        assert!(out.contains("2020-09-13 12:26:40 UTC"));
        assert!(out.contains("from:    0xAA"));
    }

    #[test]
    fn failed_modal_offers_retry() {
        let mut m = SubmissionModal::open(ModalContent::confirm_wave("hola"));
        m.show_info("boom", Severity::Error);
        let out = modal(&m);
        assert!(out.contains("[error] boom"));
        assert!(out.ends_with("> Retry?\n"));
    }

    #[test]
    fn control_sequences_in_waves_are_neutralised() {
        let wave = message(0, "hi\u{1b}[2J\rgone");

        let grid = columns(&to_columns(vec![wave.clone()]), 40);
        assert!(!grid.contains('\u{1b}'));
        assert!(!grid.contains('\r'));
        assert!(grid.contains("hi\u{fffd}[2J\u{fffd}gone"));

        let full = detail(&wave);
        assert!(!full.contains('\u{1b}'));
        assert!(full.ends_with("\u{fffd}gone\n"));
    }
}
