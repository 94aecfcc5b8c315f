use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Number of columns the message collage is laid out in.
pub const COLUMNS_AMOUNT: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct WalletAddress(pub String);

impl WalletAddress {
    /// Address without its `0x` prefix.
    pub fn bare(&self) -> &str {
        self.0.strip_prefix("0x").unwrap_or(&self.0)
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkName(pub String);

impl fmt::Display for NetworkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A wave as stored by the contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WaveRecord {
    pub waver: WalletAddress,
    pub message: String,
    /// Block timestamp in seconds.
    pub timestamp: u64,
}

/// A wave shaped for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub address: String,
    pub date: DateTime<Utc>,
    pub message: String,
}

impl Message {
    /// Timestamps past chrono's range are clamped to the latest representable
    /// date rather than wrapping to the epoch.
    pub fn from_record(index: usize, record: &WaveRecord) -> Self {
        let seconds = i64::try_from(record.timestamp).unwrap_or(i64::MAX);
        Self {
            id: display_id(&record.waver, record.timestamp, index),
            address: record.waver.0.clone(),
            date: DateTime::from_timestamp(seconds, 0).unwrap_or(DateTime::<Utc>::MAX_UTC),
            message: record.message.clone(),
        }
    }
}

/// Display key: bare sender address, timestamp, and on-chain position.
///
/// The position keeps two waves sent by the same account in one block apart.
pub fn display_id(address: &WalletAddress, timestamp: u64, index: usize) -> String {
    format!("{}{}-{}", address.bare(), timestamp, index)
}

/// Messages grouped by collage column. Empty columns are absent.
pub type MessageColumns = BTreeMap<usize, Vec<Message>>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}
