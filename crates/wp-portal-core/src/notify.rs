use std::time::Duration;
use wp_api_types::Severity;

use crate::PortalError;

/// How long a toast stays up.
pub const TOAST_DURATION: Duration = Duration::from_secs(5);

/// A transient, user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub duration: Duration,
}

impl Notification {
    pub fn new(title: &str, description: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.to_owned(),
            description: description.into(),
            severity,
            duration: TOAST_DURATION,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self::new("Error", description, Severity::Error)
    }

    pub fn warning(description: impl Into<String>) -> Self {
        Self::new("Warning", description, Severity::Warning)
    }

    pub fn info(description: impl Into<String>) -> Self {
        Self::new("Info", description, Severity::Info)
    }
}

impl From<&PortalError> for Notification {
    fn from(err: &PortalError) -> Self {
        match err {
            PortalError::WrongNetwork { .. } => Notification::warning(err.to_string()),
            _ => Notification::error(err.to_string()),
        }
    }
}
