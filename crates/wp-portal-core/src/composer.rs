//! Wave composer input and its advisory length feedback.

use wp_api_types::Severity;

use crate::PortalConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComposerFeedback {
    pub empty_not_allowed: bool,
    pub almost_reached_max: bool,
    pub reached_max: bool,
    /// Characters left before the limit, counted on the raw input. Goes
    /// negative past the limit.
    pub remaining: i64,
}

impl ComposerFeedback {
    pub fn blocks_submission(&self) -> bool {
        self.empty_not_allowed || self.reached_max
    }

    /// Alert shown under the composer: severity, title and description.
    pub fn alert(&self) -> Option<(Severity, &'static str, String)> {
        let left = format!("You are allowed to write {} characters more.", self.remaining);
        if self.empty_not_allowed {
            Some((Severity::Error, "You cannot send no waves!", "Be creative!".to_owned()))
        } else if self.reached_max {
            Some((Severity::Error, "Reached limit of characters!", left))
        } else if self.almost_reached_max {
            Some((Severity::Warning, "Reaching limit of characters!", left))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Composer {
    text: String,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn feedback(&self, config: &PortalConfig) -> ComposerFeedback {
        let raw_len = self.text.chars().count();
        let trimmed_len = self.trimmed().chars().count();
        ComposerFeedback {
            empty_not_allowed: raw_len > 0 && trimmed_len == 0,
            almost_reached_max: (config.warn_chars..=config.max_chars).contains(&trimmed_len),
            reached_max: trimmed_len > config.max_chars,
            remaining: config.max_chars as i64 - raw_len as i64,
        }
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self, config: &PortalConfig) -> bool {
        !self.trimmed().is_empty() && !self.feedback(config).blocks_submission()
    }
}
