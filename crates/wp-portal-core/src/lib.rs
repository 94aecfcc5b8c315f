//! Wave Portal client core.
//!
//! Everything here runs on the caller's task: the facade awaits one wallet
//! call at a time and the state types are plain values the presentation
//! layer owns.

pub mod collage;
pub mod columns;
pub mod composer;
pub mod config;
pub mod connection;
pub mod error;
pub mod facade;
pub mod flow;
pub mod modal;
pub mod notify;
pub mod presentation;

#[cfg(test)]
mod testing;

pub use collage::Collage;
pub use columns::to_columns;
pub use composer::{Composer, ComposerFeedback};
pub use config::PortalConfig;
pub use connection::{ConnectionEffect, ConnectionManager, ConnectionSnapshot, ConnectionState};
pub use error::PortalError;
pub use facade::WavePortal;
pub use flow::SubmissionFlow;
pub use modal::{ModalContent, SubmissionModal};
pub use notify::Notification;
