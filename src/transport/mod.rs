//! # Transport
//!
//! Everything that talks to the Max Bot API: the inbound update model, the
//! outbound effect trait, the HTTP client with its long-poll source, and the
//! webhook endpoint.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add webhook endpoint alongside long polling
//! - 1.0.0: Initial long-poll transport

pub mod max_api;
pub mod outbound;
pub mod update;
pub mod webhook;

pub use max_api::{run_long_poll, MaxApiClient};
pub use outbound::{Attachment, Button, Keyboard, Outbound, OutgoingMessage};
pub use update::{Callback, IncomingMessage, Update};
