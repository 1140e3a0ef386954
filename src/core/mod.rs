//! # Core Module
//!
//! Core domain types, configuration, and error handling for the bot.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.7.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Add clock abstraction and domain error taxonomy
//! - 1.1.0: Config file overlay (JSON or YAML) with env overrides
//! - 1.0.0: Initial creation with config module

pub mod clock;
pub mod config;
pub mod error;

// Re-export commonly used items
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, RunMode};
pub use error::{BotError, Feature};
