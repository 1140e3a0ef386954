//! # Reminders Feature
//!
//! Periodic delivery of due reminders, gated by the notifications flag.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 2.0.0: Deliver through the outbound transport with an injected clock
//! - 1.0.0: Initial release

pub mod scheduler;

pub use scheduler::ReminderScheduler;
