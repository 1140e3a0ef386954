//! # Features
//!
//! Domain logic behind the chat commands.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Time expressions, ledger queries and reminder delivery
//! - 1.0.0: Initial feature layout

pub mod ledger;
pub mod reminders;
pub mod time;

pub use ledger::{format_amount, format_ledger, parse_cash_query, CashQuery, RECENT_LIMIT};
pub use reminders::ReminderScheduler;
pub use time::{describe, parse_time_expression, TimeParseError, Zone};
