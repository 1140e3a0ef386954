//! # Ledger Feature
//!
//! Income/expense history queries for `/cash`.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: true

pub mod period;
pub mod report;

pub use period::{parse_cash_query, CashQuery, RECENT_LIMIT};
pub use report::{format_amount, format_ledger};
