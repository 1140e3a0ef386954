//! # Time Feature
//!
//! Timezone descriptors and free-text time expressions.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod parser;
pub mod timezone;

pub use parser::{parse_time_expression, TimeParseError};
pub use timezone::{describe, describe_offset, parse_offset, Zone};
