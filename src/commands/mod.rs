//! # Command System
//!
//! Text intent resolution for inbound chat messages.
//!
//! - **Version**: 3.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 3.0.0: Ordered intent handlers behind the conversation engine
//! - 2.1.0: Add modular handler infrastructure (handler trait, context, registry)
//! - 1.0.0: Initial reorganization with modular command structure

pub mod context;
pub mod engine;
pub mod handler;
pub mod handlers;
pub mod registry;

pub use context::CommandContext;
pub use engine::ConversationEngine;
pub use handler::{InboundMessage, IntentHandler, Outcome};
pub use registry::IntentRegistry;
