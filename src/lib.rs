// Core layer - shared types and configuration
pub mod core;

// Persistence
pub mod database;

// Features layer - time expressions, ledger queries, reminder delivery
pub mod features;

// Inline keyboard components
pub mod message_components;

// Application layer
pub mod commands;

// Max Bot API transport
pub mod transport;

pub use self::core::{BotError, Clock, Config, Feature, RunMode, SystemClock};

pub use commands::{CommandContext, ConversationEngine};
pub use database::Database;
pub use features::ReminderScheduler;
pub use transport::{MaxApiClient, Outbound, Update};
