//! Intent handler trait and infrastructure
//!
//! - **Version**: 2.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.0.0: Ordered text intents instead of named slash commands
//! - 1.0.0: Initial implementation for modular command handling

use anyhow::Result;
use async_trait::async_trait;

use super::context::CommandContext;
use crate::database::UserId;

/// A text message after transport validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub user_id: UserId,
    pub chat_id: Option<i64>,
    /// Trimmed message text
    pub text: String,
}

impl InboundMessage {
    pub fn new(user_id: UserId, text: impl Into<String>) -> Self {
        Self {
            user_id,
            chat_id: None,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The message was consumed; later handlers do not see it
    Handled,
    /// Not this handler's intent; try the next one
    Skipped,
}

/// Trait for intent handlers
///
/// Handlers are tried in registration order and the first one returning
/// [`Outcome::Handled`] wins.
///
/// # Example
///
/// ```ignore
/// pub struct PingHandler;
///
/// #[async_trait]
/// impl IntentHandler for PingHandler {
///     fn name(&self) -> &'static str {
///         "ping"
///     }
///
///     async fn handle(&self, ctx: &CommandContext, message: &InboundMessage) -> Result<Outcome> {
///         if !message.text.eq_ignore_ascii_case("/ping") {
///             return Ok(Outcome::Skipped);
///         }
///         ctx.reply(message.user_id, "pong").await;
///         Ok(Outcome::Handled)
///     }
/// }
/// ```
#[async_trait]
pub trait IntentHandler: Send + Sync {
    /// Stable name used in logs and registry lookups
    fn name(&self) -> &'static str;

    async fn handle(&self, ctx: &CommandContext, message: &InboundMessage) -> Result<Outcome>;
}
