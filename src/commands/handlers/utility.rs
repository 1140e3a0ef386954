//! Utility command handlers
//!
//! Handles: help, time, now
//!
//! - **Version**: 2.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.0.0: Plain-text replies; add /time and /now
//! - 1.0.0: Extracted from command_handler.rs

use anyhow::Result;
use async_trait::async_trait;
use log::info;

use crate::commands::context::CommandContext;
use crate::commands::handler::{InboundMessage, IntentHandler, Outcome};

pub const HELP_TEXT: &str = "Available commands:\n\
/help — show this message\n\
/time or /now — show the current time\n\
/note — list your active reminders (notifications on)\n\
/notedel N — delete reminder number N (notifications on)\n\
/cash [day|week|month|year|dd-mm-yy|dd-mm-yy - dd-mm-yy] — transaction history (transactions on)\n\
/settz <zone> — set your timezone (e.g. /settz UTC+3 or /settz Europe/Moscow)\n\
/gettz — show your timezone\n\
/main — toggle features (notifications, transactions)\n\n\
Reminders (notifications on):\n\
• 16:30 Feed the cat — in one message\n\
• 16:30 — then send the text as the next message\n\
Time formats: hh:mm | hh:mm dd-mm | hh:mm dd-mm-yyyy\n\n\
Transactions (transactions on):\n\
• +300 Groceries — in one message\n\
• +300 — then send the category as the next message\n\
Use negative amounts for expenses: -200 Taxi";

/// Handler for utility commands: help, time, now
pub struct UtilityHandler;

#[async_trait]
impl IntentHandler for UtilityHandler {
    fn name(&self) -> &'static str {
        "utility"
    }

    async fn handle(&self, ctx: &CommandContext, message: &InboundMessage) -> Result<Outcome> {
        match message.text.to_lowercase().as_str() {
            "/help" => {
                ctx.reply(message.user_id, HELP_TEXT).await;
                Ok(Outcome::Handled)
            }
            "/time" | "/now" => self.handle_time(ctx, message).await,
            _ => Ok(Outcome::Skipped),
        }
    }
}

impl UtilityHandler {
    /// Bare local `HH:MM` in the user's zone
    async fn handle_time(&self, ctx: &CommandContext, message: &InboundMessage) -> Result<Outcome> {
        let zone = ctx.user_zone(message.user_id).await;
        let local = zone.to_local(ctx.now()).format("%H:%M").to_string();
        info!("Local time for user {} is {local}", message.user_id);
        ctx.reply(message.user_id, &local).await;
        Ok(Outcome::Handled)
    }
}
