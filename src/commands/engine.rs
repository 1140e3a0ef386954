//! Conversation engine
//!
//! Entry point for every validated update. Text messages go through the
//! intent registry; keyboard callbacks go to the message component handler.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use log::{debug, info};
use uuid::Uuid;

use super::context::CommandContext;
use super::handler::InboundMessage;
use super::handlers::create_all_handlers;
use super::registry::IntentRegistry;
use crate::message_components::MessageComponentHandler;
use crate::transport::{IncomingMessage, Update};

pub struct ConversationEngine {
    context: CommandContext,
    registry: IntentRegistry,
    components: MessageComponentHandler,
}

impl ConversationEngine {
    pub fn new(context: CommandContext) -> Self {
        let mut registry = IntentRegistry::new();
        for handler in create_all_handlers() {
            registry.register(handler);
        }
        info!(
            "Registered {} intent handlers: {}",
            registry.len(),
            registry.names().join(" > ")
        );
        let components = MessageComponentHandler::new(context.clone());
        Self {
            context,
            registry,
            components,
        }
    }

    pub async fn handle_update(&self, update: Update) -> Result<()> {
        let request_id = Uuid::new_v4();
        info!("[{request_id}] 📥 Update received | Kind: {}", update.kind());

        match update {
            Update::MessageCreated { message, .. } => self.handle_message(request_id, &message).await,
            Update::MessageCallback { callback, .. } => self.components.handle_callback(&callback).await,
            Update::Other => {
                debug!("[{request_id}] Ignoring update kind");
                Ok(())
            }
        }
    }

    async fn handle_message(&self, request_id: Uuid, message: &IncomingMessage) -> Result<()> {
        let Some(user_id) = message.user_id() else {
            debug!("[{request_id}] Message without a sender, dropping");
            return Ok(());
        };
        let text = message.text();
        if text.is_empty() {
            debug!("[{request_id}] Message from user {user_id} has no text, dropping");
            return Ok(());
        }

        let inbound = InboundMessage {
            user_id,
            chat_id: message.chat_id(),
            text: text.to_string(),
        };
        info!(
            "[{request_id}] 💬 Message | User: {user_id} | Chat: {} | Content: '{}'",
            inbound.chat_id.map_or_else(|| "-".to_string(), |c| c.to_string()),
            text.chars().take(100).collect::<String>()
        );
        match self.registry.dispatch(&self.context, &inbound).await? {
            Some(name) => debug!("[{request_id}] ✅ Handled by {name}"),
            None => debug!("[{request_id}] No intent matched, dropping"),
        }
        Ok(())
    }
}
