//! Shared context for intent handlers
//!
//! - **Version**: 2.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.0.0: Carry store, outbound transport, clock and default timezone
//! - 1.0.0: Initial implementation with core shared state

use chrono::{DateTime, Utc};
use log::warn;
use std::sync::Arc;

use crate::core::{BotError, Clock, Feature};
use crate::database::{Database, UserId};
use crate::features::time::Zone;
use crate::transport::{Attachment, Outbound};

/// Shared context for all intent handlers
///
/// Contains the services every handler needs:
/// - Database for persistence
/// - Outbound transport for replies
/// - Clock for "now"
/// - The process-wide default timezone descriptor
#[derive(Clone)]
pub struct CommandContext {
    pub database: Database,
    pub outbound: Arc<dyn Outbound>,
    pub clock: Arc<dyn Clock>,
    pub default_timezone: String,
}

impl CommandContext {
    pub fn new(
        database: Database,
        outbound: Arc<dyn Outbound>,
        clock: Arc<dyn Clock>,
        default_timezone: String,
    ) -> Self {
        Self {
            database,
            outbound,
            clock,
            default_timezone,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// The user's stored descriptor, or the default
    pub async fn timezone_descriptor(&self, user_id: UserId) -> String {
        self.database
            .timezones()
            .get(user_id)
            .await
            .unwrap_or_else(|| self.default_timezone.clone())
    }

    /// The user's resolved zone; an unresolvable descriptor falls back to UTC
    pub async fn user_zone(&self, user_id: UserId) -> Zone {
        let descriptor = self.timezone_descriptor(user_id).await;
        Zone::parse(&descriptor).unwrap_or_else(|e| {
            warn!("User {user_id} timezone '{descriptor}' unusable ({e}), using UTC");
            Zone::utc()
        })
    }

    pub async fn feature_enabled(&self, feature: Feature) -> bool {
        self.database.features().get(feature).await
    }

    pub async fn reply(&self, user_id: UserId, text: &str) {
        self.outbound.send_reply(user_id, text, None).await;
    }

    pub async fn reply_with(&self, user_id: UserId, text: &str, attachments: Vec<Attachment>) {
        self.outbound.send_reply(user_id, text, Some(attachments)).await;
    }

    /// Reply with the disabled notice for `feature`
    pub async fn reply_disabled(&self, user_id: UserId, feature: Feature) {
        self.reply(user_id, &disabled_notice(feature)).await;
    }
}

pub fn disabled_notice(feature: Feature) -> String {
    match feature {
        Feature::Notifications => "🔕 Notifications are disabled".to_string(),
        Feature::Transactions => "💸 Transactions are disabled".to_string(),
    }
}

/// User-facing reply for a domain error
pub fn error_reply(error: &BotError) -> String {
    match error {
        BotError::LimitExceeded { limit } => format!("❌ Reminder limit reached ({limit})"),
        BotError::NotFound => "Not found".to_string(),
        BotError::FeatureDisabled(feature) => disabled_notice(*feature),
        BotError::InvalidFormat(detail) => format!("❌ Invalid format: {detail}"),
        BotError::Storage(_) | BotError::Serialization(_) => {
            "⚠️ Something went wrong, please try again".to_string()
        }
    }
}
