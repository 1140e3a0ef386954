//! Reminder collection
//!
//! Active reminders are the not-sent ones, in insertion order. Users refer to
//! them by their 1-based position in that order.

use chrono::{DateTime, Utc};
use log::info;
use uuid::Uuid;

use super::{Database, Reminder, StoreDocument, UserId};
use crate::core::BotError;

#[derive(Clone)]
pub struct ReminderRegistry {
    db: Database,
}

impl ReminderRegistry {
    pub(crate) fn new(db: Database) -> Self {
        Self { db }
    }

    /// Append a reminder unless the user is at the active cap
    pub async fn create(
        &self,
        user_id: UserId,
        due_at: DateTime<Utc>,
        text: &str,
    ) -> Result<Reminder, BotError> {
        let limit = self.db.max_reminders_per_user();
        let reminder = self
            .db
            .mutate(|doc| push_reminder(doc, user_id, due_at, text, limit))
            .await?;

        info!(
            "Created reminder {} for user {} due {}",
            reminder.id, user_id, reminder.due_at
        );
        Ok(reminder)
    }

    pub async fn list_active(&self, user_id: UserId) -> Vec<Reminder> {
        self.db
            .read(|doc| {
                doc.reminders
                    .iter()
                    .filter(|r| r.user_id == user_id && !r.sent)
                    .cloned()
                    .collect()
            })
            .await
    }

    /// Remove the `index`th (1-based) active reminder; `false` when out of range
    pub async fn delete_by_visible_index(
        &self,
        user_id: UserId,
        index: usize,
    ) -> Result<bool, BotError> {
        self.db
            .mutate(|doc| {
                let target = index.checked_sub(1).and_then(|i| {
                    doc.reminders
                        .iter()
                        .filter(|r| r.user_id == user_id && !r.sent)
                        .nth(i)
                        .map(|r| r.id.clone())
                });
                match target {
                    Some(id) => {
                        doc.reminders.retain(|r| r.id != id);
                        info!("Deleted reminder {id} for user {user_id}");
                        Ok(true)
                    }
                    None => Ok(false),
                }
            })
            .await
    }

    /// All not-sent reminders due at or before `as_of`, across users
    pub async fn due(&self, as_of: DateTime<Utc>) -> Vec<Reminder> {
        self.db
            .read(|doc| {
                doc.reminders
                    .iter()
                    .filter(|r| !r.sent && r.due_at <= as_of)
                    .cloned()
                    .collect()
            })
            .await
    }

    /// Idempotent; an already-sent or unknown id changes nothing
    pub async fn mark_sent(&self, id: &str) -> Result<(), BotError> {
        self.db
            .mutate(|doc| {
                for reminder in doc.reminders.iter_mut().filter(|r| r.id == id) {
                    reminder.sent = true;
                }
                Ok(())
            })
            .await
    }
}

/// Append to `doc` unless `user_id` already has `limit` active reminders
pub(super) fn push_reminder(
    doc: &mut StoreDocument,
    user_id: UserId,
    due_at: DateTime<Utc>,
    text: &str,
    limit: usize,
) -> Result<Reminder, BotError> {
    let active = doc
        .reminders
        .iter()
        .filter(|r| r.user_id == user_id && !r.sent)
        .count();
    if active >= limit {
        return Err(BotError::LimitExceeded { limit });
    }
    let reminder = Reminder {
        id: Uuid::new_v4().to_string(),
        user_id,
        due_at,
        text: text.to_string(),
        sent: false,
    };
    doc.reminders.push(reminder.clone());
    Ok(reminder)
}
