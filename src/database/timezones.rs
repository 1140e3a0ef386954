//! Per-user timezone descriptors, stored verbatim as the user typed them

use super::document::user_key;
use super::{Database, UserId};
use crate::core::BotError;

#[derive(Clone)]
pub struct UserTimezones {
    db: Database,
}

impl UserTimezones {
    pub(crate) fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn set(&self, user_id: UserId, descriptor: &str) -> Result<(), BotError> {
        let key = user_key(user_id);
        self.db
            .mutate(|doc| {
                doc.user_timezones.insert(key, descriptor.to_string());
                Ok(())
            })
            .await
    }

    pub async fn get(&self, user_id: UserId) -> Option<String> {
        let key = user_key(user_id);
        self.db
            .read(|doc| doc.user_timezones.get(&key).cloned())
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::database::test_support::temp_database;

    #[tokio::test]
    async fn test_set_then_overwrite() {
        let (_dir, db) = temp_database(10).await;
        let tz = db.timezones();
        assert_eq!(tz.get(3).await, None);

        tz.set(3, "Europe/Berlin").await.unwrap();
        assert_eq!(tz.get(3).await.as_deref(), Some("Europe/Berlin"));

        tz.set(3, "UTC-5").await.unwrap();
        assert_eq!(tz.get(3).await.as_deref(), Some("UTC-5"));
        assert_eq!(tz.get(4).await, None);
    }
}
