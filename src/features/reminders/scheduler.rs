use log::{debug, error, info};
use std::sync::Arc;
use std::time::Duration;

use crate::core::{Clock, Feature};
use crate::database::Database;
use crate::transport::Outbound;

/// Background loop that delivers due reminders
///
/// While notifications are switched off, due reminders stay due and are
/// retried on every tick until the flag comes back on.
pub struct ReminderScheduler {
    database: Database,
    outbound: Arc<dyn Outbound>,
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
}

impl ReminderScheduler {
    pub fn new(
        database: Database,
        outbound: Arc<dyn Outbound>,
        clock: Arc<dyn Clock>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            database,
            outbound,
            clock,
            poll_interval,
        }
    }

    pub async fn run(self) {
        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        info!(
            "Reminder scheduler started (interval: {}s)",
            self.poll_interval.as_secs()
        );

        loop {
            interval.tick().await;
            self.tick().await;
        }
    }

    /// One pass over due reminders; returns how many were delivered and marked
    ///
    /// A reminder whose sent mark cannot be stored stays due and is sent
    /// again on a later tick.
    pub async fn tick(&self) -> usize {
        let now = self.clock.now();
        let due = self.database.reminders().due(now).await;
        if due.is_empty() {
            return 0;
        }

        let features = self.database.features();
        let mut delivered = 0;
        for reminder in due {
            if !features.get(Feature::Notifications).await {
                debug!("Notifications off, deferring reminder {}", reminder.id);
                continue;
            }
            self.outbound
                .send_reply(reminder.user_id, &format!("⏰ Reminder: {}", reminder.text), None)
                .await;
            // marked after the attempt, whether or not delivery succeeded
            if let Err(e) = self.database.reminders().mark_sent(&reminder.id).await {
                error!("Failed to mark reminder {} sent: {e}", reminder.id);
                continue;
            }
            info!("Delivered reminder {} to user {}", reminder.id, reminder.user_id);
            delivered += 1;
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedClock;
    use crate::database::test_support::temp_database;
    use crate::transport::outbound::testing::{Effect, RecordingOutbound};
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};

    struct Harness {
        _dir: tempfile::TempDir,
        db: Database,
        clock: Arc<FixedClock>,
        outbound: Arc<RecordingOutbound>,
        scheduler: ReminderScheduler,
    }

    async fn harness() -> Harness {
        let (dir, db) = temp_database(10).await;
        let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()));
        let outbound = Arc::new(RecordingOutbound::default());
        let scheduler = ReminderScheduler::new(
            db.clone(),
            outbound.clone(),
            clock.clone(),
            Duration::from_secs(5),
        );
        Harness {
            _dir: dir,
            db,
            clock,
            outbound,
            scheduler,
        }
    }

    #[tokio::test]
    async fn test_delivers_only_due_reminders() {
        let h = harness().await;
        let now = h.clock.now();
        h.db.reminders().create(1, now - ChronoDuration::minutes(1), "stretch").await.unwrap();
        h.db.reminders().create(1, now + ChronoDuration::hours(1), "later").await.unwrap();

        assert_eq!(h.scheduler.tick().await, 1);
        assert_eq!(
            h.outbound.effects(),
            vec![Effect::Reply {
                user_id: 1,
                text: "⏰ Reminder: stretch".into(),
                attachments: None,
            }]
        );
        let active = h.db.reminders().list_active(1).await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].text, "later");
    }

    #[tokio::test]
    async fn test_disabled_notifications_defer_until_reenabled() {
        let h = harness().await;
        let now = h.clock.now();
        h.db.reminders().create(2, now, "water plants").await.unwrap();
        h.db.features().set(Feature::Notifications, false).await.unwrap();

        for _ in 0..3 {
            assert_eq!(h.scheduler.tick().await, 0);
            h.clock.advance(ChronoDuration::seconds(5));
        }
        assert!(h.outbound.effects().is_empty());
        assert_eq!(h.db.reminders().list_active(2).await.len(), 1);

        h.db.features().set(Feature::Notifications, true).await.unwrap();
        assert_eq!(h.scheduler.tick().await, 1);
        assert_eq!(h.scheduler.tick().await, 0);
        assert_eq!(h.outbound.replies(), vec!["⏰ Reminder: water plants".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_store_is_a_no_op() {
        let h = harness().await;
        assert_eq!(h.scheduler.tick().await, 0);
        assert!(h.outbound.effects().is_empty());
    }

    #[tokio::test]
    async fn test_failed_mark_does_not_stop_the_tick() {
        let h = harness().await;
        let now = h.clock.now();
        h.db.reminders().create(3, now, "first").await.unwrap();
        h.db.reminders().create(3, now, "second").await.unwrap();

        // a non-empty directory where the document lives makes every write fail
        let path = h.db.path().to_path_buf();
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("blocker"), b"").unwrap();

        assert_eq!(h.scheduler.tick().await, 0);
        assert_eq!(
            h.outbound.replies(),
            vec!["⏰ Reminder: first".to_string(), "⏰ Reminder: second".to_string()]
        );
        assert_eq!(h.db.reminders().list_active(3).await.len(), 2);
    }
}
