use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tasker_models::reminder::Reminder;
use tasker_recurrence::Recurrence;
use tasker_storage::ReminderStorage;
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{ReminderDeliveryChannel, ReminderNotification};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
    /// Reminders whose recurrence ran out and now have no `next_reminder`.
    pub exhausted: usize,
}

/// Periodically delivers due reminders and moves their `next_reminder`
/// forward.
pub struct ReminderDispatcher {
    reminders: Arc<dyn ReminderStorage>,
    channel: Arc<dyn ReminderDeliveryChannel>,
    period: Duration,
}

impl ReminderDispatcher {
    pub fn new(
        reminders: Arc<dyn ReminderStorage>,
        channel: Arc<dyn ReminderDeliveryChannel>,
        period: Duration,
    ) -> Self {
        Self {
            reminders,
            channel,
            period,
        }
    }

    /// Delivers everything due at `now`. Occurrences missed while the
    /// dispatcher was not running are skipped: the next reminder is the
    /// first occurrence after `now`, not after the one that was due.
    pub async fn run_once(&self, now: DateTime<Utc>) -> anyhow::Result<DispatchReport> {
        let mut report = DispatchReport::default();

        for reminder in self.reminders.get_due(now).await? {
            let due_at = reminder.next_reminder.unwrap_or(now);
            let notification = ReminderNotification::for_reminder(&reminder, due_at);

            match self.channel.deliver(&notification).await {
                Ok(()) => report.delivered += 1,
                Err(error) => {
                    log::warn!(
                        "Failed to deliver reminder {}: {error:#}",
                        reminder.reminder_id
                    );
                    report.failed += 1;
                }
            }

            let next = following_occurrence(&reminder, now);
            if next.is_none() {
                log::info!("Reminder {} has no further occurrences", reminder.reminder_id);
                report.exhausted += 1;
            }
            self.reminders
                .set_next_reminder(reminder.reminder_id, next)
                .await?;
        }

        if report != DispatchReport::default() {
            log::info!(
                "Dispatched reminders: delivered = {}, failed = {}, exhausted = {}",
                report.delivered,
                report.failed,
                report.exhausted
            );
        }

        Ok(report)
    }

    pub async fn run(&self, cancellation_token: CancellationToken) {
        log::info!("Starting reminder dispatcher, period {:?}", self.period);
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancellation_token.cancelled() => {
                    log::info!("Reminder dispatcher shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(error) = self.run_once(Utc::now()).await {
                        log::error!("Reminder dispatch failed: {error:#}");
                    }
                }
            }
        }
    }

    pub fn spawn(self, cancellation_token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(cancellation_token).await })
    }
}

fn following_occurrence(reminder: &Reminder, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match Recurrence::from_reminder(reminder) {
        Ok(recurrence) => recurrence.next_occurrence_after(now),
        Err(error) => {
            log::warn!(
                "Stored reminder {} is no longer valid: {error}",
                reminder.reminder_id
            );
            None
        }
    }
}
