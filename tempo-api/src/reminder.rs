/// Background task-reminder dispatcher
///
/// Polls for personal tasks whose `email_reminder` has come due, emails the
/// owner, and clears the reminder so it fires once. Runs inside the API
/// process on a fixed interval and stops on the shared cancellation token.
/// A failed send is logged and left in place; the next tick retries it.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use tempo_shared::email::Mailer;
use tempo_shared::models::task::Task;

/// How often the dispatcher polls for due reminders
const POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Maximum reminders processed per tick
const BATCH_SIZE: i64 = 50;

pub struct ReminderDispatcher {
    db: PgPool,
    mailer: Arc<Mailer>,
    shutdown: CancellationToken,
}

impl ReminderDispatcher {
    pub fn new(db: PgPool, mailer: Arc<Mailer>, shutdown: CancellationToken) -> Self {
        Self {
            db,
            mailer,
            shutdown,
        }
    }

    /// Runs the poll loop until the shutdown token fires
    pub async fn run(self) {
        info!(interval_secs = POLL_INTERVAL.as_secs(), "reminder dispatcher started");
        let mut ticker = tokio::time::interval(POLL_INTERVAL);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.tick().await {
                        error!(error = %e, "reminder tick failed");
                    }
                }
                _ = self.shutdown.cancelled() => {
                    info!("reminder dispatcher stopping");
                    break;
                }
            }
        }
    }

    /// Processes one batch of due reminders
    async fn tick(&self) -> Result<(), sqlx::Error> {
        let due = Task::due_reminders(&self.db, Utc::now(), BATCH_SIZE).await?;
        if due.is_empty() {
            return Ok(());
        }

        debug!(count = due.len(), "processing due reminders");

        for reminder in due {
            let sent = self
                .mailer
                .send_task_reminder(
                    &reminder.user_email,
                    &reminder.user_name,
                    &reminder.title,
                    reminder.email_reminder,
                )
                .await;

            match sent {
                Ok(()) => {
                    // Clear only after a successful send so failures retry
                    Task::clear_reminder(&self.db, reminder.task_id).await?;
                    debug!(task_id = %reminder.task_id, "reminder sent");
                }
                Err(e) => {
                    error!(task_id = %reminder.task_id, error = %e, "reminder send failed");
                }
            }
        }

        Ok(())
    }
}
