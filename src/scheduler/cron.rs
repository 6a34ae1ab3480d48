//! Process-lifetime cron scheduler.
//!
//! Entries are validated and registered once at startup; the registered set
//! is fixed until shutdown. Each entry runs in its own task and its failures
//! are logged, never propagated — one failing entry must not affect others.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use cron::Schedule;
use tokio::task::JoinHandle;

use super::table::{CronEntry, parse_schedule};
use crate::actions::{ActionContext, ActionExecutor};

/// An entry that passed validation and got a timer.
#[derive(Debug, Clone)]
pub struct RegisteredCron {
    pub name: String,
    pub schedule: String,
}

/// Owns the registered timers. Constructed once at startup; dropping or
/// calling [`CronScheduler::shutdown`] stops all timers.
pub struct CronScheduler {
    registered: Vec<RegisteredCron>,
    handles: Vec<JoinHandle<()>>,
}

impl CronScheduler {
    /// Validate the table and register a timer per enabled, valid entry.
    ///
    /// Disabled entries are never registered. Entries with an invalid
    /// schedule are logged and skipped, not fatal.
    pub fn start(entries: Vec<CronEntry>, executor: Arc<ActionExecutor>) -> Self {
        let mut registered = Vec::new();
        let mut handles = Vec::new();

        for entry in entries {
            if !entry.enabled {
                tracing::debug!(cron = %entry.name, "skipping disabled cron");
                continue;
            }

            let schedule = match parse_schedule(&entry.schedule) {
                Ok(schedule) => schedule,
                Err(e) => {
                    tracing::error!(
                        cron = %entry.name,
                        "invalid cron schedule '{}': {}",
                        entry.schedule, e
                    );
                    continue;
                }
            };

            tracing::info!(cron = %entry.name, schedule = %entry.schedule, "scheduled cron");
            registered.push(RegisteredCron {
                name: entry.name.clone(),
                schedule: entry.schedule.clone(),
            });
            handles.push(tokio::spawn(run_entry(
                schedule,
                entry,
                Arc::clone(&executor),
            )));
        }

        Self {
            registered,
            handles,
        }
    }

    /// The entries that actually got timers.
    pub fn registered(&self) -> &[RegisteredCron] {
        &self.registered
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    /// Stop all timers.
    pub fn shutdown(self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

impl Drop for CronScheduler {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

async fn run_entry(schedule: Schedule, entry: CronEntry, executor: Arc<ActionExecutor>) {
    loop {
        let Some(next) = schedule.upcoming(Utc).next() else {
            tracing::warn!(cron = %entry.name, "schedule has no future fire times, stopping");
            return;
        };
        let wait = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        tokio::time::sleep(wait).await;
        fire_entry(&executor, &entry).await;
    }
}

/// Run one entry's action, logging the outcome either way.
pub(crate) async fn fire_entry(executor: &ActionExecutor, entry: &CronEntry) {
    tracing::info!(cron = %entry.name, "running cron");
    match executor.execute(&entry.action, &ActionContext::default()).await {
        Ok(outcome) => {
            tracing::info!(cron = %entry.name, %outcome, "cron completed");
        }
        Err(e) => {
            tracing::error!(cron = %entry.name, "cron failed: {e}");
        }
    }
}
