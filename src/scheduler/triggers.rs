//! Trigger registry — fires declarative entries on external file events.
//!
//! The event source (a repository push, a watcher) is outside this subsystem;
//! callers hand a changed path to [`TriggerRegistry::fire_for_path`]. Each
//! matching entry runs its actions in declared order with the same per-entry
//! isolation the cron scheduler uses: a failing action is logged and the
//! remaining actions still run.

use std::sync::Arc;

use super::table::TriggerEntry;
use crate::actions::{ActionContext, ActionExecutor};

/// Holds the enabled trigger entries for the process lifetime.
pub struct TriggerRegistry {
    entries: Vec<TriggerEntry>,
    executor: Arc<ActionExecutor>,
}

impl TriggerRegistry {
    /// Keep only enabled entries; disabled ones are never consulted.
    pub fn new(entries: Vec<TriggerEntry>, executor: Arc<ActionExecutor>) -> Self {
        let entries: Vec<TriggerEntry> = entries
            .into_iter()
            .filter(|entry| {
                if !entry.enabled {
                    tracing::debug!(trigger = %entry.name, "skipping disabled trigger");
                }
                entry.enabled
            })
            .collect();
        for entry in &entries {
            tracing::info!(trigger = %entry.name, watch_path = %entry.watch_path, "loaded trigger");
        }
        Self { entries, executor }
    }

    pub fn entries(&self) -> &[TriggerEntry] {
        &self.entries
    }

    /// Fire every trigger watching `path`, passing `data` through to webhook
    /// bodies. Returns the number of entries fired.
    pub async fn fire_for_path(&self, path: &str, data: Option<serde_json::Value>) -> usize {
        let ctx = ActionContext {
            cwd: None,
            data,
        };

        let mut fired = 0;
        for entry in &self.entries {
            if !watches(&entry.watch_path, path) {
                continue;
            }
            fired += 1;
            self.run_entry(entry, &ctx).await;
        }
        fired
    }

    async fn run_entry(&self, entry: &TriggerEntry, ctx: &ActionContext) {
        tracing::info!(trigger = %entry.name, "running trigger");
        for (index, action) in entry.actions.iter().enumerate() {
            match self.executor.execute(action, ctx).await {
                Ok(outcome) => {
                    tracing::info!(trigger = %entry.name, action = index, %outcome, "action completed");
                }
                Err(e) => {
                    tracing::error!(trigger = %entry.name, action = index, "action failed: {e}");
                }
            }
        }
    }
}

/// A trigger watches an exact path or any path under it.
fn watches(watch_path: &str, event_path: &str) -> bool {
    match event_path.strip_prefix(watch_path) {
        Some("") => true,
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}
