//! Static schedule tables, read once at process start.

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::actions::Action;
use crate::error::ConfigError;

/// One row of the cron table. The action fields are inlined next to the
/// schedule, so `{ "name": "nightly", "schedule": "0 2 * * *", "job": "..." }`
/// is an agent entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CronEntry {
    pub name: String,
    /// 5-field cron expression.
    pub schedule: String,
    #[serde(flatten)]
    pub action: Action,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// One row of the trigger table. Fires on an external file-change event and
/// fans out to its actions in declared order.
#[derive(Debug, Clone, Deserialize)]
pub struct TriggerEntry {
    pub name: String,
    pub watch_path: String,
    pub actions: Vec<Action>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Load the cron table. A missing file is not an error — it yields an empty
/// table, matching a deployment that has no crons configured.
pub fn load_cron_table(path: &Path) -> Result<Vec<CronEntry>, ConfigError> {
    load_table(path, "cron")
}

/// Load the trigger table, with the same missing-file behavior.
pub fn load_trigger_table(path: &Path) -> Result<Vec<TriggerEntry>, ConfigError> {
    load_table(path, "trigger")
}

fn load_table<T: serde::de::DeserializeOwned>(
    path: &Path,
    kind: &str,
) -> Result<Vec<T>, ConfigError> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "no {kind} table found, skipping");
        return Ok(Vec::new());
    }
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Parse a cron expression into a schedule.
///
/// Tables use the common 5-field form; the `cron` crate wants a seconds
/// field, so 5-field expressions are pinned to second zero.
pub fn parse_schedule(expr: &str) -> Result<cron::Schedule, cron::error::Error> {
    if expr.split_whitespace().count() == 5 {
        cron::Schedule::from_str(&format!("0 {expr}"))
    } else {
        cron::Schedule::from_str(expr)
    }
}
