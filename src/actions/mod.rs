//! The action sum type shared by cron entries, trigger entries and the
//! webhook originators.
//!
//! An action is exactly one of three executable primitives: an agent job, a
//! local shell command, or an outbound webhook. The serialized form tags the
//! variant with a `type` field; an absent tag means `agent`.

pub mod executor;

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

pub use executor::ActionExecutor;

/// One executable primitive.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "ActionRepr")]
pub enum Action {
    /// Dispatch an autonomous job to the worker pool.
    Agent {
        job: String,
        llm_provider: Option<String>,
        llm_model: Option<String>,
    },
    /// Run a shell command locally and capture its output.
    Command { command: String },
    /// Make an outbound HTTP call.
    Webhook {
        url: String,
        method: Option<String>,
        headers: HashMap<String, String>,
        vars: serde_json::Map<String, serde_json::Value>,
    },
}

/// Raw serialized shape. Fields are a union over all variants so that cron
/// entries can inline them next to `name`/`schedule`/`enabled`.
#[derive(Debug, Deserialize)]
struct ActionRepr {
    #[serde(rename = "type")]
    kind: Option<String>,
    job: Option<String>,
    llm_provider: Option<String>,
    llm_model: Option<String>,
    command: Option<String>,
    url: Option<String>,
    method: Option<String>,
    #[serde(default)]
    headers: HashMap<String, String>,
    #[serde(default)]
    vars: serde_json::Map<String, serde_json::Value>,
}

impl TryFrom<ActionRepr> for Action {
    type Error = String;

    fn try_from(repr: ActionRepr) -> Result<Self, String> {
        match repr.kind.as_deref().unwrap_or("agent") {
            "agent" => Ok(Action::Agent {
                job: repr.job.ok_or("agent action missing 'job'")?,
                llm_provider: repr.llm_provider,
                llm_model: repr.llm_model,
            }),
            "command" => Ok(Action::Command {
                command: repr.command.ok_or("command action missing 'command'")?,
            }),
            "webhook" => Ok(Action::Webhook {
                url: repr.url.ok_or("webhook action missing 'url'")?,
                method: repr.method,
                headers: repr.headers,
                vars: repr.vars,
            }),
            other => Err(format!("unknown action type: {other}")),
        }
    }
}

/// Execution context supplied by the originator.
#[derive(Debug, Clone, Default)]
pub struct ActionContext {
    /// Working directory for `command` actions.
    pub cwd: Option<PathBuf>,
    /// Input blob forwarded in webhook bodies as the `data` key.
    pub data: Option<serde_json::Value>,
}
