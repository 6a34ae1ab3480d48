//! Polymorphic action executor.
//!
//! `execute` matches exhaustively over the action kinds so that adding a new
//! kind is a compile-time-checked change. No side effect is retried here;
//! retries, if desired, belong to the originator.

use std::path::Path;
use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tokio::process::Command;

use super::{Action, ActionContext};
use crate::error::ActionError;
use crate::jobs::dispatch::{JobCreator, JobOptions};

/// Executes actions on behalf of the cron scheduler, trigger registry and
/// webhook originators.
pub struct ActionExecutor {
    dispatcher: Arc<dyn JobCreator>,
    http: reqwest::Client,
}

impl ActionExecutor {
    pub fn new(dispatcher: Arc<dyn JobCreator>) -> Self {
        Self {
            dispatcher,
            http: reqwest::Client::new(),
        }
    }

    /// Execute a single action, returning a short outcome description for
    /// logging.
    pub async fn execute(
        &self,
        action: &Action,
        ctx: &ActionContext,
    ) -> Result<String, ActionError> {
        match action {
            Action::Agent {
                job,
                llm_provider,
                llm_model,
            } => {
                let options = JobOptions {
                    llm_provider: llm_provider.clone(),
                    llm_model: llm_model.clone(),
                };
                let created = self.dispatcher.create_job(job, &options).await?;
                Ok(format!("job {}", created.job_id))
            }
            Action::Command { command } => run_command(command, ctx.cwd.as_deref()).await,
            Action::Webhook {
                url,
                method,
                headers,
                vars,
            } => {
                self.call_webhook(url, method.as_deref(), headers, vars, ctx)
                    .await
            }
        }
    }

    async fn call_webhook(
        &self,
        url: &str,
        method: Option<&str>,
        headers: &std::collections::HashMap<String, String>,
        vars: &serde_json::Map<String, serde_json::Value>,
        ctx: &ActionContext,
    ) -> Result<String, ActionError> {
        let method_name = method.unwrap_or("POST").to_uppercase();
        let method = Method::from_bytes(method_name.as_bytes())
            .map_err(|_| ActionError::InvalidMethod(method_name.clone()))?;

        let mut header_map = HeaderMap::new();
        header_map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ActionError::WebhookRequest {
                    url: url.to_string(),
                    reason: format!("invalid header '{name}': {e}"),
                }
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| ActionError::WebhookRequest {
                url: url.to_string(),
                reason: format!("invalid header value: {e}"),
            })?;
            header_map.insert(name, value);
        }

        let mut request = self.http.request(method, url).headers(header_map);
        if method_name != "GET" {
            request = request.json(&webhook_body(vars, ctx.data.as_ref()));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ActionError::WebhookRequest {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ActionError::WebhookStatus {
                method: method_name,
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(format!("{} {} → {}", method_name, url, status.as_u16()))
    }
}

/// Build the JSON body for a non-GET webhook call: the caller's vars plus the
/// optional context blob under `data`.
fn webhook_body(
    vars: &serde_json::Map<String, serde_json::Value>,
    data: Option<&serde_json::Value>,
) -> serde_json::Value {
    let mut body = vars.clone();
    if let Some(data) = data {
        body.insert("data".to_string(), data.clone());
    }
    serde_json::Value::Object(body)
}

/// Run a command line under `sh -c`, waiting for completion with no timeout.
/// Returns trimmed output, preferring stdout and falling back to stderr.
async fn run_command(command: &str, cwd: Option<&Path>) -> Result<String, ActionError> {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", command]);
    if let Some(cwd) = cwd {
        cmd.current_dir(cwd);
    }

    let output = cmd.output().await?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let combined = if stdout.trim().is_empty() {
        stderr.trim().to_string()
    } else {
        stdout.trim().to_string()
    };

    if !output.status.success() {
        return Err(ActionError::CommandFailed {
            code: output.status.code(),
            output: combined,
        });
    }

    Ok(combined)
}
