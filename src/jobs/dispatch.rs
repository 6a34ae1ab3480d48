//! Job dispatcher — hands work to the worker pool via a branch.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use super::job_branch;
use crate::error::GitHubError;
use crate::github::GitHubClient;

/// Result of a successful dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedJob {
    pub job_id: String,
    pub branch: String,
}

/// Per-job execution overrides. Keys that are `None` are omitted from the
/// config file so the worker pool defaults apply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobOptions {
    pub llm_provider: Option<String>,
    pub llm_model: Option<String>,
}

impl JobOptions {
    fn to_config_json(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut config = serde_json::Map::new();
        if let Some(ref provider) = self.llm_provider {
            config.insert("llm_provider".to_string(), provider.clone().into());
        }
        if let Some(ref model) = self.llm_model {
            config.insert("llm_model".to_string(), model.clone().into());
        }
        config
    }
}

/// Seam between job originators (executor, webhook receiver) and the real
/// dispatcher, so originators can be tested with spies.
#[async_trait]
pub trait JobCreator: Send + Sync {
    async fn create_job(
        &self,
        description: &str,
        options: &JobOptions,
    ) -> Result<CreatedJob, GitHubError>;
}

/// Creates job branches on the hosting platform.
pub struct JobDispatcher {
    github: Arc<GitHubClient>,
    trunk: String,
}

impl JobDispatcher {
    pub fn new(github: Arc<GitHubClient>, trunk: String) -> Self {
        Self { github, trunk }
    }
}

#[async_trait]
impl JobCreator for JobDispatcher {
    /// Create a job: cut a `job/<id>` branch from the trunk's current commit,
    /// write the payload file, and write the config file if any override is
    /// set.
    ///
    /// The ID is random; no uniqueness check is made against existing
    /// branches — branch creation fails loudly on the (negligible) chance of
    /// a collision. There is no compensating action between branch creation
    /// and the payload write: a failure in between leaves an empty branch
    /// behind, and the error propagates so the caller can log it.
    async fn create_job(
        &self,
        description: &str,
        options: &JobOptions,
    ) -> Result<CreatedJob, GitHubError> {
        let job_id = Uuid::new_v4().to_string();
        let branch = job_branch(&job_id);

        let trunk_sha = self.github.ref_sha(&self.trunk).await?;
        self.github.create_branch(&branch, &trunk_sha).await?;

        self.github
            .put_file(
                &format!("logs/{job_id}/job.md"),
                description,
                &format!("job: {job_id}"),
                &branch,
                None,
            )
            .await?;

        let config = options.to_config_json();
        if !config.is_empty() {
            let content = serde_json::to_string_pretty(&config)
                .map_err(|e| GitHubError::Parse(e.to_string()))?;
            self.github
                .put_file(
                    &format!("logs/{job_id}/job.config.json"),
                    &content,
                    &format!("job config: {job_id}"),
                    &branch,
                    None,
                )
                .await?;
        }

        tracing::info!(job_id = %job_id, branch = %branch, "created job");
        Ok(CreatedJob { job_id, branch })
    }
}
