//! Wire types for the hosting platform's git and Actions APIs.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A git ref as returned by `GET /git/ref/heads/{branch}`.
#[derive(Debug, Deserialize)]
pub struct GitRef {
    pub object: GitObject,
}

#[derive(Debug, Deserialize)]
pub struct GitObject {
    pub sha: String,
}

/// A single CI workflow run. Fetched transiently, never cached across polls.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowRun {
    pub id: u64,
    /// Workflow name as shown on the platform.
    pub name: Option<String>,
    pub head_branch: Option<String>,
    /// `queued`, `in_progress` or `completed`.
    pub status: String,
    pub conclusion: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub html_url: String,
}

/// One page of workflow runs.
#[derive(Debug, Default, Deserialize)]
pub struct WorkflowRunsPage {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub workflow_runs: Vec<WorkflowRun>,
}

/// Per-run job/step breakdown from `GET /actions/runs/{id}/jobs`.
#[derive(Debug, Default, Deserialize)]
pub struct RunJobsPage {
    #[serde(default)]
    pub jobs: Vec<RunJob>,
}

#[derive(Debug, Deserialize)]
pub struct RunJob {
    #[serde(default)]
    pub steps: Vec<RunStep>,
}

#[derive(Debug, Deserialize)]
pub struct RunStep {
    pub name: String,
    /// `queued`, `in_progress` or `completed`.
    pub status: String,
}
