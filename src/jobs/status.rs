//! Status tracker — reconstructs per-job progress from the worker pool's
//! run/step API.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{JOB_BRANCH_PREFIX, job_branch, job_id_from_branch};
use crate::error::GitHubError;
use crate::github::GitHubClient;
use crate::github::types::WorkflowRun;

/// Progress of one in-flight job.
#[derive(Debug, Clone, Serialize)]
pub struct JobStatus {
    pub job_id: String,
    pub branch: String,
    /// `queued` or `in_progress` (completed runs are not polled).
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub duration_minutes: i64,
    /// Name of the step currently running, if the step detail was available.
    pub current_step: Option<String>,
    pub steps_completed: usize,
    pub steps_total: usize,
    pub run_id: u64,
}

/// Aggregate answer to a status query.
#[derive(Debug, Clone, Serialize)]
pub struct JobStatusReport {
    pub jobs: Vec<JobStatus>,
    pub queued: usize,
    pub running: usize,
}

/// Polls the run API of a fixed workflow and reconstructs job progress.
pub struct StatusTracker {
    github: Arc<GitHubClient>,
    workflow: String,
}

impl StatusTracker {
    pub fn new(github: Arc<GitHubClient>, workflow: String) -> Self {
        Self { github, workflow }
    }

    /// Report progress for all in-flight jobs, or for one job if `job_id` is
    /// given.
    ///
    /// Runs of the job workflow on non-`job/` branches are filtered out. The
    /// per-run step fetch is best-effort: if it fails (the run may not have
    /// materialized steps yet), the run is still reported with no current
    /// step and zero counts rather than dropped.
    pub async fn job_status(&self, job_id: Option<&str>) -> Result<JobStatusReport, GitHubError> {
        let (in_progress, queued) = tokio::try_join!(
            self.github
                .workflow_runs(Some(&self.workflow), Some("in_progress"), 1, 100),
            self.github
                .workflow_runs(Some(&self.workflow), Some("queued"), 1, 100),
        )?;

        let runs = filter_job_runs(
            in_progress
                .workflow_runs
                .into_iter()
                .chain(queued.workflow_runs)
                .collect(),
            job_id,
        );

        let now = Utc::now();
        let jobs =
            futures::future::join_all(runs.iter().map(|run| self.summarize(run, now))).await;

        let running = jobs.iter().filter(|j| j.status == "in_progress").count();
        let queued = jobs.iter().filter(|j| j.status == "queued").count();

        Ok(JobStatusReport {
            jobs,
            queued,
            running,
        })
    }

    async fn summarize(&self, run: &WorkflowRun, now: DateTime<Utc>) -> JobStatus {
        let branch = run.head_branch.clone().unwrap_or_default();
        let job_id = job_id_from_branch(&branch).unwrap_or(&branch).to_string();

        let (current_step, steps_completed, steps_total) =
            match self.github.run_jobs(run.id).await {
                Ok(detail) => match detail.jobs.first() {
                    Some(job) => {
                        let total = job.steps.len();
                        let completed =
                            job.steps.iter().filter(|s| s.status == "completed").count();
                        let current = job
                            .steps
                            .iter()
                            .find(|s| s.status == "in_progress")
                            .map(|s| s.name.clone());
                        (current, completed, total)
                    }
                    None => (None, 0, 0),
                },
                Err(e) => {
                    tracing::debug!(run_id = run.id, "step detail unavailable: {e}");
                    (None, 0, 0)
                }
            };

        JobStatus {
            job_id,
            branch,
            status: run.status.clone(),
            started_at: run.created_at,
            duration_minutes: elapsed_minutes(run.created_at, now),
            current_step,
            steps_completed,
            steps_total,
            run_id: run.id,
        }
    }
}

/// Keep only runs on `job/` branches; narrow to one job if requested.
fn filter_job_runs(runs: Vec<WorkflowRun>, job_id: Option<&str>) -> Vec<WorkflowRun> {
    let wanted = job_id.map(job_branch);
    runs.into_iter()
        .filter(|run| {
            let Some(ref branch) = run.head_branch else {
                return false;
            };
            match &wanted {
                Some(wanted) => branch == wanted,
                None => branch.starts_with(JOB_BRANCH_PREFIX),
            }
        })
        .collect()
}

/// Wall-clock minutes since `started`, rounded to the nearest minute.
fn elapsed_minutes(started: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    ((now - started).num_seconds() as f64 / 60.0).round() as i64
}
