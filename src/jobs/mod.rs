//! Job orchestration: dispatch, status polling and the swarm view.
//!
//! A job has no persisted record here. It is materialized entirely as a
//! `job/<id>` branch carrying a payload file; its state is derived by polling
//! the worker pool's run API.

pub mod dispatch;
pub mod status;
pub mod swarm;

pub use dispatch::{CreatedJob, JobCreator, JobDispatcher, JobOptions};
pub use status::{JobStatusReport, StatusTracker};
pub use swarm::SwarmAggregator;

/// Branch-name prefix identifying job branches. `prefix + id` is a bijection
/// between branch names and job IDs.
pub const JOB_BRANCH_PREFIX: &str = "job/";

/// Branch name for a job ID.
pub fn job_branch(job_id: &str) -> String {
    format!("{JOB_BRANCH_PREFIX}{job_id}")
}

/// Extract the job ID from a branch name, if it is a job branch.
pub fn job_id_from_branch(branch: &str) -> Option<&str> {
    branch.strip_prefix(JOB_BRANCH_PREFIX)
}
