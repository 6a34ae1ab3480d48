//! Swarm status — a paginated, unfiltered view of all CI runs.
//!
//! Unlike the status tracker this is workflow-agnostic and skips the per-run
//! step fetch, which would cost one extra API call per run and not scale to
//! full pages.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::GitHubError;
use crate::github::GitHubClient;
use crate::github::types::WorkflowRun;

/// Fixed page size of the swarm view.
pub const PAGE_SIZE: u32 = 25;

/// One run, summarized for dashboards.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: u64,
    pub branch: Option<String>,
    pub status: String,
    pub conclusion: Option<String>,
    pub workflow_name: Option<String>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub duration_seconds: i64,
    pub html_url: String,
}

/// One page of the swarm view.
#[derive(Debug, Clone, Serialize)]
pub struct SwarmStatus {
    pub runs: Vec<RunSummary>,
    pub has_more: bool,
}

/// Read-only projection over all workflow runs.
pub struct SwarmAggregator {
    github: Arc<GitHubClient>,
}

impl SwarmAggregator {
    pub fn new(github: Arc<GitHubClient>) -> Self {
        Self { github }
    }

    /// Fetch one page of runs across all workflows and branches.
    pub async fn swarm_status(&self, page: u32) -> Result<SwarmStatus, GitHubError> {
        let data = self.github.workflow_runs(None, None, page, PAGE_SIZE).await?;
        let now = Utc::now();

        Ok(SwarmStatus {
            runs: data
                .workflow_runs
                .into_iter()
                .map(|run| summarize(run, now))
                .collect(),
            has_more: has_more(page, data.total_count),
        })
    }
}

fn summarize(run: WorkflowRun, now: DateTime<Utc>) -> RunSummary {
    RunSummary {
        run_id: run.id,
        branch: run.head_branch,
        status: run.status,
        conclusion: run.conclusion,
        workflow_name: run.name,
        started_at: run.created_at,
        updated_at: run.updated_at,
        duration_seconds: (now - run.created_at).num_seconds(),
        html_url: run.html_url,
    }
}

/// More pages exist while the pages seen so far cover fewer runs than the
/// platform reports in total.
fn has_more(page: u32, total_count: u64) -> bool {
    u64::from(page) * u64::from(PAGE_SIZE) < total_count
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn has_more_boundary_at_total_30() {
        assert!(has_more(1, 30));
        assert!(!has_more(2, 30));
        assert!(!has_more(1, 25));
        assert!(has_more(1, 26));
    }

    #[tokio::test]
    async fn swarm_page_is_unfiltered_and_summarized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/acme/swarm/actions/runs")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("per_page".into(), "25".into()),
                mockito::Matcher::UrlEncoded("page".into(), "2".into()),
            ]))
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "total_count": 30,
                    "workflow_runs": [
                        {
                            "id": 11,
                            "name": "Run Job",
                            "head_branch": "job/abc",
                            "status": "completed",
                            "conclusion": "success",
                            "created_at": "2026-08-23T12:00:00Z",
                            "updated_at": "2026-08-23T12:04:00Z",
                            "html_url": "https://github.com/acme/swarm/actions/runs/11",
                        },
                        {
                            "id": 12,
                            "name": "Deploy",
                            "head_branch": "main",
                            "status": "in_progress",
                            "conclusion": null,
                            "created_at": "2026-08-23T12:01:00Z",
                            "updated_at": "2026-08-23T12:01:30Z",
                            "html_url": "https://github.com/acme/swarm/actions/runs/12",
                        },
                    ],
                })
                .to_string(),
            )
            .create_async()
            .await;

        let github = Arc::new(GitHubClient::with_base_url(
            &server.url(),
            "acme",
            "swarm",
            &SecretString::from("t"),
        ));
        let status = SwarmAggregator::new(github).swarm_status(2).await.unwrap();

        assert_eq!(status.runs.len(), 2);
        // No branch filtering in the swarm view.
        assert_eq!(status.runs[1].branch.as_deref(), Some("main"));
        assert_eq!(status.runs[0].conclusion.as_deref(), Some("success"));
        assert!(status.runs[0].duration_seconds > 0);
        // 2 * 25 >= 30, so page 2 is the last one.
        assert!(!status.has_more);
    }
}
