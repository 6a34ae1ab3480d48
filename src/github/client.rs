//! GitHub REST API client.
//!
//! One `reqwest::Client` with default headers carries the bearer token, the
//! `vnd.github+json` accept header and the API version pin on every request.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use super::types::{GitRef, RunJobsPage, WorkflowRunsPage};
use crate::error::GitHubError;

/// Default API base URL. Overridable for tests.
pub const API_BASE: &str = "https://api.github.com";

/// GitHub API client scoped to a single repository.
#[derive(Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
    owner: String,
    repo: String,
}

impl GitHubClient {
    /// Create a client against the public API.
    pub fn new(owner: &str, repo: &str, token: &SecretString) -> Self {
        Self::with_base_url(API_BASE, owner, repo, token)
    }

    /// Create a client against a custom base URL (used by tests).
    pub fn with_base_url(base_url: &str, owner: &str, repo: &str, token: &SecretString) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("jobswarm/0.1"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .expect("token contains invalid header characters");
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
        }
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.base_url, self.owner, self.repo, path
        )
    }

    /// Send a request and parse the JSON body, wrapping non-2xx responses
    /// with their status code and body text.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, GitHubError> {
        let response = self.check(request).await?;
        response
            .json()
            .await
            .map_err(|e| GitHubError::Parse(e.to_string()))
    }

    async fn check(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, GitHubError> {
        let response = request
            .send()
            .await
            .map_err(|e| GitHubError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GitHubError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Resolve the current commit SHA of a branch.
    pub async fn ref_sha(&self, branch: &str) -> Result<String, GitHubError> {
        let url = self.repo_url(&format!("/git/ref/heads/{branch}"));
        let git_ref: GitRef = self.send_json(self.client.get(&url)).await?;
        Ok(git_ref.object.sha)
    }

    /// Create a branch pointed at the given SHA.
    pub async fn create_branch(&self, branch: &str, sha: &str) -> Result<(), GitHubError> {
        let url = self.repo_url("/git/refs");
        let body = serde_json::json!({
            "ref": format!("refs/heads/{branch}"),
            "sha": sha,
        });
        self.check(self.client.post(&url).json(&body)).await?;
        Ok(())
    }

    /// Create or update a file on a branch via the contents API.
    ///
    /// `sha` is required by the platform when replacing an existing file and
    /// must be absent when creating a new one.
    pub async fn put_file(
        &self,
        path: &str,
        content: &str,
        message: &str,
        branch: &str,
        sha: Option<&str>,
    ) -> Result<(), GitHubError> {
        let url = self.repo_url(&format!("/contents/{path}"));
        let mut body = serde_json::json!({
            "message": message,
            "content": BASE64.encode(content),
            "branch": branch,
        });
        if let Some(sha) = sha {
            body["sha"] = serde_json::Value::String(sha.to_string());
        }
        self.check(self.client.put(&url).json(&body)).await?;
        Ok(())
    }

    /// List workflow runs, optionally scoped to one workflow file and one
    /// status (`queued`, `in_progress`, `completed`).
    pub async fn workflow_runs(
        &self,
        workflow: Option<&str>,
        status: Option<&str>,
        page: u32,
        per_page: u32,
    ) -> Result<WorkflowRunsPage, GitHubError> {
        let url = match workflow {
            Some(workflow) => self.repo_url(&format!("/actions/workflows/{workflow}/runs")),
            None => self.repo_url("/actions/runs"),
        };

        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(status) = status {
            query.push(("status", status.to_string()));
        }
        query.push(("per_page", per_page.to_string()));
        query.push(("page", page.to_string()));

        self.send_json(self.client.get(&url).query(&query)).await
    }

    /// Fetch the job/step breakdown of a single run.
    pub async fn run_jobs(&self, run_id: u64) -> Result<RunJobsPage, GitHubError> {
        let url = self.repo_url(&format!("/actions/runs/{run_id}/jobs"));
        self.send_json(self.client.get(&url)).await
    }

    /// Trigger a workflow via `workflow_dispatch`. The platform answers 204
    /// on success.
    pub async fn dispatch_workflow(
        &self,
        workflow: &str,
        git_ref: &str,
        inputs: serde_json::Value,
    ) -> Result<(), GitHubError> {
        let url = self.repo_url(&format!("/actions/workflows/{workflow}/dispatches"));
        let body = serde_json::json!({ "ref": git_ref, "inputs": inputs });
        self.check(self.client.post(&url).json(&body)).await?;
        Ok(())
    }
}
