//! Integration tests for the webhook receiver.
//!
//! Each test boots the real Axum app on a random port and exercises the HTTP
//! contract with a plain reqwest client and a spy dispatcher (no hosting
//! platform involved).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::net::TcpListener;
use tokio::time::timeout;

use jobswarm::error::GitHubError;
use jobswarm::github::GitHubClient;
use jobswarm::jobs::dispatch::{CreatedJob, JobCreator, JobOptions};
use jobswarm::jobs::{StatusTracker, SwarmAggregator};
use jobswarm::server::{AppState, app};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Spy dispatcher that fabricates job IDs without touching the platform.
struct SpyDispatcher {
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl JobCreator for SpyDispatcher {
    async fn create_job(
        &self,
        description: &str,
        _options: &JobOptions,
    ) -> Result<CreatedJob, GitHubError> {
        self.calls.lock().unwrap().push(description.to_string());
        let job_id = uuid::Uuid::new_v4().to_string();
        Ok(CreatedJob {
            branch: format!("job/{job_id}"),
            job_id,
        })
    }
}

/// Start the app on a random port, return its base URL and the spy.
async fn start_server() -> (String, Arc<SpyDispatcher>) {
    let spy = Arc::new(SpyDispatcher {
        calls: Mutex::new(Vec::new()),
    });
    // The webhook tests never query status; the trackers can point at an
    // address nothing listens on.
    let github = Arc::new(GitHubClient::with_base_url(
        "http://127.0.0.1:9",
        "acme",
        "swarm",
        &SecretString::from("t"),
    ));
    let state = AppState::new(
        spy.clone(),
        Arc::new(StatusTracker::new(
            Arc::clone(&github),
            "run-job.yml".to_string(),
        )),
        Arc::new(SwarmAggregator::new(github)),
        SecretString::from("integration-secret"),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.ok();
    });

    (format!("http://127.0.0.1:{port}"), spy)
}

#[tokio::test]
async fn webhook_round_trip_returns_job_id_and_branch() {
    timeout(TEST_TIMEOUT, async {
        let (base, spy) = start_server().await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{base}/webhook"))
            .header("x-api-key", "integration-secret")
            .json(&serde_json::json!({ "job": "do thing" }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        let job_id = body["job_id"].as_str().unwrap();
        assert_eq!(job_id.len(), 36);
        assert!(job_id.chars().all(|c| c.is_ascii_hexdigit() || c == '-'));
        assert_eq!(body["branch"], format!("job/{job_id}"));
        assert_eq!(spy.calls.lock().unwrap().as_slice(), ["do thing"]);
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn bad_api_key_gets_401_before_any_job_logic() {
    timeout(TEST_TIMEOUT, async {
        let (base, spy) = start_server().await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{base}/webhook"))
            .header("x-api-key", "nope")
            .json(&serde_json::json!({ "job": "do thing" }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 401);
        assert!(spy.calls.lock().unwrap().is_empty());
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn missing_job_field_gets_400() {
    timeout(TEST_TIMEOUT, async {
        let (base, spy) = start_server().await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{base}/webhook"))
            .header("x-api-key", "integration-secret")
            .json(&serde_json::json!({ "task": "wrong key" }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Missing job field");
        assert!(spy.calls.lock().unwrap().is_empty());
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn health_answers_without_a_key() {
    timeout(TEST_TIMEOUT, async {
        let (base, _) = start_server().await;
        let response = reqwest::get(format!("{base}/health")).await.unwrap();
        assert_eq!(response.status(), 200);
    })
    .await
    .unwrap();
}
