use std::sync::Arc;

use jobswarm::actions::ActionExecutor;
use jobswarm::config::Config;
use jobswarm::github::GitHubClient;
use jobswarm::jobs::dispatch::{JobCreator, JobDispatcher};
use jobswarm::jobs::{StatusTracker, SwarmAggregator};
use jobswarm::scheduler::{
    CronScheduler, TriggerRegistry, load_cron_table, load_trigger_table,
};
use jobswarm::server::{self, AppState};

#[tokio::main]
async fn main() -> jobswarm::error::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Config::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  required: GH_OWNER, GH_REPO, GH_TOKEN, API_KEY");
        std::process::exit(1);
    });

    eprintln!("🐝 jobswarm v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Repository: {}/{}", config.owner, config.repo);
    eprintln!("   Webhook: http://0.0.0.0:{}/webhook", config.port);

    let github = Arc::new(GitHubClient::new(
        &config.owner,
        &config.repo,
        &config.token,
    ));
    let dispatcher: Arc<dyn JobCreator> = Arc::new(JobDispatcher::new(
        Arc::clone(&github),
        config.trunk_branch.clone(),
    ));
    let executor = Arc::new(ActionExecutor::new(Arc::clone(&dispatcher)));
    let status = Arc::new(StatusTracker::new(
        Arc::clone(&github),
        config.job_workflow.clone(),
    ));
    let swarm = Arc::new(SwarmAggregator::new(Arc::clone(&github)));

    // ── Cron Scheduler ──────────────────────────────────────────────────
    let crons = load_cron_table(&config.crons_path)?;
    let scheduler = CronScheduler::start(crons, Arc::clone(&executor));
    eprintln!("   Crons: {} scheduled", scheduler.len());

    // ── Triggers ────────────────────────────────────────────────────────
    // The file-watch event source is external; the registry stays alive so
    // a future event feed can fire into it.
    let triggers = load_trigger_table(&config.triggers_path)?;
    let trigger_registry = TriggerRegistry::new(triggers, Arc::clone(&executor));
    eprintln!("   Triggers: {} loaded\n", trigger_registry.entries().len());

    // ── Webhook Receiver ────────────────────────────────────────────────
    let state = AppState::new(dispatcher, status, swarm, config.api_key.clone());
    server::serve(state, config.port).await?;

    scheduler.shutdown();
    Ok(())
}
