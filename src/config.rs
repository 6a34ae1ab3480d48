//! Environment-driven configuration.

use std::path::PathBuf;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Orchestrator configuration, read once at process start.
#[derive(Debug, Clone)]
pub struct Config {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Hosting-platform bearer token.
    pub token: SecretString,
    /// Shared secret checked against the `x-api-key` header.
    pub api_key: SecretString,
    /// Webhook receiver listen port.
    pub port: u16,
    /// Workflow file the status tracker is scoped to.
    pub job_workflow: String,
    /// Branch new job branches are cut from.
    pub trunk_branch: String,
    /// Path to the declarative cron table.
    pub crons_path: PathBuf,
    /// Path to the declarative trigger table.
    pub triggers_path: PathBuf,
}

impl Config {
    /// Read configuration from environment variables.
    ///
    /// `GH_OWNER`, `GH_REPO`, `GH_TOKEN` and `API_KEY` are required; the rest
    /// fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port_raw = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let port = port_raw
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                message: format!("'{port_raw}': {e}"),
            })?;

        Ok(Self {
            owner: required("GH_OWNER")?,
            repo: required("GH_REPO")?,
            token: SecretString::from(required("GH_TOKEN")?),
            api_key: SecretString::from(required("API_KEY")?),
            port,
            job_workflow: std::env::var("JOB_WORKFLOW")
                .unwrap_or_else(|_| "run-job.yml".to_string()),
            trunk_branch: std::env::var("TRUNK_BRANCH").unwrap_or_else(|_| "main".to_string()),
            crons_path: std::env::var("CRONS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("CRONS.json")),
            triggers_path: std::env::var("TRIGGERS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("TRIGGERS.json")),
        })
    }
}

fn required(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_var_is_reported() {
        // Env mutation is process-wide; this test only asserts the error path
        // for a variable no other test sets.
        unsafe { std::env::remove_var("GH_OWNER") };
        let err = required("GH_OWNER").unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "GH_OWNER"));
    }
}
