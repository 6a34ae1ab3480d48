//! Authenticated REST client for the Git-hosting platform.

pub mod client;
pub mod types;

pub use client::GitHubClient;
