//! jobswarm — job and action orchestration over a CI worker pool.
//!
//! Jobs are materialized as `job/<id>` branches in the source repository; an
//! external runner fleet picks them up, and this crate dispatches, tracks and
//! originates them.

pub mod actions;
pub mod config;
pub mod error;
pub mod github;
pub mod jobs;
pub mod scheduler;
pub mod server;
