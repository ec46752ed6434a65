//! Core building blocks shared by every testpilot command
//!
//! - **config**: runtime settings and the project files testpilot reads
//! - **context**: per-invocation context with memoized git lookups
//! - **error**: error types with contextual help and exit codes
//! - **runner**: subprocess execution with `--debug` echoing
//! - **vcs**: git operations (SystemGit)

pub mod config;
pub mod context;
pub mod error;
pub mod runner;
pub mod vcs;
