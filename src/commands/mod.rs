//! CLI commands for testpilot
//!
//! - **pilot** (default): format, lint and test the files changed on this branch
//! - **release**: create a new patch release on GitHub
//! - **template**: re-apply the project's cookiecutter template
//!
//! The default command takes `&InvocationContext`; the helpers only need the
//! current directory and a runner.

pub mod pilot;
pub mod release;
pub mod template;

pub use pilot::run_pilot;
pub use release::run_release;
pub use template::run_template;
