//! Integration tests for the testpilot binary

mod test_cli;
mod test_pipeline;
