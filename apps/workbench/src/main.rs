//! # Farmalink Workbench Entry Point
//!
//! Runs the bootstrap sequence: tracing, configuration, API client and
//! the startup connectivity check. The actual wiring lives in lib.rs for
//! better testability.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    farmalink_workbench::run().await
}
