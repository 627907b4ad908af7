//! GitOps Actions - repository mutation and Helm value updates for pipelines.

use gitops_actions::cli;
use gitops_actions::cli::OutputManager;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();

    match cli::run().await {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            let output = OutputManager::new();
            output.error(&format!("fatal error: {e}"));
            process::exit(1);
        }
    }
}
