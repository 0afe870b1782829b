mod api;
mod cli;
mod config;
mod error;
mod logging;
mod models;
mod output;
mod report;

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "run failed");
            cli::report_error(&err);
            ExitCode::from(err.exit_code())
        }
    }
}
