//! # Back Office Entry Point
//!
//! Sets up logging, then hands over to [`backoffice_lib::run`].
//!
//! ## Environment
//! - `BACKOFFICE_CONFIG` - explicit config file path
//! - `BACKOFFICE_*` - individual config overrides
//! - `RUST_LOG` - log filter

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    backoffice_lib::init_tracing();

    match backoffice_lib::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = ?e.code, "Back office failed: {}", e.message);
            ExitCode::FAILURE
        }
    }
}
