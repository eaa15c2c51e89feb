//! Fiat Bridge - Entry Point
//!
//! Runs one conversion attempt:
//! 1. Loads configuration (`CONFIG_PATH`, default `config.yaml`)
//! 2. Builds the Coinbase and SideShift clients from the environment
//! 3. Converts the fiat balance and settles to the configured address
//! 4. Exits non-zero on any failure or on Ctrl+C

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tokio::signal;
use tracing::{error, info, warn};

use fiat_bridge::adapters::{Clock, CoinbaseClient, SideShiftClient, SystemClock};
use fiat_bridge::config::{self, constants};
use fiat_bridge::core::Converter;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables from .env file (if it exists)
    dotenvy::dotenv().ok();

    config::init_logging();
    info!(phase = "init", "Fiat bridge starting");
    constants::log_configuration();

    let config_path = PathBuf::from(
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string()),
    );
    let app_config = match config::load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(phase = "init", error = %e, "Configuration failed");
            return Ok(ExitCode::FAILURE);
        }
    };
    let request = app_config.conversion.to_request();
    info!(
        phase = "init",
        fiat = %request.fiat_currency,
        deposit = %request.deposit,
        settle = %request.settle,
        product = %request.product_id(),
        "Conversion configured"
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let exchange = CoinbaseClient::from_env(clock.clone())?;
    let swap = SideShiftClient::from_env(clock.clone())?;
    let converter = Converter::new(exchange, swap, clock);

    tokio::select! {
        result = converter.convert(&request) => match result {
            Ok(outcome) => {
                info!(
                    shift_id = %outcome.shift.id,
                    status = %outcome.shift.status,
                    transaction_id = %outcome.transaction.id,
                    "Conversion finished"
                );
                if outcome.is_settled() {
                    Ok(ExitCode::SUCCESS)
                } else {
                    warn!(status = %outcome.shift.status, "Shift did not settle");
                    Ok(ExitCode::FAILURE)
                }
            }
            Err(e) => {
                error!(step = ?e.step(), error = %e, "Conversion failed");
                Ok(ExitCode::FAILURE)
            }
        },
        _ = signal::ctrl_c() => {
            warn!("[SHUTDOWN] Interrupted; in-flight requests are abandoned");
            Ok(ExitCode::FAILURE)
        }
    }
}
