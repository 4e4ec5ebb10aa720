//! # Back Office Application Library
//!
//! Wires configuration, the store and the page commands together.
//!
//! ## Module Organization
//! ```text
//! backoffice_lib/
//! ├── commands/      # One module per page
//! │   ├── inventory  # Products, stock adjustments
//! │   ├── orders     # Orders, status and payment changes
//! │   ├── customers  # Customers, status changes
//! │   ├── calendar   # Reminders, events, notes
//! │   └── dashboard  # Headline counters
//! ├── state/         # StoreState, ConfigState
//! └── error.rs       # ApiError for every command
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration (defaults → file → environment)
//! 3. Build the store, seeded from fixtures when configured
//! 4. Print the dashboard summary and the first inventory page as JSON

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use backoffice_core::table::TableView;

pub mod commands;
pub mod error;
pub mod state;

use commands::dashboard::{self, DashboardSummary};
use commands::{calendar, inventory};
use error::ApiError;
use state::{ConfigState, StoreState};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_VAR: &str = "BACKOFFICE_CONFIG";

/// What the binary prints on startup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub dashboard: DashboardSummary,
    pub inventory: TableView,
    pub agenda: TableView,
}

/// Builds the store for `config`.
pub fn build_store(config: &ConfigState, today: NaiveDate) -> StoreState {
    if config.seed_fixtures {
        StoreState::seeded(today)
    } else {
        StoreState::empty()
    }
}

/// Dashboard counters plus the first inventory page and today's agenda.
pub async fn overview(
    store: &StoreState,
    config: &ConfigState,
    today: NaiveDate,
) -> Result<Overview, ApiError> {
    let dashboard = dashboard::summary(store, config, today).await?;

    let products = inventory::list_products(store, inventory::InventoryQuery::default()).await?;
    let inventory = inventory::inventory_table(products.items, config).render();

    let agenda = calendar::reminders_on(store, today).await?;
    let agenda = calendar::reminder_table(agenda, config).render();

    Ok(Overview {
        dashboard,
        inventory,
        agenda,
    })
}

/// Runs the back office once and prints the overview.
pub async fn run() -> Result<(), ApiError> {
    let config_path = std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from);
    let config = ConfigState::load(config_path)?;
    info!(store = %config.store_name, page_size = config.page_size, "Configuration loaded");

    let today = Local::now().date_naive();
    let store = build_store(&config, today);

    let overview = overview(&store, &config, today).await?;
    println!("{}", serde_json::to_string_pretty(&overview)?);

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Repository operations
/// - `RUST_LOG=info` - Page mutations and startup (default)
/// - `RUST_LOG=warn` - Rejected requests only
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,backoffice=debug,backoffice_lib=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::table::TableBody;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[tokio::test]
    async fn test_overview_over_fixtures() {
        let config = ConfigState::default();
        let store = build_store(&config, today());
        let overview = overview(&store, &config, today()).await.unwrap();

        match &overview.inventory.body {
            TableBody::Rows { rows } => assert_eq!(rows.len(), 8),
            other => panic!("expected rows, got {:?}", other),
        }
        match &overview.agenda.body {
            TableBody::Rows { rows } => assert_eq!(rows.len(), 2),
            other => panic!("expected rows, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unseeded_store_shows_empty_tables() {
        let config = ConfigState {
            seed_fixtures: false,
            ..ConfigState::default()
        };
        let store = build_store(&config, today());
        let overview = overview(&store, &config, today()).await.unwrap();

        assert_eq!(
            overview.inventory.body,
            TableBody::Empty {
                message: "No data available".to_string()
            }
        );
        let json = serde_json::to_value(&overview).unwrap();
        assert_eq!(json["dashboard"]["storeName"], "Back Office Dev Store");
    }
}
