//! # Oracle Schema Landing
//!
//! A batch utility that lands every table of an Oracle schema into object
//! storage as CSV files, one file per table. Each table's extract-and-upload
//! is an independent unit of work: individual failures are recorded in the
//! run result while the run carries on with the remaining tables.
//!
//! This application follows the **Hexagonal Architecture** (Ports and
//! Adapters) to maintain a strict separation between the pipeline logic and
//! the Oracle/storage infrastructure.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ports;

use crate::application::orchestrator::Orchestrator;
use crate::application::runtime::RuntimeContext;
use crate::config::{AppConfig, CliArgs};
use crate::infrastructure::landing::local_adapter::LocalLandingAdapter;
use crate::infrastructure::landing::object_store_adapter::ObjectStoreLandingAdapter;
use crate::infrastructure::oracle::catalog_adapter::OracleCatalogAdapter;
use crate::infrastructure::oracle::extraction_adapter::OracleExtractionAdapter;
use crate::ports::landing_port::LandingTarget;
use clap::Parser;
use log::{error, info};
use std::process;
use std::sync::Arc;

fn main() {
    // 1. Initialize Logging
    env_logger::init();

    // 2. Parse Arguments
    let args = CliArgs::parse();

    // 3. Load Config
    let mut config = if let Some(config_path) = &args.config {
        match AppConfig::from_file(config_path) {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to load config: {}", e);
                process::exit(1);
            }
        }
    } else {
        AppConfig::default_from_cli(&args)
    };

    // Merge CLI overrides
    config.merge_cli(&args);

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        process::exit(1);
    }

    // 4. Set up Runtime (worker pool + connection pool)
    let runtime = match RuntimeContext::init(&config) {
        Ok(r) => r,
        Err(e) => {
            error!("Failed to initialize runtime: {}", e);
            process::exit(1);
        }
    };

    // 5. Initialize Hexagonal Components
    let catalog = Arc::new(OracleCatalogAdapter::new(Arc::clone(&runtime.pool)));

    let prefetch = config.run.prefetch_rows.unwrap_or(5000);
    let extractor = Arc::new(OracleExtractionAdapter::new(
        Arc::clone(&runtime.pool),
        prefetch,
    ));

    let landing: Arc<dyn LandingTarget> = match &config.landing.azure {
        Some(azure) => {
            match ObjectStoreLandingAdapter::for_azure(azure, &config.landing.directory) {
                Ok(adapter) => Arc::new(adapter),
                Err(e) => {
                    error!("Failed to initialize landing target: {}", e);
                    process::exit(1);
                }
            }
        }
        None => Arc::new(LocalLandingAdapter::new(config.landing.directory.clone())),
    };

    // 6. Run Orchestrator
    let orchestrator = Orchestrator::new(catalog, extractor, landing, config);

    info!("Starting landing process...");
    match orchestrator.run() {
        Ok(result) => {
            info!(
                "Landing finished. {}/{} tables landed successfully.",
                result.succeeded(),
                result.total()
            );
        }
        Err(e) => {
            error!("Landing run aborted: {}", e);
            process::exit(1);
        }
    }
}

// Helper to build an AppConfig from CLI arguments alone
impl AppConfig {
    fn default_from_cli(args: &CliArgs) -> Self {
        Self {
            database: crate::config::DatabaseConfig {
                username: args.username.clone().unwrap_or_default(),
                password: args.password.clone(),
                host: args.host.clone().unwrap_or_default(),
                port: args.port.unwrap_or(1521),
                service: args.service.clone().unwrap_or_default(),
                connection_string: None,
            },
            landing: crate::config::LandingConfig {
                directory: args.directory.clone().unwrap_or_else(|| "landing".into()),
                azure: None,
            },
            run: crate::config::RunConfig {
                schema: args.schema.clone().unwrap_or_default(),
                parallel: args.parallel,
                cpu_percent: None,
                prefetch_rows: None,
                exclude_tables: None,
                report_path: args.report.clone(),
            },
        }
    }
}
