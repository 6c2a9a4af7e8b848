// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Runtime Context
//!
//! This module acts as the "Engine Room" of the application. It sets up the
//! underlying resources that a landing run needs:
//! 1. **Thread Pool**: Using the `rayon` crate for the per-table fan-out.
//! 2. **Connection Pool**: Using `r2d2` to manage Oracle connections so each
//!    table worker can check one out for the duration of its extract.
//! 3. **CPU Scaling**: Sizing the worker pool from the available CPU cores.

use crate::config::AppConfig;
use crate::domain::errors::{LandingError, Result};
use crate::infrastructure::oracle::connection_manager::OracleConnectionManager;
use log::info;
use r2d2::Pool;
use std::sync::Arc;

/// `RuntimeContext` holds shared resources that exist for the entire run.
pub struct RuntimeContext {
    pub pool: Arc<Pool<OracleConnectionManager>>,
    /// The number of table workers that can run at once.
    pub num_threads: usize,
}

impl RuntimeContext {
    /// Initializes the global thread pool and the Oracle connection pool.
    ///
    /// If the user did not pin `parallel`, the worker count defaults to
    /// `cpu_percent` (50% unless set) of the available cores, minimum 1.
    pub fn init(config: &AppConfig) -> Result<Self> {
        let cpu_percent = config.run.cpu_percent.unwrap_or(50);
        let total_cpus = num_cpus::get();
        let num_threads = config
            .run
            .parallel
            .unwrap_or_else(|| (total_cpus as f64 * (cpu_percent as f64 / 100.0)).ceil() as usize);
        let num_threads = std::cmp::max(1, num_threads);

        info!(
            "Initializing worker pool with {} threads (Target CPU: {}%)",
            num_threads, cpu_percent
        );

        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .unwrap_or_else(|e| {
                info!(
                    "Global thread pool already initialized (likely in a test): {}",
                    e
                );
            });

        let conn_str = config.database.get_connection_string();

        // Password from the config file, else from the environment.
        let password = config
            .database
            .password
            .clone()
            .or_else(|| std::env::var("ORACLE_PASSWORD").ok())
            .unwrap_or_default();

        info!("Initializing connection pool for {}...", conn_str);

        let manager = OracleConnectionManager::new(&config.database.username, &password, &conn_str);

        // Slightly larger than the worker count so a spare connection is
        // available for the catalog query while workers are busy.
        let pool_size = (num_threads + 2) as u32;

        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(|e| {
                LandingError::Catalog(format!("Failed to create connection pool: {}", e))
            })?;

        Ok(Self {
            pool: Arc::new(pool),
            num_threads,
        })
    }
}
