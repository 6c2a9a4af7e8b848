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

//! Core error definitions for the schema landing pipeline.
//!
//! This module provides a centralized `LandingError` enum and a `Result` type
//! used throughout the application. The taxonomy splits into fatal errors
//! (`Config`, `Catalog`, `Directory`) that abort a run, and table-scoped
//! errors (`Extract`, `Upload`) that are recorded in the run result while the
//! run continues with the remaining tables.

use thiserror::Error;

/// Error types encountered during a landing run.
#[derive(Error, Debug)]
pub enum LandingError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Table discovery failed: {0}")]
    Catalog(String),

    #[error("Landing directory unavailable: {0}")]
    Directory(String),

    #[error("Extraction failed for {table}: {reason}")]
    Extract { table: String, reason: String },

    #[error("Upload failed for {object}: {reason}")]
    Upload { object: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Oracle error: {0}")]
    Oracle(#[from] oracle::Error),
}

impl LandingError {
    /// True for errors that abort the whole run rather than a single table.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            LandingError::Extract { .. } | LandingError::Upload { .. }
        )
    }
}

/// A specialized Result type for the schema landing pipeline.
pub type Result<T> = std::result::Result<T, LandingError>;
