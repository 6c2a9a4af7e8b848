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

//! # Catalog Port
//!
//! In Hexagonal Architecture, a **Port** is like a "Slot" or a "Contract".
//!
//! This Port defines what it means to "list the tables of a schema". It does
//! not care IF the database is Oracle, PostgreSQL, or a Mock for testing.
//! Any struct that implements the `SchemaCatalog` trait can be used by the
//! Orchestrator.

use crate::domain::entities::TableRef;
use crate::domain::errors::Result;

/// `SchemaCatalog` is a **Trait**. Think of it as an Interface.
///
/// We add `: Send + Sync` here. This is a Rust requirement for types
/// that are shared across multiple threads.
pub trait SchemaCatalog: Send + Sync {
    /// Returns the tables belonging to `schema`, as reported by the
    /// database's own metadata catalog. Ordering follows the metadata query
    /// and is meaningful for display only. An empty schema is a valid,
    /// empty answer; an unreachable source is a `LandingError::Catalog`.
    fn list_tables(&self, schema: &str) -> Result<Vec<TableRef>>;
}
