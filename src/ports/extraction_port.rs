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

//! # Extraction Port
//!
//! This Port defines the contract for the "Data Mover": pulling one table's
//! full contents into memory.

use crate::domain::entities::{TableData, TableRef};
use crate::domain::errors::Result;

/// `TableExtractor` handles the heavy-lifting of a landing run.
pub trait TableExtractor: Send + Sync {
    /// Takes a full snapshot of one table: all columns, all rows, no
    /// predicate, no pagination. Column order is preserved as returned by
    /// the source and NULLs stay NULL. A failure here is scoped to the
    /// single table (`LandingError::Extract`) and must not abort the
    /// extraction of other tables.
    fn extract_table(&self, table: &TableRef) -> Result<TableData>;
}
