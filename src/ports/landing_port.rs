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

//! # Landing Port
//!
//! This Port represents the destination directory in the object store or
//! filesystem where extracted tables are landed.

use crate::domain::errors::Result;

/// `LandingTarget` is the write side of the pipeline.
pub trait LandingTarget: Send + Sync {
    /// Ensures the destination directory exists. Idempotent: an
    /// already-existing directory is success, anything else is a fatal
    /// `LandingError::Directory`. Called once per run, before any upload.
    fn ensure_directory(&self) -> Result<()>;

    /// Writes one object under the landing directory, overwriting any
    /// existing object of the same name (re-running a landing job replaces
    /// prior output). A failure is scoped to the single table
    /// (`LandingError::Upload`).
    fn write_file(&self, name: &str, bytes: &[u8]) -> Result<()>;
}
