//! # Domain Entities
//!
//! Entities are the "Nouns" of the pipeline: the tables we discover, the
//! in-memory snapshot of one table, and the per-table/per-run outcome
//! records. They are plain data structures shared across the application,
//! ports, and infrastructure layers.
//!
//! The report types derive `serde::Serialize` so a run result can be emitted
//! as JSON for programmatic consumers as well as logged.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

/// Identifies one source table: schema name plus table name.
///
/// Produced once by the catalog at the start of a run and consumed read-only
/// by the extractor and the landing writer. The table name also becomes the
/// landed file's base name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TableRef {
    pub schema: String,
    pub table: String,
}

impl TableRef {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
        }
    }

    /// `SCHEMA.TABLE`, for SQL statements and log lines.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.table)
    }

    /// Name of the landed object, derived deterministically from the table
    /// name: `{table}.csv`.
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.table)
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

/// A single cell of an extracted row.
///
/// The source's declared type is preserved: SQL NULL stays `Null` and is
/// only rendered to an empty field at serialization time, never coerced to
/// empty text inside the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Renders the cell as a CSV field. `Null` becomes the empty field;
    /// timestamps use `YYYY-MM-DD HH:MM:SS.ffffff`.
    pub fn as_field(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Integer(v) => v.to_string(),
            CellValue::Float(v) => v.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Timestamp(ts) => ts.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
        }
    }
}

/// An in-memory snapshot of one table: ordered column names plus rows of
/// equal width. Owned by the extraction call that produced it and dropped
/// once serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl TableData {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Outcome of one table's extract-and-upload unit of work.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableOutcome {
    Succeeded { rows: u64 },
    ExtractFailed { error: String },
    UploadFailed { error: String },
}

/// One entry of the run result: a table and what happened to it.
#[derive(Debug, Clone, Serialize)]
pub struct TableReport {
    pub table: TableRef,
    #[serde(flatten)]
    pub outcome: TableOutcome,
}

impl TableReport {
    /// Helper to record a landed table with its row count.
    pub fn succeeded(table: TableRef, rows: u64) -> Self {
        Self {
            table,
            outcome: TableOutcome::Succeeded { rows },
        }
    }

    /// Helper to record a table whose extraction failed. No upload was
    /// attempted for it.
    pub fn extract_failed(table: TableRef, error: String) -> Self {
        Self {
            table,
            outcome: TableOutcome::ExtractFailed { error },
        }
    }

    /// Helper to record a table that extracted but could not be landed.
    pub fn upload_failed(table: TableRef, error: String) -> Self {
        Self {
            table,
            outcome: TableOutcome::UploadFailed { error },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, TableOutcome::Succeeded { .. })
    }
}

/// Aggregate report for one full landing run: one entry per table attempted,
/// plus the count of tables skipped by cancellation.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub entries: Vec<TableReport>,
    pub skipped: usize,
}

impl RunResult {
    pub fn new(entries: Vec<TableReport>, skipped: usize) -> Self {
        Self { entries, skipped }
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.succeeded()
    }
}
