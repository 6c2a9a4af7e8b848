//! Infrastructure adapter for reading the Oracle table catalog.

use crate::domain::entities::TableRef;
use crate::domain::errors::{LandingError, Result};
use crate::infrastructure::oracle::connection_manager::OracleConnectionManager;
use crate::ports::catalog_port::SchemaCatalog;
use log::debug;
use r2d2::Pool;
use std::sync::Arc;

const SQL_LIST_TABLES: &str =
    "SELECT table_name FROM all_tables WHERE owner = :1 ORDER BY table_name";

/// Concrete implementation of `SchemaCatalog` for Oracle databases, backed
/// by the shared connection pool.
pub struct OracleCatalogAdapter {
    pool: Arc<Pool<OracleConnectionManager>>,
}

impl OracleCatalogAdapter {
    pub fn new(pool: Arc<Pool<OracleConnectionManager>>) -> Self {
        Self { pool }
    }
}

impl SchemaCatalog for OracleCatalogAdapter {
    fn list_tables(&self, schema: &str) -> Result<Vec<TableRef>> {
        let owner = schema.to_uppercase();
        debug!("Listing tables for owner {}", owner);

        let conn = self
            .pool
            .get()
            .map_err(|e| LandingError::Catalog(format!("connection checkout failed: {}", e)))?;

        let rows = conn
            .query(SQL_LIST_TABLES, &[&owner])
            .map_err(|e| LandingError::Catalog(e.to_string()))?;

        let mut tables = Vec::new();
        for row_result in rows {
            let row = row_result.map_err(|e| LandingError::Catalog(e.to_string()))?;
            let name: String = row
                .get(0)
                .map_err(|e| LandingError::Catalog(e.to_string()))?;
            tables.push(TableRef::new(owner.clone(), name));
        }
        Ok(tables)
    }
}
