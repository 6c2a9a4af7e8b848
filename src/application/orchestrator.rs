//! The core application logic that orchestrates a whole landing run.
//!
//! A run walks an explicit sequence of states: the catalog is read once,
//! the landing directory is ensured once, then every table goes through its
//! own extract-and-upload unit of work. Failures inside a unit never leave
//! it; they become entries of the final `RunResult`.

use crate::config::AppConfig;
use crate::domain::csv;
use crate::domain::entities::{RunResult, TableRef, TableReport};
use crate::domain::errors::{LandingError, Result};
use crate::ports::catalog_port::SchemaCatalog;
use crate::ports::extraction_port::TableExtractor;
use crate::ports::landing_port::LandingTarget;
use log::{error, info, warn};
use rayon::prelude::*;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Orchestrates the extraction and landing of every table in a schema.
pub struct Orchestrator {
    catalog: Arc<dyn SchemaCatalog>,
    extractor: Arc<dyn TableExtractor>,
    landing: Arc<dyn LandingTarget>,
    config: AppConfig,
    cancelled: Arc<AtomicBool>,
}

impl Orchestrator {
    /// Creates a new Orchestrator with the provided components.
    pub fn new(
        catalog: Arc<dyn SchemaCatalog>,
        extractor: Arc<dyn TableExtractor>,
        landing: Arc<dyn LandingTarget>,
        config: AppConfig,
    ) -> Self {
        Self {
            catalog,
            extractor,
            landing,
            config,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns a handle that, once set, stops new table workers from
    /// starting. In-flight tables finish or fail normally and the partial
    /// run result is still produced.
    pub fn cancellation_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Entry point for running the full landing process.
    ///
    /// Table discovery and the landing-directory check are fatal when they
    /// fail; everything after that is isolated per table.
    pub fn run(&self) -> Result<RunResult> {
        let start_time = Instant::now();
        let schema = &self.config.run.schema;
        info!("Starting landing run for schema {}", schema);

        let discovered = self.catalog.list_tables(schema)?;
        info!("Discovered {} tables in schema {}", discovered.len(), schema);

        let tables: Vec<TableRef> = discovered
            .into_iter()
            .filter(|t| {
                if self.config.is_excluded(&t.table) {
                    warn!("Skipping excluded table: {}", t.qualified_name());
                    false
                } else {
                    true
                }
            })
            .collect();

        self.landing.ensure_directory()?;

        if tables.is_empty() {
            info!("No tables to land.");
            return Ok(RunResult::new(vec![], 0));
        }

        let planned = tables.len();
        let entries: Vec<TableReport> = tables
            .into_par_iter()
            .filter_map(|table| {
                if self.cancelled.load(Ordering::SeqCst) {
                    return None;
                }
                Some(self.process_table(table))
            })
            .collect();

        let skipped = planned - entries.len();
        let result = RunResult::new(entries, skipped);

        self.log_summary(&result, start_time.elapsed().as_secs_f64());

        if let Some(path) = &self.config.run.report_path {
            if let Err(e) = self.write_report(&result, path) {
                error!("Failed to write run report to {}: {}", path, e);
            }
        }

        Ok(result)
    }

    /// One table's unit of work: extract, serialize, upload.
    ///
    /// Upload is attempted only after a successful extraction; every exit
    /// path produces exactly one report entry.
    fn process_table(&self, table: TableRef) -> TableReport {
        info!("Extracting {}", table.qualified_name());

        let data = match self.extractor.extract_table(&table) {
            Ok(data) => data,
            Err(e) => {
                error!("{}", e);
                return TableReport::extract_failed(table, e.to_string());
            }
        };

        let rows = data.row_count() as u64;
        let landed = csv::serialize(&data)
            .and_then(|bytes| self.landing.write_file(&table.file_name(), &bytes));

        match landed {
            Ok(()) => {
                info!("Landed {} ({} rows)", table.file_name(), rows);
                TableReport::succeeded(table, rows)
            }
            Err(e) => {
                error!("{}", e);
                TableReport::upload_failed(table, e.to_string())
            }
        }
    }

    fn log_summary(&self, result: &RunResult, duration_secs: f64) {
        info!(
            "Landing run finished in {:.1}s: {} landed, {} failed, {} total",
            duration_secs,
            result.succeeded(),
            result.failed(),
            result.total()
        );
        if result.skipped > 0 {
            warn!("{} tables were not started (run cancelled)", result.skipped);
        }
    }

    fn write_report(&self, result: &RunResult, path: &str) -> Result<()> {
        let report = json!({
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "schema": self.config.run.schema,
            "summary": {
                "total": result.total(),
                "succeeded": result.succeeded(),
                "failed": result.failed(),
                "skipped": result.skipped,
            },
            "tables": result.entries,
        });

        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, &report)
            .map_err(|e| LandingError::Io(std::io::Error::other(e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, DatabaseConfig, LandingConfig, RunConfig};
    use crate::domain::entities::{CellValue, TableData, TableOutcome};
    use crate::domain::errors::LandingError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct StaticCatalog {
        tables: Vec<&'static str>,
    }

    impl SchemaCatalog for StaticCatalog {
        fn list_tables(&self, schema: &str) -> Result<Vec<TableRef>> {
            Ok(self
                .tables
                .iter()
                .map(|t| TableRef::new(schema, *t))
                .collect())
        }
    }

    struct FailingCatalog;

    impl SchemaCatalog for FailingCatalog {
        fn list_tables(&self, _schema: &str) -> Result<Vec<TableRef>> {
            Err(LandingError::Catalog("ORA-12541: no listener".into()))
        }
    }

    /// Extracts a small fixture for `clientes` and fails `pedidos` with a
    /// connectivity error; every other table yields an empty snapshot.
    struct ScriptedExtractor;

    impl TableExtractor for ScriptedExtractor {
        fn extract_table(&self, table: &TableRef) -> Result<TableData> {
            match table.table.as_str() {
                "clientes" => Ok(TableData::new(
                    vec!["id".into(), "nome".into()],
                    vec![
                        vec![CellValue::Integer(1), CellValue::Text("Ana".into())],
                        vec![CellValue::Integer(2), CellValue::Text("Bea".into())],
                        vec![CellValue::Integer(3), CellValue::Null],
                    ],
                )),
                "pedidos" => Err(LandingError::Extract {
                    table: table.qualified_name(),
                    reason: "IO Error: connection lost".into(),
                }),
                _ => Ok(TableData::new(vec!["id".into()], vec![])),
            }
        }
    }

    #[derive(Default)]
    struct MemoryLanding {
        files: Mutex<HashMap<String, Vec<u8>>>,
        fail_upload_for: Option<&'static str>,
        fail_directory: bool,
    }

    impl LandingTarget for MemoryLanding {
        fn ensure_directory(&self) -> Result<()> {
            if self.fail_directory {
                return Err(LandingError::Directory("403 AuthorizationFailure".into()));
            }
            Ok(())
        }

        fn write_file(&self, name: &str, bytes: &[u8]) -> Result<()> {
            if self.fail_upload_for == Some(name) {
                return Err(LandingError::Upload {
                    object: name.to_string(),
                    reason: "request timed out".into(),
                });
            }
            self.files
                .lock()
                .unwrap()
                .insert(name.to_string(), bytes.to_vec());
            Ok(())
        }
    }

    fn test_config(schema: &str) -> AppConfig {
        AppConfig {
            database: DatabaseConfig {
                username: "TEST".into(),
                password: None,
                host: "localhost".into(),
                port: 1521,
                service: "XE".into(),
                connection_string: None,
            },
            landing: LandingConfig {
                directory: "landing".into(),
                azure: None,
            },
            run: RunConfig {
                schema: schema.into(),
                parallel: Some(2),
                cpu_percent: None,
                prefetch_rows: None,
                exclude_tables: None,
                report_path: None,
            },
        }
    }

    fn orchestrator_with(
        catalog: Arc<dyn SchemaCatalog>,
        landing: Arc<MemoryLanding>,
        config: AppConfig,
    ) -> Orchestrator {
        Orchestrator::new(catalog, Arc::new(ScriptedExtractor), landing, config)
    }

    #[test]
    fn test_example_scenario() {
        let landing = Arc::new(MemoryLanding::default());
        let orchestrator = orchestrator_with(
            Arc::new(StaticCatalog {
                tables: vec!["clientes", "pedidos"],
            }),
            Arc::clone(&landing),
            test_config("vendas"),
        );

        let result = orchestrator.run().unwrap();
        assert_eq!(result.total(), 2);
        assert_eq!(result.skipped, 0);

        let clientes = result
            .entries
            .iter()
            .find(|e| e.table.table == "clientes")
            .unwrap();
        assert_eq!(clientes.outcome, TableOutcome::Succeeded { rows: 3 });

        let pedidos = result
            .entries
            .iter()
            .find(|e| e.table.table == "pedidos")
            .unwrap();
        assert!(matches!(
            pedidos.outcome,
            TableOutcome::ExtractFailed { .. }
        ));

        let files = landing.files.lock().unwrap();
        assert_eq!(
            files.get("clientes.csv").map(Vec::as_slice),
            Some(b"id,nome\n1,Ana\n2,Bea\n3,\n".as_slice())
        );
        assert!(!files.contains_key("pedidos.csv"));
    }

    #[test]
    fn test_one_entry_per_table_even_when_all_fail() {
        let landing = Arc::new(MemoryLanding {
            fail_upload_for: Some("clientes.csv"),
            ..Default::default()
        });
        let orchestrator = orchestrator_with(
            Arc::new(StaticCatalog {
                tables: vec!["clientes", "pedidos"],
            }),
            Arc::clone(&landing),
            test_config("vendas"),
        );

        let result = orchestrator.run().unwrap();
        assert_eq!(result.total(), 2);
        assert_eq!(result.succeeded(), 0);
        assert_eq!(result.failed(), 2);
    }

    #[test]
    fn test_upload_failure_does_not_affect_other_tables() {
        let landing = Arc::new(MemoryLanding {
            fail_upload_for: Some("clientes.csv"),
            ..Default::default()
        });
        let orchestrator = orchestrator_with(
            Arc::new(StaticCatalog {
                tables: vec!["clientes", "produtos"],
            }),
            Arc::clone(&landing),
            test_config("vendas"),
        );

        let result = orchestrator.run().unwrap();
        let clientes = result
            .entries
            .iter()
            .find(|e| e.table.table == "clientes")
            .unwrap();
        assert!(matches!(clientes.outcome, TableOutcome::UploadFailed { .. }));

        let produtos = result
            .entries
            .iter()
            .find(|e| e.table.table == "produtos")
            .unwrap();
        assert_eq!(produtos.outcome, TableOutcome::Succeeded { rows: 0 });
        assert!(landing.files.lock().unwrap().contains_key("produtos.csv"));
    }

    #[test]
    fn test_catalog_failure_is_fatal() {
        let landing = Arc::new(MemoryLanding::default());
        let orchestrator = orchestrator_with(
            Arc::new(FailingCatalog),
            Arc::clone(&landing),
            test_config("vendas"),
        );

        let err = orchestrator.run().unwrap_err();
        assert!(matches!(err, LandingError::Catalog(_)));
        assert!(landing.files.lock().unwrap().is_empty());
    }

    #[test]
    fn test_directory_failure_is_fatal() {
        let landing = Arc::new(MemoryLanding {
            fail_directory: true,
            ..Default::default()
        });
        let orchestrator = orchestrator_with(
            Arc::new(StaticCatalog {
                tables: vec!["clientes"],
            }),
            Arc::clone(&landing),
            test_config("vendas"),
        );

        let err = orchestrator.run().unwrap_err();
        assert!(matches!(err, LandingError::Directory(_)));
        assert!(landing.files.lock().unwrap().is_empty());
    }

    #[test]
    fn test_excluded_tables_are_filtered_case_insensitively() {
        let landing = Arc::new(MemoryLanding::default());
        let mut config = test_config("vendas");
        config.run.exclude_tables = Some(vec!["PEDIDOS".into()]);

        let orchestrator = orchestrator_with(
            Arc::new(StaticCatalog {
                tables: vec!["clientes", "pedidos"],
            }),
            Arc::clone(&landing),
            config,
        );

        let result = orchestrator.run().unwrap();
        assert_eq!(result.total(), 1);
        assert_eq!(result.entries[0].table.table, "clientes");
        // Exclusion is not cancellation; nothing counts as skipped.
        assert_eq!(result.skipped, 0);
    }

    #[test]
    fn test_cancellation_skips_unstarted_tables() {
        let landing = Arc::new(MemoryLanding::default());
        let orchestrator = orchestrator_with(
            Arc::new(StaticCatalog {
                tables: vec!["clientes", "pedidos", "produtos"],
            }),
            Arc::clone(&landing),
            test_config("vendas"),
        );

        orchestrator
            .cancellation_handle()
            .store(true, Ordering::SeqCst);

        let result = orchestrator.run().unwrap();
        assert_eq!(result.total(), 0);
        assert_eq!(result.skipped, 3);
        assert!(landing.files.lock().unwrap().is_empty());
    }

    #[test]
    fn test_empty_schema_is_success() {
        let landing = Arc::new(MemoryLanding::default());
        let orchestrator = orchestrator_with(
            Arc::new(StaticCatalog { tables: vec![] }),
            Arc::clone(&landing),
            test_config("vendas"),
        );

        let result = orchestrator.run().unwrap();
        assert_eq!(result.total(), 0);
        assert_eq!(result.skipped, 0);
    }

    #[test]
    fn test_report_file_written() {
        let tmp = tempfile::tempdir().unwrap();
        let report_path = tmp.path().join("run_report.json");

        let landing = Arc::new(MemoryLanding::default());
        let mut config = test_config("vendas");
        config.run.report_path = Some(report_path.to_str().unwrap().to_string());

        let orchestrator = orchestrator_with(
            Arc::new(StaticCatalog {
                tables: vec!["clientes", "pedidos"],
            }),
            Arc::clone(&landing),
            config,
        );

        orchestrator.run().unwrap();

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(report["schema"], "vendas");
        assert_eq!(report["summary"]["total"], 2);
        assert_eq!(report["summary"]["succeeded"], 1);
        assert_eq!(report["summary"]["failed"], 1);
        assert_eq!(report["tables"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_rerun_produces_identical_bytes() {
        let first = Arc::new(MemoryLanding::default());
        let orchestrator = orchestrator_with(
            Arc::new(StaticCatalog {
                tables: vec!["clientes"],
            }),
            Arc::clone(&first),
            test_config("vendas"),
        );
        orchestrator.run().unwrap();
        orchestrator.run().unwrap();

        let second = Arc::new(MemoryLanding::default());
        let rerun = orchestrator_with(
            Arc::new(StaticCatalog {
                tables: vec!["clientes"],
            }),
            Arc::clone(&second),
            test_config("vendas"),
        );
        rerun.run().unwrap();

        assert_eq!(
            first.files.lock().unwrap().get("clientes.csv"),
            second.files.lock().unwrap().get("clientes.csv")
        );
    }
}
