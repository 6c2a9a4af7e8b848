use crate::domain::errors::{LandingError, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub landing: LandingConfig,
    pub run: RunConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub username: String,
    pub password: Option<String>,
    pub host: String,
    pub port: u16,
    pub service: String,
    pub connection_string: Option<String>,
}

impl DatabaseConfig {
    /// Prefers an explicit connection string; otherwise builds the easy
    /// connect form `//host:port/service`.
    pub fn get_connection_string(&self) -> String {
        self.connection_string
            .clone()
            .unwrap_or_else(|| format!("//{}:{}/{}", self.host, self.port, self.service))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LandingConfig {
    /// Directory the files land under: a local path, or the directory
    /// inside the configured container when `azure` is set.
    pub directory: String,
    pub azure: Option<AzureConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AzureConfig {
    pub account: String,
    pub container: String,
    /// Falls back to the AZURE_STORAGE_SAS_TOKEN environment variable.
    pub sas_token: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RunConfig {
    /// Source schema whose tables are landed.
    pub schema: String,
    pub parallel: Option<usize>,
    pub cpu_percent: Option<u8>,
    pub prefetch_rows: Option<u32>,
    pub exclude_tables: Option<Vec<String>>,
    /// When set, the run result is also written here as JSON.
    pub report_path: Option<String>,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<String>,

    // Overrides for ad-hoc runs
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub host: Option<String>,
    #[arg(long)]
    pub port: Option<u16>,
    #[arg(long)]
    pub service: Option<String>,
    #[arg(long)]
    pub schema: Option<String>,
    #[arg(short, long)]
    pub directory: Option<String>,
    #[arg(long)]
    pub parallel: Option<usize>,
    #[arg(long)]
    pub report: Option<String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: AppConfig = if path.ends_with(".json") {
            serde_json::from_str(&contents)
                .map_err(|e| LandingError::Config(format!("{}: {}", path, e)))?
        } else {
            serde_yaml::from_str(&contents)
                .map_err(|e| LandingError::Config(format!("{}: {}", path, e)))?
        };

        Ok(config)
    }

    pub fn merge_cli(&mut self, args: &CliArgs) {
        if let Some(u) = &args.username {
            self.database.username = u.clone();
        }
        if let Some(p) = &args.password {
            self.database.password = Some(p.clone());
        }
        if let Some(h) = &args.host {
            self.database.host = h.clone();
        }
        if let Some(p) = args.port {
            self.database.port = p;
        }
        if let Some(s) = &args.service {
            self.database.service = s.clone();
        }
        if let Some(s) = &args.schema {
            self.run.schema = s.clone();
        }
        if let Some(d) = &args.directory {
            self.landing.directory = d.clone();
        }
        if let Some(p) = args.parallel {
            self.run.parallel = Some(p);
        }
        if let Some(r) = &args.report {
            self.run.report_path = Some(r.clone());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.run.schema.trim().is_empty() {
            return Err(LandingError::Config("run.schema must not be empty".into()));
        }
        if self.landing.directory.trim().is_empty() {
            return Err(LandingError::Config(
                "landing.directory must not be empty".into(),
            ));
        }
        if self.database.username.trim().is_empty() {
            return Err(LandingError::Config(
                "database.username must not be empty".into(),
            ));
        }
        if self.database.connection_string.is_none()
            && (self.database.host.trim().is_empty() || self.database.service.trim().is_empty())
        {
            return Err(LandingError::Config(
                "database.host and database.service are required without a connection_string"
                    .into(),
            ));
        }
        if let Some(azure) = &self.landing.azure {
            if azure.account.trim().is_empty() || azure.container.trim().is_empty() {
                return Err(LandingError::Config(
                    "landing.azure.account and landing.azure.container must not be empty".into(),
                ));
            }
        }
        Ok(())
    }

    /// True when `table` is in the configured exclusion list, compared
    /// case-insensitively.
    pub fn is_excluded(&self, table: &str) -> bool {
        self.run
            .exclude_tables
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|t| t.eq_ignore_ascii_case(table))
    }
}
