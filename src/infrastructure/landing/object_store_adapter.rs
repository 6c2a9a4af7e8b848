//! Infrastructure adapter for landing files in an object store.
//!
//! Built on the `object_store` crate so the same adapter serves Azure
//! (account + container, the ADLS-shaped deployment) and the in-memory
//! store used in tests. Object stores have a flat namespace: `put` always
//! overwrites, and "ensuring the directory" amounts to probing that the
//! store is reachable under the configured prefix.

use crate::config::AzureConfig;
use crate::domain::errors::{LandingError, Result};
use crate::ports::landing_port::LandingTarget;
use log::debug;
use object_store::azure::{AzureConfigKey, MicrosoftAzureBuilder};
use object_store::{path::Path as ObjectPath, ObjectStore};
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Concrete implementation of `LandingTarget` over any `ObjectStore`.
///
/// The pipeline core is synchronous; this adapter owns a small tokio
/// runtime and bridges each storage call with `block_on`.
pub struct ObjectStoreLandingAdapter {
    store: Arc<dyn ObjectStore>,
    directory: String,
    runtime: Runtime,
}

impl ObjectStoreLandingAdapter {
    pub fn new(store: Arc<dyn ObjectStore>, directory: &str) -> Result<Self> {
        let runtime = Runtime::new()
            .map_err(|e| LandingError::Config(format!("landing runtime: {}", e)))?;
        Ok(Self {
            store,
            directory: directory.trim_matches('/').to_string(),
            runtime,
        })
    }

    /// Builds the adapter against an Azure storage account. The SAS token
    /// comes from the config or the `AZURE_STORAGE_SAS_TOKEN` environment
    /// variable; further credentials are picked up from the environment the
    /// way the builder documents.
    pub fn for_azure(azure: &AzureConfig, directory: &str) -> Result<Self> {
        let mut builder = MicrosoftAzureBuilder::from_env()
            .with_account(&azure.account)
            .with_container_name(&azure.container);

        let sas_token = azure
            .sas_token
            .clone()
            .or_else(|| std::env::var("AZURE_STORAGE_SAS_TOKEN").ok());
        if let Some(token) = sas_token {
            builder = builder.with_config(AzureConfigKey::SasKey, token);
        }

        let store = builder
            .build()
            .map_err(|e| LandingError::Config(format!("Azure landing target: {}", e)))?;

        Self::new(Arc::new(store), directory)
    }

    fn object_path(&self, name: &str) -> ObjectPath {
        if self.directory.is_empty() {
            ObjectPath::from(name)
        } else {
            ObjectPath::from(format!("{}/{}", self.directory, name))
        }
    }
}

impl LandingTarget for ObjectStoreLandingAdapter {
    fn ensure_directory(&self) -> Result<()> {
        let prefix = ObjectPath::from(self.directory.as_str());
        self.runtime
            .block_on(self.store.list_with_delimiter(Some(&prefix)))
            .map_err(|e| LandingError::Directory(format!("{}: {}", self.directory, e)))?;
        debug!("Landing prefix reachable: {}", self.directory);
        Ok(())
    }

    fn write_file(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.object_path(name);
        self.runtime
            .block_on(self.store.put(&path, bytes.to_vec().into()))
            .map(|_| ())
            .map_err(|e| LandingError::Upload {
                object: name.to_string(),
                reason: e.to_string(),
            })
    }
}
