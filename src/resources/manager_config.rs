// file: src/resources/manager_config.rs
// version: 1.0.0
// guid: 719eaa58-69ac-4c3d-879a-5a7daeb6b35f

//! The manager bootstrap configuration data source

use crate::config::{ConfigLoader, ManagerBootstrapConfig};
use crate::Result;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Where a manager bootstrap configuration comes from
pub trait ManagerConfigSource {
    fn fetch(&self) -> Result<ManagerBootstrapConfig>;
}

/// Reads the configuration from a YAML or JSON file
pub struct FileConfigSource {
    path: PathBuf,
    loader: ConfigLoader,
}

impl FileConfigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_loader(path, ConfigLoader::new())
    }

    pub fn with_loader(path: impl Into<PathBuf>, loader: ConfigLoader) -> Self {
        Self {
            path: path.into(),
            loader,
        }
    }
}

impl ManagerConfigSource for FileConfigSource {
    fn fetch(&self) -> Result<ManagerBootstrapConfig> {
        self.loader.load_manager_config(&self.path)
    }
}

/// Serves an already-built configuration
pub struct StaticConfigSource(pub ManagerBootstrapConfig);

impl ManagerConfigSource for StaticConfigSource {
    fn fetch(&self) -> Result<ManagerBootstrapConfig> {
        Ok(self.0.clone())
    }
}

/// Data source handler: fetch once, validate, hand back
pub struct ManagerConfigDataSource<S> {
    source: S,
}

impl<S: ManagerConfigSource> ManagerConfigDataSource<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn read(&self) -> Result<ManagerBootstrapConfig> {
        let config = self.source.fetch()?;
        debug!("Fetched manager bootstrap configuration: {}", config);

        if let Err(failure) = config.validate() {
            warn!(violations = failure.len(), "Manager bootstrap configuration rejected");
            return Err(failure.into());
        }

        info!(hostname = %config.hostname, "Manager bootstrap configuration accepted");
        Ok(config)
    }
}
