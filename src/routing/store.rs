use arc_swap::ArcSwap;
use parking_lot::{Mutex, MutexGuard};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use super::table::RouteTable;
use crate::errors::{HashlinkerError, Result};
use crate::storage::UrlConfig;

/// Routing state shared by all request handlers
///
/// Readers go through [`lookup`](Self::lookup) and never block: the table is
/// swapped atomically after each rebuild. Writers must hold a [`RouteWriter`],
/// which keeps the config mutex for its whole lifetime.
pub struct RouteStore {
    config_path: PathBuf,
    key_length: usize,
    config: Mutex<UrlConfig>,
    table: ArcSwap<RouteTable>,
}

impl RouteStore {
    pub fn new(config: UrlConfig, config_path: impl Into<PathBuf>, key_length: usize) -> Self {
        let table = RouteTable::build(&config, key_length);
        info!(
            "Route table built: {} keys from {} urls",
            table.len(),
            config.len()
        );
        Self {
            config_path: config_path.into(),
            key_length,
            config: Mutex::new(config),
            table: ArcSwap::from_pointee(table),
        }
    }

    /// Load the config file and build the initial table
    pub fn open(config_path: impl Into<PathBuf>, key_length: usize) -> Result<Self> {
        let config_path = config_path.into();
        let config = UrlConfig::load(&config_path)?;
        Ok(Self::new(config, config_path, key_length))
    }

    pub fn lookup(&self, key: &str) -> Option<String> {
        self.table.load().get(key).map(str::to_string)
    }

    pub fn table(&self) -> Arc<RouteTable> {
        self.table.load_full()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn snapshot(&self) -> UrlConfig {
        self.config.lock().clone()
    }

    /// Acquire the single writer lock. Released when the writer is dropped.
    pub fn lock(&self) -> RouteWriter<'_> {
        RouteWriter {
            store: self,
            config: self.config.lock(),
        }
    }
}

/// Exclusive access to the route config
pub struct RouteWriter<'a> {
    store: &'a RouteStore,
    config: MutexGuard<'a, UrlConfig>,
}

impl RouteWriter<'_> {
    /// Append `urls`, persist the whole config, then rebuild and publish the table.
    ///
    /// No deduplication or URL validation happens here. If persisting fails the
    /// in-memory config and table stay untouched.
    pub fn append(&mut self, urls: &[String]) -> Result<Arc<RouteTable>> {
        let mut next = self.config.clone();
        for url in urls {
            info!("adding route: {}", url);
            next.urls.push(url.clone());
        }

        if let Err(e) = next.save(&self.store.config_path) {
            error!(
                "Failed to persist {} new urls, keeping previous routes: {}",
                urls.len(),
                e
            );
            return Err(HashlinkerError::persistence(e.message().to_string()));
        }

        let table = Arc::new(RouteTable::build(&next, self.store.key_length));
        *self.config = next;
        self.store.table.store(table.clone());
        info!("Route table rebuilt with {} keys", table.len());
        Ok(table)
    }
}
