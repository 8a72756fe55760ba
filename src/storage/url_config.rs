use serde::de::MapAccess;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, error};

use super::fields::{self, FoldedFields};
use crate::errors::{HashlinkerError, Result};

/// Persisted list of destination URLs: `{"urls": [...]}`
///
/// Order matters: the route table is built by walking `urls` front to back,
/// so on a key collision the later entry wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UrlConfig {
    pub urls: Vec<String>,
}

impl FoldedFields for UrlConfig {
    const EXPECTING: &'static str = "an object with a `urls` list";

    fn read_field<'de, A: MapAccess<'de>>(
        &mut self,
        key: &str,
        map: &mut A,
    ) -> std::result::Result<bool, A::Error> {
        if key != "urls" {
            return Ok(false);
        }
        self.urls = fields::string_list(map)?;
        Ok(true)
    }
}

impl<'de> Deserialize<'de> for UrlConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        fields::deserialize_folded(deserializer)
    }
}

impl UrlConfig {
    pub fn new(urls: Vec<String>) -> Self {
        Self { urls }
    }

    /// Read and parse the config file. An empty `urls` list is rejected.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read(path).map_err(|e| {
            error!("Failed to read config file {}: {}", path.display(), e);
            let msg = format!("could not read config file {}: {}", path.display(), e);
            match e.kind() {
                ErrorKind::NotFound => HashlinkerError::not_found(msg),
                _ => HashlinkerError::file_operation(msg),
            }
        })?;

        let config: UrlConfig = serde_json::from_slice(&content).map_err(|e| {
            HashlinkerError::serialization(format!(
                "could not parse config file {}: {}",
                path.display(),
                e
            ))
        })?;

        if config.urls.is_empty() {
            return Err(HashlinkerError::validation(format!(
                "config file {} must contain at least one url",
                path.display()
            )));
        }

        debug!("Loaded {} urls from {}", config.urls.len(), path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Overwrite the config file with the full document.
    ///
    /// The write is not atomic: a crash mid-write can leave a truncated file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json()?;
        fs::write(path, json).map_err(|e| {
            HashlinkerError::file_operation(format!(
                "could not write config file {}: {}",
                path.display(),
                e
            ))
        })?;
        debug!("Wrote {} urls to {}", self.urls.len(), path.display());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
