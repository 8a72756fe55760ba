//! On-disk state
//!
//! - `url_config`: the list of destination URLs, the only durable state
//! - `secrets`: credential pair guarding the add-route endpoint

pub(crate) mod fields;
pub mod secrets;
pub mod url_config;

pub use secrets::{AuthMode, Secrets, SecretsStore};
pub use url_config::UrlConfig;
