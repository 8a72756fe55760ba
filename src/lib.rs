//! hashlinker - a hash-keyed URL shortener
//!
//! Destination URLs live in a JSON file (`{"urls": [...]}`). Each URL is
//! reachable under the first few hex characters of its SHA-1 digest; unknown
//! keys redirect to a fixed fallback page. An authenticated endpoint appends
//! new URLs, rewrites the file and rebuilds the table.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: Offline commands (`key`, `list`, `config generate`)
//!
//! # Architecture
//! - `storage`: url config and secrets files
//! - `routing`: short key derivation, route table, writer-locked store
//! - `api`: HTTP handlers and route wiring
//! - `config`: static configuration (TOML + `HL__*` env)
//! - `runtime`: startup, server modes, shutdown
//! - `system`: logging

#[cfg(feature = "server")]
pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod routing;
#[cfg(feature = "server")]
pub mod runtime;
pub mod storage;
pub mod system;
