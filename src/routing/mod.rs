//! Short key derivation and the in-memory route table
//!
//! `table` builds the key → URL mapping from a [`UrlConfig`](crate::storage::UrlConfig);
//! `store` owns the config and the current table and funnels every mutation
//! through a single lock.

pub mod store;
pub mod table;

pub use store::{RouteStore, RouteWriter};
pub use table::{Collision, DEFAULT_KEY_LENGTH, RouteTable, short_key};
