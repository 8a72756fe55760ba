//! Server modes
//!
//! Both modes serve the same redirect semantics; only `dynamic` exposes the
//! add-route endpoint. See [`RouteMode`](crate::config::RouteMode).

pub mod server;

pub use server::run_server;
