//! Application lifecycle: startup preparation, server modes, shutdown

pub mod lifetime;
pub mod modes;

pub use modes::run_server;
