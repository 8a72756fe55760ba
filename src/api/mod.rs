//! HTTP surface: redirect and add-route handlers plus their route wiring

pub mod services;
