//! Server mode
//!
//! Builds the actix-web server for the configured route mode, binds the
//! listener and waits for either the server to exit or Ctrl+C.

use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::services::{dynamic_routes, static_routes};
use crate::config::{RouteMode, StaticConfig};
use crate::runtime::lifetime::{self, startup::StartupContext};

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: Arc<StaticConfig>) -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup(&config).map_err(|e| {
        tracing::error!("Server startup failed: {:#}", e);
        e
    })?;

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let workers = config.server.workers.clamp(1, 32);

    let server = match startup.mode {
        RouteMode::Dynamic => build_dynamic_server(startup, &bind_address, workers)?,
        RouteMode::Static => build_static_server(startup, &bind_address, workers)?,
    };
    warn!(
        "Starting {} server at http://{} with {} workers",
        config.routes.mode, bind_address, workers
    );

    let handle = server.handle();
    tokio::select! {
        res = server => {
            res.context("HTTP server exited with an error")?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            handle.stop(true).await;
            info!("Graceful shutdown complete");
        }
    }

    Ok(())
}

fn build_dynamic_server(
    startup: StartupContext,
    bind_address: &str,
    workers: usize,
) -> Result<Server> {
    let StartupContext {
        store,
        redirect,
        new_route,
        post_path,
        max_body_bytes,
        ..
    } = startup;
    info!(
        "Add-route endpoint: POST {} (body limit {} bytes)",
        post_path, max_body_bytes
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(redirect.clone()))
            .app_data(web::Data::new(new_route.clone()))
            .configure(dynamic_routes(&post_path, max_body_bytes))
    })
    .workers(workers)
    .disable_signals()
    .bind(bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    Ok(server)
}

fn build_static_server(
    startup: StartupContext,
    bind_address: &str,
    workers: usize,
) -> Result<Server> {
    let table = startup.store.table();
    let redirect = startup.redirect;
    info!("Static mode: registering {} fixed routes", table.len());

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(redirect.clone()))
            .configure(static_routes(&table))
    })
    .workers(workers)
    .disable_signals()
    .bind(bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    Ok(server)
}
