use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::services::{NewRouteSettings, RedirectSettings};
use crate::config::{RouteMode, StaticConfig};
use crate::routing::RouteStore;
use crate::storage::{AuthMode, SecretsStore};

/// Everything the HTTP workers share
pub struct StartupContext {
    pub store: Arc<RouteStore>,
    pub redirect: RedirectSettings,
    pub new_route: NewRouteSettings,
    pub mode: RouteMode,
    pub post_path: String,
    pub max_body_bytes: usize,
}

/// 准备服务器启动的上下文
///
/// Loads the url config (fatal when missing, malformed or empty) and builds
/// the initial route table.
pub fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    config.validate().context("Invalid configuration")?;

    let routes = &config.routes;
    let store = RouteStore::open(&routes.config_path, routes.key_length)
        .with_context(|| format!("config error - {}", routes.config_path))?;

    let table = store.table();
    if !table.collisions().is_empty() {
        warn!(
            "{} short key collisions while building routes; later urls won",
            table.collisions().len()
        );
    }

    if routes.mode == RouteMode::Dynamic && config.auth.mode == AuthMode::Any {
        warn!(
            "auth.mode = \"any\": a request matching only one of the two credentials is accepted"
        );
    }

    info!(
        "Loaded {} routes from {} in {:?}",
        table.len(),
        routes.config_path,
        start_time.elapsed()
    );

    Ok(StartupContext {
        store: Arc::new(store),
        redirect: RedirectSettings {
            fallback_url: routes.fallback_url.clone(),
        },
        new_route: NewRouteSettings {
            secrets: SecretsStore::new(&routes.secrets_path),
            auth_mode: config.auth.mode,
        },
        mode: routes.mode,
        post_path: routes.post_path.clone(),
        max_body_bytes: routes.max_body_bytes,
    })
}
