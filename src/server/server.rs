use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::path::Path;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::{debug, info, warn};

use axum::{middleware, routing::get, Router};

use super::download_routes::{download_file, download_without_filename, get_downloads, get_health};
use super::{http_cache, log_requests, security_headers, state::ServerState, ServerConfig};
use crate::config::AppConfig;
use crate::downloads::DownloadsLayout;

pub fn make_app(config: ServerConfig, layout: &DownloadsLayout) -> Router {
    let state = ServerState::new(layout);

    let api_routes: Router = Router::new()
        .route("/health", get(get_health))
        .route("/downloads", get(get_downloads))
        .with_state(state.clone());

    // The wildcard keeps every path under /downloads/ away from the static
    // fallback, nested ones included, so each goes through filename validation.
    let download_routes: Router = Router::new()
        .route("/downloads/", get(download_without_filename))
        .route(
            "/downloads/{*filename}",
            get(download_file).layer(middleware::from_fn_with_state(
                config.content_cache_age_sec,
                http_cache,
            )),
        )
        .with_state(state);

    let static_files_service =
        ServeDir::new(&layout.public_dir).append_index_html_on_directories(true);

    Router::new()
        .nest("/api", api_routes)
        .merge(download_routes)
        .fallback_service(static_files_service)
        .layer(middleware::from_fn_with_state(
            config.production,
            security_headers,
        ))
        .layer(middleware::from_fn_with_state(
            config.requests_logging_level,
            log_requests,
        ))
}

/// Binds the first free port in `start_port..=max_port`.
///
/// Falls back to an OS-assigned port when the whole range is taken.
pub async fn bind_first_available(host: &str, start_port: u16, max_port: u16) -> Result<TcpListener> {
    for port in start_port..=max_port {
        match TcpListener::bind((host, port)).await {
            Ok(listener) => return Ok(listener),
            Err(err) if err.kind() == ErrorKind::AddrInUse => {
                debug!("Port {} is in use, trying the next one", port);
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to bind {}:{}", host, port))
            }
        }
    }

    warn!(
        "No free port between {} and {}, using an OS-assigned port",
        start_port, max_port
    );
    TcpListener::bind((host, 0))
        .await
        .with_context(|| format!("Failed to bind {}:0", host))
}

async fn write_url_file(path: &Path, url: &str) {
    if let Err(err) = tokio::fs::write(path, url).await {
        warn!("Could not write server url to {:?}: {}", path, err);
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutting down...");
}

pub async fn run_server(config: AppConfig) -> Result<()> {
    config.ensure_public_dir()?;

    let downloads_dir = &config.layout.downloads_dir;
    if !downloads_dir.exists() {
        tokio::fs::create_dir_all(downloads_dir)
            .await
            .with_context(|| format!("Failed to create downloads directory {:?}", downloads_dir))?;
        info!("Created downloads directory: {:?}", downloads_dir);
    }

    let server_config = ServerConfig {
        requests_logging_level: config.logging_level.clone(),
        content_cache_age_sec: config.content_cache_age_sec,
        production: config.production,
    };
    let app = make_app(server_config, &config.layout);

    let listener = bind_first_available("0.0.0.0", config.port, config.max_port).await?;
    let port = listener.local_addr()?.port();
    let url = format!("http://localhost:{}", port);
    info!("Serving static files from {:?}", config.layout.public_dir);
    info!("Server running at {}", url);

    if let Some(url_file) = &config.url_file {
        write_url_file(url_file, &url).await;
    }

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}
