//! Test server lifecycle management
//!
//! Each test gets an isolated server with its own temporary site.

use super::constants::*;
use super::fixtures::{create_test_site, TestSite};
use portal_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use portal_server::DownloadsLayout;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

/// Test server instance with an isolated site on disk
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// On-disk layout, tests may change files while the server runs
    pub layout: DownloadsLayout,

    // Private fields - keep resources alive until drop
    _site: TestSite,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port, serving [`create_test_site`].
    ///
    /// # Panics
    ///
    /// Panics if the site can not be created, the port can not be bound or
    /// the server doesn't become ready within timeout.
    pub async fn spawn() -> Self {
        let site = create_test_site().expect("Failed to create test site");
        Self::spawn_with_site(site).await
    }

    pub async fn spawn_with_site(site: TestSite) -> Self {
        let layout = site.layout.clone();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            requests_logging_level: RequestsLoggingLevel::None,
            content_cache_age_sec: 0, // Disable caching in tests
            production: false,
        };
        let app = make_app(config, &layout);

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .expect("Server failed");
        });

        let server = Self {
            base_url,
            layout,
            _site: site,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling /api/health
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client
                .get(format!("{}/api/health", self.base_url))
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
