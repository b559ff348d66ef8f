//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per portal endpoint.
//! When API routes change, update only this file.

#![allow(dead_code)]

use super::constants::*;
use reqwest::Response;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// GET /api/health
    pub async fn health(&self) -> Response {
        self.get_path("/api/health").await
    }

    /// GET /api/downloads
    pub async fn get_downloads(&self) -> Response {
        self.get_path("/api/downloads").await
    }

    /// GET /downloads/{filename}, `filename` is sent percent-encoded
    pub async fn download(&self, filename: &str) -> Response {
        self.get_path(&format!("/downloads/{}", urlencoding::encode(filename)))
            .await
    }

    /// GET on a raw path, sent as written (after URL normalisation by reqwest)
    pub async fn get_path(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("Request failed")
    }
}
