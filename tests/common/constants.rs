//! Shared constants for end-to-end tests
//!
//! When the test site changes (file names, manifest content), update only
//! this file.

#![allow(dead_code)]

// ============================================================================
// Test Site Content
// ============================================================================

/// Listed in the manifest and deployed under the downloads root
pub const GUIDE_FILENAME: &str = "guide.pdf";

pub const GUIDE_NAME: &str = "Citizen Guide";

pub const GUIDE_VERSION: &str = "1.0";

/// Minimal PDF header so content sniffing recognises it
pub const GUIDE_BYTES: &[u8] = b"%PDF-1.4\n% test guide\n";

/// Listed in the manifest but not deployed
pub const MAP_FILENAME: &str = "regional-map.zip";

pub const MAP_NAME: &str = "Regional Map";

pub const MAP_VERSION: &str = "2024.3";

/// Lives next to the public directory, never reachable over HTTP
pub const SECRET_FILENAME: &str = "secret.txt";

pub const SECRET_CONTENT: &str = "do not serve me";

pub const PORTAL_PAGE_CONTENT: &str = "<!doctype html><title>Downloads</title>";

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
