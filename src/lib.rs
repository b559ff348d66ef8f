//! Download portal server library
//!
//! Manifest loading, traversal-safe file serving and the deployment health
//! check, shared by the `portal-server` and `cli-health-check` binaries.

pub mod config;
pub mod downloads;
pub mod health;
pub mod server;

// Re-export commonly used types for convenience
pub use downloads::{validate_filename, DownloadsLayout, ManifestStore};
pub use health::{HealthOptions, HealthReport, HealthVerifier};
pub use server::{make_app, run_server, RequestsLoggingLevel};
