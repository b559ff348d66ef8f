mod file_config;

pub use file_config::{FileConfig, HealthConfig};

use crate::downloads::{validate_filename, DownloadsLayout, DEFAULT_MANIFEST_FILE_NAME};
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub public_dir: Option<PathBuf>,
    pub downloads_dir: Option<PathBuf>,
    pub manifest_file_name: Option<String>,
    pub portal_page: Option<PathBuf>,
    pub port: u16,
    pub max_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub production: bool,
    pub url_file: Option<PathBuf>,
    pub check_entry_files: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub layout: DownloadsLayout,
    pub port: u16,
    pub max_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub production: bool,
    pub url_file: Option<PathBuf>,
    pub health: HealthSettings,
}

#[derive(Debug, Clone, Default)]
pub struct HealthSettings {
    pub check_entry_files: bool,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let public_dir = file
            .public_dir
            .map(PathBuf::from)
            .or_else(|| cli.public_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("public_dir must be specified via --public-dir or in config file")
            })?;

        let mut layout = DownloadsLayout::from_public_dir(&public_dir);
        if let Some(downloads_dir) = file
            .downloads_dir
            .map(PathBuf::from)
            .or_else(|| cli.downloads_dir.clone())
        {
            layout.manifest_path = downloads_dir.join(DEFAULT_MANIFEST_FILE_NAME);
            layout.downloads_dir = downloads_dir;
        }
        if let Some(name) = file
            .manifest_file_name
            .or_else(|| cli.manifest_file_name.clone())
        {
            if validate_filename(&name).is_err() {
                bail!("manifest_file_name must be a plain file name: {:?}", name);
            }
            layout.manifest_path = layout.downloads_dir.join(name);
        }
        if let Some(portal_page) = file
            .portal_page
            .map(PathBuf::from)
            .or_else(|| cli.portal_page.clone())
        {
            layout.portal_page = portal_page;
        }

        let port = file.port.unwrap_or(cli.port);
        // A range ending below the first port means "only try `port`".
        let max_port = file.max_port.unwrap_or(cli.max_port).max(port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let content_cache_age_sec = file
            .content_cache_age_sec
            .unwrap_or(cli.content_cache_age_sec);
        let production = file.production.unwrap_or(cli.production);
        let url_file = file
            .url_file
            .map(PathBuf::from)
            .or_else(|| cli.url_file.clone());

        let health_file = file.health.unwrap_or_default();
        let health = HealthSettings {
            check_entry_files: health_file
                .check_entry_files
                .unwrap_or(cli.check_entry_files),
        };

        Ok(Self {
            layout,
            port,
            max_port,
            logging_level,
            content_cache_age_sec,
            production,
            url_file,
            health,
        })
    }

    /// The server needs an existing public directory to serve from.
    pub fn ensure_public_dir(&self) -> Result<()> {
        let public_dir = &self.layout.public_dir;
        if !public_dir.exists() {
            bail!("Public directory does not exist: {:?}", public_dir);
        }
        if !public_dir.is_dir() {
            bail!("public_dir is not a directory: {:?}", public_dir);
        }
        Ok(())
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
