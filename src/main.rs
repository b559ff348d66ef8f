use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use portal_server::config::{AppConfig, CliConfig, FileConfig};
use portal_server::{run_server, RequestsLoggingLevel};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory statically served by the site (contains the portal page).
    #[clap(long, value_parser = parse_path)]
    pub public_dir: Option<PathBuf>,

    /// Directory holding the downloadable files and the manifest.
    /// Defaults to `<public-dir>/downloads`.
    #[clap(long, value_parser = parse_path)]
    pub downloads_dir: Option<PathBuf>,

    /// File name of the manifest inside the downloads directory.
    #[clap(long)]
    pub manifest_file_name: Option<String>,

    /// The first port to try.
    #[clap(short, long, default_value_t = 3000, env = "PORT")]
    pub port: u16,

    /// The last port to try before letting the OS pick one.
    #[clap(long, default_value_t = 3100)]
    pub max_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// The maximum age of downloaded files in client caches, in seconds.
    #[clap(long, default_value_t = 3600)]
    pub content_cache_age_sec: usize,

    /// Send the stricter production security headers.
    #[clap(long)]
    pub production: bool,

    /// Write the URL the server ended up listening on to this file.
    #[clap(long, value_parser = parse_path)]
    pub url_file: Option<PathBuf>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            public_dir: self.public_dir.clone(),
            downloads_dir: self.downloads_dir.clone(),
            manifest_file_name: self.manifest_file_name.clone(),
            portal_page: None,
            port: self.port,
            max_port: self.max_port,
            logging_level: self.logging_level.clone(),
            content_cache_age_sec: self.content_cache_age_sec,
            production: self.production,
            url_file: self.url_file.clone(),
            check_entry_files: false,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!(
        "Downloads root {:?}, manifest {:?}",
        config.layout.downloads_dir, config.layout.manifest_path
    );
    run_server(config).await
}
