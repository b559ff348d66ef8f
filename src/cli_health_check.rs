//! Verifies that a deployed download portal is consistent.
//!
//! Exits with status 0 when every check passes and 1 otherwise, so it can
//! gate a deployment.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use portal_server::config::{AppConfig, CliConfig, FileConfig};
use portal_server::{HealthOptions, HealthVerifier};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the same TOML config file the server uses.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory statically served by the site.
    #[clap(long, value_parser = parse_path)]
    pub public_dir: Option<PathBuf>,

    /// Directory holding the downloadable files and the manifest.
    #[clap(long, value_parser = parse_path)]
    pub downloads_dir: Option<PathBuf>,

    /// File name of the manifest inside the downloads directory.
    #[clap(long)]
    pub manifest_file_name: Option<String>,

    /// Path of the portal page. Defaults to `<public-dir>/downloads.html`.
    #[clap(long, value_parser = parse_path)]
    pub portal_page: Option<PathBuf>,

    /// Also require every manifest entry's file to be present.
    #[clap(long)]
    pub check_entry_files: bool,
}

async fn run(cli_args: CliArgs) -> Result<bool> {
    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let cli_config = CliConfig {
        public_dir: cli_args.public_dir,
        downloads_dir: cli_args.downloads_dir,
        manifest_file_name: cli_args.manifest_file_name,
        portal_page: cli_args.portal_page,
        check_entry_files: cli_args.check_entry_files,
        ..Default::default()
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    println!("Running download portal health checks...\n");
    let verifier = HealthVerifier::new(
        config.layout,
        HealthOptions {
            check_entry_files: config.health.check_entry_files,
        },
    );
    let report = verifier.run_all().await;
    println!("{}", report);

    if report.passed() {
        println!("\nAll health checks passed!");
    } else {
        println!(
            "\n{} check(s) failed. Downloads may not work correctly.",
            report.failed_count()
        );
    }
    Ok(report.passed())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli_args = CliArgs::parse();

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init();

    match run(cli_args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            error!("Health check could not run: {:#}", err);
            eprintln!("Health check could not run: {:#}", err);
            ExitCode::from(1)
        }
    }
}
