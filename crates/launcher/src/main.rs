//! Settings launcher - main application entry point
//!
//! Resolves the settings bundle at startup and serves commands from the
//! finished settings.

use anyhow::{Context, Result};
use bundle::{AppContext, Bundle, ConfigFlags, FlagSet};
use clap::Parser;
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;

use app::{Application, Command};

/// Load layered settings and inspect them
#[derive(Debug, Parser)]
#[command(name = "launcher", author, version)]
struct Cli {
    #[command(flatten)]
    config: ConfigFlags,

    /// Directory searched for the config file (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    app_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    // Load .env before logging so RUST_LOG and LOG_FORMAT can come from it
    let dotenv_result = dotenv::dotenv();

    let cli = Cli::parse();

    init_logging()?;

    match dotenv_result {
        Ok(path) => info!("Loaded environment variables from {}", path.display()),
        Err(e) if !e.not_found() => warn!("Could not load .env file: {}", e),
        Err(_) => {}
    }

    info!("Starting launcher v{}", env!("CARGO_PKG_VERSION"));

    let ctx = match cli.app_path {
        Some(path) => AppContext::new().with_app_path(path),
        None => AppContext::from_current_dir().context("Failed to determine current directory")?,
    };

    let bundle = Bundle::default();
    info!("Initialising bundle: {}", bundle.name());

    let settings = bundle
        .provide_settings(&ctx, &FlagSet::from(cli.config))
        .context("Failed to initialise settings bundle")?;

    let app = Application::new(settings);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    app.run(&cli.command, &mut out)
}

/// Initialize logging based on environment variables
fn init_logging() -> Result<()> {
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    // Logs go to stderr so command output on stdout stays machine-readable
    match log_format.as_str() {
        "pretty" => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to initialize pretty logging")?;
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to initialize JSON logging")?;
        }
    }

    info!(level = %log_level, format = %log_format, "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_global_config_flag() {
        let cli = Cli::try_parse_from(["launcher", "get", "db.host", "-c", "/etc/app.json"]).unwrap();
        assert_eq!(cli.config.config, "/etc/app.json");
        assert_eq!(cli.command, Command::Get { key: "db.host".into() });
        assert_eq!(FlagSet::from(cli.config).config_file(), Some("/etc/app.json"));
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["launcher", "show"]).unwrap();
        assert!(cli.config.config.is_empty());
        assert!(cli.app_path.is_none());
        assert_eq!(cli.command, Command::Show);
    }

    #[test]
    fn test_cli_app_path() {
        let cli = Cli::try_parse_from(["launcher", "--app-path", "/srv/app", "show"]).unwrap();
        assert_eq!(cli.app_path, Some(PathBuf::from("/srv/app")));
    }
}
