//! Host application holding the resolved settings

use anyhow::{anyhow, Context, Result};
use clap::Subcommand;
use config::{Settings, Value};
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info};

/// Commands served from the resolved settings
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print every resolved setting as JSON
    Show,
    /// Print the value of one key
    Get {
        /// Dot-separated key, e.g. `db.host`
        key: String,
    },
}

/// Main application, sharing the settings read-only once they are built
#[derive(Debug, Clone)]
pub struct Application {
    settings: Arc<Settings>,
}

impl Application {
    /// Create a new application instance from finished settings
    pub fn new(settings: Settings) -> Self {
        info!(
            keys = settings.all_keys().len(),
            file = ?settings.config_file_used(),
            "Application initialized"
        );
        Self {
            settings: Arc::new(settings),
        }
    }

    /// Shared handle to the settings
    pub fn settings(&self) -> Arc<Settings> {
        self.settings.clone()
    }

    /// Run a command, writing its output to `out`
    pub fn run<W: Write>(&self, command: &Command, out: &mut W) -> Result<()> {
        debug!(?command, "Running command");

        match command {
            Command::Show => {
                let all = self
                    .settings
                    .all_settings()
                    .context("Failed to resolve settings")?;
                serde_json::to_writer_pretty(&mut *out, &all)
                    .context("Failed to render settings")?;
                writeln!(out)?;
            }
            Command::Get { key } => {
                let value = self
                    .settings
                    .get(key)
                    .ok_or_else(|| anyhow!("Key is not set: {}", key))?;
                write_value(out, &value)?;
            }
        }

        Ok(())
    }
}

fn write_value<W: Write>(out: &mut W, value: &Value) -> Result<()> {
    match value {
        Value::String(_, s) => writeln!(out, "{}", s)?,
        other => {
            serde_json::to_writer_pretty(&mut *out, other).context("Failed to render value")?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> Application {
        let mut settings = Settings::new();
        settings.set_default("db.host", "localhost");
        settings.set_default("db.port", 5432);
        settings.set("name", "demo");
        Application::new(settings)
    }

    fn run(app: &Application, command: Command) -> Result<String> {
        let mut out = Vec::new();
        app.run(&command, &mut out)?;
        Ok(String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn test_show_prints_all_settings() {
        let output = run(&app(), Command::Show).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["db"]["host"], "localhost");
        assert_eq!(parsed["db"]["port"], 5432);
        assert_eq!(parsed["name"], "demo");
    }

    #[test]
    fn test_get_scalar_and_section() {
        let app = app();

        let output = run(&app, Command::Get { key: "db.host".into() }).unwrap();
        assert_eq!(output, "localhost\n");

        let output = run(&app, Command::Get { key: "db".into() }).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["port"], 5432);
    }

    #[test]
    fn test_get_missing_key_fails() {
        let err = run(&app(), Command::Get { key: "nope".into() }).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_settings_are_shared() {
        let app = app();
        let shared = app.settings();
        assert_eq!(Arc::strong_count(&shared), 2);
        assert_eq!(shared.get_string("name").as_deref(), Some("demo"));
    }
}
