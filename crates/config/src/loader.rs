//! Config file discovery and parsing

use crate::settings::{lowercase_keys, Settings};
use figment::{
    providers::{Format, Json, Serialized, Toml, Yaml},
    value::{Dict, Value},
    Figment,
};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};
use types::{Result, SettingsError};

/// Supported config file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
    Toml,
    /// `KEY=value` lines, as in `.env` files
    Env,
}

impl ConfigFormat {
    /// Every format, in discovery order
    pub const ALL: [ConfigFormat; 4] = [
        ConfigFormat::Json,
        ConfigFormat::Yaml,
        ConfigFormat::Toml,
        ConfigFormat::Env,
    ];

    /// File extensions recognised for this format
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            ConfigFormat::Json => &["json"],
            ConfigFormat::Yaml => &["yaml", "yml"],
            ConfigFormat::Toml => &["toml"],
            ConfigFormat::Env => &["env"],
        }
    }

    /// Format for a file extension, if supported
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extensions().contains(&ext.as_str()))
    }

    /// Format for a path's extension, if supported
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl FromStr for ConfigFormat {
    type Err = SettingsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dotenv" => Ok(ConfigFormat::Env),
            other => Self::from_extension(other).ok_or_else(|| SettingsError::UnsupportedConfigType {
                config_type: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extensions()[0])
    }
}

impl Settings {
    /// Find the config file, parse it and replace the file layer with its contents
    pub fn read_in_config(&mut self) -> Result<()> {
        let path = self.resolve_config_file()?;
        let format = self.format_for(&path)?;

        info!(path = %path.display(), %format, "Reading config file");
        let dict = parse_file(&path, format)?;

        self.file = Figment::from(Serialized::defaults(lowercase_keys(dict)));
        self.config_file_used = Some(path);
        Ok(())
    }

    /// Explicit config file if set, otherwise the first match on the search paths
    pub fn resolve_config_file(&self) -> Result<PathBuf> {
        match &self.config_file {
            Some(file) if file.is_file() => Ok(file.clone()),
            Some(file) => Err(SettingsError::FileNotFound {
                path: file.display().to_string(),
            }),
            None => self.find_config_file(),
        }
    }

    fn configured_format(&self) -> Result<Option<ConfigFormat>> {
        self.config_type
            .as_deref()
            .map(str::parse::<ConfigFormat>)
            .transpose()
    }

    fn find_config_file(&self) -> Result<PathBuf> {
        let configured = self.configured_format()?;
        let extensions: Vec<&str> = match configured {
            Some(format) => format.extensions().to_vec(),
            None => ConfigFormat::ALL
                .iter()
                .flat_map(|format| format.extensions().iter().copied())
                .collect(),
        };

        for dir in &self.config_paths {
            debug!(dir = %dir.display(), name = %self.config_name, "Searching for config file");

            for ext in &extensions {
                let candidate = dir.join(format!("{}.{}", self.config_name, ext));
                if candidate.is_file() {
                    return Ok(candidate);
                }
            }

            if configured.is_some() {
                let candidate = dir.join(&self.config_name);
                if candidate.is_file() {
                    return Ok(candidate);
                }
            }
        }

        Err(SettingsError::ConfigFileNotFound {
            name: self.config_name.clone(),
            paths: self
                .config_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
        })
    }

    fn format_for(&self, path: &Path) -> Result<ConfigFormat> {
        // An explicit file is parsed by its own extension when that is recognised.
        if self.config_file.is_some() {
            if let Some(format) = ConfigFormat::from_path(path) {
                return Ok(format);
            }
        }

        if let Some(format) = self.configured_format()? {
            return Ok(format);
        }

        ConfigFormat::from_path(path).ok_or_else(|| SettingsError::UnsupportedConfigType {
            config_type: path
                .extension()
                .map(|ext| ext.to_string_lossy().into_owned())
                .unwrap_or_default(),
        })
    }
}

fn parse_file(path: &Path, format: ConfigFormat) -> Result<Dict> {
    let figment = match format {
        ConfigFormat::Json => Figment::from(Json::string(&read_file(path)?)),
        ConfigFormat::Yaml => Figment::from(Yaml::string(&read_file(path)?)),
        ConfigFormat::Toml => Figment::from(Toml::string(&read_file(path)?)),
        ConfigFormat::Env => return parse_dotenv(path),
    };

    figment.extract::<Dict>().map_err(|e| SettingsError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| SettingsError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

// dotenv keeps its line iterator private, so `from_path_iter` is the only way
// to read a file without exporting it into the process environment.
#[allow(deprecated)]
fn parse_dotenv(path: &Path) -> Result<Dict> {
    let parse_error = |message: String| SettingsError::Parse {
        path: path.display().to_string(),
        message,
    };

    let mut dict = Dict::new();
    for item in dotenv::from_path_iter(path).map_err(|e| parse_error(e.to_string()))? {
        let (key, value) = item.map_err(|e| parse_error(e.to_string()))?;
        dict.insert(key, Value::from(value));
    }
    Ok(dict)
}
