//! Error types for the settings bundle

use thiserror::Error;

/// Errors raised by the configuration object while reading config files
/// or resolving values
#[derive(Error, Debug)]
pub enum SettingsError {
    /// No config file matched the configured name on any search path
    #[error("Config file \"{name}\" not found in {paths:?}")]
    ConfigFileNotFound { name: String, paths: Vec<String> },

    /// The explicit config file does not exist
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    /// Config type string (or file extension) is not a supported format
    #[error("Unsupported config type: {config_type}")]
    UnsupportedConfigType { config_type: String },

    /// Reading the config file from disk failed
    #[error("Unable to read config file {path}: {message}")]
    Io { path: String, message: String },

    /// The config file could not be parsed in its format
    #[error("Unable to parse config file {path}: {message}")]
    Parse { path: String, message: String },

    /// A value exists but has the wrong shape for the requested type
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Extraction of a typed structure from the resolved settings failed
    #[error("Unable to extract settings: {0}")]
    Extract(String),
}

/// Errors raised while resolving the bundle
#[derive(Error, Debug)]
pub enum BundleError {
    /// The application context carries no app path
    #[error("app.path is undefined")]
    UndefinedAppPath,

    /// Command-line flags could not be parsed
    #[error("Unable to parse flags: {0}")]
    FlagParse(String),

    /// Reading the config file failed
    #[error("Unable to read config file: '{file}'")]
    ReadConfig {
        file: String,
        #[source]
        source: SettingsError,
    },
}

/// Result type alias for configuration object operations
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Result type alias for bundle resolution
pub type BundleResult<T> = std::result::Result<T, BundleError>;

impl BundleError {
    /// Wrap a read failure with the file name that was attempted
    pub fn read_config(file: impl Into<String>, source: SettingsError) -> Self {
        BundleError::ReadConfig {
            file: file.into(),
            source,
        }
    }
}
