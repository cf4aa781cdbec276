//! Layered configuration object for the settings bundle
//!
//! This crate provides [`Settings`], a key/value store merging defaults,
//! config files, environment variables and explicit overrides, along with
//! the options used to set it up and config file discovery.

pub mod loader;
pub mod options;
pub mod replacer;
pub mod settings;

pub use figment::value::{Dict, Value};
pub use loader::ConfigFormat;
pub use options::{apply_all, default_options, ConfigOption};
pub use replacer::KeyReplacer;
pub use settings::Settings;
