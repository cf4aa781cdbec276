//! Layered configuration object
//!
//! Values resolve from four layers, highest precedence first: explicit
//! overrides, environment variables (when automatic env is enabled), the
//! config file, and defaults. Keys are dot-separated and case-insensitive.

use crate::replacer::KeyReplacer;
use figment::{
    providers::Serialized,
    value::{Dict, Value},
    Figment,
};
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::trace;
use types::{Result, SettingsError};

/// Default file stem searched for on the config paths
pub const DEFAULT_CONFIG_NAME: &str = "config";

/// Configuration object merging defaults, config file, environment and overrides
#[derive(Debug, Clone)]
pub struct Settings {
    pub(crate) automatic_env: bool,
    pub(crate) env_prefix: Option<String>,
    pub(crate) env_key_replacer: KeyReplacer,
    pub(crate) config_file: Option<PathBuf>,
    pub(crate) config_name: String,
    pub(crate) config_paths: Vec<PathBuf>,
    pub(crate) config_type: Option<String>,
    pub(crate) config_file_used: Option<PathBuf>,
    pub(crate) defaults: Figment,
    pub(crate) file: Figment,
    pub(crate) overrides: Figment,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            automatic_env: false,
            env_prefix: None,
            env_key_replacer: KeyReplacer::default(),
            config_file: None,
            config_name: DEFAULT_CONFIG_NAME.to_string(),
            config_paths: Vec::new(),
            config_type: None,
            config_file_used: None,
            defaults: Figment::new(),
            file: Figment::new(),
            overrides: Figment::new(),
        }
    }
}

impl Settings {
    /// Create an empty configuration object
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the environment on every key read
    pub fn automatic_env(&mut self) {
        self.automatic_env = true;
    }

    /// Prefix prepended (with `_`) to every environment variable name.
    /// An empty prefix clears it.
    pub fn set_env_prefix(&mut self, prefix: impl Into<String>) {
        let prefix = prefix.into();
        self.env_prefix = (!prefix.is_empty()).then_some(prefix);
    }

    /// Replacer applied to environment variable names
    pub fn set_env_key_replacer(&mut self, replacer: KeyReplacer) {
        self.env_key_replacer = replacer;
    }

    /// Explicit config file, bypassing discovery. An empty path clears it.
    pub fn set_config_file(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.config_file = (!path.as_os_str().is_empty()).then_some(path);
    }

    /// File stem used by discovery
    pub fn set_config_name(&mut self, name: impl Into<String>) {
        self.config_name = name.into();
    }

    /// Add a directory to the discovery search paths
    pub fn add_config_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if path.as_os_str().is_empty() || self.config_paths.contains(&path) {
            return;
        }
        trace!(path = %path.display(), "adding config search path");
        self.config_paths.push(path);
    }

    /// Config format name. Not validated until the file is read.
    pub fn set_config_type(&mut self, config_type: impl Into<String>) {
        let config_type = config_type.into();
        self.config_type = (!config_type.is_empty()).then_some(config_type);
    }

    /// Set an override value, taking precedence over every other layer
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        let layer = std::mem::take(&mut self.overrides);
        self.overrides = layer.merge(Serialized::default(&key.to_lowercase(), value.into()));
    }

    /// Set a default value, used when no other layer supplies the key
    pub fn set_default(&mut self, key: &str, value: impl Into<Value>) {
        let layer = std::mem::take(&mut self.defaults);
        self.defaults = layer.merge(Serialized::default(&key.to_lowercase(), value.into()));
    }

    pub fn is_automatic_env(&self) -> bool {
        self.automatic_env
    }

    pub fn env_prefix(&self) -> Option<&str> {
        self.env_prefix.as_deref()
    }

    pub fn env_key_replacer(&self) -> &KeyReplacer {
        &self.env_key_replacer
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    pub fn config_name(&self) -> &str {
        &self.config_name
    }

    pub fn config_paths(&self) -> &[PathBuf] {
        &self.config_paths
    }

    pub fn config_type(&self) -> Option<&str> {
        self.config_type.as_deref()
    }

    /// The file read by the last successful `read_in_config`
    pub fn config_file_used(&self) -> Option<&Path> {
        self.config_file_used.as_deref()
    }

    /// Environment variable name consulted for `key`
    pub fn env_key(&self, key: &str) -> String {
        let name = match &self.env_prefix {
            Some(prefix) => format!("{}_{}", prefix, key),
            None => key.to_string(),
        };
        self.env_key_replacer.replace(&name.to_uppercase())
    }

    /// Resolve `key` through every layer. Keys no layer knows about can
    /// still be answered by the environment.
    pub fn get(&self, key: &str) -> Option<Value> {
        let key = key.to_lowercase();
        self.resolved()
            .find_value(&key)
            .ok()
            .or_else(|| self.env_value(&key))
    }

    /// Whether any layer supplies `key`
    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Resolve `key` as a string. Scalars are rendered, sections yield `None`.
    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(_, s) => Some(s),
            Value::Char(_, c) => Some(c.to_string()),
            value @ (Value::Num(..) | Value::Bool(..)) => serde_json::to_string(&value).ok(),
            _ => None,
        }
    }

    /// Resolve `key` as a boolean, accepting `true`/`false`/`1`/`0` strings
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };

        match value {
            Value::Bool(_, b) => Ok(Some(b)),
            Value::String(_, ref s) => match s.to_lowercase().as_str() {
                "true" | "t" | "1" => Ok(Some(true)),
                "false" | "f" | "0" => Ok(Some(false)),
                _ => Err(invalid_value(key, format!("'{}' is not a boolean", s))),
            },
            other => other
                .deserialize::<i64>()
                .map(|n| Some(n != 0))
                .map_err(|e| invalid_value(key, e.to_string())),
        }
    }

    /// Resolve `key` as a signed integer, parsing string values
    pub fn get_i64(&self, key: &str) -> Result<Option<i64>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(_, s)) => s
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|e| invalid_value(key, e.to_string())),
            Some(value) => value
                .deserialize::<i64>()
                .map(Some)
                .map_err(|e| invalid_value(key, e.to_string())),
        }
    }

    /// Resolve `key` as a float, parsing string values
    pub fn get_f64(&self, key: &str) -> Result<Option<f64>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(_, s)) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|e| invalid_value(key, e.to_string())),
            Some(value) => value
                .deserialize::<f64>()
                .map(Some)
                .map_err(|e| invalid_value(key, e.to_string())),
        }
    }

    /// Resolve `key` as a list of strings. A string value is split on whitespace.
    pub fn get_string_list(&self, key: &str) -> Result<Option<Vec<String>>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(_, s)) => {
                Ok(Some(s.split_whitespace().map(str::to_string).collect()))
            }
            Some(Value::Array(_, items)) => Ok(Some(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(_, s) => Some(s),
                        other => serde_json::to_string(&other).ok(),
                    })
                    .collect(),
            )),
            Some(_) => Err(invalid_value(key, "not a list")),
        }
    }

    /// Resolve `key` and deserialize it into `T`
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.get(key)
            .map(|value| value.deserialize::<T>())
            .transpose()
            .map_err(|e| invalid_value(key, e.to_string()))
    }

    /// Every leaf key known to the defaults, file and override layers, sorted
    pub fn all_keys(&self) -> Vec<String> {
        let mut keys = BTreeSet::new();
        if let Ok(dict) = self.static_layers().extract::<Dict>() {
            collect_leaf_keys(&dict, "", &mut keys);
        }
        keys.into_iter().collect()
    }

    /// Nested map of every known key, resolved with the same precedence as `get`
    pub fn all_settings(&self) -> Result<Dict> {
        self.resolved()
            .extract()
            .map_err(|e| SettingsError::Extract(e.to_string()))
    }

    /// Deserialize the resolved settings into a typed structure
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T> {
        self.resolved()
            .extract()
            .map_err(|e| SettingsError::Extract(e.to_string()))
    }

    /// Defaults, file and overrides, later layers replacing earlier ones
    fn static_layers(&self) -> Figment {
        Figment::new()
            .merge(self.defaults.clone())
            .merge(self.file.clone())
            .merge(self.overrides.clone())
    }

    /// Every layer merged. Env values sit between the file and the overrides,
    /// one per key the other layers know about.
    fn resolved(&self) -> Figment {
        let mut figment = Figment::new()
            .merge(self.defaults.clone())
            .merge(self.file.clone());

        if self.automatic_env {
            for key in self.all_keys() {
                if let Some(value) = self.env_value(&key) {
                    figment = figment.merge(Serialized::default(&key, value));
                }
            }
        }

        figment.merge(self.overrides.clone())
    }

    fn env_value(&self, key: &str) -> Option<Value> {
        if !self.automatic_env {
            return None;
        }

        let name = self.env_key(key);
        let raw = std::env::var(&name).ok().filter(|v| !v.is_empty())?;
        trace!(key, env = %name, "resolved key from environment");
        Some(Value::from(raw))
    }
}

fn invalid_value(key: &str, message: impl Into<String>) -> SettingsError {
    SettingsError::InvalidValue {
        key: key.to_string(),
        message: message.into(),
    }
}

/// Lowercase every key of a nested dictionary
pub(crate) fn lowercase_keys(dict: Dict) -> Dict {
    dict.into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::Dict(tag, inner) => Value::Dict(tag, lowercase_keys(inner)),
                other => other,
            };
            (key.to_lowercase(), value)
        })
        .collect()
}

fn collect_leaf_keys(dict: &Dict, prefix: &str, keys: &mut BTreeSet<String>) {
    for (key, value) in dict {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            Value::Dict(_, inner) if !inner.is_empty() => collect_leaf_keys(inner, &path, keys),
            _ => {
                keys.insert(path);
            }
        }
    }
}
