//! Application context consumed by the bundle

use std::path::{Path, PathBuf};
use types::{BundleError, BundleResult};

/// Values the host application hands to the bundle at resolution time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppContext {
    app_path: Option<PathBuf>,
}

impl AppContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the application path searched for the config file
    pub fn with_app_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.app_path = Some(path.into());
        self
    }

    /// Context whose application path is the current working directory
    pub fn from_current_dir() -> std::io::Result<Self> {
        Ok(Self::new().with_app_path(std::env::current_dir()?))
    }

    pub fn app_path(&self) -> Option<&Path> {
        self.app_path.as_deref()
    }

    /// The application path, or `UndefinedAppPath` when none was set
    pub fn require_app_path(&self) -> BundleResult<&Path> {
        self.app_path().ok_or(BundleError::UndefinedAppPath)
    }
}
