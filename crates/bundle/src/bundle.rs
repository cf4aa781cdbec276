//! Settings bundle: default options, flag-set stage and settings stage

use crate::context::AppContext;
use crate::flags::FlagSet;
use config::{apply_all, default_options, ConfigOption, Settings};
use std::ffi::OsString;
use tracing::{debug, error, info};
use types::{BundleError, BundleResult};

/// Name of the settings bundle
pub const BUNDLE_NAME: &str = "settings";

/// Owns the configuration object until it is resolved and handed to the application
#[derive(Debug, Clone)]
pub struct Bundle {
    settings: Settings,
}

impl Bundle {
    /// Create a bundle with the default options followed by `options`
    pub fn new<I>(options: I) -> Self
    where
        I: IntoIterator<Item = ConfigOption>,
    {
        let mut all = default_options();
        all.extend(options);
        Self::with_config(all)
    }

    /// Create a bundle configured only by `options`
    pub fn with_config<I>(options: I) -> Self
    where
        I: IntoIterator<Item = ConfigOption>,
    {
        let mut settings = Settings::new();
        apply_all(&mut settings, options);
        Self { settings }
    }

    pub fn name(&self) -> &'static str {
        BUNDLE_NAME
    }

    /// The configuration object as set up so far
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable access, e.g. for registering defaults before resolution
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Parse the bundle's flags from the process arguments
    pub fn provide_flag_set<I, T>(args: I) -> BundleResult<FlagSet>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        FlagSet::parse_args(args)
    }

    /// Read the config file and hand the finished settings over
    ///
    /// The application path is added as a search path, and a non-empty
    /// `--config` value replaces discovery with that file.
    pub fn provide_settings(mut self, ctx: &AppContext, flags: &FlagSet) -> BundleResult<Settings> {
        let app_path = ctx.require_app_path()?;
        self.settings.add_config_path(app_path);

        if let Some(config_file) = flags.config_file() {
            debug!(config_file, "Using config file from flags");
            self.settings.set_config_file(config_file);
        }

        if let Err(e) = self.settings.read_in_config() {
            let file = self.attempted_file();
            error!(file = %file, error = %e, "Failed to read config file");
            return Err(BundleError::read_config(file, e));
        }

        info!(
            bundle = BUNDLE_NAME,
            file = ?self.settings.config_file_used(),
            "Settings loaded"
        );
        Ok(self.settings)
    }

    /// Parse flags from `args`, then resolve the settings
    pub fn build<I, T>(self, ctx: &AppContext, args: I) -> BundleResult<Settings>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let flags = Self::provide_flag_set(args)?;
        self.provide_settings(ctx, &flags)
    }

    fn attempted_file(&self) -> String {
        match self.settings.config_file() {
            Some(path) => path.display().to_string(),
            None => self.settings.config_name().to_string(),
        }
    }
}

impl Default for Bundle {
    fn default() -> Self {
        Self::with_config(default_options())
    }
}
