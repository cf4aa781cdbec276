//! Command-line flags owned by the bundle

use crate::bundle::BUNDLE_NAME;
use clap::{error::ErrorKind, Args, Parser};
use std::ffi::OsString;
use tracing::debug;
use types::{BundleError, BundleResult};

/// The `--config` flag. Hosts with their own parser can flatten this in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct ConfigFlags {
    /// config file
    #[arg(
        short = 'c',
        long = "config",
        value_name = "PATH",
        default_value = "",
        hide_default_value = true,
        global = true
    )]
    pub config: String,
}

/// Standalone flag set parsed from the process arguments
#[derive(Debug, Clone, Default, PartialEq, Eq, Parser)]
#[command(name = BUNDLE_NAME, disable_version_flag = true)]
pub struct FlagSet {
    #[command(flatten)]
    flags: ConfigFlags,

    /// Positional arguments belonging to the host application
    #[arg(hide = true)]
    args: Vec<String>,
}

impl FlagSet {
    /// Parse full process arguments, the first being the program name.
    /// A help request is not an error: flags before it are kept.
    pub fn parse_args<I, T>(args: I) -> BundleResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

        match Self::try_parse_from(&args) {
            Ok(flag_set) => Ok(flag_set),
            Err(e) if e.kind() == ErrorKind::DisplayHelp => {
                let end = args
                    .iter()
                    .position(|arg| arg == "-h" || arg == "--help")
                    .unwrap_or(args.len());
                debug!("Help requested, keeping flags given before it");
                Self::try_parse_from(&args[..end])
                    .map_err(|e| BundleError::FlagParse(e.to_string()))
            }
            Err(e) => Err(BundleError::FlagParse(e.to_string())),
        }
    }

    pub fn flags(&self) -> &ConfigFlags {
        &self.flags
    }

    /// Explicit config file path, if the flag was given a non-empty value
    pub fn config_file(&self) -> Option<&str> {
        let config = self.flags.config.as_str();
        (!config.is_empty()).then_some(config)
    }
}

impl From<ConfigFlags> for FlagSet {
    fn from(flags: ConfigFlags) -> Self {
        Self {
            flags,
            args: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flag_is_empty() {
        let flag_set = FlagSet::parse_args(["app"]).unwrap();
        assert_eq!(flag_set.config_file(), None);
    }

    #[test]
    fn test_long_and_short_flag() {
        let flag_set = FlagSet::parse_args(["app", "--config", "/etc/app.yaml"]).unwrap();
        assert_eq!(flag_set.config_file(), Some("/etc/app.yaml"));

        let flag_set = FlagSet::parse_args(["app", "-c", "local.json"]).unwrap();
        assert_eq!(flag_set.config_file(), Some("local.json"));

        let flag_set = FlagSet::parse_args(["app", "--config="]).unwrap();
        assert_eq!(flag_set.config_file(), None);
    }

    #[test]
    fn test_positional_args_are_ignored() {
        let flag_set = FlagSet::parse_args(["app", "-c", "x.toml", "serve", "extra"]).unwrap();
        assert_eq!(flag_set.config_file(), Some("x.toml"));
    }

    #[test]
    fn test_help_is_not_an_error() {
        let flag_set = FlagSet::parse_args(["app", "--help"]).unwrap();
        assert_eq!(flag_set, FlagSet::default());
    }

    #[test]
    fn test_help_keeps_earlier_config() {
        let flag_set = FlagSet::parse_args(["app", "-c", "x.json", "-h"]).unwrap();
        assert_eq!(flag_set.config_file(), Some("x.json"));

        let flag_set =
            FlagSet::parse_args(["app", "--config=y.yaml", "--help", "-c", "z.toml"]).unwrap();
        assert_eq!(flag_set.config_file(), Some("y.yaml"));
    }

    #[test]
    fn test_unknown_flag_is_an_error() {
        let err = FlagSet::parse_args(["app", "--bogus"]).unwrap_err();
        assert!(matches!(err, BundleError::FlagParse(_)));
    }

    #[test]
    fn test_missing_value_is_an_error() {
        let err = FlagSet::parse_args(["app", "--config"]).unwrap_err();
        assert!(matches!(err, BundleError::FlagParse(_)));
    }

    #[test]
    fn test_from_host_flags() {
        let flag_set = FlagSet::from(ConfigFlags {
            config: "host.json".to_string(),
        });
        assert_eq!(flag_set.config_file(), Some("host.json"));
        assert_eq!(flag_set.flags().config, "host.json");
    }
}
