//! Options applied to a configuration object at construction time

use crate::replacer::KeyReplacer;
use crate::settings::{Settings, DEFAULT_CONFIG_NAME};
use std::path::PathBuf;

/// Default environment variable prefix
pub const DEFAULT_ENV_PREFIX: &str = "ENV";

/// Default config file format
pub const DEFAULT_CONFIG_TYPE: &str = "json";

/// A single mutation of a [`Settings`]
///
/// Options are applied in order. Later options replace the value set by
/// earlier ones, except `ConfigPath` which adds another search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOption {
    /// Check the environment on every key read
    AutomaticEnv,
    /// Prefix for environment variable names
    EnvPrefix(String),
    /// Substitutions applied to environment variable names
    EnvKeyReplacer(KeyReplacer),
    /// Explicit config file, bypassing discovery
    ConfigFile(PathBuf),
    /// File stem used by discovery
    ConfigName(String),
    /// Additional discovery search path
    ConfigPath(PathBuf),
    /// Config format name
    ConfigType(String),
}

impl ConfigOption {
    /// Apply this option to `settings`
    pub fn apply(self, settings: &mut Settings) {
        match self {
            ConfigOption::AutomaticEnv => settings.automatic_env(),
            ConfigOption::EnvPrefix(prefix) => settings.set_env_prefix(prefix),
            ConfigOption::EnvKeyReplacer(replacer) => settings.set_env_key_replacer(replacer),
            ConfigOption::ConfigFile(path) => settings.set_config_file(path),
            ConfigOption::ConfigName(name) => settings.set_config_name(name),
            ConfigOption::ConfigPath(path) => settings.add_config_path(path),
            ConfigOption::ConfigType(config_type) => settings.set_config_type(config_type),
        }
    }
}

/// Apply `options` to `settings` in order
pub fn apply_all<I>(settings: &mut Settings, options: I)
where
    I: IntoIterator<Item = ConfigOption>,
{
    for option in options {
        option.apply(settings);
    }
}

/// Options used when a bundle is created without an explicit configuration:
/// automatic env, `ENV` prefix, `.` to `_` key replacement, name `config`, type `json`
pub fn default_options() -> Vec<ConfigOption> {
    vec![
        ConfigOption::AutomaticEnv,
        ConfigOption::EnvPrefix(DEFAULT_ENV_PREFIX.to_string()),
        ConfigOption::EnvKeyReplacer(KeyReplacer::dots_to_underscores()),
        ConfigOption::ConfigName(DEFAULT_CONFIG_NAME.to_string()),
        ConfigOption::ConfigType(DEFAULT_CONFIG_TYPE.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn build(options: Vec<ConfigOption>) -> Settings {
        let mut settings = Settings::new();
        apply_all(&mut settings, options);
        settings
    }

    #[test]
    fn test_default_options() {
        let settings = build(default_options());

        assert!(settings.is_automatic_env());
        assert_eq!(settings.env_prefix(), Some("ENV"));
        assert_eq!(settings.env_key_replacer(), &KeyReplacer::dots_to_underscores());
        assert_eq!(settings.config_name(), "config");
        assert_eq!(settings.config_type(), Some("json"));
        assert!(settings.config_file().is_none());
        assert!(settings.config_paths().is_empty());
        assert_eq!(settings.env_key("db.host"), "ENV_DB_HOST");
    }

    #[test]
    fn test_last_write_wins() {
        let sequences = vec![
            vec![
                ConfigOption::ConfigType("json".into()),
                ConfigOption::ConfigType("yaml".into()),
            ],
            vec![
                ConfigOption::EnvPrefix("A".into()),
                ConfigOption::ConfigName("first".into()),
                ConfigOption::EnvPrefix("B".into()),
                ConfigOption::ConfigType("toml".into()),
                ConfigOption::ConfigName("second".into()),
            ],
            vec![
                ConfigOption::ConfigFile("one.json".into()),
                ConfigOption::EnvKeyReplacer(KeyReplacer::new([("-", "_")])),
                ConfigOption::ConfigFile("two.yaml".into()),
                ConfigOption::EnvKeyReplacer(KeyReplacer::dots_to_underscores()),
            ],
        ];

        for options in sequences {
            let settings = build(options.clone());

            let mut prefix = None;
            let mut name = DEFAULT_CONFIG_NAME.to_string();
            let mut config_type = None;
            let mut file = None;
            let mut replacer = KeyReplacer::default();
            for option in options {
                match option {
                    ConfigOption::EnvPrefix(v) => prefix = Some(v),
                    ConfigOption::ConfigName(v) => name = v,
                    ConfigOption::ConfigType(v) => config_type = Some(v),
                    ConfigOption::ConfigFile(v) => file = Some(v),
                    ConfigOption::EnvKeyReplacer(v) => replacer = v,
                    _ => {}
                }
            }

            assert_eq!(settings.env_prefix(), prefix.as_deref());
            assert_eq!(settings.config_name(), name);
            assert_eq!(settings.config_type(), config_type.as_deref());
            assert_eq!(settings.config_file(), file.as_deref());
            assert_eq!(settings.env_key_replacer(), &replacer);
        }
    }

    #[test]
    fn test_config_path_is_additive() {
        let settings = build(vec![
            ConfigOption::ConfigPath("/etc/app".into()),
            ConfigOption::ConfigPath("./conf".into()),
            ConfigOption::ConfigPath("/etc/app".into()),
        ]);

        assert_eq!(
            settings.config_paths(),
            &[Path::new("/etc/app").to_path_buf(), Path::new("./conf").to_path_buf()]
        );
    }

    #[test]
    fn test_user_options_follow_defaults() {
        let mut options = default_options();
        options.push(ConfigOption::ConfigType("yaml".into()));
        options.push(ConfigOption::EnvPrefix("APP".into()));

        let settings = build(options);
        assert_eq!(settings.config_type(), Some("yaml"));
        assert_eq!(settings.env_key("db.host"), "APP_DB_HOST");
    }

    #[test]
    fn test_no_validation_on_apply() {
        let settings = build(vec![ConfigOption::ConfigType("definitely-not-a-format".into())]);
        assert_eq!(settings.config_type(), Some("definitely-not-a-format"));
    }
}
