use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::dialog::{DialogDefaults, Rgb, ScrollStyle, SupersedePolicy};
use crate::ui::components::theme::ThemeOverrides;
use crate::util::paths::config_path;

use super::keys::{parse_key_notation, KeyAction, KeybindingConfig};

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Defaults applied to dialog requests
    pub dialog: DialogDefaults,
    /// Built-in theme name
    pub theme_name: Option<String>,
    /// Color overrides applied on top of the named theme
    pub theme_overrides: ThemeOverrides,
    /// Keybinding configuration
    pub keybindings: KeybindingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialog: DialogDefaults::default(),
            theme_name: None,
            theme_overrides: ThemeOverrides::default(),
            keybindings: KeybindingConfig::defaults(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// TOML representation of the `[dialog]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlDialogConfig {
    pub cancel_text: Option<String>,
    pub scroll_max_height: Option<u16>,
    pub supersede: Option<SupersedePolicy>,
}

/// TOML representation of theme configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlThemeConfig {
    /// Built-in theme name
    pub name: Option<String>,
    pub background: Option<Rgb>,
    pub text: Option<Rgb>,
    pub accent: Option<Rgb>,
}

/// One key or a list of keys bound to an action
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TomlKeySpec {
    One(String),
    Many(Vec<String>),
}

impl TomlKeySpec {
    fn notations(&self) -> Vec<&str> {
        match self {
            TomlKeySpec::One(key) => vec![key.as_str()],
            TomlKeySpec::Many(keys) => keys.iter().map(String::as_str).collect(),
        }
    }
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub dialog: Option<TomlDialogConfig>,
    pub theme: Option<TomlThemeConfig>,
    /// Action name to key notation(s)
    pub keys: Option<HashMap<String, TomlKeySpec>>,
}

impl Config {
    /// Load configuration from the default location, merging with defaults.
    ///
    /// Writes the bundled example on first run.
    pub fn load() -> Result<Self, ConfigError> {
        let config_file = config_path();
        if !config_file.exists() {
            Self::create_default_config(&config_file);
        }
        Self::load_from(&config_file)
    }

    /// Load configuration from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let toml_config = toml::from_str::<TomlConfig>(&contents).map_err(|source| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;

        tracing::debug!(path = %path.display(), "Config loaded");
        Ok(Self::from_toml(toml_config))
    }

    /// Merge a parsed TOML config onto the defaults.
    pub fn from_toml(toml_config: TomlConfig) -> Self {
        let mut config = Config::default();

        if let Some(dialog) = toml_config.dialog {
            if let Some(cancel_text) = dialog.cancel_text {
                config.dialog.cancel_text = cancel_text;
            }
            if let Some(max_height) = dialog.scroll_max_height {
                config.dialog.scroll_style = ScrollStyle::with_max_height(max_height);
            }
            if let Some(supersede) = dialog.supersede {
                config.dialog.supersede = supersede;
            }
        }

        if let Some(theme) = toml_config.theme {
            config.theme_name = theme.name;
            config.theme_overrides = ThemeOverrides {
                background: theme.background,
                text: theme.text,
                accent: theme.accent,
            };
        }

        if let Some(keys) = toml_config.keys {
            apply_keybindings(&mut config.keybindings, &keys);
        }

        config
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::warn!(error = %e, "Failed to create config directory");
                return;
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!(error = %e, "Failed to write default config");
        }
    }
}

/// Rebind each named action. Unknown actions and unparseable keys are skipped.
fn apply_keybindings(config: &mut KeybindingConfig, keys: &HashMap<String, TomlKeySpec>) {
    for (action_name, spec) in keys {
        let Some(action) = KeyAction::from_name(action_name) else {
            tracing::warn!(action = %action_name, "Unknown action in [keys]");
            continue;
        };

        let mut combos = Vec::new();
        for notation in spec.notations() {
            match parse_key_notation(notation) {
                Ok(combo) => combos.push(combo),
                Err(e) => tracing::warn!(
                    action = %action_name,
                    key = notation,
                    error = %e,
                    "Invalid key notation in [keys]"
                ),
            }
        }

        if !combos.is_empty() {
            config.rebind(action, combos);
        }
    }
}
