pub mod keys;
mod settings;

pub use keys::{parse_key_notation, KeyAction, KeyCombo, KeyContext, KeyParseError, KeybindingConfig};
pub use settings::{Config, ConfigError, TomlConfig, EXAMPLE_CONFIG};
