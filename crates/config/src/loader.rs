//! Configuration loading utilities

use crate::Settings;
use config::{Config, Environment, File};

pub type ConfigLoadError = config::ConfigError;

/// Default config file, without extension (toml, json and yaml are all accepted)
pub const DEFAULT_CONFIG_PATH: &str = "config/config";

/// Load configuration from the file named by `CONFIG_PATH` (or the default
/// `config/config`), overlaid with `FANOUT__`-prefixed environment variables
pub fn load_config() -> Result<Settings, ConfigLoadError> {
	let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
	load_config_from(&path)
}

/// Load configuration from an explicit file path
///
/// A missing file is not an error; every section has defaults. Environment
/// overrides use `__` as separator, e.g. `FANOUT__SERVER__PORT=8080`.
pub fn load_config_from(path: &str) -> Result<Settings, ConfigLoadError> {
	let s = Config::builder()
		.add_source(File::with_name(path).required(false))
		.add_source(
			Environment::with_prefix("FANOUT")
				.prefix_separator("__")
				.separator("__")
				.try_parsing(true),
		)
		.build()?;

	s.try_deserialize()
}
