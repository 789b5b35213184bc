use std::{
	collections::HashMap,
	env,
	fmt::{Display, Formatter},
	fs,
	path::PathBuf,
};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::prelude::*;

/// The prefix of every environment variable read by the provider
const ENV_PREFIX: &str = "KUBERMATIC";
/// The environment variable naming an optional configuration file
const CONFIG_FILE_ENV: &str = "KUBERMATIC_CONFIG";
/// The API used when no host is configured
const DEFAULT_HOST: &str = "https://localhost";

/// The configuration of the provider. Settings are layered, each layer
/// overriding the previous one: the defaults, the file named by
/// `KUBERMATIC_CONFIG`, the `KUBERMATIC_*` environment variables, and finally
/// the provider block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProviderSettings {
	/// The URL of the API
	pub host: Url,
	/// The bearer token used to authenticate with the API
	#[serde(default)]
	pub token: Option<String>,
	/// A file to read the bearer token from, if `token` is not set
	#[serde(default)]
	pub token_path: Option<PathBuf>,
	/// How much the provider logs
	pub log_level: LogLevel,
	/// Whether to skip verifying the TLS certificate of the API
	pub insecure: bool,
}

/// The settings in the provider block. Any setting that is set here overrides
/// the files and the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderOverrides {
	/// The URL of the API
	pub host: Option<String>,
	/// The bearer token
	pub token: Option<String>,
	/// A file to read the bearer token from
	pub token_path: Option<String>,
	/// How much the provider logs
	pub log_level: Option<String>,
	/// Whether to skip verifying the TLS certificate of the API
	pub insecure: Option<bool>,
}

impl ProviderSettings {
	/// Loads the settings from the configuration file, the process environment
	/// and the provider block.
	pub fn parse(overrides: ProviderOverrides) -> Result<Self, AppError> {
		Self::parse_from(env::vars().collect(), overrides)
	}

	/// Loads the settings with the given variables standing in for the process
	/// environment
	fn parse_from(
		vars: HashMap<String, String>,
		overrides: ProviderOverrides,
	) -> Result<Self, AppError> {
		trace!("Reading provider configuration");

		let mut builder = Config::builder()
			.set_default("host", DEFAULT_HOST)?
			.set_default("log_level", LogLevel::Info.to_string())?
			.set_default("insecure", false)?;
		if let Some(file) = vars.get(CONFIG_FILE_ENV) {
			debug!("Reading provider configuration from `{}`", file);
			builder = builder.add_source(File::with_name(file).required(true));
		}

		let vars = vars
			.into_iter()
			.filter(|(name, _)| name != CONFIG_FILE_ENV)
			.collect();
		builder
			.add_source(
				Environment::with_prefix(ENV_PREFIX)
					.prefix_separator("_")
					.try_parsing(true)
					.source(Some(vars)),
			)
			.set_override_option("host", overrides.host)?
			.set_override_option("token", overrides.token)?
			.set_override_option("token_path", overrides.token_path)?
			.set_override_option("log_level", overrides.log_level)?
			.set_override_option("insecure", overrides.insecure)?
			.build()?
			.try_deserialize()
			.map_err(AppError::from)
	}

	/// The bearer token to authenticate with: `token` if it is set, else the
	/// trimmed contents of the file at `token_path`.
	pub fn resolve_token(&self) -> Result<String, AppError> {
		if let Some(token) = self.token.as_ref().filter(|token| !token.is_empty()) {
			return Ok(token.clone());
		}

		let Some(path) = &self.token_path else {
			return Err(ConfigError::Message(
				"either `token` or `token_path` must be set".to_string(),
			)
			.into());
		};
		let token = fs::read_to_string(path).map_err(|source| AppError::Io {
			path: path.clone(),
			source,
		})?;
		let token = token.trim();
		if token.is_empty() {
			return Err(ConfigError::Message(format!(
				"the token file `{}` is empty",
				path.display()
			))
			.into());
		}
		Ok(token.to_string())
	}

	/// Settings pointing at a host that is never contacted
	#[cfg(test)]
	pub(crate) fn for_tests() -> Self {
		Self {
			host: Url::parse("https://kubermatic.test").expect("valid URL"),
			token: Some("test-token".to_string()),
			token_path: None,
			log_level: LogLevel::Trace,
			insecure: false,
		}
	}
}

/// How much the provider logs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
	/// Everything, including every request made
	Trace,
	/// Details of the lifecycle of every resource
	Debug,
	/// Only what changed
	Info,
	/// Only things that might need attention
	Warn,
	/// Only errors
	Error,
}

impl From<LogLevel> for LevelFilter {
	fn from(level: LogLevel) -> Self {
		match level {
			LogLevel::Trace => LevelFilter::TRACE,
			LogLevel::Debug => LevelFilter::DEBUG,
			LogLevel::Info => LevelFilter::INFO,
			LogLevel::Warn => LevelFilter::WARN,
			LogLevel::Error => LevelFilter::ERROR,
		}
	}
}

impl Display for LogLevel {
	fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
		write!(
			formatter,
			"{}",
			match self {
				LogLevel::Trace => "trace",
				LogLevel::Debug => "debug",
				LogLevel::Info => "info",
				LogLevel::Warn => "warn",
				LogLevel::Error => "error",
			}
		)
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use super::*;

	fn vars(vars: &[(&str, &str)]) -> HashMap<String, String> {
		vars.iter()
			.map(|(name, value)| (name.to_string(), value.to_string()))
			.collect()
	}

	#[test]
	fn uses_defaults() {
		let settings = ProviderSettings::parse_from(HashMap::new(), Default::default()).unwrap();

		assert_eq!(settings.host.as_str(), "https://localhost/");
		assert_eq!(settings.log_level, LogLevel::Info);
		assert!(!settings.insecure);
		assert_eq!(settings.token, None);
	}

	#[test]
	fn environment_overrides_defaults() {
		let settings = ProviderSettings::parse_from(
			vars(&[
				("KUBERMATIC_HOST", "https://dev.kubermatic.io"),
				("KUBERMATIC_TOKEN_PATH", "/tmp/token"),
				("KUBERMATIC_LOG_LEVEL", "debug"),
				("KUBERMATIC_INSECURE", "true"),
				("HOME", "/root"),
			]),
			Default::default(),
		)
		.unwrap();

		assert_eq!(settings.host.as_str(), "https://dev.kubermatic.io/");
		assert_eq!(settings.token_path, Some(PathBuf::from("/tmp/token")));
		assert_eq!(settings.log_level, LogLevel::Debug);
		assert!(settings.insecure);
	}

	#[test]
	fn provider_block_overrides_environment() {
		let settings = ProviderSettings::parse_from(
			vars(&[("KUBERMATIC_HOST", "https://dev.kubermatic.io")]),
			ProviderOverrides {
				host: Some("https://prod.kubermatic.io".to_string()),
				token: Some("abc".to_string()),
				..Default::default()
			},
		)
		.unwrap();

		assert_eq!(settings.host.as_str(), "https://prod.kubermatic.io/");
		assert_eq!(settings.resolve_token().unwrap(), "abc");
	}

	#[test]
	fn reads_the_configuration_file() {
		let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
		writeln!(file, "host = \"https://file.kubermatic.io\"\nlog_level = \"warn\"").unwrap();

		let settings = ProviderSettings::parse_from(
			vars(&[
				(CONFIG_FILE_ENV, file.path().to_str().unwrap()),
				("KUBERMATIC_LOG_LEVEL", "error"),
			]),
			Default::default(),
		)
		.unwrap();

		assert_eq!(settings.host.as_str(), "https://file.kubermatic.io/");
		assert_eq!(settings.log_level, LogLevel::Error);
	}

	#[test]
	fn invalid_hosts_are_rejected() {
		let error = ProviderSettings::parse_from(
			vars(&[("KUBERMATIC_HOST", "not a url")]),
			Default::default(),
		)
		.unwrap_err();

		assert!(matches!(error, AppError::Config(_)));
	}

	#[test]
	fn reads_the_token_from_a_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "  secret-token  ").unwrap();

		let settings = ProviderSettings {
			token: None,
			token_path: Some(file.path().to_path_buf()),
			..ProviderSettings::for_tests()
		};

		assert_eq!(settings.resolve_token().unwrap(), "secret-token");
	}

	#[test]
	fn a_token_is_required() {
		let settings = ProviderSettings {
			token: None,
			token_path: None,
			..ProviderSettings::for_tests()
		};

		assert_eq!(
			settings.resolve_token().unwrap_err().to_string(),
			"invalid provider configuration: either `token` or `token_path` must be set"
		);
	}

	#[test]
	fn missing_token_files_are_reported() {
		let settings = ProviderSettings {
			token: None,
			token_path: Some(PathBuf::from("/nonexistent/kubermatic/token")),
			..ProviderSettings::for_tests()
		};

		assert!(matches!(
			settings.resolve_token().unwrap_err(),
			AppError::Io { .. }
		));
	}
}
