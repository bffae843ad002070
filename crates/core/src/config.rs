use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

/// Effective application configuration: defaults, then an optional TOML
/// file, then `DESKFLOW_*` environment overrides, then programmatic
/// overrides, validated last.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub identity: IdentityConfig,
    pub logging: LoggingConfig,
}

/// Connection settings for the workflow process-engine API.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Base URL up to and excluding the `/process/...` segment.
    pub base_url: String,
    /// Bearer credential issued by the identity provider. The core
    /// never refreshes it; a 401/403 surfaces as an auth error.
    pub token: SecretString,
    pub timeout_secs: u64,
}

/// The acting employee. Supplied by deployment configuration since the
/// identity provider is an external collaborator.
#[derive(Clone, Debug)]
pub struct IdentityConfig {
    pub emp_number: String,
    pub emp_name: String,
    pub email: String,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub emp_number: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

const DEFAULT_CONFIG_FILE: &str = "deskflow.toml";

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:8080/mr/api".to_string(),
                token: String::new().into(),
                timeout_secs: 30,
            },
            identity: IdentityConfig {
                emp_number: String::new(),
                emp_name: String::new(),
                email: String::new(),
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    api: Option<ApiPatch>,
    identity: Option<IdentityPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiPatch {
    base_url: Option<String>,
    token: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct IdentityPatch {
    emp_number: Option<String>,
    emp_name: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(api) = patch.api {
            if let Some(base_url) = api.base_url {
                self.api.base_url = base_url;
            }
            if let Some(token_value) = api.token {
                self.api.token = token_value.into();
            }
            if let Some(timeout_secs) = api.timeout_secs {
                self.api.timeout_secs = timeout_secs;
            }
        }

        if let Some(identity) = patch.identity {
            if let Some(emp_number) = identity.emp_number {
                self.identity.emp_number = emp_number;
            }
            if let Some(emp_name) = identity.emp_name {
                self.identity.emp_name = emp_name;
            }
            if let Some(email) = identity.email {
                self.identity.email = email;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("DESKFLOW_API_BASE_URL") {
            self.api.base_url = value;
        }
        if let Some(value) = read_env("DESKFLOW_API_TOKEN") {
            self.api.token = value.into();
        }
        if let Some(value) = read_env("DESKFLOW_API_TIMEOUT_SECS") {
            self.api.timeout_secs = parse_u64("DESKFLOW_API_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("DESKFLOW_IDENTITY_EMP_NUMBER") {
            self.identity.emp_number = value;
        }
        if let Some(value) = read_env("DESKFLOW_IDENTITY_EMP_NAME") {
            self.identity.emp_name = value;
        }
        if let Some(value) = read_env("DESKFLOW_IDENTITY_EMAIL") {
            self.identity.email = value;
        }
        if let Some(value) = read_env("DESKFLOW_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = read_env("DESKFLOW_LOG_FORMAT") {
            self.logging.format = value.parse()?;
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(base_url) = overrides.base_url {
            self.api.base_url = base_url;
        }
        if let Some(token_value) = overrides.token {
            self.api.token = token_value.into();
        }
        if let Some(emp_number) = overrides.emp_number {
            self.identity.emp_number = emp_number;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "api.base_url must be an http(s) URL, got `{}`",
                self.api.base_url
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Validation("api.timeout_secs must be positive".to_string()));
        }
        if self.identity.emp_number.trim().is_empty() {
            return Err(ConfigError::Validation(
                "identity.emp_number is required (who is acting?)".to_string(),
            ));
        }
        Ok(())
    }
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => path.exists().then(|| path.to_path_buf()),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            default.exists().then(|| default.to_path_buf())
        }
    }
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
    toml::from_str(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidEnvOverride { key: key.to_owned(), value: value.to_owned() })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn overrides_with_identity() -> ConfigOverrides {
        ConfigOverrides { emp_number: Some("TR100958".to_owned()), ..Default::default() }
    }

    #[test]
    fn defaults_fail_validation_without_identity() {
        let error = AppConfig::load(LoadOptions::default())
            .expect_err("identity.emp_number must be required");
        assert!(matches!(error, ConfigError::Validation(_)));
    }

    #[test]
    fn overrides_satisfy_validation() {
        let config = AppConfig::load(LoadOptions {
            overrides: overrides_with_identity(),
            ..Default::default()
        })
        .expect("valid config");

        assert_eq!(config.identity.emp_number, "TR100958");
        assert_eq!(config.api.base_url, "http://localhost:8080/mr/api");
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn toml_patch_applies_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "[api]\nbase_url = \"https://itsm.example.com/mr/api\"\ntimeout_secs = 5\n\n\
             [identity]\nemp_number = \"TR200111\"\nemp_name = \"Field Tech\"\n\n\
             [logging]\nlevel = \"debug\"\nformat = \"json\""
        )
        .expect("write config");

        let config = AppConfig::load(LoadOptions {
            config_path: Some(file.path().to_path_buf()),
            require_file: true,
            overrides: ConfigOverrides::default(),
        })
        .expect("valid config");

        assert_eq!(config.api.base_url, "https://itsm.example.com/mr/api");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.identity.emp_name, "Field Tech");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn missing_required_file_is_reported() {
        let error = AppConfig::load(LoadOptions {
            config_path: Some(PathBuf::from("/nonexistent/deskflow.toml")),
            require_file: true,
            overrides: overrides_with_identity(),
        })
        .expect_err("missing file must fail");

        assert!(matches!(error, ConfigError::MissingConfigFile(_)));
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let error = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                base_url: Some("ftp://example.com".to_owned()),
                ..overrides_with_identity()
            },
            ..Default::default()
        })
        .expect_err("scheme must be http(s)");

        assert!(matches!(error, ConfigError::Validation(_)));
    }
}
