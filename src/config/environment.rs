//! Application configuration and environment selection.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{ConfigError, ConfigResult};

/// Environment variable naming the environment
pub const ENVIRONMENT_VAR: &str = "FLATRECORD_ENV";

/// Environment variable overriding the hashing secret
pub const HASHING_SECRET_VAR: &str = "FLATRECORD_HASHING_SECRET";

/// Named deployment environments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Staging,
    Production,
}

impl Environment {
    /// Parse an environment name; anything unknown is staging
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "production" => Environment::Production,
            _ => Environment::Staging,
        }
    }

    /// Environment named by `FLATRECORD_ENV`, staging when unset
    pub fn from_env() -> Self {
        std::env::var(ENVIRONMENT_VAR)
            .map(|name| Self::parse(&name))
            .unwrap_or_default()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    /// Built-in settings for this environment
    pub fn defaults(&self) -> AppConfig {
        let (http_port, https_port) = match self {
            Environment::Staging => (3000, 3001),
            Environment::Production => (5000, 5001),
        };

        AppConfig {
            env_name: self.name().to_string(),
            host: default_host(),
            http_port,
            https_port,
            hashing_secret: default_hashing_secret(),
            data_dir: default_data_dir(),
            phone_length: default_phone_length(),
            max_body_bytes: None,
            tls: Some(TlsConfig::default()),
            log_level: default_log_level(),
            log_json: matches!(self, Environment::Production),
        }
    }
}

/// PEM files for the HTTPS listener
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsConfig {
    #[serde(default = "default_cert_path")]
    pub cert_path: PathBuf,

    #[serde(default = "default_key_path")]
    pub key_path: PathBuf,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cert_path: default_cert_path(),
            key_path: default_key_path(),
        }
    }
}

/// Resolved application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppConfig {
    pub env_name: String,
    pub host: String,
    pub http_port: u16,
    pub https_port: u16,
    /// Process-wide key for password digests
    #[serde(skip_serializing)]
    pub hashing_secret: String,
    /// Root of the record store
    pub data_dir: PathBuf,
    /// Exact length of a phone number
    pub phone_length: usize,
    /// Request bodies larger than this are refused; unbounded when unset
    pub max_body_bytes: Option<usize>,
    /// HTTPS is served only when set
    pub tls: Option<TlsConfig>,
    pub log_level: String,
    pub log_json: bool,
}

/// Optional overrides read from a JSON config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub http_port: Option<u16>,
    pub https_port: Option<u16>,
    pub hashing_secret: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub phone_length: Option<usize>,
    pub max_body_bytes: Option<usize>,
    pub tls_enabled: Option<bool>,
    pub tls: Option<TlsConfig>,
    pub log_level: Option<String>,
    pub log_json: Option<bool>,
}

impl ConfigOverrides {
    /// Load overrides from a JSON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Ok(serde_json::from_str(&content)?)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_hashing_secret() -> String {
    "thisIsASecret".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./.data")
}

fn default_phone_length() -> usize {
    10
}

fn default_cert_path() -> PathBuf {
    PathBuf::from("./https/cert.pem")
}

fn default_key_path() -> PathBuf {
    PathBuf::from("./https/key.pem")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Environment::default().defaults()
    }
}

impl AppConfig {
    /// Resolve configuration from the process environment
    ///
    /// `env` wins over `FLATRECORD_ENV`; the optional config file overlays
    /// the environment's defaults and `FLATRECORD_HASHING_SECRET` overrides
    /// the hashing secret.
    pub fn load(env: Option<&str>, config_path: Option<&Path>) -> ConfigResult<Self> {
        let environment = env.map(Environment::parse).unwrap_or_else(Environment::from_env);
        let overrides = match config_path {
            Some(path) => ConfigOverrides::load(path)?,
            None => ConfigOverrides::default(),
        };

        Self::resolve(
            environment,
            overrides,
            std::env::var(HASHING_SECRET_VAR).ok(),
        )
    }

    /// Combine defaults, file overrides and a secret override, then validate
    pub fn resolve(
        environment: Environment,
        overrides: ConfigOverrides,
        hashing_secret: Option<String>,
    ) -> ConfigResult<Self> {
        let mut config = environment.defaults();
        config.apply(overrides);

        if let Some(secret) = hashing_secret {
            config.hashing_secret = secret;
        }

        config.validate()?;
        Ok(config)
    }

    fn apply(&mut self, overrides: ConfigOverrides) {
        let ConfigOverrides {
            host,
            http_port,
            https_port,
            hashing_secret,
            data_dir,
            phone_length,
            max_body_bytes,
            tls_enabled,
            tls,
            log_level,
            log_json,
        } = overrides;

        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = http_port {
            self.http_port = port;
        }
        if let Some(port) = https_port {
            self.https_port = port;
        }
        if let Some(secret) = hashing_secret {
            self.hashing_secret = secret;
        }
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        if let Some(length) = phone_length {
            self.phone_length = length;
        }
        if let Some(limit) = max_body_bytes {
            self.max_body_bytes = Some(limit);
        }
        if let Some(tls) = tls {
            self.tls = Some(tls);
        }
        if tls_enabled == Some(false) {
            self.tls = None;
        }
        if let Some(level) = log_level {
            self.log_level = level;
        }
        if let Some(json) = log_json {
            self.log_json = json;
        }
    }

    /// Turn off the HTTPS listener
    pub fn without_tls(mut self) -> Self {
        self.tls = None;
        self
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.hashing_secret.is_empty() {
            return Err(ConfigError::Invalid("hashing_secret must not be empty".into()));
        }

        if self.phone_length == 0 {
            return Err(ConfigError::Invalid("phone_length must be > 0".into()));
        }

        if self.max_body_bytes == Some(0) {
            return Err(ConfigError::Invalid("max_body_bytes must be > 0".into()));
        }

        if self.tls.is_some() && self.http_port == self.https_port {
            return Err(ConfigError::Invalid(format!(
                "http_port and https_port must differ (both {})",
                self.http_port
            )));
        }

        Ok(())
    }

    /// Plaintext listener address
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    /// TLS listener address
    pub fn https_addr(&self) -> String {
        format!("{}:{}", self.host, self.https_port)
    }
}
