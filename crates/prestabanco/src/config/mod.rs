use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::lending::completeness::{DocumentRequirements, RequirementsError};
use crate::lending::documents::{LifecycleConfig, TransitionPolicy};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub lending: LendingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            lending: LendingConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Document review rules and the per-category requirement table.
#[derive(Debug, Clone, Default)]
pub struct LendingConfig {
    pub lifecycle: LifecycleConfig,
    pub requirements: DocumentRequirements,
    /// File the requirement table was read from, when not using the built-in one.
    pub requirements_source: Option<PathBuf>,
}

impl LendingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let transitions = match env::var("APP_DOCUMENT_TRANSITIONS") {
            Ok(raw) => TransitionPolicy::from_label(&raw)
                .ok_or(ConfigError::InvalidTransitionPolicy(raw))?,
            Err(_) => TransitionPolicy::default(),
        };

        let single_active_per_type = match env::var("APP_SINGLE_ACTIVE_DOCUMENT") {
            Ok(raw) => parse_flag("APP_SINGLE_ACTIVE_DOCUMENT", &raw)?,
            Err(_) => false,
        };

        let requirements_source = env::var("APP_DOCUMENT_REQUIREMENTS")
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);
        let requirements = match &requirements_source {
            Some(path) => DocumentRequirements::load(path)?,
            None => DocumentRequirements::default(),
        };

        Ok(Self {
            lifecycle: LifecycleConfig {
                transitions,
                single_active_per_type,
            },
            requirements,
            requirements_source,
        })
    }
}

fn parse_flag(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: raw.to_string(),
        }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTransitionPolicy(String),
    InvalidFlag { name: &'static str, value: String },
    Requirements(RequirementsError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTransitionPolicy(value) => write!(
                f,
                "APP_DOCUMENT_TRANSITIONS must be 'strict' or 'permissive', got '{value}'"
            ),
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{name} must be a boolean, got '{value}'")
            }
            ConfigError::Requirements(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::Requirements(err) => Some(err),
            ConfigError::InvalidPort
            | ConfigError::InvalidTransitionPolicy(_)
            | ConfigError::InvalidFlag { .. } => None,
        }
    }
}

impl From<RequirementsError> for ConfigError {
    fn from(value: RequirementsError) -> Self {
        Self::Requirements(value)
    }
}
