use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::assessment::{AnaemiaModel, Condition};

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
    pub assessment: AssessmentConfig,
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
        let log_format = match env::var("APP_LOG_FORMAT") {
            Ok(raw) if !raw.trim().is_empty() => LogFormat::parse(&raw)?,
            _ => LogFormat::Full,
        };
        let ansi = match env::var("APP_LOG_ANSI") {
            Ok(raw) => matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            ),
            Err(_) => environment == AppEnvironment::Development,
        };

        let default_conditions = match env::var("APP_DEFAULT_CONDITIONS") {
            Ok(raw) if !raw.trim().is_empty() => parse_conditions(&raw)?,
            _ => Condition::ALL.to_vec(),
        };

        let anaemia_model = match env::var("APP_ANAEMIA_MODEL") {
            Ok(raw) if !raw.trim().is_empty() => raw
                .parse::<AnaemiaModel>()
                .map_err(|err| ConfigError::InvalidAnaemiaModel(err.0))?,
            _ => AnaemiaModel::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                log_format,
                ansi,
            },
            assessment: AssessmentConfig {
                default_conditions,
                anaemia_model,
            },
        })
    }
}

/// Parse a comma separated list of condition names, preserving order and dropping repeats.
pub fn parse_conditions(raw: &str) -> Result<Vec<Condition>, ConfigError> {
    let mut conditions = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        let condition = name
            .parse::<Condition>()
            .map_err(|_| ConfigError::InvalidCondition(name.to_string()))?;
        if !conditions.contains(&condition) {
            conditions.push(condition);
        }
    }
    Ok(conditions)
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

/// Line layout of the fmt subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Full,
    Compact,
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            other => Err(ConfigError::InvalidLogFormat(other.to_string())),
        }
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
    /// Colour escapes; off by default outside development so log shippers see plain text.
    pub ansi: bool,
}

/// Scoring choices applied to every request.
#[derive(Debug, Clone)]
pub struct AssessmentConfig {
    /// Conditions evaluated when a request does not name any.
    pub default_conditions: Vec<Condition>,
    pub anaemia_model: AnaemiaModel,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            default_conditions: Condition::ALL.to_vec(),
            anaemia_model: AnaemiaModel::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidCondition(String),
    InvalidLogFormat(String),
    InvalidAnaemiaModel(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidCondition(name) => {
                write!(f, "APP_DEFAULT_CONDITIONS names unknown condition '{name}'")
            }
            ConfigError::InvalidAnaemiaModel(value) => {
                write!(f, "APP_ANAEMIA_MODEL must be screening or tracker, got '{value}'")
            }
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT must be full, compact or pretty, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidCondition(_)
            | ConfigError::InvalidLogFormat(_)
            | ConfigError::InvalidAnaemiaModel(_) => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
