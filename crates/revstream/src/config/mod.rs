use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

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
    pub aggregator: AggregatorConfig,
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
            aggregator: AggregatorConfig::load(),
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Upstream financial-data aggregator stage selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatorEnvironment {
    Sandbox,
    Production,
}

impl AggregatorEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            _ => Self::Sandbox,
        }
    }

    pub const fn base_url(self) -> &'static str {
        match self {
            AggregatorEnvironment::Sandbox => "https://sandbox.plaid.com",
            AggregatorEnvironment::Production => "https://production.plaid.com",
        }
    }
}

/// Credentials and stage selection for the upstream aggregator.
///
/// Credentials are optional at load time: their absence is a per-request
/// configuration error surfaced by the proxy, not a boot failure.
#[derive(Debug, Clone, Default)]
pub struct AggregatorConfig {
    pub client_id: Option<String>,
    pub secret: Option<String>,
    pub environment: Option<AggregatorEnvironment>,
}

impl AggregatorConfig {
    pub fn load() -> Self {
        Self {
            client_id: env_with_legacy_fallback("PLAID_CLIENT_ID", "REACT_APP_PLAID_CLIENT_ID"),
            secret: env_with_legacy_fallback("PLAID_SECRET", "REACT_APP_PLAID_SECRET"),
            environment: env_with_legacy_fallback("PLAID_ENV", "REACT_APP_PLAID_ENV")
                .map(|value| AggregatorEnvironment::from_str(&value)),
        }
    }

    pub fn base_url(&self) -> &'static str {
        self.environment
            .unwrap_or(AggregatorEnvironment::Sandbox)
            .base_url()
    }

    /// Returns the credential pair, or `None` when either half is missing.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.client_id.as_deref(), self.secret.as_deref()) {
            (Some(client_id), Some(secret)) if !client_id.is_empty() && !secret.is_empty() => {
                Some((client_id, secret))
            }
            _ => None,
        }
    }
}

fn env_with_legacy_fallback(primary: &str, legacy: &str) -> Option<String> {
    env::var(primary)
        .or_else(|_| env::var(legacy))
        .ok()
        .filter(|value| !value.trim().is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
