use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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

const DEFAULT_RECOMMENDATIONS_PER_DIMENSION: usize = 3;

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub dignometro: DignometroConfig,
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
            dignometro: DignometroConfig::from_env()?,
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

/// Goal catalog and recommendation surfacing settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DignometroConfig {
    /// Spreadsheet export replacing the bundled goal catalog when it loads.
    pub catalog_csv: Option<PathBuf>,
    /// `None` surfaces every surviving recommendation.
    pub recommendations_per_dimension: Option<usize>,
    pub stable_recommendation_ids: bool,
}

impl Default for DignometroConfig {
    fn default() -> Self {
        Self {
            catalog_csv: None,
            recommendations_per_dimension: Some(DEFAULT_RECOMMENDATIONS_PER_DIMENSION),
            stable_recommendation_ids: false,
        }
    }
}

impl DignometroConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let catalog_csv = env::var("DIGNOMETRO_CATALOG_CSV")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let recommendations_per_dimension =
            match env::var("DIGNOMETRO_RECOMMENDATIONS_PER_DIMENSION") {
                Ok(raw) => match raw
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| ConfigError::InvalidRecommendationCap)?
                {
                    0 => None,
                    cap => Some(cap),
                },
                Err(_) => Some(DEFAULT_RECOMMENDATIONS_PER_DIMENSION),
            };

        let stable_recommendation_ids = env::var("DIGNOMETRO_STABLE_RECOMMENDATION_IDS")
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            catalog_csv,
            recommendations_per_dimension,
            stable_recommendation_ids,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidRecommendationCap,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidRecommendationCap => write!(
                f,
                "DIGNOMETRO_RECOMMENDATIONS_PER_DIMENSION must be a non-negative integer"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidRecommendationCap => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
