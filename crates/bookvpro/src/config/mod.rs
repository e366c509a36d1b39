use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::workflows::grading::GradePolicy;

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
    pub jobs: JobConfig,
    pub grading: GradePolicy,
    pub naver: NaverConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let jobs = JobConfig {
            workers: parse_var("BOOKVPRO_WORKERS", 3usize)?.clamp(1, MAX_WORKERS),
            request_delay: Duration::from_millis(parse_var("BOOKVPRO_REQUEST_DELAY_MS", 300u64)?),
            request_timeout: Duration::from_secs(parse_var(
                "BOOKVPRO_REQUEST_TIMEOUT_SECS",
                10u64,
            )?),
            max_titles: parse_var("BOOKVPRO_MAX_TITLES", 1000usize)?,
            retention: chrono::Duration::minutes(i64::from(parse_var(
                "BOOKVPRO_JOB_RETENTION_MINUTES",
                60u32,
            )?)),
        };

        let grading = GradePolicy {
            max_sellers_for_a: parse_var("GRADE_MAX_SELLERS_FOR_A", 0u32)?,
            min_search_volume: parse_optional_var("GRADE_MIN_SEARCH_VOLUME")?,
        };

        let naver = NaverConfig {
            search_base_url: env::var("NAVER_SEARCH_BASE_URL")
                .unwrap_or_else(|_| "https://search.naver.com".to_string()),
            open_api: match (non_empty_var("NAVER_CLIENT_ID"), non_empty_var("NAVER_CLIENT_SECRET")) {
                (Some(client_id), Some(client_secret)) => Some(OpenApiCredentials {
                    base_url: env::var("NAVER_OPENAPI_BASE_URL")
                        .unwrap_or_else(|_| "https://openapi.naver.com".to_string()),
                    client_id,
                    client_secret,
                }),
                _ => None,
            },
            search_ad: match (
                non_empty_var("SEARCHAD_API_KEY"),
                non_empty_var("SEARCHAD_SECRET_KEY"),
                non_empty_var("SEARCHAD_CUSTOMER_ID"),
            ) {
                (Some(api_key), Some(secret_key), Some(customer_id)) => {
                    Some(SearchAdCredentials {
                        base_url: env::var("SEARCHAD_BASE_URL")
                            .unwrap_or_else(|_| "https://api.searchad.naver.com".to_string()),
                        api_key,
                        secret_key,
                        customer_id,
                    })
                }
                _ => None,
            },
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            jobs,
            grading,
            naver,
        })
    }
}

/// Upper bound on concurrent lookups per job.
pub const MAX_WORKERS: usize = 10;

fn non_empty_var(name: &'static str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match non_empty_var(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { name, value: raw }),
        None => Ok(default),
    }
}

fn parse_optional_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    non_empty_var(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|_| ConfigError::InvalidNumber { name, value: raw })
        })
        .transpose()
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

/// Worker pool sizing and pacing for classification jobs.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub workers: usize,
    pub request_delay: Duration,
    pub request_timeout: Duration,
    pub max_titles: usize,
    pub retention: chrono::Duration,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            workers: 3,
            request_delay: Duration::from_millis(300),
            request_timeout: Duration::from_secs(10),
            max_titles: 1000,
            retention: chrono::Duration::minutes(60),
        }
    }
}

/// Endpoints and credentials for the Naver services.
#[derive(Debug, Clone)]
pub struct NaverConfig {
    pub search_base_url: String,
    pub open_api: Option<OpenApiCredentials>,
    pub search_ad: Option<SearchAdCredentials>,
}

#[derive(Debug, Clone)]
pub struct OpenApiCredentials {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone)]
pub struct SearchAdCredentials {
    pub base_url: String,
    pub api_key: String,
    pub secret_key: String,
    pub customer_id: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { name, value } => {
                write!(f, "{name} must be a non-negative number (got '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
