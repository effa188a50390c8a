use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

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
    pub providers: ProviderConfig,
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
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
            },
            providers: ProviderConfig::from_env()?,
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
    pub ansi: bool,
}

/// Endpoints and tuning for every outbound data source.
///
/// Built once at startup and handed to each provider at construction time.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub timeout: Duration,
    pub user_agent: String,
    pub geocoder: GeocoderConfig,
    pub elevation: ElevationConfig,
    pub parcel_service_url: Option<String>,
    pub flood_service_url: Option<String>,
    pub wetlands_service_url: Option<String>,
    pub imagery: ImageryConfig,
}

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub base_url: String,
    /// Appended to every query to scope matches to the target metro area.
    pub region_qualifier: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ElevationConfig {
    pub base_url: String,
    pub grid_size: usize,
    pub grid_offset_degrees: f64,
    pub default_elevation_m: f64,
}

#[derive(Debug, Clone)]
pub struct ImageryConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub zoom: u8,
    pub width: u32,
    pub height: u32,
    pub max_boundary_points: usize,
    pub decimated_boundary_points: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: "SiteAnalyzer/1.0".to_string(),
            geocoder: GeocoderConfig::default(),
            elevation: ElevationConfig::default(),
            parcel_service_url: None,
            flood_service_url: None,
            wetlands_service_url: None,
            imagery: ImageryConfig::default(),
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            region_qualifier: Some("Salt Lake City, Utah".to_string()),
        }
    }
}

impl Default for ElevationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.open-elevation.com".to_string(),
            grid_size: 5,
            grid_offset_degrees: 0.001,
            default_elevation_m: 1300.0,
        }
    }
}

impl Default for ImageryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com/maps/api/staticmap".to_string(),
            api_key: None,
            zoom: 18,
            width: 640,
            height: 640,
            max_boundary_points: 50,
            decimated_boundary_points: 40,
        }
    }
}

impl ProviderConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let timeout_secs: u64 = parse_var("SITE_PROVIDER_TIMEOUT_SECS", 10)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "SITE_PROVIDER_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        let grid_size: usize = parse_var("SITE_ELEVATION_GRID_SIZE", defaults.elevation.grid_size)?;
        if grid_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "SITE_ELEVATION_GRID_SIZE",
                value: "0".to_string(),
            });
        }

        let grid_offset_degrees = finite_var(
            "SITE_ELEVATION_GRID_OFFSET",
            defaults.elevation.grid_offset_degrees,
        )?;
        if grid_offset_degrees <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "SITE_ELEVATION_GRID_OFFSET",
                value: grid_offset_degrees.to_string(),
            });
        }
        let default_elevation_m =
            finite_var("SITE_ELEVATION_DEFAULT_M", defaults.elevation.default_elevation_m)?;

        let region_qualifier = match env::var("SITE_REGION_QUALIFIER") {
            Ok(value) => non_empty(value),
            Err(_) => defaults.geocoder.region_qualifier,
        };

        Ok(Self {
            timeout: Duration::from_secs(timeout_secs),
            user_agent: env::var("SITE_USER_AGENT").unwrap_or(defaults.user_agent),
            geocoder: GeocoderConfig {
                base_url: env::var("SITE_GEOCODER_URL").unwrap_or(defaults.geocoder.base_url),
                region_qualifier,
            },
            elevation: ElevationConfig {
                base_url: env::var("SITE_ELEVATION_URL").unwrap_or(defaults.elevation.base_url),
                grid_size,
                grid_offset_degrees,
                default_elevation_m,
            },
            parcel_service_url: optional_var("SITE_PARCEL_SERVICE_URL"),
            flood_service_url: optional_var("SITE_FLOOD_SERVICE_URL"),
            wetlands_service_url: optional_var("SITE_WETLANDS_SERVICE_URL"),
            imagery: ImageryConfig {
                base_url: env::var("SITE_STATIC_MAP_URL").unwrap_or(defaults.imagery.base_url),
                api_key: optional_var("GOOGLE_MAPS_API_KEY"),
                zoom: parse_var("SITE_MAP_ZOOM", defaults.imagery.zoom)?,
                ..defaults.imagery
            },
        })
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().and_then(non_empty)
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Like [`parse_var`], but `NaN` and infinities are rejected.
fn finite_var(key: &'static str, default: f64) -> Result<f64, ConfigError> {
    let value = parse_var(key, default)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidValue { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "{key} has an invalid value '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidValue { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
