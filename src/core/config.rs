use std::env;
use std::time::Duration;

use crate::core::error::AppError;
use crate::shared::geo::{CityBounds, GeoPoint};

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub swagger: SwaggerConfig,
    pub minio: MinIOConfig,
    pub map: MapConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
    pub frontend_url: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Session token and account settings
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// HMAC secret used to sign session tokens
    pub jwt_secret: String,
    pub session_ttl: Duration,
    pub password_reset_ttl: Duration,
    /// Accounts registered with one of these emails get the admin role
    pub admin_emails: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// MinIO/S3 storage configuration for image uploads
#[derive(Debug, Clone)]
pub struct MinIOConfig {
    /// MinIO/S3 endpoint URL
    pub endpoint: String,
    /// Public endpoint URL for publicly accessible files (optional, defaults to endpoint)
    pub public_endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub region: String,
    /// Prefix under which objects are world-readable (e.g., "public")
    pub public_prefix: String,
}

/// City map settings shared by the map feed and the location picker check
#[derive(Debug, Clone)]
pub struct MapConfig {
    pub city_name: String,
    pub center: GeoPoint,
    pub zoom: u8,
    pub bounds: CityBounds,
    pub tile_url: String,
    pub attribution: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            minio: MinIOConfig::from_env()?,
            map: MapConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 32 * 1024 * 1024; // 32MB, room for 5 images

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = split_list(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()));

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3001".to_string());

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
            frontend_url,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl AuthConfig {
    const DEFAULT_SESSION_TTL_SECS: u64 = 7 * 24 * 3600; // 7 days
    const DEFAULT_PASSWORD_RESET_TTL_SECS: u64 = 3600; // 1 hour
    const MIN_SECRET_LEN: usize = 32;

    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET environment variable is required".to_string())?;
        if jwt_secret.len() < Self::MIN_SECRET_LEN {
            return Err(format!(
                "JWT_SECRET must be at least {} characters",
                Self::MIN_SECRET_LEN
            ));
        }

        let session_ttl_secs = env::var("SESSION_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_SESSION_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "SESSION_TTL_SECS must be a valid number".to_string())?;

        let password_reset_ttl_secs = env::var("PASSWORD_RESET_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_PASSWORD_RESET_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "PASSWORD_RESET_TTL_SECS must be a valid number".to_string())?;

        let admin_emails = split_list(&env::var("ADMIN_EMAILS").unwrap_or_default())
            .into_iter()
            .map(|e| e.to_lowercase())
            .collect();

        Ok(Self {
            jwt_secret,
            session_ttl: Duration::from_secs(session_ttl_secs),
            password_reset_ttl: Duration::from_secs(password_reset_ttl_secs),
            admin_emails,
        })
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.to_lowercase();
        self.admin_emails.iter().any(|e| *e == email)
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Water Guard API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Water infrastructure reporting, plumbers directory and community news".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl MinIOConfig {
    pub fn from_env() -> Result<Self, String> {
        let endpoint =
            env::var("MINIO_ENDPOINT").unwrap_or_else(|_| "http://localhost:9000".to_string());

        let public_endpoint =
            env::var("MINIO_PUBLIC_ENDPOINT").unwrap_or_else(|_| endpoint.clone());

        let access_key = env::var("MINIO_ACCESS_KEY").unwrap_or_else(|_| "minioadmin".to_string());

        let secret_key = env::var("MINIO_SECRET_KEY").unwrap_or_else(|_| "minioadmin".to_string());

        let bucket = env::var("MINIO_BUCKET").unwrap_or_else(|_| "water-guard".to_string());

        let region = env::var("MINIO_REGION").unwrap_or_else(|_| "us-east-1".to_string());

        let public_prefix =
            env::var("MINIO_PUBLIC_PREFIX").unwrap_or_else(|_| "public".to_string());

        Ok(Self {
            endpoint,
            public_endpoint,
            access_key,
            secret_key,
            bucket,
            region,
            public_prefix,
        })
    }
}

impl MapConfig {
    const DEFAULT_TILE_URL: &'static str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
    const DEFAULT_ATTRIBUTION: &'static str =
        "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

    pub fn from_env() -> Result<Self, String> {
        let city_name = env::var("MAP_CITY_NAME").unwrap_or_else(|_| "المحلة الكبرى".to_string());

        let center = GeoPoint {
            lat: env_f64("MAP_CENTER_LAT", 30.9700)?,
            lng: env_f64("MAP_CENTER_LNG", 31.1667)?,
        };

        let zoom = env::var("MAP_ZOOM")
            .unwrap_or_else(|_| "13".to_string())
            .parse::<u8>()
            .map_err(|_| "MAP_ZOOM must be a valid number".to_string())?;

        let bounds = CityBounds::new(
            GeoPoint {
                lat: env_f64("MAP_BOUNDS_SOUTH", 30.92)?,
                lng: env_f64("MAP_BOUNDS_WEST", 31.11)?,
            },
            GeoPoint {
                lat: env_f64("MAP_BOUNDS_NORTH", 31.02)?,
                lng: env_f64("MAP_BOUNDS_EAST", 31.22)?,
            },
        )?;

        if !bounds.contains(center) {
            return Err("MAP_CENTER must lie inside the configured map bounds".to_string());
        }

        let tile_url = env::var("MAP_TILE_URL").unwrap_or_else(|_| Self::DEFAULT_TILE_URL.to_string());
        let attribution =
            env::var("MAP_ATTRIBUTION").unwrap_or_else(|_| Self::DEFAULT_ATTRIBUTION.to_string());

        Ok(Self {
            city_name,
            center,
            zoom,
            bounds,
            tile_url,
            attribution,
        })
    }

    /// Validation error unless the point lies inside the city bounds
    pub fn ensure_in_city(&self, point: GeoPoint) -> Result<(), AppError> {
        if !self.bounds.contains(point) {
            return Err(AppError::Validation(format!(
                "Location ({:.4}, {:.4}) is outside {}",
                point.lat, point.lng, self.city_name
            )));
        }
        Ok(())
    }
}

/// Default city settings for tests
#[cfg(test)]
pub fn test_map_config() -> MapConfig {
    MapConfig {
        city_name: "المحلة الكبرى".to_string(),
        center: GeoPoint::new(30.97, 31.1667),
        zoom: 13,
        bounds: CityBounds::new(GeoPoint::new(30.92, 31.11), GeoPoint::new(31.02, 31.22))
            .unwrap(),
        tile_url: MapConfig::DEFAULT_TILE_URL.to_string(),
        attribution: MapConfig::DEFAULT_ATTRIBUTION.to_string(),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn env_f64(key: &str, default: f64) -> Result<f64, String> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("{} must be a valid number", key)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_trims_and_drops_empty() {
        assert_eq!(
            split_list(" admin@city.gov , ,ops@city.gov"),
            vec!["admin@city.gov".to_string(), "ops@city.gov".to_string()]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_admin_email_match_is_case_insensitive() {
        let config = AuthConfig {
            jwt_secret: "x".repeat(32),
            session_ttl: Duration::from_secs(60),
            password_reset_ttl: Duration::from_secs(60),
            admin_emails: vec!["admin@city.gov".to_string()],
        };

        assert!(config.is_admin_email("Admin@City.gov"));
        assert!(!config.is_admin_email("user@city.gov"));
    }

    #[test]
    fn test_ensure_in_city_edges_inclusive() {
        let map = test_map_config();
        assert!(map.ensure_in_city(GeoPoint::new(30.92, 31.11)).is_ok());
        assert!(map.ensure_in_city(GeoPoint::new(31.02, 31.22)).is_ok());
        assert!(matches!(
            map.ensure_in_city(GeoPoint::new(30.0444, 31.2357)),
            Err(AppError::Validation(_))
        ));
    }
}
