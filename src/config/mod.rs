use anyhow::{bail, Context, Result};
use std::env;
use std::time::Duration;

pub mod seeding;

pub use seeding::DatabaseSeeder;

const DEFAULT_JWT_SECRET: &str = "your-secret-key-change-in-production";

const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

/// One year
const MAX_JWT_EXPIRES_IN_SECS: i64 = 365 * 24 * 60 * 60;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub log_level: String,
    pub jwt_secret: String,
    pub jwt_expires_in_secs: i64,
    pub bcrypt_cost: u32,
    pub seed_demo_data: bool,
    pub rate_limit_max_requests: usize,
    pub rate_limit_window: Duration,
    /// Key rate limits on `x-forwarded-for` / `x-real-ip` instead of the peer address
    pub trust_proxy: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "development".to_string(),
            log_level: "info".to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_expires_in_secs: 3600,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            seed_demo_data: true,
            rate_limit_max_requests: 100,
            rate_limit_window: Duration::from_secs(15 * 60),
            trust_proxy: false,
        }
    }
}

fn parsed<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, value)),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parsed("PORT", defaults.port)?,
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            jwt_secret: env::var("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            jwt_expires_in_secs: parsed("JWT_EXPIRES_IN_SECS", defaults.jwt_expires_in_secs)?,
            bcrypt_cost: parsed("BCRYPT_COST", defaults.bcrypt_cost)?,
            seed_demo_data: parsed("SEED_DEMO_DATA", defaults.seed_demo_data)?,
            rate_limit_max_requests: parsed(
                "RATE_LIMIT_MAX_REQUESTS",
                defaults.rate_limit_max_requests,
            )?,
            rate_limit_window: Duration::from_secs(parsed(
                "RATE_LIMIT_WINDOW_SECS",
                defaults.rate_limit_window.as_secs(),
            )?),
            trust_proxy: parsed("TRUST_PROXY", defaults.trust_proxy)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> Result<()> {
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            bail!(
                "BCRYPT_COST must be between {} and {}",
                MIN_BCRYPT_COST,
                MAX_BCRYPT_COST
            );
        }

        if !(1..=MAX_JWT_EXPIRES_IN_SECS).contains(&self.jwt_expires_in_secs) {
            bail!(
                "JWT_EXPIRES_IN_SECS must be between 1 and {}",
                MAX_JWT_EXPIRES_IN_SECS
            );
        }

        if self.is_production() && self.jwt_secret == DEFAULT_JWT_SECRET {
            bail!("JWT_SECRET must be set in production");
        }

        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Get server address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server_address(), "0.0.0.0:3000");
        assert_eq!(config.jwt_expires_in_secs, 3600);
        assert_eq!(config.rate_limit_max_requests, 100);
        assert_eq!(config.rate_limit_window, Duration::from_secs(900));
        assert!(config.is_development());
        assert!(config.seed_demo_data);
        assert!(!config.trust_proxy);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parsed_falls_back_to_default() {
        let value: u16 = parsed("GYM_MANAGER_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_bcrypt_cost_bounds() {
        let config = AppConfig {
            bcrypt_cost: 4,
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());

        for cost in [3, 32] {
            let config = AppConfig {
                bcrypt_cost: cost,
                ..AppConfig::default()
            };
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn test_jwt_lifetime_bounds() {
        for secs in [0, -60, MAX_JWT_EXPIRES_IN_SECS + 1, i64::MAX] {
            let config = AppConfig {
                jwt_expires_in_secs: secs,
                ..AppConfig::default()
            };
            assert!(config.validate().is_err(), "{} should be rejected", secs);
        }

        let config = AppConfig {
            jwt_expires_in_secs: MAX_JWT_EXPIRES_IN_SECS,
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_secret_rejected_in_production() {
        let config = AppConfig {
            environment: "production".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            environment: "production".to_string(),
            jwt_secret: "a-real-secret".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
