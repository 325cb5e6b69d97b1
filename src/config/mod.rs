use crate::core::{AppError, Result, SystemClock};
use std::env;
use std::str::FromStr;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub ledger: LedgerConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

/// Billing settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Day of month generated rent invoices fall due
    pub rent_due_day: u32,
    /// Offset used to decide which calendar day "today" is
    pub utc_offset_hours: i32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rent_due_day: 5,
            utc_offset_hours: SystemClock::DEFAULT_OFFSET_HOURS,
        }
    }
}

impl LedgerConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            rent_due_day: parse_var("RENT_DUE_DAY", defaults.rent_due_day)?,
            utc_offset_hours: parse_var("LEDGER_UTC_OFFSET_HOURS", defaults.utc_offset_hours)?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=28).contains(&self.rent_due_day) {
            return Err(AppError::Configuration(format!(
                "RENT_DUE_DAY must be between 1 and 28, got {}",
                self.rent_due_day
            )));
        }

        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err(AppError::Configuration(format!(
                "LEDGER_UTC_OFFSET_HOURS must be between -12 and 14, got {}",
                self.utc_offset_hours
            )));
        }

        Ok(())
    }

    /// System clock at the configured offset
    pub fn clock(&self) -> Result<SystemClock> {
        SystemClock::with_offset_hours(self.utc_offset_hours)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            ledger: LedgerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.ledger.validate()?;
        self.database.validate()?;

        if self.server.port == 0 {
            return Err(AppError::Configuration(
                "SERVER_PORT must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Read `name` from the environment, falling back to `default` when unset
pub(crate) fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T> {
    parse_value(name, env::var(name).ok(), default)
}

fn parse_value<T: FromStr>(name: &str, raw: Option<String>, default: T) -> Result<T> {
    match raw {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid {}: {}", name, value))),
        _ => Ok(default),
    }
}
