use serde::Deserialize;
use std::env;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: Option<DatabaseConfig>,
    pub redis: Option<RedisConfig>,
    pub cache: CacheConfig,
    pub wallet: WalletConfig,
    pub features: FeatureFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err("expected text or json".to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub log_format: LogFormat,
    /// Offset used for calendar-day filtering; server local time when unset.
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub events_ttl_seconds: u64,
}

/// Starting state handed to a profile the first time its wallet is read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WalletConfig {
    pub seed_points: u32,
    pub seed_rsvps: Vec<String>,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            seed_points: 120,
            seed_rsvps: vec!["1".to_string(), "5".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    pub seed_demo_events: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let seed_rsvps = or("WALLET_SEED_RSVPS", "1,5")
            .split(',')
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();

        Ok(Config {
            app: AppConfig {
                host: or("HOST", "0.0.0.0"),
                port: parse("PORT", &or("PORT", "8000"))?,
                environment: or("ENVIRONMENT", "development"),
                rust_log: or("RUST_LOG", "bubble=debug,tower_http=debug"),
                log_format: parse("LOG_FORMAT", &or("LOG_FORMAT", "text"))?,
                utc_offset_minutes: var("UTC_OFFSET_MINUTES")
                    .map(|v| parse_offset(&v))
                    .transpose()?,
            },
            database: match var("DATABASE_URL") {
                Some(url) => Some(DatabaseConfig {
                    url,
                    pool_size: parse("DB_POOL_SIZE", &or("DB_POOL_SIZE", "20"))?,
                }),
                None => None,
            },
            redis: var("REDIS_URL").map(|url| RedisConfig { url }),
            cache: CacheConfig {
                events_ttl_seconds: parse(
                    "EVENTS_CACHE_TTL_SECONDS",
                    &or("EVENTS_CACHE_TTL_SECONDS", "3600"),
                )?,
            },
            wallet: WalletConfig {
                seed_points: parse("WALLET_SEED_POINTS", &or("WALLET_SEED_POINTS", "120"))?,
                seed_rsvps,
            },
            features: FeatureFlags {
                seed_demo_events: parse("SEED_DEMO_EVENTS", &or("SEED_DEMO_EVENTS", "true"))?,
            },
        })
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_offset(value: &str) -> Result<i32, ConfigError> {
    let minutes: i32 = parse("UTC_OFFSET_MINUTES", value)?;
    // chrono::FixedOffset accepts strictly less than a day
    if minutes.abs() >= 24 * 60 {
        return Err(ConfigError::Invalid {
            key: "UTC_OFFSET_MINUTES",
            value: value.to_string(),
            reason: "must be within ±1439 minutes".to_string(),
        });
    }
    Ok(minutes)
}
