use std::env;
use std::str::FromStr;

use log::warn;

pub const DEFAULT_DATABASE_URL: &str = "instance/sensors.sqlite";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_POOL_SIZE: u32 = 10;

/// Process configuration, read from the environment (and `.env` via dotenv).
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    pub pool_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}: {:?}", name, raw);
            default
        }),
        Err(_) => default,
    }
}

impl Settings {
    pub fn from_env() -> Settings {
        let defaults = Settings::default();
        Settings {
            database_url: env_or("DATABASE_URL", defaults.database_url),
            bind_address: env_or("BIND_ADDRESS", defaults.bind_address),
            pool_size: env_or("DB_POOL_SIZE", defaults.pool_size).max(1),
        }
    }
}
