//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Database parameters can be given as a
//! single `DATABASE_URL` or as discrete `DB_*` keys.

use std::net::SocketAddr;
use std::time::Duration;

use sqlx::postgres::PgConnectOptions;

use crate::domain::CoinId;

/// Coins tracked when `COIN_IDS` is not set.
pub const DEFAULT_COIN_IDS: &str = "bitcoin,ethereum,matic-network";

/// Default CoinGecko API base URL.
pub const DEFAULT_COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Errors raised while loading [`GatewayConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `LISTEN_ADDR` is not a valid socket address.
    #[error("invalid LISTEN_ADDR: {0}")]
    InvalidListenAddr(#[from] std::net::AddrParseError),

    /// `COIN_IDS` is empty or contains an invalid identifier.
    #[error("invalid COIN_IDS: {0}")]
    InvalidCoinList(String),

    /// `DATABASE_URL` could not be parsed.
    #[error("invalid DATABASE_URL: {0}")]
    InvalidDatabaseUrl(String),
}

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Full PostgreSQL connection string; overrides the discrete keys.
    pub database_url: Option<String>,

    /// Database host.
    pub database_host: String,

    /// Database port.
    pub database_port: u16,

    /// Database user.
    pub database_user: String,

    /// Database password.
    pub database_password: String,

    /// Database name.
    pub database_name: String,

    /// Maximum number of database connections in the pool.
    pub database_max_connections: u32,

    /// Minimum idle connections in the pool.
    pub database_min_connections: u32,

    /// Timeout in seconds for acquiring a database connection.
    pub database_connect_timeout_secs: u64,

    /// Coins polled on every refresh cycle.
    pub coin_ids: Vec<CoinId>,

    /// Base URL of the CoinGecko API.
    pub coingecko_api_url: String,

    /// Timeout in seconds for one upstream request.
    pub upstream_timeout_secs: u64,

    /// Wall-clock refresh cadence in hours (1..=24).
    pub refresh_interval_hours: u32,

    /// Whether to run one refresh cycle before serving traffic.
    pub refresh_on_startup: bool,

    /// Emit JSON log lines instead of the human-readable format.
    pub log_json: bool,
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `LISTEN_ADDR` cannot be parsed as a
    /// [`SocketAddr`] or `COIN_IDS` yields no valid identifiers.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()?;

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let coin_ids = parse_coin_ids(
            &std::env::var("COIN_IDS").unwrap_or_else(|_| DEFAULT_COIN_IDS.to_string()),
        )?;

        Ok(Self {
            listen_addr,
            database_url,
            database_host: env_or("DB_HOST", "localhost"),
            database_port: parse_env("DB_PORT", 5432),
            database_user: env_or("DB_USER", "postgres"),
            database_password: env_or("DB_PASSWORD", "postgres"),
            database_name: env_or("DB_NAME", "crypto_db"),
            database_max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 10),
            database_min_connections: parse_env("DATABASE_MIN_CONNECTIONS", 1),
            database_connect_timeout_secs: parse_env("DATABASE_CONNECT_TIMEOUT_SECS", 5),
            coin_ids,
            coingecko_api_url: env_or("COINGECKO_API_URL", DEFAULT_COINGECKO_API_URL),
            upstream_timeout_secs: parse_env("UPSTREAM_TIMEOUT_SECS", 10),
            refresh_interval_hours: parse_env::<u32>("REFRESH_INTERVAL_HOURS", 2).clamp(1, 24),
            refresh_on_startup: parse_env_bool("REFRESH_ON_STARTUP", true),
            log_json: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }

    /// Builds PostgreSQL connect options from `DATABASE_URL` or the
    /// discrete `DB_*` settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDatabaseUrl`] if `DATABASE_URL` is set
    /// but malformed.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        match &self.database_url {
            Some(url) => url
                .parse::<PgConnectOptions>()
                .map_err(|e| ConfigError::InvalidDatabaseUrl(e.to_string())),
            None => Ok(PgConnectOptions::new()
                .host(&self.database_host)
                .port(self.database_port)
                .username(&self.database_user)
                .password(&self.database_password)
                .database(&self.database_name)),
        }
    }

    /// Upstream request timeout as a [`Duration`].
    #[must_use]
    pub const fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}

/// Splits a comma-separated coin list, trimming and dropping empty entries.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidCoinList`] if an entry is not a valid
/// [`CoinId`] or the list ends up empty.
pub fn parse_coin_ids(raw: &str) -> Result<Vec<CoinId>, ConfigError> {
    let mut coins: Vec<CoinId> = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let coin = CoinId::parse(part).map_err(|e| ConfigError::InvalidCoinList(e.to_string()))?;
        if !coins.contains(&coin) {
            coins.push(coin);
        }
    }
    if coins.is_empty() {
        return Err(ConfigError::InvalidCoinList(
            "at least one coin id is required".to_string(),
        ));
    }
    Ok(coins)
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        _ => default,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn coin_list_is_trimmed_and_deduplicated() {
        let Ok(coins) = parse_coin_ids(" bitcoin, ethereum,,bitcoin ,matic-network") else {
            panic!("valid coin list");
        };
        let names: Vec<&str> = coins.iter().map(CoinId::as_str).collect();
        assert_eq!(names, vec!["bitcoin", "ethereum", "matic-network"]);
    }

    #[test]
    fn empty_coin_list_is_rejected() {
        assert!(matches!(
            parse_coin_ids(" , ,"),
            Err(ConfigError::InvalidCoinList(_))
        ));
    }

    #[test]
    fn default_coin_list_parses() {
        let Ok(coins) = parse_coin_ids(DEFAULT_COIN_IDS) else {
            panic!("default coin list must parse");
        };
        assert_eq!(coins.len(), 3);
    }
}
