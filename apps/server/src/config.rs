use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{anyhow, Context};
use chrono_tz::Tz;
use stockfolio_core::constants::{DEFAULT_COLLABORATOR_TIMEOUT_SECS, DEFAULT_CSV_FETCH_TIMEOUT_SECS};

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub request_timeout: Duration,
    pub construction_api_url: String,
    pub rebalance_api_url: String,
    pub collaborator_timeout: Duration,
    pub csv_fetch_timeout: Duration,
    pub session_ttl: Duration,
    pub secure_cookies: bool,
    pub display_tz: Tz,
    pub static_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            db_path: "./db/app.db".to_string(),
            request_timeout: Duration::from_millis(200_000),
            construction_api_url: "http://127.0.0.1:8000/scrape_index_csv".to_string(),
            rebalance_api_url: "http://127.0.0.1:8001/rebalance_portfolio".to_string(),
            collaborator_timeout: Duration::from_secs(DEFAULT_COLLABORATOR_TIMEOUT_SECS),
            csv_fetch_timeout: Duration::from_secs(DEFAULT_CSV_FETCH_TIMEOUT_SECS),
            session_ttl: Duration::from_secs(8 * 60 * 60),
            secure_cookies: false,
            display_tz: chrono_tz::Asia::Kolkata,
            static_dir: "static".to_string(),
        }
    }
}

/// Reads `name` and parses it, keeping `default` when the variable is unset.
fn env_parsed<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid {}='{}': {}", name, raw, e)),
        Err(std::env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(e).with_context(|| format!("Cannot read {}", name)),
    }
}

fn env_string(name: &str, default: String) -> String {
    std::env::var(name).unwrap_or(default)
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Config::default();

        let listen_addr = env_parsed("SF_LISTEN_ADDR", defaults.listen_addr)?;
        let db_path = env_string("SF_DB_PATH", defaults.db_path);
        let timeout_ms: u64 = env_parsed("SF_REQUEST_TIMEOUT_MS", 200_000)?;
        let construction_api_url =
            env_string("SF_CONSTRUCTION_API_URL", defaults.construction_api_url);
        let rebalance_api_url = env_string("SF_REBALANCE_API_URL", defaults.rebalance_api_url);
        let collaborator_secs: u64 =
            env_parsed("SF_COLLABORATOR_TIMEOUT_SECS", DEFAULT_COLLABORATOR_TIMEOUT_SECS)?;
        let csv_secs: u64 = env_parsed("SF_CSV_FETCH_TIMEOUT_SECS", DEFAULT_CSV_FETCH_TIMEOUT_SECS)?;
        let session_secs: u64 = env_parsed("SF_SESSION_TTL_SECS", defaults.session_ttl.as_secs())?;
        let secure_cookies = env_parsed("SF_SECURE_COOKIES", defaults.secure_cookies)?;
        let display_tz = env_parsed("SF_DISPLAY_TZ", defaults.display_tz)?;
        let static_dir = env_string("SF_STATIC_DIR", defaults.static_dir);

        let config = Self {
            listen_addr,
            db_path,
            request_timeout: Duration::from_millis(timeout_ms),
            construction_api_url,
            rebalance_api_url,
            collaborator_timeout: Duration::from_secs(collaborator_secs),
            csv_fetch_timeout: Duration::from_secs(csv_secs),
            session_ttl: Duration::from_secs(session_secs),
            secure_cookies,
            display_tz,
            static_dir,
        };
        if config.request_timeout <= config.collaborator_timeout {
            return Err(anyhow!(
                "SF_REQUEST_TIMEOUT_MS ({} ms) must exceed the collaborator timeout ({} s)",
                timeout_ms,
                collaborator_secs
            ));
        }
        Ok(config)
    }
}
