use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::engine::UnknownTeamPolicy;

/// Default bookmaker preference order, best-trusted first.
pub const DEFAULT_BOOKMAKER_PRIORITY: [&str; 10] = [
    "fanduel",
    "betmgm",
    "caesars",
    "betrivers",
    "williamhill_us",
    "draftkings",
    "fanatics",
    "windcreek",
    "espnbet",
    "ballybet",
];

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub odds: OddsApiConfig,
    pub projections: ProjectionsConfig,
    pub cache: CacheConfig,
    pub engine: EngineConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OddsApiConfig {
    /// The Odds API credential. The only setting with no safe default.
    pub api_key: String,
    /// REST base URL for The Odds API
    #[serde(default = "default_odds_base_url")]
    pub base_url: String,
    /// Bookmaker preference order; first one quoting a fixture wins
    #[serde(default = "default_bookmaker_priority")]
    pub bookmaker_priority: Vec<String>,
}

fn default_odds_base_url() -> String {
    "https://api.the-odds-api.com/v4".to_string()
}

fn default_bookmaker_priority() -> Vec<String> {
    DEFAULT_BOOKMAKER_PRIORITY
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectionsConfig {
    /// Team TD projections feed (`{ games: [...] }` shape)
    #[serde(default = "default_projections_url")]
    pub url: String,
}

fn default_projections_url() -> String {
    "https://nfl-team-td-projections-production.up.railway.app/team-analysis".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Snapshot time-to-live in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Multiplier policy for players whose team cannot be resolved
    #[serde(default)]
    pub unknown_team_policy: UnknownTeamPolicy,
    /// Path to the roster reference text; unset means every player is unresolved
    #[serde(default)]
    pub roster_path: Option<String>,
    /// Concurrent per-fixture market fetches
    #[serde(default = "default_fixture_concurrency")]
    pub fixture_concurrency: usize,
}

fn default_fixture_concurrency() -> usize {
    8
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listening port for the HTTP API
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port() }
    }
}

fn default_port() -> u16 {
    8080
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("odds.base_url", default_odds_base_url())?
            .set_default("projections.url", default_projections_url())?
            .set_default("cache.ttl_secs", default_cache_ttl_secs() as i64)?
            .set_default("engine.fixture_concurrency", default_fixture_concurrency() as i64)?
            .set_default("server.port", default_port() as i64)?
            .set_default("logging.level", default_log_level())?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("TDEDGE_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (TDEDGE_ODDS__API_KEY, etc.)
            .add_source(
                Environment::with_prefix("TDEDGE")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.odds.api_key.trim().is_empty() {
            errors.push("odds.api_key must be set (TDEDGE_ODDS__API_KEY)".to_string());
        }

        if self.odds.bookmaker_priority.is_empty() {
            errors.push("odds.bookmaker_priority must not be empty".to_string());
        }

        if self.cache.ttl_secs == 0 {
            errors.push("cache.ttl_secs must be positive".to_string());
        }

        if self.engine.fixture_concurrency == 0 {
            errors.push("engine.fixture_concurrency must be positive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
