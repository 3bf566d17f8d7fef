use std::env;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; MetaScraper/1.0; +https://example.com/bot)";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Outbound fetch settings for the scraper.
#[derive(Clone, Debug)]
pub struct ScrapeConfig {
    pub timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
    /// Honour HTTP(S)_PROXY from the environment. Tests turn this off so
    /// requests to local fixture servers never leave the machine.
    pub use_system_proxy: bool,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        ScrapeConfig {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            use_system_proxy: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub is_dev: bool,
    pub scrape: ScrapeConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let timeout_secs = parse_var("SCRAPE_TIMEOUT_SECS", "number of seconds")?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let max_redirects =
            parse_var("SCRAPE_MAX_REDIRECTS", "redirect count")?.unwrap_or(DEFAULT_MAX_REDIRECTS);
        let use_system_proxy =
            parse_var("SCRAPE_USE_SYSTEM_PROXY", "boolean")?.unwrap_or(true);

        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: parse_var("SERVER_PORT", "port")?.unwrap_or(8080),
            is_dev: env::var("APP_ENV").as_deref() != Ok("production"),
            scrape: ScrapeConfig {
                timeout: Duration::from_secs(timeout_secs),
                max_redirects,
                user_agent: env::var("SCRAPE_USER_AGENT")
                    .ok()
                    .filter(|ua| !ua.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
                use_system_proxy,
            },
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Read an optional env var and parse it; unset or blank means `None`.
fn parse_var<T: std::str::FromStr>(
    name: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::Invalid {
                    name,
                    expected,
                    value: raw,
                })
        }
        _ => Ok(None),
    }
}
