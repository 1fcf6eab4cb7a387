//! Runtime configuration and the command-line surface that fills it in.

use std::time::Duration;

use clap::Parser;
use reqwest::Url;

pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/users";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);
const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);
pub const DEFAULT_LIST_ID: &str = "user-list";

/// Exponential backoff for retryable fetch failures.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(1000),
            multiplier: 1.5,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (zero-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = self.multiplier.powi(i32::try_from(retry).unwrap_or(i32::MAX));
        self.initial_delay.mul_f64(factor)
    }

    /// A policy that never waits.
    #[cfg(test)]
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_delay: Duration::ZERO,
            multiplier: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub endpoint: Url,
    pub request_timeout: Duration,
    /// Shared by every cache entry.
    pub cache_ttl: Duration,
    pub retry: RetryPolicy,
    pub debounce_window: Duration,
    pub list_id: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            request_timeout: DEFAULT_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
            retry: RetryPolicy::default(),
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
            list_id: DEFAULT_LIST_ID.to_owned(),
        }
    }
}

/// Browse the user directory from the terminal.
#[derive(Debug, Parser)]
#[command(name = "user_directory", version)]
pub struct Cli {
    /// Endpoint serving the JSON user list.
    #[arg(long, env = "USER_DIRECTORY_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: Url,

    /// Seconds before a cached user list is considered stale.
    #[arg(long, env = "USER_DIRECTORY_CACHE_TTL_SECS", default_value_t = 300)]
    pub cache_ttl_secs: u64,

    /// Quiescence window for the search box, in milliseconds.
    #[arg(long, env = "USER_DIRECTORY_DEBOUNCE_MS", default_value_t = 300)]
    pub debounce_ms: u64,

    /// Per-request timeout in seconds.
    #[arg(long, env = "USER_DIRECTORY_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Search text matched against formatted names.
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Commit the user at this position of the filtered list.
    #[arg(short, long)]
    pub select: Option<usize>,

    /// Use the dark palette for avatar colours.
    #[arg(long)]
    pub dark: bool,

    /// Rows of the filtered list to print.
    #[arg(long, default_value_t = 20)]
    pub rows: usize,

    /// First row to print, as a scroll offset into the filtered list.
    #[arg(long, default_value_t = 0)]
    pub scroll: usize,

    /// Drop the cached list and fetch it again before searching.
    #[arg(long)]
    pub refresh: bool,
}

impl From<&Cli> for DirectoryConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            endpoint: cli.endpoint.clone(),
            request_timeout: Duration::from_secs(cli.timeout_secs),
            cache_ttl: Duration::from_secs(cli.cache_ttl_secs),
            debounce_window: Duration::from_millis(cli.debounce_ms),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backoff_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(1), Duration::from_millis(1500));
        assert_eq!(policy.delay_for(2), Duration::from_millis(2250));
    }

    #[test]
    fn test_cli_overrides_defaults() {
        let cli = Cli::try_parse_from([
            "user_directory",
            "--endpoint",
            "http://localhost:8080/users",
            "--cache-ttl-secs",
            "30",
            "--debounce-ms",
            "120",
            "--query",
            "doe",
            "--select",
            "2",
        ])
        .unwrap();

        let config = DirectoryConfig::from(&cli);
        assert_eq!(config.endpoint.as_str(), "http://localhost:8080/users");
        assert_eq!(config.cache_ttl, Duration::from_secs(30));
        assert_eq!(config.debounce_window, Duration::from_millis(120));
        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(cli.select, Some(2));
    }

    #[test]
    fn test_cli_paging_defaults() {
        let cli = Cli::try_parse_from(["user_directory"]).unwrap();
        assert_eq!(cli.rows, 20);
        assert_eq!(cli.scroll, 0);
        assert!(!cli.refresh);

        let cli = Cli::try_parse_from(["user_directory", "--rows", "5", "--scroll", "3", "--refresh"]).unwrap();
        assert_eq!((cli.rows, cli.scroll, cli.refresh), (5, 3, true));
    }

    #[test]
    fn test_cli_rejects_invalid_endpoint() {
        assert!(Cli::try_parse_from(["user_directory", "--endpoint", "not a url"]).is_err());
    }
}
