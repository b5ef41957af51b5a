//! Command-line interface parsing for reviewcard
//!
//! This module handles parsing of CLI arguments using clap and turns them
//! into validated settings for building a widget. Secrets and deployment
//! endpoints can come from the environment so they never live in the page.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use thiserror::Error;

use crate::cache::{CachePolicy, DEFAULT_TTL_HOURS};
use crate::data::{places::DEFAULT_PROXY_URL, WidgetConfig};
use crate::widget::DEFAULT_FETCH_TIMEOUT;

/// Default id of the page region reviews are rendered into
pub const DEFAULT_TARGET_ID: &str = "google-reviews-widget";

/// Default remote call timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = DEFAULT_FETCH_TIMEOUT.as_secs();

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// A required value was given but empty
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// A numeric option must be positive
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),

    /// A numeric option is too large to represent
    #[error("{0} is out of range")]
    OutOfRange(&'static str),
}

/// reviewcard - Render a business's latest reviews into an HTML page
#[derive(Parser, Debug)]
#[command(name = "reviewcard")]
#[command(about = "Fetch, cache and render business reviews into an HTML page")]
#[command(version)]
pub struct Cli {
    /// HTML page containing the render target
    #[arg(long, value_name = "FILE")]
    pub page: PathBuf,

    /// Where to write the rendered page (defaults to the input page; `-` for stdout)
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Place identifier at the review source
    #[arg(long, env = "REVIEWCARD_PLACE_ID", value_name = "ID")]
    pub place_id: String,

    /// API key for the review source
    #[arg(long, env = "REVIEWCARD_API_KEY", value_name = "KEY", hide_env_values = true)]
    pub api_key: String,

    /// Id of the element reviews are rendered into
    #[arg(long, default_value = DEFAULT_TARGET_ID, value_name = "ID")]
    pub target: String,

    /// Proxy prefix; the encoded source URL is appended to it
    #[arg(
        long,
        env = "REVIEWCARD_PROXY_URL",
        default_value = DEFAULT_PROXY_URL,
        value_name = "URL"
    )]
    pub proxy_url: String,

    /// Directory for cached reviews (defaults to the user cache directory)
    #[arg(long, env = "REVIEWCARD_CACHE_DIR", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Keep cached reviews in memory only
    #[arg(long, conflicts_with = "cache_dir")]
    pub no_cache: bool,

    /// Hours a cached review set stays usable
    #[arg(long, default_value_t = DEFAULT_TTL_HOURS, value_name = "HOURS")]
    pub ttl_hours: i64,

    /// Seconds to wait for the review source
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_name = "SECS")]
    pub timeout_secs: u64,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Where cached reviews should live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLocation {
    /// The platform cache directory
    Default,
    /// A caller-chosen directory
    Dir(PathBuf),
    /// No persistence
    Memory,
}

/// Validated settings derived from CLI arguments
#[derive(Debug, Clone)]
pub struct WidgetSettings {
    pub config: WidgetConfig,
    pub policy: CachePolicy,
    pub cache: CacheLocation,
    pub proxy_url: String,
    pub fetch_timeout: Duration,
    pub page: PathBuf,
    pub output: PathBuf,
}

impl WidgetSettings {
    /// Creates WidgetSettings from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(WidgetSettings)` with appropriate settings
    /// * `Err(CliError)` if a required value is empty or a number is not positive
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.place_id.trim().is_empty() {
            return Err(CliError::Empty("place id"));
        }
        if cli.api_key.trim().is_empty() {
            return Err(CliError::Empty("api key"));
        }
        if cli.target.trim().is_empty() {
            return Err(CliError::Empty("target"));
        }
        if cli.proxy_url.trim().is_empty() {
            return Err(CliError::Empty("proxy url"));
        }
        if cli.ttl_hours <= 0 {
            return Err(CliError::NotPositive("ttl hours"));
        }
        if cli.timeout_secs == 0 {
            return Err(CliError::NotPositive("timeout secs"));
        }

        let ttl = chrono::Duration::try_hours(cli.ttl_hours)
            .ok_or(CliError::OutOfRange("ttl hours"))?;

        let cache = match (&cli.cache_dir, cli.no_cache) {
            (_, true) => CacheLocation::Memory,
            (Some(dir), false) => CacheLocation::Dir(dir.clone()),
            (None, false) => CacheLocation::Default,
        };

        Ok(WidgetSettings {
            config: WidgetConfig::new(
                cli.place_id.trim(),
                cli.api_key.trim(),
                cli.target.trim(),
            ),
            policy: CachePolicy::default().with_ttl(ttl),
            cache,
            proxy_url: cli.proxy_url.clone(),
            fetch_timeout: Duration::from_secs(cli.timeout_secs),
            page: cli.page.clone(),
            output: cli.output.clone().unwrap_or_else(|| cli.page.clone()),
        })
    }

    /// Whether the rendered page goes to stdout
    pub fn writes_to_stdout(&self) -> bool {
        self.output.as_os_str() == "-"
    }
}

/// Log filter directive for a `-v` count
pub fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
