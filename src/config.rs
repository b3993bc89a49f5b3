// src/config.rs
// COMMAND LINE + RUNTIME SETTINGS
// Every knob can also come from a TRENDS_RADAR_* environment variable.

use clap::builder::FalseyValueParser;
use clap::Parser;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://trends.google.com";

#[derive(Debug, Parser)]
#[command(
    name = "trends_radar",
    about = "Search-interest history for a keyword, as JSON",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Keyword to look up. Echoed back verbatim.
    #[arg(allow_hyphen_values = true)]
    pub keyword: Option<String>,

    /// Ignored; only the first keyword is looked up.
    #[arg(hide = true, allow_hyphen_values = true)]
    pub extra: Vec<String>,

    /// Interface language sent to Google Trends
    #[arg(long, env = "TRENDS_RADAR_HL", default_value = "en-US")]
    pub hl: String,

    /// Timezone offset in minutes sent to Google Trends
    #[arg(long, env = "TRENDS_RADAR_TZ", default_value_t = 360, allow_hyphen_values = true)]
    pub tz: i32,

    /// Connect timeout in seconds
    #[arg(long, env = "TRENDS_RADAR_CONNECT_TIMEOUT", default_value_t = 10)]
    pub connect_timeout: u64,

    /// Read timeout in seconds
    #[arg(long, env = "TRENDS_RADAR_READ_TIMEOUT", default_value_t = 25)]
    pub read_timeout: u64,

    #[arg(long, env = "TRENDS_RADAR_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Skip the live client entirely and emit synthetic data
    #[arg(long, env = "TRENDS_RADAR_OFFLINE", value_parser = FalseyValueParser::new())]
    pub offline: bool,

    /// Add `trend` and `volatility` summaries to the output
    #[arg(long, env = "TRENDS_RADAR_ANALYZE", value_parser = FalseyValueParser::new())]
    pub analyze: bool,
}

impl Cli {
    /// The keyword to look up. When clap consumed every argument as a flag
    /// (`trends_radar --offline`), the first raw argument is the keyword.
    pub fn keyword_from(&self, raw_args: &[String]) -> Option<String> {
        self.keyword.clone().or_else(|| raw_args.first().cloned())
    }
}

/// Resolved settings handed to the live client.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(not(feature = "live"), allow(dead_code))]
pub struct Settings {
    pub hl: String,
    pub tz: i32,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub base_url: String,
    pub offline: bool,
    pub analyze: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hl: "en-US".to_string(),
            tz: 360,
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(25),
            base_url: DEFAULT_BASE_URL.to_string(),
            offline: false,
            analyze: false,
        }
    }
}

impl From<&Cli> for Settings {
    fn from(cli: &Cli) -> Self {
        Self {
            hl: cli.hl.clone(),
            tz: cli.tz,
            connect_timeout: Duration::from_secs(cli.connect_timeout),
            read_timeout: Duration::from_secs(cli.read_timeout),
            base_url: cli.base_url.trim_end_matches('/').to_string(),
            offline: cli.offline,
            analyze: cli.analyze,
        }
    }
}
