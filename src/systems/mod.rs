// src/systems/mod.rs
// EXTERNAL DATA SOURCES
// The resolver only ever talks to a `TrendSource`; which one (if any) is decided here, once.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::Settings;
use crate::error::TrendsError;

#[cfg(feature = "live")]
pub mod google_trends;

/// One raw point as the source reports it, before coercion into the 0-100 index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterestPoint {
    pub date: NaiveDate,
    pub value: i64,
}

/// What gets asked of a source.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendQuery {
    pub keyword: String,
    pub timeframe: String,
    pub geo: String,
    pub category: u32,
    pub property: String,
}

impl TrendQuery {
    /// Trailing 30 days, worldwide, web search.
    pub fn last_month(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            timeframe: "today 1-m".to_string(),
            geo: String::new(),
            category: 0,
            property: String::new(),
        }
    }
}

// Any live provider must implement this.
// An empty Ok means the query worked but there was nothing to report.
pub trait TrendSource {
    fn name(&self) -> &str;
    fn interest_over_time(&self, query: &TrendQuery) -> Result<Vec<InterestPoint>, TrendsError>;
}

/// Availability probe. `None` means "client not installed" as far as the resolver cares.
pub fn connect(settings: &Settings) -> Option<Box<dyn TrendSource>> {
    if settings.offline {
        info!("TRENDS: Live lookups disabled by configuration.");
        return None;
    }
    connect_live(settings)
}

#[cfg(feature = "live")]
fn connect_live(settings: &Settings) -> Option<Box<dyn TrendSource>> {
    match google_trends::GoogleTrendsClient::new(settings) {
        Ok(client) => Some(Box::new(client)),
        Err(e) => {
            warn!("TRENDS: Could not start the Google Trends client: {}", e);
            None
        }
    }
}

#[cfg(not(feature = "live"))]
fn connect_live(_settings: &Settings) -> Option<Box<dyn TrendSource>> {
    warn!("TRENDS: Built without the `live` feature; every lookup is synthetic.");
    None
}
