// src/systems/google_trends.rs
// THE LIVE CLIENT
// Talks to the public Google Trends web API (the same two calls the website makes):
//   1. /trends/api/explore                 -> widget token for the time series
//   2. /trends/api/widgetdata/multiline    -> the time series itself
// Both answers start with an anti-JSON-hijacking prefix (")]}'") that we strip.

use chrono::{DateTime, NaiveDate};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{InterestPoint, TrendQuery, TrendSource};
use crate::config::Settings;
use crate::error::{TrendsError, CLIENT_NAME};

const EXPLORE_PATH: &str = "/trends/api/explore";
const MULTILINE_PATH: &str = "/trends/api/widgetdata/multiline";
const TIMESERIES_WIDGET: &str = "TIMESERIES";

#[derive(Deserialize)]
struct ExploreResponse {
    #[serde(default)]
    widgets: Vec<Widget>,
}

#[derive(Deserialize, Debug)]
struct Widget {
    id: String,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    request: Value,
}

#[derive(Deserialize)]
struct MultilineResponse {
    default: Timeline,
}

#[derive(Deserialize)]
struct Timeline {
    #[serde(rename = "timelineData", default)]
    timeline_data: Vec<TimelinePoint>,
}

#[derive(Deserialize)]
struct TimelinePoint {
    time: String,
    #[serde(default)]
    value: Vec<i64>,
}

pub struct GoogleTrendsClient {
    http: Client,
    base_url: String,
    hl: String,
    tz: i32,
}

impl GoogleTrendsClient {
    pub fn new(settings: &Settings) -> Result<Self, TrendsError> {
        // reqwest's blocking client has no separate read timeout; the total
        // request timeout plays that role.
        let http = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.read_timeout)
            .cookie_store(true)
            .user_agent(concat!("trends_radar/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TrendsError::Query(e.to_string()))?;

        Ok(Self {
            http,
            base_url: settings.base_url.clone(),
            hl: settings.hl.clone(),
            tz: settings.tz,
        })
    }

    // Google hands out the NID cookie on the landing page; without it the API
    // answers 429 much sooner. Best effort only.
    fn warm_up(&self) {
        let url = format!("{}/", self.base_url);
        match self.http.get(&url).query(&[("geo", cookie_geo(&self.hl))]).send() {
            Ok(resp) => debug!("TRENDS: Cookie warm-up returned {}", resp.status()),
            Err(e) => debug!("TRENDS: Cookie warm-up failed: {}", e),
        }
    }

    fn get_text(&self, path: &str, params: &[(&str, String)]) -> Result<String, TrendsError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .query(params)
            .send()
            .map_err(|e| TrendsError::classify(format!("The request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrendsError::classify(format!(
                "The request failed: Google returned a response with code {} ({})",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .text()
            .map_err(|e| TrendsError::classify(format!("Failed to read response: {}", e)))
    }

    fn base_params(&self) -> Vec<(&'static str, String)> {
        vec![("hl", self.hl.clone()), ("tz", self.tz.to_string())]
    }
}

impl TrendSource for GoogleTrendsClient {
    fn name(&self) -> &str {
        CLIENT_NAME
    }

    fn interest_over_time(&self, query: &TrendQuery) -> Result<Vec<InterestPoint>, TrendsError> {
        self.warm_up();

        // 1. Explore: which widget holds the time series, and its token
        let mut params = self.base_params();
        params.push(("req", explore_request(query).to_string()));
        let body = self.get_text(EXPLORE_PATH, &params)?;
        let widget = parse_explore(&body)?;
        let token = widget
            .token
            .ok_or_else(|| TrendsError::Query("TIMESERIES widget carries no token".to_string()))?;

        // 2. Multiline: the series itself
        let mut params = self.base_params();
        params.push(("req", widget.request.to_string()));
        params.push(("token", token));
        let body = self.get_text(MULTILINE_PATH, &params)?;
        let points = parse_timeline(&body)?;

        info!("TRENDS: Google returned {} points for '{}'", points.len(), query.keyword);
        Ok(points)
    }
}

/// Region code for the cookie request: the tail of `hl` ("en-US" -> "US").
fn cookie_geo(hl: &str) -> String {
    let chars: Vec<char> = hl.chars().collect();
    chars[chars.len().saturating_sub(2)..].iter().collect()
}

fn explore_request(query: &TrendQuery) -> Value {
    json!({
        "comparisonItem": [{
            "keyword": query.keyword,
            "time": query.timeframe,
            "geo": query.geo,
        }],
        "category": query.category,
        "property": query.property,
    })
}

/// Drops everything before the first `{` and parses the rest.
fn parse_guarded<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, TrendsError> {
    let start = body
        .find('{')
        .ok_or_else(|| TrendsError::Query("Google Trends returned no JSON payload".to_string()))?;
    serde_json::from_str(&body[start..])
        .map_err(|e| TrendsError::Query(format!("Unexpected response from Google Trends: {}", e)))
}

fn parse_explore(body: &str) -> Result<Widget, TrendsError> {
    let explore: ExploreResponse = parse_guarded(body)?;
    explore
        .widgets
        .into_iter()
        .find(|w| w.id == TIMESERIES_WIDGET)
        .ok_or_else(|| TrendsError::Query("No TIMESERIES widget in explore response".to_string()))
}

fn parse_timeline(body: &str) -> Result<Vec<InterestPoint>, TrendsError> {
    let multiline: MultilineResponse = parse_guarded(body)?;
    multiline
        .default
        .timeline_data
        .into_iter()
        .map(|point| {
            Ok(InterestPoint {
                date: unix_day(&point.time)?,
                value: point.value.first().copied().unwrap_or(0),
            })
        })
        .collect()
}

fn unix_day(raw: &str) -> Result<NaiveDate, TrendsError> {
    raw.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.date_naive())
        .ok_or_else(|| TrendsError::Query(format!("Bad timestamp in timeline: {}", raw)))
}
