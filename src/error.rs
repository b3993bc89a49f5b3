// src/error.rs
// FAILURE TAXONOMY
// Every way a live lookup can go wrong, and the synthetic series each one falls back to.

use thiserror::Error;

/// Name reported when the live client is missing.
pub const CLIENT_NAME: &str = "google-trends";

/// Surfaced instead of the raw text when Google throttles us.
pub const RATE_LIMIT_NOTICE: &str = "Rate limited by Google. Using cached data.";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrendsError {
    /// The live client is not compiled in, disabled, or failed to start.
    #[error("{0} not installed")]
    ClientUnavailable(&'static str),

    /// The query went through but Google had nothing for the keyword.
    #[error("No data available for this keyword")]
    EmptyResult,

    /// HTTP 429 / "Too Many Requests". Holds the raw message for the logs.
    #[error("{0}")]
    RateLimited(String),

    /// Anything else the query raised.
    #[error("{0}")]
    Query(String),
}

/// Starting point and step size of a synthetic series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackProfile {
    pub base_value: f64,
    pub volatility: f64,
}

impl TrendsError {
    /// Sorts a raw failure message into rate-limited vs. everything else.
    /// Substring matching on free text; keep the rule here and nowhere else.
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains("429") || message.contains("Too Many Requests") {
            TrendsError::RateLimited(message)
        } else {
            TrendsError::Query(message)
        }
    }

    /// The text that ends up in the `error` field of the output.
    pub fn user_message(&self) -> String {
        match self {
            TrendsError::RateLimited(_) => RATE_LIMIT_NOTICE.to_string(),
            other => other.to_string(),
        }
    }

    /// Baseline and volatility for the replacement series.
    /// Query failures seed from the keyword itself.
    pub fn fallback_profile(&self, keyword: &str) -> FallbackProfile {
        match self {
            TrendsError::ClientUnavailable(_) => FallbackProfile { base_value: 50.0, volatility: 10.0 },
            TrendsError::EmptyResult => FallbackProfile { base_value: 40.0, volatility: 8.0 },
            TrendsError::RateLimited(_) | TrendsError::Query(_) => FallbackProfile {
                base_value: crate::scout::keyword_baseline(keyword),
                volatility: 12.0,
            },
        }
    }
}
