// src/history.rs
// THE OUTPUT RECORD + SYNTHETIC SERIES
// What one invocation prints, and the random walk used whenever live data is missing.

use chrono::{Duration, NaiveDate};
use rand::Rng;
use serde::{Serialize, Serializer};

pub const DEFAULT_INDEX: f64 = 50.0;
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendRecord {
    #[serde(serialize_with = "serialize_day")]
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_index")]
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendResult {
    pub keyword: String,
    #[serde(serialize_with = "serialize_index")]
    pub current_index: f64,
    pub history: Vec<TrendRecord>,
    pub is_real: bool,
    // Always emitted, `null` on success
    pub error: Option<String>,
}

impl TrendResult {
    pub fn live(keyword: &str, history: Vec<TrendRecord>) -> Self {
        Self {
            keyword: keyword.to_string(),
            current_index: latest_value(&history),
            history,
            is_real: true,
            error: None,
        }
    }

    pub fn fallback(keyword: &str, history: Vec<TrendRecord>, error: String) -> Self {
        Self {
            keyword: keyword.to_string(),
            current_index: latest_value(&history),
            history,
            is_real: false,
            error: Some(error),
        }
    }
}

fn latest_value(history: &[TrendRecord]) -> f64 {
    history.last().map(|r| r.value).unwrap_or(DEFAULT_INDEX)
}

/// Bounded random walk ending on `today`, oldest first, `days + 1` points.
/// Every step (including the first) moves by a uniform delta in
/// `[-volatility/2, +volatility/2]` and is clamped to `[0, 100]`.
pub fn generate_mock_history<R: Rng + ?Sized>(
    rng: &mut R,
    today: NaiveDate,
    base_value: f64,
    volatility: f64,
    days: u32,
) -> Vec<TrendRecord> {
    let mut history = Vec::with_capacity(days as usize + 1);
    let mut current = base_value;

    for offset in (0..=days).rev() {
        let date = today - Duration::days(i64::from(offset));
        let change = (rng.gen::<f64>() - 0.5) * volatility;
        current = (current + change).clamp(0.0, 100.0);
        history.push(TrendRecord {
            date,
            value: round2(current),
        });
    }

    history
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn serialize_day<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format("%Y-%m-%d"))
}

// Live points are whole numbers and print as `57`, synthetic ones as `57.31`.
fn serialize_index<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.is_finite() {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
