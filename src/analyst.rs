// src/analyst.rs
// THE ANALYST
// Reads a finished history and labels its direction and choppiness.

use serde::Serialize;

use crate::history::TrendRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Volatility {
    High,
    Moderate,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendAnalysis {
    pub trend: Direction,
    pub volatility: Volatility,
}

const MIN_POINTS: usize = 7;

pub struct AnalystEngine;

impl AnalystEngine {
    pub fn analyze(history: &[TrendRecord]) -> TrendAnalysis {
        TrendAnalysis {
            trend: Self::direction(history),
            volatility: Self::volatility(history),
        }
    }

    /// Last week: mean of the final three days against the first three.
    pub fn direction(history: &[TrendRecord]) -> Direction {
        if history.len() < MIN_POINTS {
            return Direction::Stable;
        }

        let week = &history[history.len() - MIN_POINTS..];
        let first = mean(week[..3].iter().map(|r| r.value));
        let last = mean(week[MIN_POINTS - 3..].iter().map(|r| r.value));
        let diff = last - first;

        if diff > 5.0 {
            Direction::Up
        } else if diff < -5.0 {
            Direction::Down
        } else {
            Direction::Stable
        }
    }

    /// Population standard deviation over the last two weeks.
    pub fn volatility(history: &[TrendRecord]) -> Volatility {
        if history.len() < MIN_POINTS {
            return Volatility::Moderate;
        }

        let window = &history[history.len().saturating_sub(14)..];
        let avg = mean(window.iter().map(|r| r.value));
        let variance = mean(window.iter().map(|r| (r.value - avg).powi(2)));
        let std_dev = variance.sqrt();

        if std_dev > 15.0 {
            Volatility::High
        } else if std_dev > 7.0 {
            Volatility::Moderate
        } else {
            Volatility::Low
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}
