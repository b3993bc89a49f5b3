// src/scout.rs
// THE TREND SCOUT
// Fetch-or-fallback: one live query if a client is available, otherwise (or on
// any failure) a synthetic random walk that is clearly flagged as such.

use chrono::NaiveDate;
use rand::Rng;
use tracing::{info, warn};

use crate::error::{TrendsError, CLIENT_NAME};
use crate::history::{generate_mock_history, TrendRecord, TrendResult, DEFAULT_WINDOW_DAYS};
use crate::systems::{InterestPoint, TrendQuery, TrendSource};

// Topical seeds for synthetic series. Declaration order matters: first match wins.
const KEYWORD_BASELINES: &[(&str, f64)] = &[
    ("travel", 65.0),
    ("flight", 58.0),
    ("oil", 72.0),
    ("recession", 45.0),
    ("pandemic", 30.0),
    ("tourism", 60.0),
];

const DEFAULT_BASELINE: f64 = 50.0;

/// Case-insensitive substring lookup against the baseline table.
pub fn keyword_baseline(keyword: &str) -> f64 {
    let keyword = keyword.to_lowercase();
    KEYWORD_BASELINES
        .iter()
        .find(|(key, _)| keyword.contains(key))
        .map(|(_, base)| *base)
        .unwrap_or(DEFAULT_BASELINE)
}

pub struct TrendScout<'a> {
    source: Option<&'a dyn TrendSource>,
    days: u32,
}

impl<'a> TrendScout<'a> {
    /// `None` means the live client is not available at all.
    pub fn new(source: Option<&'a dyn TrendSource>) -> Self {
        Self {
            source,
            days: DEFAULT_WINDOW_DAYS,
        }
    }

    /// Always returns a well-formed result. Failures end up in `error`, never as a panic or Err.
    pub fn resolve<R: Rng + ?Sized>(&self, keyword: &str, today: NaiveDate, rng: &mut R) -> TrendResult {
        info!("SCOUT: Resolving search interest for '{}'...", keyword);

        match self.fetch(keyword) {
            Ok(history) => {
                info!("SCOUT: Live series acquired ({} points).", history.len());
                TrendResult::live(keyword, history)
            }
            Err(err) => {
                warn!("SCOUT: Falling back to synthetic data for '{}': {}", keyword, err);
                let profile = err.fallback_profile(keyword);
                let history = generate_mock_history(rng, today, profile.base_value, profile.volatility, self.days);
                TrendResult::fallback(keyword, history, err.user_message())
            }
        }
    }

    fn fetch(&self, keyword: &str) -> Result<Vec<TrendRecord>, TrendsError> {
        let source = self.source.ok_or(TrendsError::ClientUnavailable(CLIENT_NAME))?;

        info!("SCOUT: Querying {} for the trailing {} days...", source.name(), self.days);
        let points = source.interest_over_time(&TrendQuery::last_month(keyword))?;
        if points.is_empty() {
            return Err(TrendsError::EmptyResult);
        }

        Ok(points.into_iter().map(to_record).collect())
    }
}

fn to_record(point: InterestPoint) -> TrendRecord {
    TrendRecord {
        date: point.date,
        value: point.value.clamp(0, 100) as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RATE_LIMIT_NOTICE;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;

    // Test doubles for the live client
    struct Failing(&'static str);
    impl TrendSource for Failing {
        fn name(&self) -> &str { "failing" }
        fn interest_over_time(&self, _q: &TrendQuery) -> Result<Vec<InterestPoint>, TrendsError> {
            Err(TrendsError::classify(self.0))
        }
    }

    struct Fixed {
        points: Vec<InterestPoint>,
        seen: RefCell<Vec<TrendQuery>>,
    }
    impl TrendSource for Fixed {
        fn name(&self) -> &str { "fixed" }
        fn interest_over_time(&self, q: &TrendQuery) -> Result<Vec<InterestPoint>, TrendsError> {
            self.seen.borrow_mut().push(q.clone());
            Ok(self.points.clone())
        }
    }

    fn fixed(values: &[i64]) -> Fixed {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        Fixed {
            points: values
                .iter()
                .enumerate()
                .map(|(i, v)| InterestPoint { date: start + chrono::Duration::days(i as i64), value: *v })
                .collect(),
            seen: RefCell::new(Vec::new()),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
    }

    fn assert_well_formed(result: &TrendResult) {
        assert!(!result.history.is_empty());
        assert!(result.history.iter().all(|r| (0.0..=100.0).contains(&r.value)));
        assert_eq!(result.current_index, result.history.last().unwrap().value);
        assert_eq!(result.is_real, result.error.is_none());
    }

    #[test]
    fn test_keyword_baseline_table() {
        assert_eq!(keyword_baseline("business travel news"), 65.0);
        assert_eq!(keyword_baseline("xyz123"), 50.0);
        assert_eq!(keyword_baseline("JET FUEL OIL"), 72.0);
        assert_eq!(keyword_baseline("Pandemic"), 30.0);
        // "travel" is declared before "tourism"
        assert_eq!(keyword_baseline("tourism and travel"), 65.0);
        // substring, not word match
        assert_eq!(keyword_baseline("boiler"), 72.0);
    }

    #[test]
    fn test_missing_client_falls_back() {
        let scout = TrendScout::new(None);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..3 {
            let result = scout.resolve("oil", today(), &mut rng);
            assert!(!result.is_real);
            assert_eq!(result.error.as_deref(), Some("google-trends not installed"));
            assert_eq!(result.history.len(), 31);
            assert_eq!(result.history.last().unwrap().date, today());
            assert_well_formed(&result);
        }
    }

    #[test]
    fn test_missing_client_uses_neutral_baseline() {
        let scout = TrendScout::new(None);
        let result = scout.resolve("oil", today(), &mut StdRng::seed_from_u64(5));
        let expected = generate_mock_history(&mut StdRng::seed_from_u64(5), today(), 50.0, 10.0, 30);
        assert_eq!(result.history, expected);
    }

    #[test]
    fn test_empty_result_falls_back() {
        let source = fixed(&[]);
        let scout = TrendScout::new(Some(&source));
        let result = scout.resolve("obscure thing", today(), &mut StdRng::seed_from_u64(2));

        assert!(!result.is_real);
        assert_eq!(result.error.as_deref(), Some("No data available for this keyword"));
        let expected = generate_mock_history(&mut StdRng::seed_from_u64(2), today(), 40.0, 8.0, 30);
        assert_eq!(result.history, expected);
        assert_well_formed(&result);
    }

    #[test]
    fn test_query_failure_uses_keyword_baseline() {
        let source = Failing("connection reset");
        let scout = TrendScout::new(Some(&source));

        let result = scout.resolve("business travel news", today(), &mut StdRng::seed_from_u64(3));
        let expected = generate_mock_history(&mut StdRng::seed_from_u64(3), today(), 65.0, 12.0, 30);
        assert_eq!(result.history, expected);
        assert_eq!(result.error.as_deref(), Some("connection reset"));
        assert_well_formed(&result);

        let result = scout.resolve("xyz123", today(), &mut StdRng::seed_from_u64(3));
        let expected = generate_mock_history(&mut StdRng::seed_from_u64(3), today(), 50.0, 12.0, 30);
        assert_eq!(result.history, expected);
    }

    #[test]
    fn test_rate_limit_rewrites_error() {
        let source = Failing("The request failed: Google returned a response with code 429");
        let scout = TrendScout::new(Some(&source));
        let result = scout.resolve("flight prices", today(), &mut StdRng::seed_from_u64(4));

        assert!(!result.is_real);
        assert_eq!(result.error.as_deref(), Some(RATE_LIMIT_NOTICE));
        assert_well_formed(&result);
    }

    #[test]
    fn test_live_series_is_coerced_and_flagged_real() {
        let source = fixed(&[10, 55, 120, -3, 87]);
        let scout = TrendScout::new(Some(&source));
        let result = scout.resolve("Oil", today(), &mut StdRng::seed_from_u64(0));

        assert!(result.is_real);
        assert!(result.error.is_none());
        assert_eq!(result.keyword, "Oil");
        let values: Vec<f64> = result.history.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![10.0, 55.0, 100.0, 0.0, 87.0]);
        assert_eq!(result.current_index, 87.0);
        assert_well_formed(&result);

        let seen = source.seen.borrow();
        assert_eq!(seen.as_slice(), &[TrendQuery::last_month("Oil")]);
    }

    proptest! {
        #[test]
        fn prop_any_keyword_yields_well_formed_fallback(keyword in ".{0,40}", seed in any::<u64>(), fail in any::<bool>()) {
            let failing = Failing("boom");
            let source: Option<&dyn TrendSource> = if fail { Some(&failing) } else { None };
            let scout = TrendScout::new(source);
            let result = scout.resolve(&keyword, today(), &mut StdRng::seed_from_u64(seed));

            prop_assert_eq!(&result.keyword, &keyword);
            prop_assert_eq!(result.history.len(), 31);
            prop_assert!(result.history.iter().all(|r| (0.0..=100.0).contains(&r.value)));
            prop_assert_eq!(result.current_index, result.history.last().unwrap().value);
            prop_assert!(!result.is_real);
            prop_assert!(result.error.is_some());
        }
    }
}
