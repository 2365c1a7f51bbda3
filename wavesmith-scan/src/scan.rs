//! Parallel multi-symbol scanning.
//!
//! Each symbol is synthesized independently on the rayon pool. A bad
//! series never aborts the batch: its error is collected per symbol and
//! the rest of the scan proceeds. Surviving signals are filtered by the
//! configured score floor and ranked best first.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wavesmith_core::domain::SeriesError;
use wavesmith_core::{synthesize, Bar, SynthesisInput, TradeSignal};

use crate::config::ScanConfig;

/// One symbol's series pair for a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    pub symbol: String,
    pub primary: Vec<Bar>,
    /// Optional higher timeframe series for confirmation.
    pub secondary: Option<Vec<Bar>>,
}

/// A series that could not be analyzed, tagged with its symbol.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{symbol}: {source}")]
pub struct SymbolError {
    pub symbol: String,
    #[source]
    pub source: SeriesError,
}

/// Outcome of one batch scan.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Signals above the score floor, best first.
    pub signals: Vec<TradeSignal>,
    /// Symbols whose series failed validation.
    pub errors: Vec<SymbolError>,
    /// How many symbols were scanned in total.
    pub scanned: usize,
}

/// Scan every request in parallel and rank the resulting signals.
///
/// Ordering is deterministic: score descending, symbol as tiebreak.
pub fn scan_all(requests: &[ScanRequest], config: &ScanConfig) -> ScanOutcome {
    let results: Vec<Result<Option<TradeSignal>, SymbolError>> = requests
        .par_iter()
        .map(|request| {
            let mut input = SynthesisInput::new(
                request.symbol.clone(),
                request.primary.clone(),
                config.account_balance,
            );
            input.secondary = request.secondary.clone();
            input.risk_fraction = config.risk_fraction;
            synthesize(&input).map_err(|source| SymbolError {
                symbol: request.symbol.clone(),
                source,
            })
        })
        .collect();

    let mut signals = Vec::new();
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(Some(signal)) if signal.probability_score >= config.min_score => {
                signals.push(signal)
            }
            Ok(_) => {}
            Err(error) => errors.push(error),
        }
    }

    signals.sort_by(|a, b| {
        b.probability_score
            .total_cmp(&a.probability_score)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });

    ScanOutcome {
        signals,
        errors,
        scanned: requests.len(),
    }
}

/// Serialize ranked signals as JSON lines, one signal per line.
pub fn signals_to_json_lines(signals: &[TradeSignal]) -> anyhow::Result<String> {
    let mut out = String::new();
    for signal in signals {
        out.push_str(&serde_json::to_string(signal)?);
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bars_from_rows(symbol: &str, rows: &[(f64, f64, f64, f64)]) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        rows.iter()
            .enumerate()
            .map(|(i, &(open, high, low, close))| Bar {
                symbol: symbol.to_string(),
                timestamp: start + chrono::Duration::hours(i as i64),
                open,
                high,
                low,
                close,
                volume: Some(1_000.0),
            })
            .collect()
    }

    /// Uptrend with periodic breakout candles; produces a long signal.
    fn trending_rows(n: usize) -> Vec<(f64, f64, f64, f64)> {
        let mut c = 100.0;
        (0..n)
            .map(|i| {
                let open = c;
                let step = if i % 10 == 9 { 1.5 } else { 0.15 };
                c += step;
                (open, c + 0.1, open - 0.1, c)
            })
            .collect()
    }

    fn request(symbol: &str, rows: &[(f64, f64, f64, f64)]) -> ScanRequest {
        ScanRequest {
            symbol: symbol.to_string(),
            primary: bars_from_rows(symbol, rows),
            secondary: None,
        }
    }

    #[test]
    fn bad_series_is_skipped_not_fatal() {
        let good = request("EURUSD", &trending_rows(100));
        let mut bad = request("GBPUSD", &trending_rows(100));
        bad.primary[50].close = f64::NAN;

        let outcome = scan_all(&[good, bad], &ScanConfig::default());
        assert_eq!(outcome.scanned, 2);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].symbol, "GBPUSD");
        assert_eq!(outcome.signals.len(), 1);
        assert_eq!(outcome.signals[0].symbol, "EURUSD");
    }

    #[test]
    fn score_floor_filters_signals() {
        let requests = [request("EURUSD", &trending_rows(100))];
        let config = ScanConfig {
            min_score: 101.0,
            ..ScanConfig::default()
        };
        let outcome = scan_all(&requests, &config);
        assert!(outcome.signals.is_empty());
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn flat_symbols_simply_produce_nothing() {
        let requests = [request("USDCHF", &vec![(1.0, 1.0, 1.0, 1.0); 80])];
        let outcome = scan_all(&requests, &ScanConfig::default());
        assert!(outcome.signals.is_empty());
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.scanned, 1);
    }

    #[test]
    fn ranking_is_deterministic_across_runs() {
        let requests = [
            request("EURUSD", &trending_rows(100)),
            request("AUDUSD", &trending_rows(100)),
            request("NZDUSD", &trending_rows(90)),
        ];
        let config = ScanConfig::default();
        let a = scan_all(&requests, &config);
        let b = scan_all(&requests, &config);
        let symbols_a: Vec<&str> = a.signals.iter().map(|s| s.symbol.as_str()).collect();
        let symbols_b: Vec<&str> = b.signals.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols_a, symbols_b);
        // Equal scores fall back to symbol order.
        if a.signals.len() >= 2 && a.signals[0].probability_score == a.signals[1].probability_score
        {
            assert!(a.signals[0].symbol < a.signals[1].symbol);
        }
    }

    proptest::proptest! {
        /// Random walks never error (the series are well-formed) and the
        /// score floor is honored for whatever signals survive.
        #[test]
        fn random_walks_scan_cleanly(
            steps in proptest::collection::vec(-1.0f64..1.0, 60..120),
            min_score in 0.0f64..100.0,
        ) {
            let mut c = 100.0;
            let rows: Vec<(f64, f64, f64, f64)> = steps
                .iter()
                .map(|&s| {
                    let open = c;
                    c = (c + s).max(1.0);
                    (open, open.max(c) + 0.2, open.min(c) - 0.2, c)
                })
                .collect();
            let requests = [request("RAND", &rows)];
            let config = ScanConfig {
                min_score,
                ..ScanConfig::default()
            };
            let outcome = scan_all(&requests, &config);
            proptest::prop_assert!(outcome.errors.is_empty());
            for signal in &outcome.signals {
                proptest::prop_assert!(signal.probability_score >= min_score);
            }
        }
    }

    #[test]
    fn json_lines_one_per_signal() {
        let outcome = scan_all(
            &[request("EURUSD", &trending_rows(100))],
            &ScanConfig::default(),
        );
        let text = signals_to_json_lines(&outcome.signals).unwrap();
        assert_eq!(text.lines().count(), outcome.signals.len());
        for line in text.lines() {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(value.get("symbol").is_some());
        }
    }
}
