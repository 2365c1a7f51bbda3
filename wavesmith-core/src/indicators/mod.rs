//! Momentum and pattern filters — stateless functions over a bar slice.
//!
//! Each function reads the whole series and answers for the latest bar.
//! None of them ever panics on short or degenerate input; insufficient
//! history yields the documented neutral value instead.

pub mod atr;
pub mod candle;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod volume;

pub use atr::{atr, true_range};
pub use candle::{classify_last_candle, CandlePattern};
pub use ema::{ema_last, ema_series};
pub use macd::{macd_snapshot, MacdSnapshot};
pub use rsi::rsi;
pub use volume::volume_ok;

/// Shared test fixtures for bar-driven tests across the crate.
#[cfg(test)]
pub mod testing {
    use crate::domain::Bar;
    use chrono::{TimeZone, Utc};

    /// Build bars from explicit (open, high, low, close) rows, hourly spaced.
    pub fn bars_from_ohlc(rows: &[(f64, f64, f64, f64)]) -> Vec<Bar> {
        let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        rows.iter()
            .enumerate()
            .map(|(i, &(open, high, low, close))| Bar {
                symbol: "TEST".to_string(),
                timestamp: base + chrono::Duration::hours(i as i64),
                open,
                high,
                low,
                close,
                volume: Some(1000.0),
            })
            .collect()
    }

    /// Build bars from a close series with plausible OHLC around each close.
    pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
        let rows: Vec<(f64, f64, f64, f64)> = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let open = if i == 0 { close } else { closes[i - 1] };
                (open, open.max(close) + 0.5, open.min(close) - 0.5, close)
            })
            .collect();
        bars_from_ohlc(&rows)
    }

    /// Assert two f64 values are approximately equal (within epsilon).
    pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
        assert!(
            (actual - expected).abs() < epsilon,
            "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
            (actual - expected).abs()
        );
    }

    pub const DEFAULT_EPSILON: f64 = 1e-10;
}
