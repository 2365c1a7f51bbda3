//! Bar — the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OHLCV bar for a single symbol at a single timestamp.
///
/// Volume is optional: forex feeds typically carry none, crypto/stock feeds do.
/// Every analytical function in this crate treats a bar slice as an immutable
/// snapshot; nothing here is ever mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

impl Bar {
    /// Absolute body size (|close - open|).
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Full high-to-low range.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Wick above the body.
    pub fn upper_wick(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    /// Wick below the body.
    pub fn lower_wick(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    /// Up-candle: close above open.
    pub fn is_up(&self) -> bool {
        self.close > self.open
    }

    /// Down-candle: close below open.
    pub fn is_down(&self) -> bool {
        self.close < self.open
    }

    /// Basic OHLC sanity: high is the top, low is the bottom, prices positive.
    pub fn is_sane(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
    }
}

/// Contract violations in an input series.
///
/// Expected degenerate data (too few bars, flat ranges) never produces these;
/// they cover only input the data collaborator promised not to send.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SeriesError {
    #[error("timestamps not strictly increasing at bar {index}")]
    NonMonotonicTimestamps { index: usize },

    #[error("non-finite price field at bar {index}")]
    NonFinitePrice { index: usize },
}

/// Validate the input contract: strictly increasing timestamps, finite prices.
///
/// OHLC integrity (high >= max(open, close) etc.) is the data collaborator's
/// responsibility and is deliberately not enforced here.
pub fn validate_series(bars: &[Bar]) -> Result<(), SeriesError> {
    for (i, bar) in bars.iter().enumerate() {
        if !(bar.open.is_finite()
            && bar.high.is_finite()
            && bar.low.is_finite()
            && bar.close.is_finite())
        {
            return Err(SeriesError::NonFinitePrice { index: i });
        }
        if i > 0 && bar.timestamp <= bars[i - 1].timestamp {
            return Err(SeriesError::NonMonotonicTimestamps { index: i });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_bar() -> Bar {
        Bar {
            symbol: "EURUSD".into(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap(),
            open: 1.1000,
            high: 1.1050,
            low: 1.0980,
            close: 1.1030,
            volume: Some(50_000.0),
        }
    }

    #[test]
    fn bar_geometry() {
        let bar = sample_bar();
        assert!((bar.body() - 0.0030).abs() < 1e-12);
        assert!((bar.range() - 0.0070).abs() < 1e-12);
        assert!((bar.upper_wick() - 0.0020).abs() < 1e-12);
        assert!((bar.lower_wick() - 0.0020).abs() < 1e-12);
        assert!(bar.is_up());
        assert!(!bar.is_down());
        assert!(bar.is_sane());
    }

    #[test]
    fn bar_detects_insane_high_low() {
        let mut bar = sample_bar();
        bar.high = 1.0900; // below low
        assert!(!bar.is_sane());
    }

    #[test]
    fn validate_accepts_ordered_series() {
        let mut bars = vec![sample_bar(), sample_bar()];
        bars[1].timestamp = bars[0].timestamp + chrono::Duration::hours(1);
        assert_eq!(validate_series(&bars), Ok(()));
    }

    #[test]
    fn validate_rejects_duplicate_timestamp() {
        let bars = vec![sample_bar(), sample_bar()];
        assert_eq!(
            validate_series(&bars),
            Err(SeriesError::NonMonotonicTimestamps { index: 1 })
        );
    }

    #[test]
    fn validate_rejects_nan_price() {
        let mut bars = vec![sample_bar()];
        bars[0].close = f64::NAN;
        assert_eq!(
            validate_series(&bars),
            Err(SeriesError::NonFinitePrice { index: 0 })
        );
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = sample_bar();
        let json = serde_json::to_string(&bar).unwrap();
        let deser: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, deser);
    }
}
