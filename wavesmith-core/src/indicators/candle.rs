//! Last-candle shape classification.
//!
//! Three families, checked in order of specificity:
//! - engulfing: latest body fully engulfs the previous body, colors opposed
//! - pin bar: dominant wick >= 2x body and >= 1.5x the opposite wick
//! - strong directional candle: body >= 60% of the full range

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, Bias};

const PIN_WICK_TO_BODY: f64 = 2.0;
const PIN_WICK_ASYMMETRY: f64 = 1.5;
const STRONG_BODY_FRACTION: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandlePattern {
    BullishEngulfing,
    BearishEngulfing,
    Hammer,
    ShootingStar,
    StrongBullish,
    StrongBearish,
}

impl CandlePattern {
    /// Which trade side the pattern supports.
    pub fn bias(self) -> Bias {
        match self {
            CandlePattern::BullishEngulfing
            | CandlePattern::Hammer
            | CandlePattern::StrongBullish => Bias::Bullish,
            CandlePattern::BearishEngulfing
            | CandlePattern::ShootingStar
            | CandlePattern::StrongBearish => Bias::Bearish,
        }
    }
}

/// Classify the shape of the latest candle, or None when nothing qualifies.
/// Never panics; fewer than two bars disables the engulfing check only.
pub fn classify_last_candle(bars: &[Bar]) -> Option<CandlePattern> {
    let last = bars.last()?;

    if bars.len() >= 2 {
        let prev = &bars[bars.len() - 2];
        if let Some(p) = engulfing(prev, last) {
            return Some(p);
        }
    }
    if let Some(p) = pin_bar(last) {
        return Some(p);
    }
    strong_candle(last)
}

fn engulfing(prev: &Bar, last: &Bar) -> Option<CandlePattern> {
    let prev_top = prev.open.max(prev.close);
    let prev_bottom = prev.open.min(prev.close);
    let last_top = last.open.max(last.close);
    let last_bottom = last.open.min(last.close);

    let engulfs = last_top >= prev_top && last_bottom <= prev_bottom && last.body() > prev.body();
    if !engulfs {
        return None;
    }
    if last.is_up() && prev.is_down() {
        Some(CandlePattern::BullishEngulfing)
    } else if last.is_down() && prev.is_up() {
        Some(CandlePattern::BearishEngulfing)
    } else {
        None
    }
}

fn pin_bar(bar: &Bar) -> Option<CandlePattern> {
    let body = bar.body();
    if body <= 0.0 {
        return None;
    }
    let upper = bar.upper_wick();
    let lower = bar.lower_wick();

    if lower >= PIN_WICK_TO_BODY * body && lower >= PIN_WICK_ASYMMETRY * upper {
        return Some(CandlePattern::Hammer);
    }
    if upper >= PIN_WICK_TO_BODY * body && upper >= PIN_WICK_ASYMMETRY * lower {
        return Some(CandlePattern::ShootingStar);
    }
    None
}

fn strong_candle(bar: &Bar) -> Option<CandlePattern> {
    let range = bar.range();
    if range <= 0.0 || bar.body() < STRONG_BODY_FRACTION * range {
        return None;
    }
    if bar.is_up() {
        Some(CandlePattern::StrongBullish)
    } else if bar.is_down() {
        Some(CandlePattern::StrongBearish)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::testing::bars_from_ohlc;

    #[test]
    fn detects_bullish_engulfing() {
        let bars = bars_from_ohlc(&[
            (101.0, 101.5, 99.5, 100.0), // down candle
            (99.8, 102.5, 99.4, 102.0),  // up candle engulfing previous body
        ]);
        assert_eq!(
            classify_last_candle(&bars),
            Some(CandlePattern::BullishEngulfing)
        );
    }

    #[test]
    fn detects_bearish_engulfing() {
        let bars = bars_from_ohlc(&[
            (100.0, 101.5, 99.8, 101.0), // up candle
            (101.2, 101.6, 99.2, 99.5),  // down candle engulfing previous body
        ]);
        assert_eq!(
            classify_last_candle(&bars),
            Some(CandlePattern::BearishEngulfing)
        );
    }

    #[test]
    fn detects_hammer() {
        // Body 0.2, lower wick 1.0, upper wick 0.1
        let bars = bars_from_ohlc(&[(100.0, 100.3, 99.0, 100.2)]);
        assert_eq!(classify_last_candle(&bars), Some(CandlePattern::Hammer));
    }

    #[test]
    fn detects_shooting_star() {
        // Body 0.2, upper wick 1.0, lower wick 0.1
        let bars = bars_from_ohlc(&[(100.2, 101.2, 99.9, 100.0)]);
        assert_eq!(
            classify_last_candle(&bars),
            Some(CandlePattern::ShootingStar)
        );
    }

    #[test]
    fn detects_strong_directional_candle() {
        // Body 1.0 of range 1.4
        let bars = bars_from_ohlc(&[(100.0, 101.2, 99.8, 101.0)]);
        assert_eq!(
            classify_last_candle(&bars),
            Some(CandlePattern::StrongBullish)
        );
    }

    #[test]
    fn balanced_candle_is_none() {
        // Body 0.4 of range 1.6, wicks symmetric
        let bars = bars_from_ohlc(&[(100.0, 101.0, 99.4, 100.4)]);
        assert_eq!(classify_last_candle(&bars), None);
    }

    #[test]
    fn empty_series_is_none() {
        assert_eq!(classify_last_candle(&[]), None);
    }

    #[test]
    fn pattern_bias_sides() {
        assert_eq!(CandlePattern::Hammer.bias(), Bias::Bullish);
        assert_eq!(CandlePattern::ShootingStar.bias(), Bias::Bearish);
        assert_eq!(CandlePattern::StrongBearish.bias(), Bias::Bearish);
    }
}
