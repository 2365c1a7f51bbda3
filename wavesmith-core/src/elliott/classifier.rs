//! Ordered classifier chain: impulse scan, ABC scan, trend fallback.
//!
//! Each strategy returns an optional result; the chain short-circuits on the
//! first hit. The trend fallback always succeeds, so `classify` is total for
//! any series of `MIN_BARS` or more.

use crate::domain::{Bar, Bias, Trend};
use crate::elliott::corrective::best_abc;
use crate::elliott::fib::fib_levels;
use crate::elliott::impulse::best_impulse;
use crate::elliott::{ElliottWaveResult, PatternType, WaveKind, WavePoint};
use crate::pivots::{adaptive_order, find_pivots, Pivot};

/// Minimum series length for any wave classification.
pub const MIN_BARS: usize = 30;

/// Impulse candidates above this confidence are emitted.
const IMPULSE_EMIT_CONFIDENCE: f64 = 0.38;

/// Stop scanning further pivot sensitivities once a candidate is this good.
const IMPULSE_EARLY_STOP: f64 = 0.70;

/// Confidence of the trend-only fallback result.
const FALLBACK_CONFIDENCE: f64 = 0.25;

/// Cap on how many recent pivots each scan considers.
const MAX_SCAN_PIVOTS: usize = 30;

/// Classify the series into the best-supported wave structure.
///
/// Series shorter than `MIN_BARS` produce the neutral unknown result; for
/// anything longer some strategy in the chain always answers.
pub fn classify(bars: &[Bar]) -> ElliottWaveResult {
    if bars.len() < MIN_BARS {
        return ElliottWaveResult::unknown("Insufficient data for a wave count");
    }

    let strategies: [fn(&[Bar]) -> Option<ElliottWaveResult>; 3] =
        [impulse_strategy, abc_strategy, fallback_strategy];
    for strategy in strategies {
        if let Some(result) = strategy(bars) {
            return result;
        }
    }
    // The fallback strategy never returns None for MIN_BARS+ series.
    unreachable!("trend fallback always classifies")
}

fn recent_pivots(bars: &[Bar], order: usize) -> Vec<Pivot> {
    let mut pivots = find_pivots(bars, Some(order)).interleaved();
    if pivots.len() > MAX_SCAN_PIVOTS {
        pivots.drain(..pivots.len() - MAX_SCAN_PIVOTS);
    }
    pivots
}

/// Scan three pivot sensitivities for the best 6-point impulse window.
fn impulse_strategy(bars: &[Bar]) -> Option<ElliottWaveResult> {
    let order = adaptive_order(bars.len());
    let sensitivities = [order, order.saturating_sub(2).max(1), order + 4];

    let mut best: Option<crate::elliott::impulse::ImpulseCandidate> = None;
    for k in sensitivities {
        if let Some(c) = best_impulse(&recent_pivots(bars, k)) {
            if best.as_ref().map_or(true, |b| c.confidence > b.confidence) {
                best = Some(c);
            }
        }
        if best
            .as_ref()
            .map_or(false, |b| b.confidence >= IMPULSE_EARLY_STOP)
        {
            break;
        }
    }

    let best = best?;
    if best.confidence <= IMPULSE_EMIT_CONFIDENCE {
        return None;
    }

    let p = &best.points;
    let direction = best.direction;
    let sign = direction.sign();
    let last_close = bars.last().map(|b| b.close).unwrap_or(p[5].price);

    let w1_size = (p[1].price - p[0].price).abs();
    let base = p[4].price;
    let target = base + sign * w1_size;
    let tp2 = base + sign * w1_size * 1.618;
    let tp3 = base + sign * w1_size * 2.618;

    // Past the wave-4 extreme the fifth wave is underway.
    let in_wave5 = match direction {
        Bias::Bullish => last_close > p[4].price,
        Bias::Bearish => last_close < p[4].price,
    };
    let current_wave = if in_wave5 { "5" } else { "4" };

    let wave_points = p
        .iter()
        .enumerate()
        .map(|(i, pivot)| WavePoint {
            index: pivot.index,
            price: pivot.price,
            label: i.to_string(),
            wave_kind: WaveKind::Impulse,
            direction,
        })
        .collect();

    Some(ElliottWaveResult {
        pattern_type: PatternType::FiveWaveImpulse,
        wave_points,
        current_wave: current_wave.to_string(),
        target: Some(target),
        tp2: Some(tp2),
        tp3: Some(tp3),
        stop: Some(p[4].price),
        confidence: best.confidence,
        trend: direction.trend(),
        fib_levels: fib_levels(p[0].price, p[5].price),
        description: format!(
            "{} 5-wave impulse; price in wave {current_wave}",
            trend_word(direction)
        ),
        wave3_extended: best.wave3_extended,
    })
}

/// ABC corrective scan over a wider pivot window than the impulse scan.
fn abc_strategy(bars: &[Bar]) -> Option<ElliottWaveResult> {
    let order = adaptive_order(bars.len()) + 2;
    let abc = best_abc(&recent_pivots(bars, order))?;

    let p = &abc.points;
    let direction = abc.direction;
    let sign = direction.sign();
    let a_size = (p[1].price - p[0].price).abs();

    let target = p[2].price + sign * a_size;
    let tp2 = p[2].price + sign * a_size * 1.272;
    let tp3 = p[2].price + sign * a_size * 1.618;

    let labels = ["A", "B", "C"];
    let wave_points = p
        .iter()
        .zip(labels)
        .map(|(pivot, label)| WavePoint {
            index: pivot.index,
            price: pivot.price,
            label: label.to_string(),
            wave_kind: WaveKind::Corrective,
            direction,
        })
        .collect();

    Some(ElliottWaveResult {
        pattern_type: PatternType::ThreeWaveAbc,
        wave_points,
        current_wave: "C".to_string(),
        target: Some(target),
        tp2: Some(tp2),
        tp3: Some(tp3),
        stop: Some(p[0].price),
        confidence: abc.confidence,
        trend: direction.trend(),
        fib_levels: fib_levels(p[0].price, p[1].price),
        description: format!(
            "{} ABC correction; wave C targeting {target:.5}",
            trend_word(direction)
        ),
        wave3_extended: false,
    })
}

/// Trend-only heuristic. Total: always classifies a MIN_BARS+ series.
fn fallback_strategy(bars: &[Bar]) -> Option<ElliottWaveResult> {
    let n = bars.len();
    let last_close = bars[n - 1].close;
    let ref_close = bars[n - 20].close;

    let trend = if last_close > ref_close {
        Trend::Bullish
    } else if last_close < ref_close {
        Trend::Bearish
    } else {
        Trend::Neutral
    };

    // Average absolute close-to-close move, 14-bar (or what history allows).
    let window = 14.min(n - 1);
    let avg_move = bars[n - window - 1..]
        .windows(2)
        .map(|w| (w[1].close - w[0].close).abs())
        .sum::<f64>()
        / window as f64;

    let (target, tp2, tp3, stop) = match trend.bias() {
        Some(bias) => {
            let sign = bias.sign();
            (
                Some(last_close + sign * avg_move * 2.0),
                Some(last_close + sign * avg_move * 3.5),
                Some(last_close + sign * avg_move * 5.0),
                Some(last_close - sign * avg_move * 1.5),
            )
        }
        None => (None, None, None, None),
    };

    let recent = &bars[n - 20..];
    let recent_high = recent.iter().map(|b| b.high).fold(f64::MIN, f64::max);
    let recent_low = recent.iter().map(|b| b.low).fold(f64::MAX, f64::min);
    let fib = match trend {
        Trend::Bearish => fib_levels(recent_high, recent_low),
        _ => fib_levels(recent_low, recent_high),
    };

    Some(ElliottWaveResult {
        pattern_type: PatternType::Unknown,
        wave_points: Vec::new(),
        current_wave: "?".to_string(),
        target,
        tp2,
        tp3,
        stop,
        confidence: FALLBACK_CONFIDENCE,
        trend,
        fib_levels: fib,
        description: match trend {
            Trend::Bullish => "No clear wave count; general bullish drift".to_string(),
            Trend::Bearish => "No clear wave count; general bearish drift".to_string(),
            Trend::Neutral => "No clear wave count; sideways market".to_string(),
        },
        wave3_extended: false,
    })
}

fn trend_word(bias: Bias) -> &'static str {
    match bias {
        Bias::Bullish => "Bullish",
        Bias::Bearish => "Bearish",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::testing::bars_from_ohlc;

    /// Piecewise-linear path through the given anchor prices, `step` bars per
    /// leg, with a +-0.01 high/low envelope around each close.
    fn path_bars(anchors: &[f64], step: usize) -> Vec<Bar> {
        let mut closes = vec![anchors[0]];
        for pair in anchors.windows(2) {
            for s in 1..=step {
                let t = s as f64 / step as f64;
                closes.push(pair[0] + (pair[1] - pair[0]) * t);
            }
        }
        let rows: Vec<(f64, f64, f64, f64)> = closes
            .iter()
            .map(|&c| (c, c + 0.01, c - 0.01, c))
            .collect();
        bars_from_ohlc(&rows)
    }

    /// Decline into point 0, the textbook five waves, then a short drift
    /// lower so both end points are interior pivots.
    fn ideal_impulse_bars() -> Vec<Bar> {
        // W2 = 50% of W1, W3 = 2x W1 (extended), W4 = 30% of W3, W5 = W1.
        let mut bars = path_bars(&[103.0, 100.0], 8);
        let waves = path_bars(&[100.0, 110.0, 105.0, 125.0, 119.0, 129.0], 8);
        let tail = path_bars(&[129.0, 128.3], 7);
        bars.extend_from_slice(&waves[1..]);
        bars.extend_from_slice(&tail[1..]);
        bars
    }

    #[test]
    fn ideal_five_wave_sequence_classifies_as_impulse() {
        let bars = ideal_impulse_bars();

        let result = classify(&bars);
        assert_eq!(result.pattern_type, PatternType::FiveWaveImpulse);
        assert!(
            result.confidence >= 0.85,
            "confidence {} below 0.85",
            result.confidence
        );
        assert_eq!(result.trend, Trend::Bullish);
        assert!(result.wave3_extended);
        assert_eq!(result.wave_points.len(), 6);
        assert_eq!(result.current_wave, "5");
        // TP1 sits one wave-1 size above the wave-4 base.
        let base = result.wave_points[4].price;
        let w1 = result.wave_points[1].price - result.wave_points[0].price;
        let tp1 = result.target.unwrap();
        assert!((tp1 - (base + w1)).abs() < 1e-9);
        assert_eq!(result.stop, Some(base));
    }

    #[test]
    fn zigzag_without_impulse_classifies_as_abc() {
        // Rise, 10-bar drop, 55% retrace, short tail lower.
        let mut bars = path_bars(&[97.0, 100.0], 5);
        let down = path_bars(&[100.0, 90.0], 10);
        let up = path_bars(&[90.0, 95.5], 10);
        let tail = path_bars(&[95.5, 93.8], 8);
        bars.extend_from_slice(&down[1..]);
        bars.extend_from_slice(&up[1..]);
        bars.extend_from_slice(&tail[1..]);

        let result = classify(&bars);
        assert_eq!(result.pattern_type, PatternType::ThreeWaveAbc);
        assert_eq!(result.trend, Trend::Bearish);
        assert!((result.confidence - 0.72).abs() < 1e-12);
        assert_eq!(result.current_wave, "C");
        let labels: Vec<&str> = result
            .wave_points
            .iter()
            .map(|w| w.label.as_str())
            .collect();
        assert_eq!(labels, vec!["A", "B", "C"]);
    }

    #[test]
    fn strictly_rising_series_falls_back_to_unknown_bullish() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + 0.5 * i as f64).collect();
        let rows: Vec<(f64, f64, f64, f64)> = closes
            .iter()
            .map(|&c| (c - 0.25, c + 0.1, c - 0.35, c))
            .collect();
        let bars = bars_from_ohlc(&rows);

        let result = classify(&bars);
        assert_eq!(result.pattern_type, PatternType::Unknown);
        assert_eq!(result.trend, Trend::Bullish);
        assert!((result.confidence - 0.25).abs() < 1e-12);
        assert!(result.target.unwrap() > closes[59]);
        assert!(result.stop.unwrap() < closes[59]);
    }

    #[test]
    fn short_series_is_unknown_with_zero_confidence() {
        let bars = path_bars(&[100.0, 101.0], 10);
        assert!(bars.len() < MIN_BARS);
        let result = classify(&bars);
        assert_eq!(result.pattern_type, PatternType::Unknown);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.trend, Trend::Neutral);
    }

    #[test]
    fn classification_is_deterministic() {
        let bars = ideal_impulse_bars();
        assert_eq!(classify(&bars), classify(&bars));
    }
}
