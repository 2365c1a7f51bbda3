//! 5-wave impulse detection and rule scoring.
//!
//! A candidate is six consecutive pivots of strictly alternating kind,
//! low-first for a bullish count, high-first for a bearish one. Candidates
//! are scored against the weighted Elliott rule set (total weight 9.5);
//! confidence = score / 9.5 capped at 1.0.

use crate::domain::Bias;
use crate::pivots::{Pivot, PivotKind};

/// Sum of the maximum weights of all rule tiers.
const TOTAL_RULE_WEIGHT: f64 = 9.5;

/// Minimum confidence for a candidate to count as a valid impulse.
pub const VALID_CONFIDENCE: f64 = 0.40;

/// A scored 6-point impulse candidate (points 0-5).
#[derive(Debug, Clone, PartialEq)]
pub struct ImpulseCandidate {
    pub points: [Pivot; 6],
    pub direction: Bias,
    pub confidence: f64,
    pub wave3_extended: bool,
}

impl ImpulseCandidate {
    pub fn is_valid(&self) -> bool {
        self.confidence > VALID_CONFIDENCE
    }
}

/// Best-scoring impulse window among consecutive pivot runs, if any window
/// passes the hard wave-2 rule at all.
pub fn best_impulse(pivots: &[Pivot]) -> Option<ImpulseCandidate> {
    let mut best: Option<ImpulseCandidate> = None;

    for window in pivots.windows(6) {
        let direction = match alternating_direction(window) {
            Some(d) => d,
            None => continue,
        };
        let prices = [
            window[0].price,
            window[1].price,
            window[2].price,
            window[3].price,
            window[4].price,
            window[5].price,
        ];
        let Some((confidence, wave3_extended)) = score_impulse(&prices, direction) else {
            continue;
        };
        if best.as_ref().map_or(true, |b| confidence > b.confidence) {
            best = Some(ImpulseCandidate {
                points: [
                    window[0], window[1], window[2], window[3], window[4], window[5],
                ],
                direction,
                confidence,
                wave3_extended,
            });
        }
    }

    best
}

/// Kind pattern must strictly alternate; the first kind fixes the direction.
fn alternating_direction(window: &[Pivot]) -> Option<Bias> {
    for pair in window.windows(2) {
        if pair[0].kind == pair[1].kind {
            return None;
        }
    }
    match window[0].kind {
        PivotKind::Low => Some(Bias::Bullish),
        PivotKind::High => Some(Bias::Bearish),
    }
}

/// Apply the weighted rule set to prices p0..p5.
///
/// Returns None when the candidate is structurally invalid: wave 2 retracing
/// a full 100% of wave 1, or a degenerate zero-length wave 1 or 3.
pub fn score_impulse(p: &[f64; 6], direction: Bias) -> Option<(f64, bool)> {
    let w1 = (p[1] - p[0]).abs();
    let w2 = (p[2] - p[1]).abs();
    let w3 = (p[3] - p[2]).abs();
    let w4 = (p[4] - p[3]).abs();
    let w5 = (p[5] - p[4]).abs();

    if w1 <= 0.0 || w3 <= 0.0 {
        return None;
    }
    // Hard rule: wave 2 never retraces all of wave 1.
    if w2 >= w1 {
        return None;
    }

    let mut score = 1.0;
    let r2 = w2 / w1;
    if (0.382..=0.618).contains(&r2) {
        score += 1.0;
    }

    // Wave 3 must not be the shortest of 1/3/5.
    if w3 > w1 && w3 > w5 {
        score += 2.0;
    } else if w3 > w1 || w3 > w5 {
        score += 0.5;
    }

    // Wave 3 extension ratio.
    let ext = w3 / w1;
    let wave3_extended = ext >= 1.618;
    if wave3_extended {
        score += 1.0;
    } else if ext >= 1.2 {
        score += 0.5;
    }

    // Wave 4 must stay out of wave 1 territory (direction-aware).
    // "Partial" credit when it dips less than half of wave 1's range in.
    let intrusion = match direction {
        Bias::Bullish => p[1] - p[4],
        Bias::Bearish => p[4] - p[1],
    };
    if intrusion <= 0.0 {
        score += 2.0;
    } else if intrusion < 0.5 * w1 {
        score += 0.5;
    }

    // Wave 4 retracement of wave 3.
    let r4 = w4 / w3;
    if (0.236..=0.382).contains(&r4) {
        score += 1.0;
    } else if r4 <= 0.5 {
        score += 0.3;
    }

    // Alternation between the two corrections.
    if (r2 - r4).abs() > 0.1 {
        score += 0.5;
    }

    // Wave 5 proportion.
    if w5 >= 0.5 * w1 && w5 <= 1.618 * w1 {
        score += 0.5;
    }

    Some(((score / TOTAL_RULE_WEIGHT).min(1.0), wave3_extended))
}
