//! 3-wave ABC corrective detection.
//!
//! A candidate is three consecutive alternating pivots: high-low-high reads
//! as a bearish correction (A down, B up, C down pending), low-high-low as
//! the bullish mirror. Confidence is tiered by how much of leg A the B leg
//! retraces: 50-61.8% is the textbook zone, 38.2-78.6% acceptable, anything
//! under a full retrace is a weak candidate.

use crate::domain::Bias;
use crate::pivots::{Pivot, PivotKind};

/// Minimum confidence for an ABC candidate to be emitted.
pub const ACCEPT_CONFIDENCE: f64 = 0.30;

const CONF_IDEAL: f64 = 0.72;
const CONF_ACCEPTABLE: f64 = 0.55;
const CONF_WEAK: f64 = 0.35;

/// A scored A-B-C candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct AbcCandidate {
    pub points: [Pivot; 3],
    pub direction: Bias,
    pub confidence: f64,
}

/// Best-scoring ABC triple among consecutive pivot runs.
pub fn best_abc(pivots: &[Pivot]) -> Option<AbcCandidate> {
    let mut best: Option<AbcCandidate> = None;

    for window in pivots.windows(3) {
        if window[0].kind == window[1].kind || window[1].kind == window[2].kind {
            continue;
        }
        let a_size = (window[1].price - window[0].price).abs();
        let b_size = (window[2].price - window[1].price).abs();
        if a_size <= 0.0 {
            continue;
        }

        let retrace = b_size / a_size;
        let confidence = if (0.5..=0.618).contains(&retrace) {
            CONF_IDEAL
        } else if (0.382..=0.786).contains(&retrace) {
            CONF_ACCEPTABLE
        } else if retrace < 1.0 {
            CONF_WEAK
        } else {
            continue;
        };

        let direction = match window[0].kind {
            PivotKind::High => Bias::Bearish,
            PivotKind::Low => Bias::Bullish,
        };

        if best.as_ref().map_or(true, |b| confidence > b.confidence) {
            best = Some(AbcCandidate {
                points: [window[0], window[1], window[2]],
                direction,
                confidence,
            });
        }
    }

    best.filter(|b| b.confidence > ACCEPT_CONFIDENCE)
}
