//! Elliott Wave classification.
//!
//! Three classifier strategies run in order (`classifier::classify`):
//! 5-wave impulse scan, 3-wave ABC corrective scan, trend-only fallback.
//! The first strategy whose confidence clears its threshold wins; the
//! fallback always produces a result for any series of 30+ bars.

pub mod classifier;
pub mod corrective;
pub mod fib;
pub mod impulse;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Bias, Trend};

pub use classifier::{classify, MIN_BARS};

/// Which wave family a point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaveKind {
    Impulse,
    Corrective,
}

/// Recognized pattern families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternType {
    #[serde(rename = "5-wave-impulse")]
    FiveWaveImpulse,
    #[serde(rename = "3-wave-ABC")]
    ThreeWaveAbc,
    #[serde(rename = "unknown")]
    Unknown,
}

/// One labeled point of a wave count. Owned by exactly one result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WavePoint {
    pub index: usize,
    pub price: f64,
    pub label: String,
    pub wave_kind: WaveKind,
    pub direction: Bias,
}

/// Output of one classification call. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElliottWaveResult {
    pub pattern_type: PatternType,
    pub wave_points: Vec<WavePoint>,
    pub current_wave: String,
    pub target: Option<f64>,
    pub tp2: Option<f64>,
    pub tp3: Option<f64>,
    pub stop: Option<f64>,
    /// 0.0 - 1.0.
    pub confidence: f64,
    pub trend: Trend,
    pub fib_levels: BTreeMap<String, f64>,
    pub description: String,
    pub wave3_extended: bool,
}

impl ElliottWaveResult {
    /// Neutral result for series the classifier cannot read at all.
    pub fn unknown(description: impl Into<String>) -> Self {
        Self {
            pattern_type: PatternType::Unknown,
            wave_points: Vec::new(),
            current_wave: "?".to_string(),
            target: None,
            tp2: None,
            tp3: None,
            stop: None,
            confidence: 0.0,
            trend: Trend::Neutral,
            fib_levels: BTreeMap::new(),
            description: description.into(),
            wave3_extended: false,
        }
    }
}
