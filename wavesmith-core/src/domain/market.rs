//! Closed direction vocabularies shared across the analytical modules.
//!
//! The original free-form string tags (`"bullish"`, `"BOS"`, ...) are closed
//! enums here so matches are exhaustive and typo-class bugs cannot exist.

use serde::{Deserialize, Serialize};

/// Trade direction of a synthesized signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// +1.0 for long, -1.0 for short. Used to fold mirrored price arithmetic.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }

    /// The structural bias this trade direction trades with.
    pub fn bias(self) -> Bias {
        match self {
            Direction::Long => Bias::Bullish,
            Direction::Short => Bias::Bearish,
        }
    }
}

/// Direction of a structural entity (order block, FVG, break, sweep).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bias {
    Bullish,
    Bearish,
}

impl Bias {
    pub fn sign(self) -> f64 {
        match self {
            Bias::Bullish => 1.0,
            Bias::Bearish => -1.0,
        }
    }

    pub fn opposite(self) -> Bias {
        match self {
            Bias::Bullish => Bias::Bearish,
            Bias::Bearish => Bias::Bullish,
        }
    }

    pub fn trend(self) -> Trend {
        match self {
            Bias::Bullish => Trend::Bullish,
            Bias::Bearish => Trend::Bearish,
        }
    }
}

/// Overall trend reading produced by the Elliott and SMC analyzers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

impl Trend {
    /// Directional bias, if the trend is not neutral.
    pub fn bias(self) -> Option<Bias> {
        match self {
            Trend::Bullish => Some(Bias::Bullish),
            Trend::Bearish => Some(Bias::Bearish),
            Trend::Neutral => None,
        }
    }
}
