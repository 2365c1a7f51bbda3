//! Fibonacci retracement and extension levels.
//!
//! Levels are computed for one swing leg. For an up leg, retracements step
//! back from the leg end and extensions project forward from the leg start;
//! the down-leg case mirrors both.

use std::collections::BTreeMap;

/// Ratio table used for both retracements and extensions (percent names).
pub const FIB_RATIOS: [(&str, f64); 11] = [
    ("23.6", 0.236),
    ("38.2", 0.382),
    ("50.0", 0.500),
    ("61.8", 0.618),
    ("78.6", 0.786),
    ("100.0", 1.000),
    ("127.2", 1.272),
    ("161.8", 1.618),
    ("200.0", 2.000),
    ("261.8", 2.618),
    ("423.6", 4.236),
];

/// Retracement (`"<name>"`) and extension (`"<name>_ext"`) levels for the
/// leg from `start` to `end`. Leg direction is inferred from the ordering.
pub fn fib_levels(start: f64, end: f64) -> BTreeMap<String, f64> {
    let diff = (end - start).abs();
    let up = end >= start;
    let mut levels = BTreeMap::new();
    for (name, ratio) in FIB_RATIOS {
        let (retrace, extend) = if up {
            (end - diff * ratio, start + diff * ratio)
        } else {
            (end + diff * ratio, start - diff * ratio)
        };
        levels.insert(name.to_string(), retrace);
        levels.insert(format!("{name}_ext"), extend);
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn up_leg_retracements_step_down_from_end() {
        let levels = fib_levels(100.0, 200.0);
        assert_eq!(levels["50.0"], 150.0);
        assert_eq!(levels["23.6"], 200.0 - 23.6);
        assert_eq!(levels["100.0"], 100.0);
    }

    #[test]
    fn up_leg_extensions_project_from_start() {
        let levels = fib_levels(100.0, 200.0);
        assert_eq!(levels["161.8_ext"], 100.0 + 161.8);
        assert_eq!(levels["100.0_ext"], 200.0);
    }

    #[test]
    fn down_leg_mirrors() {
        let levels = fib_levels(200.0, 100.0);
        assert_eq!(levels["50.0"], 150.0);
        assert_eq!(levels["161.8_ext"], 200.0 - 161.8);
    }

    #[test]
    fn all_ratios_present_twice() {
        let levels = fib_levels(1.0, 2.0);
        assert_eq!(levels.len(), FIB_RATIOS.len() * 2);
    }
}
