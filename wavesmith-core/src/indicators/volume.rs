//! Volume participation check.
//!
//! The latest bar passes when its volume is at least 80% of the 20-bar
//! average. Series without volume data (typical of forex feeds) pass by
//! default rather than penalizing the signal.

use crate::domain::Bar;

const VOLUME_AVG_WINDOW: usize = 20;
const VOLUME_MIN_RATIO: f64 = 0.8;

/// True when the latest bar's volume clears 80% of the 20-bar average,
/// or when volume is unavailable.
pub fn volume_ok(bars: &[Bar]) -> bool {
    let Some(last) = bars.last() else {
        return true;
    };
    let Some(last_volume) = last.volume else {
        return true;
    };

    let start = bars.len().saturating_sub(VOLUME_AVG_WINDOW);
    let window: Vec<f64> = bars[start..].iter().filter_map(|b| b.volume).collect();
    if window.is_empty() {
        return true;
    }
    let avg = window.iter().sum::<f64>() / window.len() as f64;
    if avg <= 0.0 {
        return true;
    }
    last_volume >= VOLUME_MIN_RATIO * avg
}
