//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], alpha = 2/(period+1).
//! Seed: SMA of the first `period` values. Warmup values are NaN.

/// EMA of an arbitrary f64 series. The first `period - 1` outputs are NaN.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if n < period || period == 0 {
        return result;
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let seed = values[..period].iter().sum::<f64>() / period as f64;
    result[period - 1] = seed;

    let mut prev = seed;
    for i in period..n {
        let ema = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = ema;
        prev = ema;
    }
    result
}

/// Latest EMA value, or None when the series is shorter than `period`.
pub fn ema_last(values: &[f64], period: usize) -> Option<f64> {
    ema_series(values, period)
        .last()
        .copied()
        .filter(|v| !v.is_nan())
}
