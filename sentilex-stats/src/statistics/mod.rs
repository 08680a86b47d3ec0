//! Aggregates over per-example evaluation errors.
//!
//! License: MIT OR Apache-2.0

use libm::sqrt;

/// Summary statistics for a set of per-example error values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorStats {
    /// The unweighted arithmetic mean.
    pub mean: f64,
    /// The population standard deviation (divisor `n`, not `n - 1`).
    pub std_dev: f64,
}

/// Mean and population standard deviation of per-example errors, as reported
/// by the evaluator.
///
/// Uses Welford's running update, so one pass suffices and long validation
/// sets do not lose precision to a large intermediate sum. Empty input is
/// `0.0` for both fields.
pub fn compute_stats(values: &[f64]) -> ErrorStats {
    let mut count = 0.0;
    let mut mean = 0.0;
    let mut squared_deviations = 0.0;

    for &value in values {
        count += 1.0;
        let delta = value - mean;
        mean += delta / count;
        squared_deviations += delta * (value - mean);
    }

    if count == 0.0 {
        return ErrorStats { mean: 0.0, std_dev: 0.0 };
    }
    ErrorStats {
        mean,
        std_dev: sqrt(squared_deviations / count),
    }
}

/// Same as [`compute_stats`] for boolean indicators, counted as 0 / 1.
pub fn compute_flag_stats(flags: &[bool]) -> ErrorStats {
    let len = flags.len();
    if len == 0 {
        return ErrorStats { mean: 0.0, std_dev: 0.0 };
    }
    let hits = flags.iter().filter(|f| **f).count() as f64;
    let p = hits / len as f64;
    // For 0/1 data the population variance reduces to p * (1 - p).
    ErrorStats {
        mean: p,
        std_dev: sqrt(p * (1.0 - p)),
    }
}
