//! Statistical primitives for drift detection
//!
//! Two-sample Kolmogorov-Smirnov distance with its asymptotic p-value,
//! and binary predictive entropy. These are pure functions shared by the
//! feature and prediction drift analyzers.

use ndarray::Array1;
use std::cmp::Ordering;

/// Clamp bound keeping probabilities away from {0, 1} before logarithms
const PROB_EPSILON: f64 = 1e-9;

/// Compute the two-sample Kolmogorov-Smirnov statistic: the maximum
/// absolute difference between the empirical CDFs of the two samples
/// over the pooled value domain.
///
/// Both samples must be non-empty; callers validate emptiness upstream.
/// The result is always in `[0, 1]` and is exactly `0` for identical
/// samples.
pub fn ks_statistic(reference: &Array1<f64>, live: &Array1<f64>) -> f64 {
    let mut ref_sorted: Vec<f64> = reference.iter().copied().collect();
    let mut live_sorted: Vec<f64> = live.iter().copied().collect();
    ref_sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    live_sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let n1 = ref_sorted.len();
    let n2 = live_sorted.len();
    let (n1f, n2f) = (n1 as f64, n2 as f64);

    let mut d_max = 0.0f64;
    let mut i = 0usize;
    let mut j = 0usize;

    // Walk the pooled domain; advance both cursors past ties before
    // sampling the ECDF difference so tied values are not double counted.
    while i < n1 && j < n2 {
        let x = if ref_sorted[i] <= live_sorted[j] {
            ref_sorted[i]
        } else {
            live_sorted[j]
        };
        while i < n1 && ref_sorted[i] == x {
            i += 1;
        }
        while j < n2 && live_sorted[j] == x {
            j += 1;
        }
        let diff = (i as f64 / n1f - j as f64 / n2f).abs();
        if diff > d_max {
            d_max = diff;
        }
    }

    d_max.clamp(0.0, 1.0)
}

/// Asymptotic two-sample KS p-value for a statistic computed over samples
/// of sizes `n1` and `n2`.
///
/// Uses the Kolmogorov distribution tail series
/// `P(D > d) = 2 * sum_{k>=1} (-1)^{k+1} * exp(-2 k^2 lambda^2)` with
/// `lambda = d * sqrt(n1*n2 / (n1+n2))`.
pub fn ks_p_value(statistic: f64, n1: usize, n2: usize) -> f64 {
    if n1 == 0 || n2 == 0 {
        return 1.0;
    }

    let (n1f, n2f) = (n1 as f64, n2 as f64);
    let n_eff = (n1f * n2f) / (n1f + n2f);
    let lambda = statistic * n_eff.sqrt();

    if lambda <= 0.0 {
        return 1.0;
    }

    let mut p = 0.0;
    for k in 1..=100u32 {
        let sign = if k % 2 == 1 { 1.0 } else { -1.0 };
        let term = sign * (-2.0 * f64::from(k).powi(2) * lambda.powi(2)).exp();
        p += term;
        if term.abs() < 1e-10 {
            break;
        }
    }

    (2.0 * p).clamp(0.0, 1.0)
}

/// Binary predictive entropy of a probability `p`, in bits.
///
/// `H(p) = -p*log2(p) - (1-p)*log2(1-p)`, with `p` clamped away from
/// `{0, 1}` so the logarithm is always defined. Maximum is `1.0` at
/// `p = 0.5`.
pub fn binary_entropy(p: f64) -> f64 {
    let p = p.clamp(PROB_EPSILON, 1.0 - PROB_EPSILON);
    -(p * p.log2() + (1.0 - p) * (1.0 - p).log2())
}

/// Mean binary predictive entropy over a window of probabilities.
pub fn mean_entropy(probs: &Array1<f64>) -> f64 {
    if probs.is_empty() {
        return 0.0;
    }
    probs.iter().map(|&p| binary_entropy(p)).sum::<f64>() / probs.len() as f64
}
