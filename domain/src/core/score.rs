//! Score clamping.
//!
//! Confidence and impact values arrive from unreliable sources (LLM output,
//! hand-written JSON). They are never rejected, only forced into range.

/// Lower/upper bound for report confidence.
pub const CONFIDENCE_RANGE: (f64, f64) = (0.0, 1.0);

/// Lower/upper bound for report impact.
pub const IMPACT_RANGE: (f64, f64) = (0.0, 10.0);

/// Clamp a confidence value into `[0.0, 1.0]`. NaN becomes `0.0`.
pub fn clamp_confidence(value: f64) -> f64 {
    clamp_finite(value, CONFIDENCE_RANGE)
}

/// Clamp an impact value into `[0.0, 10.0]`. NaN becomes `0.0`.
pub fn clamp_impact(value: f64) -> f64 {
    clamp_finite(value, IMPACT_RANGE)
}

fn clamp_finite(value: f64, (lo, hi): (f64, f64)) -> f64 {
    if value.is_nan() {
        return lo;
    }
    value.clamp(lo, hi)
}
