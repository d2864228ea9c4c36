//! Impact ranking.

use crate::report::BottleneckReport;
use std::cmp::Ordering;

/// Order reports by `impact_score * confidence`, highest first.
///
/// The sort is stable: reports with equal weighted impact keep their input
/// order. That stability *is* the tie-break policy.
///
/// # Example
///
/// ```
/// use sentinel_domain::planning::rank_by_impact;
/// use sentinel_domain::report::BottleneckReport;
///
/// let ranked = rank_by_impact(vec![
///     BottleneckReport::new("a", 0.8, 5.0),
///     BottleneckReport::new("b", 0.9, 8.0),
///     BottleneckReport::new("c", 0.7, 3.0),
/// ]);
/// let order: Vec<_> = ranked.iter().map(|r| r.description.as_str()).collect();
/// assert_eq!(order, ["b", "a", "c"]);
/// ```
pub fn rank_by_impact(mut reports: Vec<BottleneckReport>) -> Vec<BottleneckReport> {
    // Vec::sort_by is stable; NaN cannot occur because reports are clamped
    reports.sort_by(|a, b| {
        b.weighted_impact()
            .partial_cmp(&a.weighted_impact())
            .unwrap_or(Ordering::Equal)
    });
    reports
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(description: &str, impact: f64, confidence: f64) -> BottleneckReport {
        BottleneckReport::new(description, confidence, impact)
    }

    #[test]
    fn test_empty_input() {
        assert!(rank_by_impact(vec![]).is_empty());
    }

    #[test]
    fn test_orders_by_weighted_impact() {
        let ranked = rank_by_impact(vec![
            report("five", 5.0, 0.8),
            report("eight", 8.0, 0.9),
            report("three", 3.0, 0.7),
        ]);
        let impacts: Vec<f64> = ranked.iter().map(|r| r.impact_score).collect();
        assert_eq!(impacts, vec![8.0, 5.0, 3.0]);
    }

    #[test]
    fn test_confidence_can_outweigh_impact() {
        let ranked = rank_by_impact(vec![report("loud", 9.0, 0.1), report("sure", 4.0, 1.0)]);
        assert_eq!(ranked[0].description, "sure");
    }

    #[test]
    fn test_ties_keep_input_order() {
        // 4.0 * 0.5 == 2.0 * 1.0
        let ranked = rank_by_impact(vec![
            report("first", 4.0, 0.5),
            report("top", 9.0, 1.0),
            report("second", 2.0, 1.0),
            report("third", 8.0, 0.25),
        ]);
        let order: Vec<&str> = ranked.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(order, vec!["top", "first", "second", "third"]);
    }
}
