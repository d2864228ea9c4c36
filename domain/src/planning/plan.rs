//! The weekly plan.

use super::conflict::{Conflict, find_conflicts};
use crate::report::BottleneckReport;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lowest plan item priority.
pub const MIN_PRIORITY: u8 = 1;
/// Highest plan item priority.
pub const MAX_PRIORITY: u8 = 10;
/// Priority assumed when an enrichment response omits one.
pub const DEFAULT_PRIORITY: u8 = 5;

/// One sequenced step of the weekly plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItem {
    pub action: String,
    pub domain: String,
    /// 1 (lowest) to 10 (highest)
    pub priority: u8,
    pub rationale: String,
}

impl PlanItem {
    pub fn new(
        action: impl Into<String>,
        domain: impl Into<String>,
        priority: i64,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            domain: domain.into(),
            priority: clamp_priority(priority),
            rationale: rationale.into(),
        }
    }
}

/// Clamp a priority into `[1, 10]`.
pub fn clamp_priority(priority: i64) -> u8 {
    priority.clamp(MIN_PRIORITY as i64, MAX_PRIORITY as i64) as u8
}

/// The orchestrator's synthesized plan for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPlan {
    /// Cycle identifier (RFC 3339 timestamp of finalisation)
    pub week: String,
    pub top_bottleneck: Option<BottleneckReport>,
    pub priority_ranking: Vec<BottleneckReport>,
    pub cross_domain_conflicts: Vec<Conflict>,
    pub weekly_plan: Vec<PlanItem>,
    /// Reserved; always empty
    #[serde(default)]
    pub resource_allocation: Map<String, Value>,
}

impl WeeklyPlan {
    /// A plan with nothing in it (no reports were collected).
    pub fn empty(week: impl Into<String>) -> Self {
        Self {
            week: week.into(),
            top_bottleneck: None,
            priority_ranking: Vec::new(),
            cross_domain_conflicts: Vec::new(),
            weekly_plan: Vec::new(),
            resource_allocation: Map::new(),
        }
    }

    /// The purely local plan used when enrichment output is unusable.
    ///
    /// Deterministic: the same ranked input always yields the same plan.
    pub fn local_fallback(ranked: Vec<BottleneckReport>, week: impl Into<String>) -> Self {
        let cross_domain_conflicts = find_conflicts(&ranked);
        Self {
            week: week.into(),
            top_bottleneck: ranked.first().cloned(),
            priority_ranking: ranked,
            cross_domain_conflicts,
            weekly_plan: Vec::new(),
            resource_allocation: Map::new(),
        }
    }

    /// Overwrite the cycle identifier.
    pub fn stamped(mut self, week: impl Into<String>) -> Self {
        self.week = week.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.top_bottleneck.is_none()
            && self.priority_ranking.is_empty()
            && self.weekly_plan.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_priority() {
        assert_eq!(clamp_priority(0), 1);
        assert_eq!(clamp_priority(-4), 1);
        assert_eq!(clamp_priority(7), 7);
        assert_eq!(clamp_priority(99), 10);
    }

    #[test]
    fn test_empty_plan() {
        let plan = WeeklyPlan::empty("2026-W42");
        assert!(plan.is_empty());
        assert!(plan.cross_domain_conflicts.is_empty());
        assert!(plan.resource_allocation.is_empty());
    }

    #[test]
    fn test_local_fallback() {
        let ranked = vec![
            BottleneckReport::new("first", 0.9, 8.0)
                .with_blocking(["deploy"])
                .attributed("sec", "security"),
            BottleneckReport::new("second", 0.8, 5.0)
                .with_blocking(["deploy"])
                .attributed("gh", "github-triage"),
        ];
        let plan = WeeklyPlan::local_fallback(ranked.clone(), "w");
        assert_eq!(plan.top_bottleneck.as_ref(), Some(&ranked[0]));
        assert_eq!(plan.priority_ranking, ranked);
        assert_eq!(plan.cross_domain_conflicts.len(), 1);
        assert!(plan.weekly_plan.is_empty());
    }

    #[test]
    fn test_local_fallback_empty() {
        let plan = WeeklyPlan::local_fallback(vec![], "w");
        assert!(plan.top_bottleneck.is_none());
        assert!(plan.is_empty());
    }
}
