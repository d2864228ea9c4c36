//! Synthesis response parsing.
//!
//! The synthesis collaborator is asked for a JSON object with four keys.
//! Partial responses are accepted key by key: an absent (or unusable) key
//! falls back to its empty default and is listed in
//! [`SynthesisResponse::missing_fields`]. Only a response that is not a JSON
//! object at all is an error.

use super::conflict::Conflict;
use super::plan::{DEFAULT_PRIORITY, PlanItem, WeeklyPlan, clamp_priority};
use crate::core::error::DomainError;
use crate::report::{BottleneckReport, extract_json_block, report_from_value};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Keys expected in a synthesis response.
pub const SYNTHESIS_FIELDS: [&str; 4] = [
    "top_bottleneck",
    "priority_ranking",
    "cross_domain_conflicts",
    "weekly_plan",
];

/// A validated synthesis response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SynthesisResponse {
    pub top_bottleneck: Option<BottleneckReport>,
    pub priority_ranking: Vec<BottleneckReport>,
    pub cross_domain_conflicts: Vec<Conflict>,
    pub weekly_plan: Vec<PlanItem>,
    /// Keys that were absent or unusable and got an empty default
    pub missing_fields: Vec<&'static str>,
}

impl SynthesisResponse {
    /// Turn the response into a plan stamped with `week`.
    pub fn into_plan(self, week: impl Into<String>) -> WeeklyPlan {
        WeeklyPlan {
            week: week.into(),
            top_bottleneck: self.top_bottleneck,
            priority_ranking: self.priority_ranking,
            cross_domain_conflicts: self.cross_domain_conflicts,
            weekly_plan: self.weekly_plan,
            resource_allocation: Map::new(),
        }
    }
}

/// Parse a synthesis collaborator response.
///
/// # Examples
///
/// ```
/// use sentinel_domain::planning::parse_synthesis_response;
///
/// let response = parse_synthesis_response(r#"{"weekly_plan": []}"#).unwrap();
/// assert!(response.missing_fields.contains(&"cross_domain_conflicts"));
///
/// assert!(parse_synthesis_response("Sorry, I can't help").is_err());
/// ```
pub fn parse_synthesis_response(text: &str) -> Result<SynthesisResponse, DomainError> {
    let value: Value = serde_json::from_str(extract_json_block(text))
        .map_err(|e| DomainError::MalformedPayload(e.to_string()))?;
    let Value::Object(map) = value else {
        return Err(DomainError::MalformedPayload(
            "expected a JSON object".to_string(),
        ));
    };

    let mut response = SynthesisResponse::default();

    match map.get("top_bottleneck") {
        Some(value @ Value::Object(_)) => response.top_bottleneck = report_from_value(value),
        _ => response.missing_fields.push("top_bottleneck"),
    }

    match map.get("priority_ranking") {
        Some(Value::Array(items)) => {
            response.priority_ranking = items.iter().filter_map(report_from_value).collect();
        }
        _ => response.missing_fields.push("priority_ranking"),
    }

    match map.get("cross_domain_conflicts") {
        Some(Value::Array(items)) => {
            response.cross_domain_conflicts = items.iter().filter_map(conflict_from_value).collect();
        }
        _ => response.missing_fields.push("cross_domain_conflicts"),
    }

    match map.get("weekly_plan") {
        Some(Value::Array(items)) => {
            response.weekly_plan = items.iter().filter_map(plan_item_from_value).collect();
        }
        _ => response.missing_fields.push("weekly_plan"),
    }

    Ok(response)
}

fn text(map: &Map<String, Value>, key: &str) -> String {
    match map.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn conflict_from_value(value: &Value) -> Option<Conflict> {
    let map = value.as_object()?;
    let affected_domains: BTreeSet<String> = match map.get("affected_domains") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => BTreeSet::new(),
    };
    Some(Conflict {
        description: text(map, "description"),
        affected_domains,
        resolution_strategy: text(map, "resolution_strategy"),
    })
}

fn plan_item_from_value(value: &Value) -> Option<PlanItem> {
    let map = value.as_object()?;
    let priority = match map.get("priority") {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .map(clamp_priority),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok().map(clamp_priority),
        _ => None,
    }
    .unwrap_or(DEFAULT_PRIORITY);

    Some(PlanItem {
        action: text(map, "action"),
        domain: text(map, "domain"),
        priority,
        rationale: text(map, "rationale"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "top_bottleneck": {"description": "Critical CVEs", "confidence": 0.95, "impact_score": 9, "domain": "security"},
        "priority_ranking": [
            {"description": "Critical CVEs", "confidence": 0.95, "impact_score": 9, "domain": "security"},
            {"description": "Stale PRs", "confidence": 0.7, "impact_score": 14, "domain": "github-triage"}
        ],
        "cross_domain_conflicts": [
            {"description": "Both need the release window", "affected_domains": ["security", "github-triage"], "resolution_strategy": "Patch first"}
        ],
        "weekly_plan": [
            {"action": "Patch CVEs", "domain": "security", "priority": 10, "rationale": "Blocks deploy"},
            {"action": "Triage PRs", "domain": "github-triage", "priority": 0, "rationale": "Velocity"},
            {"action": "Read papers", "domain": "research", "rationale": "Learning"}
        ]
    }"#;

    #[test]
    fn test_full_response() {
        let response = parse_synthesis_response(FULL).unwrap();
        assert!(response.missing_fields.is_empty());
        assert_eq!(
            response.top_bottleneck.as_ref().map(|r| r.description.as_str()),
            Some("Critical CVEs")
        );
        assert_eq!(response.priority_ranking.len(), 2);
        // Embedded reports are clamped
        assert_eq!(response.priority_ranking[1].impact_score, 10.0);
        assert_eq!(response.cross_domain_conflicts.len(), 1);
        assert_eq!(response.cross_domain_conflicts[0].affected_domains.len(), 2);
        let priorities: Vec<u8> = response.weekly_plan.iter().map(|i| i.priority).collect();
        assert_eq!(priorities, vec![10, 1, DEFAULT_PRIORITY]);
    }

    #[test]
    fn test_missing_conflicts_defaults_to_empty() {
        let text = r#"{
            "top_bottleneck": {"description": "x", "confidence": 0.5, "impact_score": 5},
            "priority_ranking": [{"description": "x", "confidence": 0.5, "impact_score": 5}],
            "weekly_plan": [{"action": "do x", "domain": "d", "priority": 3, "rationale": "r"}]
        }"#;
        let response = parse_synthesis_response(text).unwrap();
        assert_eq!(response.missing_fields, vec!["cross_domain_conflicts"]);
        assert!(response.cross_domain_conflicts.is_empty());
        assert!(response.top_bottleneck.is_some());
        assert_eq!(response.priority_ranking.len(), 1);
        assert_eq!(response.weekly_plan.len(), 1);
    }

    #[test]
    fn test_wrong_types_treated_as_missing() {
        let text = r#"{"top_bottleneck": "none", "priority_ranking": {}, "weekly_plan": null}"#;
        let response = parse_synthesis_response(text).unwrap();
        assert_eq!(response.missing_fields.len(), 4);
        assert!(response.top_bottleneck.is_none());
    }

    #[test]
    fn test_empty_top_bottleneck_is_absent() {
        let response = parse_synthesis_response(r#"{"top_bottleneck": {}}"#).unwrap();
        assert!(response.top_bottleneck.is_none());
        assert!(!response.missing_fields.contains(&"top_bottleneck"));
    }

    #[test]
    fn test_unparseable() {
        assert!(matches!(
            parse_synthesis_response("{not json"),
            Err(DomainError::MalformedPayload(_))
        ));
        assert!(parse_synthesis_response("42").is_err());
    }

    #[test]
    fn test_into_plan_uses_given_week() {
        let plan = parse_synthesis_response(FULL).unwrap().into_plan("2026-10-18T00:00:00Z");
        assert_eq!(plan.week, "2026-10-18T00:00:00Z");
        assert!(plan.resource_allocation.is_empty());
    }
}
