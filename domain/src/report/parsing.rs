//! Diagnosis payload parsing.
//!
//! Enrichment collaborators return text that *should* be a JSON object with
//! the six report fields. Two failure grades are distinguished:
//!
//! | Input | Result |
//! |-------|--------|
//! | Not a JSON object at all | `Err(DomainError::MalformedPayload)` |
//! | JSON object with absent or mistyped fields | `Ok`, field defaulted and listed |
//!
//! The caller decides what to do with each grade (log a warning, substitute
//! a stand-in report); nothing here logs or panics.

use super::bottleneck::BottleneckReport;
use crate::core::error::DomainError;
use crate::core::score::{clamp_confidence, clamp_impact};
use serde_json::{Map, Value};

/// The report fields every diagnosis payload is expected to carry.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "description",
    "confidence",
    "impact_score",
    "blocking",
    "recommended_action",
    "reasoning",
];

/// Result of parsing a diagnosis payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDiagnosis {
    /// The report, with every missing field defaulted
    pub report: BottleneckReport,
    /// Fields that were absent from the payload
    pub missing_fields: Vec<&'static str>,
    /// Fields that were present but had an unusable type
    pub mistyped_fields: Vec<&'static str>,
}

impl ParsedDiagnosis {
    /// Whether any field had to be defaulted.
    pub fn is_complete(&self) -> bool {
        self.missing_fields.is_empty() && self.mistyped_fields.is_empty()
    }
}

/// Extract the JSON object from a response that may wrap it in a Markdown
/// code fence.
///
/// Returns the trimmed input unchanged when no fence is present.
pub fn extract_json_block(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip an optional language tag on the opening fence line
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    match body.rfind("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

/// Parse a diagnosis payload into a report.
///
/// # Examples
///
/// ```
/// use sentinel_domain::report::parse_diagnosis_payload;
///
/// let parsed = parse_diagnosis_payload(r#"{"description": "Stale PRs", "confidence": 0.8}"#).unwrap();
/// assert_eq!(parsed.report.description, "Stale PRs");
/// assert!(parsed.missing_fields.contains(&"impact_score"));
///
/// assert!(parse_diagnosis_payload("not json").is_err());
/// ```
pub fn parse_diagnosis_payload(text: &str) -> Result<ParsedDiagnosis, DomainError> {
    let json = extract_json_block(text);
    let value: Value =
        serde_json::from_str(json).map_err(|e| DomainError::MalformedPayload(e.to_string()))?;
    let Value::Object(map) = value else {
        return Err(DomainError::MalformedPayload(
            "expected a JSON object".to_string(),
        ));
    };

    let mut parsed = ParsedDiagnosis {
        report: BottleneckReport::new("", 0.0, 0.0),
        missing_fields: Vec::new(),
        mistyped_fields: Vec::new(),
    };

    for field in REQUIRED_FIELDS {
        match map.get(field) {
            None | Some(Value::Null) => parsed.missing_fields.push(field),
            Some(value) => {
                if !apply_field(&mut parsed.report, field, value) {
                    parsed.mistyped_fields.push(field);
                }
            }
        }
    }

    Ok(parsed)
}

/// Build a report from an arbitrary JSON value (lenient).
///
/// Used for reports embedded in synthesis responses. Returns `None` for
/// non-objects and for empty objects.
pub fn report_from_value(value: &Value) -> Option<BottleneckReport> {
    let map = value.as_object()?;
    if map.is_empty() {
        return None;
    }

    let mut report = BottleneckReport::new("", 0.0, 0.0);
    for field in REQUIRED_FIELDS {
        if let Some(value) = map.get(field) {
            apply_field(&mut report, field, value);
        }
    }
    report.agent_id = string_field(map, "agent_id");
    report.domain = string_field(map, "domain");
    Some(report)
}

fn string_field(map: &Map<String, Value>, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

/// Set one field from a JSON value; returns false when the type is unusable.
fn apply_field(report: &mut BottleneckReport, field: &str, value: &Value) -> bool {
    match field {
        "confidence" => match as_number(value) {
            Some(n) => {
                report.confidence = clamp_confidence(n);
                true
            }
            None => false,
        },
        "impact_score" => match as_number(value) {
            Some(n) => {
                report.impact_score = clamp_impact(n);
                true
            }
            None => false,
        },
        "blocking" => match value {
            Value::Array(items) => {
                report.blocking = items.iter().filter_map(as_text).collect();
                true
            }
            Value::String(s) if !s.trim().is_empty() => {
                report.blocking = vec![s.trim().to_string()];
                true
            }
            _ => false,
        },
        "description" | "recommended_action" | "reasoning" => match as_text(value) {
            Some(text) => {
                match field {
                    "description" => report.description = text,
                    "recommended_action" => report.recommended_action = text,
                    _ => report.reasoning = text,
                }
                true
            }
            None => false,
        },
        _ => false,
    }
}

/// Numbers and numeric strings (`"0.8"`) are accepted.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
