//! Security findings domain
//!
//! Normalized vulnerability findings from scanners (SARIF producers such as
//! ESLint or ZAP), their aggregate summary, and the rule that turns a summary
//! into the security domain's bottleneck report.

pub mod finding;

pub use finding::{SecurityFinding, SecuritySummary, Severity};
