//! Cross-domain conflict detection.
//!
//! Two reports conflict when their `blocking` lists name the same resource.
//! Resources are compared after trimming and lowercasing. Overlap is
//! transitive: if A shares a resource with B and B with C, all three land in
//! one group even when A and C share nothing directly.

use crate::report::BottleneckReport;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Contention between reports over shared resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub description: String,
    pub affected_domains: BTreeSet<String>,
    pub resolution_strategy: String,
}

impl Conflict {
    pub fn new<I, S>(
        description: impl Into<String>,
        affected_domains: I,
        resolution_strategy: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            description: description.into(),
            affected_domains: affected_domains.into_iter().map(Into::into).collect(),
            resolution_strategy: resolution_strategy.into(),
        }
    }
}

/// Detect resource contention among ranked reports.
///
/// Emits one [`Conflict`] per group of two or more reports whose `blocking`
/// entries intersect, in the rank order of each group's first member.
/// Reports with disjoint `blocking` sets never produce a conflict.
pub fn find_conflicts(ranked: &[BottleneckReport]) -> Vec<Conflict> {
    let mut groups = DisjointSet::new(ranked.len());
    // resource -> indices of reports blocking it
    let mut claims: HashMap<String, Vec<usize>> = HashMap::new();

    for (index, report) in ranked.iter().enumerate() {
        let resources: BTreeSet<String> = report
            .blocking
            .iter()
            .map(|b| normalize(b))
            .filter(|b| !b.is_empty())
            .collect();
        for resource in resources {
            let holders = claims.entry(resource).or_default();
            if let Some(&first) = holders.first() {
                groups.union(first, index);
            }
            holders.push(index);
        }
    }

    // root -> member indices, in rank order
    let mut members: Vec<(usize, Vec<usize>)> = Vec::new();
    for index in 0..ranked.len() {
        let root = groups.find(index);
        match members.iter_mut().find(|(r, _)| *r == root) {
            Some((_, list)) => list.push(index),
            None => members.push((root, vec![index])),
        }
    }

    members
        .into_iter()
        .filter(|(_, list)| list.len() > 1)
        .map(|(_, list)| conflict_for(ranked, &list, &claims))
        .collect()
}

fn conflict_for(
    ranked: &[BottleneckReport],
    members: &[usize],
    claims: &HashMap<String, Vec<usize>>,
) -> Conflict {
    let shared: BTreeSet<&str> = claims
        .iter()
        .filter(|(_, holders)| holders.len() > 1 && members.contains(&holders[0]))
        .map(|(resource, _)| resource.as_str())
        .collect();

    let domains: BTreeSet<String> = members
        .iter()
        .map(|&i| ranked[i].source_label().to_string())
        .collect();

    let lead = ranked[members[0]].source_label();

    Conflict {
        description: format!(
            "{} bottlenecks contend for: {}",
            members.len(),
            shared.into_iter().collect::<Vec<_>>().join(", ")
        ),
        affected_domains: domains,
        resolution_strategy: format!(
            "Prioritize {} and sequence the others behind it",
            lead
        ),
    }
}

fn normalize(resource: &str) -> String {
    resource.trim().to_lowercase()
}

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            // Keep the earlier-ranked index as root
            let (root, child) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[child] = root;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(domain: &str, blocking: &[&str]) -> BottleneckReport {
        BottleneckReport::new(format!("{} issue", domain), 0.5, 5.0)
            .with_blocking(blocking.iter().copied())
            .attributed(format!("{}-agent", domain), domain)
    }

    #[test]
    fn test_no_reports() {
        assert!(find_conflicts(&[]).is_empty());
    }

    #[test]
    fn test_disjoint_blocking_never_conflicts() {
        let reports = vec![
            report("security", &["production deployment"]),
            report("github-triage", &["release 2.1"]),
            report("research", &[]),
        ];
        assert!(find_conflicts(&reports).is_empty());
    }

    #[test]
    fn test_shared_resource_produces_conflict() {
        let reports = vec![
            report("security", &["production deployment", "security compliance"]),
            report("github-triage", &["Production Deployment "]),
            report("research", &["roadmap"]),
        ];
        let conflicts = find_conflicts(&reports);
        assert_eq!(conflicts.len(), 1);
        let conflict = &conflicts[0];
        assert_eq!(
            conflict.affected_domains,
            BTreeSet::from(["github-triage".to_string(), "security".to_string()])
        );
        assert!(conflict.description.contains("production deployment"));
        assert!(!conflict.description.contains("roadmap"));
        assert!(conflict.resolution_strategy.contains("security"));
    }

    #[test]
    fn test_overlap_is_transitive() {
        let reports = vec![
            report("a", &["x"]),
            report("b", &["x", "y"]),
            report("c", &["y"]),
        ];
        let conflicts = find_conflicts(&reports);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].affected_domains.len(), 3);
    }

    #[test]
    fn test_separate_groups() {
        let reports = vec![
            report("a", &["x"]),
            report("b", &["y"]),
            report("c", &["x"]),
            report("d", &["y"]),
        ];
        let conflicts = find_conflicts(&reports);
        assert_eq!(conflicts.len(), 2);
        assert!(conflicts[0].affected_domains.contains("a"));
        assert!(conflicts[0].affected_domains.contains("c"));
        assert!(conflicts[1].affected_domains.contains("b"));
        assert!(conflicts[1].affected_domains.contains("d"));
    }

    #[test]
    fn test_unattributed_reports_use_fallback_label() {
        let reports = vec![
            BottleneckReport::new("one", 0.5, 5.0).with_blocking(["ci"]),
            BottleneckReport::new("two", 0.5, 5.0).with_blocking(["ci"]),
        ];
        let conflicts = find_conflicts(&reports);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(
            conflicts[0].affected_domains,
            BTreeSet::from(["unknown".to_string()])
        );
    }
}
