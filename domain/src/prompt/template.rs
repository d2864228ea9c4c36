//! Prompt templates for diagnosis and synthesis

use crate::report::BottleneckReport;

/// Sources the research analyst watches.
pub const RESEARCH_SOURCES: [&str; 4] = ["arXiv", "TechCrunch", "GitHub Trending", "Hacker News"];

/// The report shape every diagnosis prompt asks for.
const REPORT_SHAPE: &str = r#"{
    "description": "Brief description of the bottleneck",
    "confidence": 0.0-1.0 (your confidence that this is a real bottleneck),
    "impact_score": 0.0-10.0 (potential impact on the domain),
    "blocking": ["list", "of", "things", "this", "blocks"],
    "recommended_action": "Specific action to take",
    "reasoning": "Why this is a bottleneck and needs attention"
}"#;

/// Kind of enrichment-backed diagnostician.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosisProfile {
    /// Repository issues, pull requests, and review flow
    GitHubTriage,
    /// Papers, trends, and competitive intelligence
    ResearchAnalyst,
    /// Any other domain
    Generic,
}

impl DiagnosisProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosisProfile::GitHubTriage => "github_triage",
            DiagnosisProfile::ResearchAnalyst => "research_analyst",
            DiagnosisProfile::Generic => "generic",
        }
    }

    /// Decision type recorded after a successful scan.
    pub fn decision_type(&self) -> &'static str {
        match self {
            DiagnosisProfile::GitHubTriage => "github_triage_scan",
            DiagnosisProfile::ResearchAnalyst => "intelligence_scan",
            DiagnosisProfile::Generic => "diagnosis_scan",
        }
    }
}

/// Templates for generating enrichment prompts
pub struct PromptTemplate;

impl PromptTemplate {
    /// Role instruction for a diagnosis call
    pub fn diagnosis_system(profile: DiagnosisProfile, domain: &str) -> String {
        let role = match profile {
            DiagnosisProfile::GitHubTriage => format!(
                r#"You are a GitHub Triage Agent for the domain: {domain}.

Your role is to monitor GitHub repositories and identify issues, pull requests, or repository health problems that need attention. You analyze:
- Unassigned high-priority bugs
- Stale issues and PRs
- Code review bottlenecks
- Release blockers
- Repository health metrics"#
            ),
            DiagnosisProfile::ResearchAnalyst => format!(
                r#"You are a Research & Intelligence Agent for the domain: {domain}.

Your role is to monitor information sources and identify high-signal research items, papers, trends, or developments that could impact your domain. You filter noise and surface only the most relevant findings.

Your sources include: {sources}"#,
                sources = RESEARCH_SOURCES.join(", ")
            ),
            DiagnosisProfile::Generic => format!(
                r#"You are a diagnostic agent responsible for the domain: {domain}.

Your role is to identify the single most significant bottleneck slowing progress in this domain."#
            ),
        };

        format!(
            r#"{role}

When you identify a bottleneck, you must respond with a JSON object (and ONLY JSON, no other text) with this exact structure:
{REPORT_SHAPE}

If there are no significant bottlenecks, return a JSON object with confidence: 0.0 and description: "No significant bottlenecks identified"."#
        )
    }

    /// Task payload for a diagnosis call
    pub fn diagnosis_task(profile: DiagnosisProfile, domain: &str) -> String {
        match profile {
            DiagnosisProfile::GitHubTriage => format!(
                r#"Analyze the current state of GitHub repositories in the {domain} domain and identify any bottlenecks.

Consider:
1. Unassigned high-priority bugs or issues
2. Stale issues or pull requests (no activity for 30+ days)
3. Pull requests awaiting review for extended periods
4. Release blockers or critical bugs
5. Repository backlog health

Return your analysis as a JSON object following the specified structure."#
            ),
            DiagnosisProfile::ResearchAnalyst => format!(
                r#"Analyze the current state of {domain} and identify any high-signal research items, papers, or trends that represent bottlenecks to progress or knowledge gaps.

Consider:
1. Recent developments relevant to {domain}
2. Emerging tools or frameworks
3. Competitive intelligence
4. Knowledge gaps that need filling

Return your analysis as a JSON object following the specified structure."#
            ),
            DiagnosisProfile::Generic => format!(
                r#"Identify the most significant bottleneck in the {domain} domain right now.

Return your analysis as a JSON object following the specified structure."#
            ),
        }
    }

    /// Role instruction for the synthesis call
    pub fn synthesis_system() -> &'static str {
        r#"You are the Chief of Staff orchestrating a fleet of domain agents.
Each agent has reported the bottleneck it sees in its own domain.
Your task is to:
1. Identify the single most important bottleneck across all domains
2. Re-rank every reported bottleneck by real-world priority
3. Detect cross-domain conflicts (bottlenecks competing for the same resources)
4. Produce a sequenced weekly plan with a priority (1-10) and rationale per item

Respond with a JSON object (and ONLY JSON) with keys:
"top_bottleneck", "priority_ranking", "cross_domain_conflicts", "weekly_plan"."#
    }

    /// Task payload for the synthesis call
    pub fn synthesis_task(ranked: &[BottleneckReport]) -> String {
        let reports = serde_json::to_string_pretty(ranked).unwrap_or_else(|_| "[]".to_string());
        format!(
            r#"Here are {count} bottleneck reports, pre-ranked by impact x confidence:

{reports}

Return a JSON object with this structure:
{{
    "top_bottleneck": {{ ...one report from the list... }},
    "priority_ranking": [ ...all reports, highest priority first... ],
    "cross_domain_conflicts": [
        {{"description": "...", "affected_domains": ["..."], "resolution_strategy": "..."}}
    ],
    "weekly_plan": [
        {{"action": "...", "domain": "...", "priority": 1-10, "rationale": "..."}}
    ]
}}"#,
            count = ranked.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnosis_system_mentions_domain_and_shape() {
        for profile in [
            DiagnosisProfile::GitHubTriage,
            DiagnosisProfile::ResearchAnalyst,
            DiagnosisProfile::Generic,
        ] {
            let prompt = PromptTemplate::diagnosis_system(profile, "payments");
            assert!(prompt.contains("payments"));
            assert!(prompt.contains("\"impact_score\""));
            assert!(prompt.contains("ONLY JSON"));
        }
    }

    #[test]
    fn test_research_prompt_lists_sources() {
        let prompt = PromptTemplate::diagnosis_system(DiagnosisProfile::ResearchAnalyst, "ml");
        assert!(prompt.contains("arXiv, TechCrunch, GitHub Trending, Hacker News"));
    }

    #[test]
    fn test_synthesis_task_embeds_reports() {
        let reports = vec![BottleneckReport::new("Stale PRs", 0.7, 6.0)];
        let task = PromptTemplate::synthesis_task(&reports);
        assert!(task.contains("Here are 1 bottleneck reports"));
        assert!(task.contains("Stale PRs"));
    }

    #[test]
    fn test_decision_types() {
        assert_eq!(DiagnosisProfile::GitHubTriage.decision_type(), "github_triage_scan");
        assert_eq!(DiagnosisProfile::ResearchAnalyst.decision_type(), "intelligence_scan");
    }
}
