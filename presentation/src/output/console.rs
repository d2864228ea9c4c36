//! Console output formatter for sentinel results

use colored::Colorize;
use sentinel_application::{AgentRecord, AgentReport, CycleSummary};
use sentinel_domain::{
    AgentState, BottleneckReport, CycleResult, ExecutionResult, ProjectConfig, WeeklyPlan,
};
use serde::Serialize;

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format any result as pretty JSON
    pub fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format a complete cycle: per-agent results, then the plan (full mode)
    pub fn format_summary(summary: &CycleSummary) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&format!("Sentinel Cycle ({})", summary.mode)));
        output.push('\n');
        output.push_str(&format!(
            "{} {} succeeded, {} failed\n",
            "Agents:".cyan().bold(),
            summary.succeeded().to_string().green(),
            summary.failed().to_string().red()
        ));

        output.push_str(&Self::section_header("Diagnoses"));
        for result in &summary.agent_results {
            output.push_str(&Self::format_cycle_result(result));
        }

        if let Some(plan) = &summary.plan {
            output.push_str(&Self::format_plan(plan));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format one agent's cycle result
    pub fn format_cycle_result(result: &CycleResult) -> String {
        match (&result.bottleneck, &result.error) {
            (Some(report), _) if result.is_success() => format!(
                "\n{}\n{}",
                format!("── {} ──", result.agent_id).yellow().bold(),
                Self::format_report(report)
            ),
            (_, error) => format!(
                "\n{}\nError: {}\n",
                format!("── {} ──", result.agent_id).red().bold(),
                error.as_deref().unwrap_or("Unknown")
            ),
        }
    }

    /// Format a bottleneck report
    pub fn format_report(report: &BottleneckReport) -> String {
        let mut output = format!(
            "{}\n  impact {:.1}  confidence {:.2}\n",
            report.description,
            report.impact_score,
            report.confidence
        );
        if !report.blocking.is_empty() {
            output.push_str(&format!(
                "  {} {}\n",
                "blocking:".dimmed(),
                report.blocking.join(", ")
            ));
        }
        if !report.recommended_action.is_empty() {
            output.push_str(&format!(
                "  {} {}\n",
                "next:".green(),
                report.recommended_action
            ));
        }
        output
    }

    /// Format a weekly plan
    pub fn format_plan(plan: &WeeklyPlan) -> String {
        let mut output = Self::section_header(&format!("Weekly Plan ({})", plan.week));

        if plan.is_empty() {
            output.push_str(&format!("\n{}\n", "No reports to plan from.".dimmed()));
            return output;
        }

        if let Some(top) = &plan.top_bottleneck {
            output.push_str(&format!(
                "\n{} [{}] {}\n",
                "Top bottleneck:".cyan().bold(),
                top.source_label(),
                top.description
            ));
        }

        if !plan.priority_ranking.is_empty() {
            output.push_str(&format!("\n{}\n", "Priority Ranking:".cyan().bold()));
            for (i, report) in plan.priority_ranking.iter().enumerate() {
                output.push_str(&format!(
                    "  {}. [{}] {} ({:.2})\n",
                    i + 1,
                    report.source_label(),
                    report.description,
                    report.weighted_impact()
                ));
            }
        }

        if !plan.weekly_plan.is_empty() {
            output.push_str(&format!("\n{}\n", "Plan:".green().bold()));
            for item in &plan.weekly_plan {
                output.push_str(&format!(
                    "  * (P{}) [{}] {}\n",
                    item.priority, item.domain, item.action
                ));
                if !item.rationale.is_empty() {
                    output.push_str(&format!("      {}\n", item.rationale.dimmed()));
                }
            }
        }

        if !plan.cross_domain_conflicts.is_empty() {
            output.push_str(&format!("\n{}\n", "Conflicts:".yellow().bold()));
            for conflict in &plan.cross_domain_conflicts {
                output.push_str(&format!(
                    "  * {} ({})\n",
                    conflict.description,
                    conflict
                        .affected_domains
                        .iter()
                        .cloned()
                        .collect::<Vec<_>>()
                        .join(", ")
                ));
                output.push_str(&format!("      {}\n", conflict.resolution_strategy.dimmed()));
            }
        }

        output
    }

    /// Format an agent state snapshot
    pub fn format_state(state: &AgentState) -> String {
        let mut output = Self::header(&format!("Agent {}", state.agent_id));
        output.push('\n');

        let field = |label: &str, value: String| format!("{} {}\n", label.cyan().bold(), value);
        output.push_str(&field("Type:", state.agent_type.as_str().to_string()));
        if !state.domain.is_empty() {
            output.push_str(&field("Domain:", state.domain.clone()));
        }
        output.push_str(&field("Created:", state.created_at.to_rfc3339()));
        output.push_str(&field(
            "Last run:",
            state
                .last_run
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "never".to_string()),
        ));
        output.push_str(&field(
            "Guardrail:",
            format!(
                "confidence >= {:.2}, {} retries, {}s timeout",
                state.confidence_threshold, state.max_retries, state.timeout_seconds
            ),
        ));
        output.push_str(&field(
            "Metrics:",
            format!(
                "{} diagnoses, {} actions, {} errors",
                state.metrics.diagnoses_run, state.metrics.actions_executed, state.metrics.errors
            ),
        ));
        output.push_str(&field(
            "Actions queued:",
            state.actions_queued.len().to_string(),
        ));

        if let Some(report) = &state.bottleneck {
            output.push_str(&Self::section_header("Latest Bottleneck"));
            output.push('\n');
            output.push_str(&Self::format_report(report));
        }

        output
    }

    /// Format the result of `execute`
    pub fn format_execution(agent_id: &str, result: &ExecutionResult) -> String {
        let status = match result.status.as_str() {
            "success" => result.status.green().bold(),
            "blocked" | "failed" => result.status.red().bold(),
            _ => result.status.yellow().bold(),
        };
        let mut output = format!("{} {}\n", agent_id.cyan().bold(), status);
        for (key, value) in &result.fields {
            let rendered = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            output.push_str(&format!("  {}: {}\n", key.dimmed(), rendered));
        }
        output
    }

    /// Format registered agents
    pub fn format_agents(agents: &[AgentRecord]) -> String {
        if agents.is_empty() {
            return format!("{}\n", "No agents registered.".dimmed());
        }
        let mut output = format!("{}\n", "Registered agents:".cyan().bold());
        for agent in agents {
            output.push_str(&format!(
                "  {} ({}) last run: {}\n",
                agent.agent_id.bold(),
                agent.domain,
                agent
                    .last_run
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "never".to_string())
            ));
        }
        output
    }

    /// Format the latest report of every agent
    pub fn format_reports(reports: &[AgentReport]) -> String {
        if reports.is_empty() {
            return format!("{}\n", "No agents registered.".dimmed());
        }
        let mut output = Self::header("Latest Reports");
        output.push('\n');
        for report in reports {
            output.push_str(&format!(
                "\n{}\n",
                format!("── {} ({}) ──", report.agent_id, report.domain)
                    .yellow()
                    .bold()
            ));
            match &report.bottleneck {
                Some(bottleneck) => output.push_str(&Self::format_report(bottleneck)),
                None => output.push_str(&format!("{}\n", "not diagnosed yet".dimmed())),
            }
        }
        output
    }

    /// Format an accepted project definition
    pub fn format_project(project: &ProjectConfig, registered: &[String]) -> String {
        let mut output = format!(
            "{} {}\n",
            "Project:".cyan().bold(),
            project.project.bold()
        );
        if !project.description.is_empty() {
            output.push_str(&format!("  {}\n", project.description));
        }
        output.push_str(&format!(
            "  {} milestones, {} risks, {} done criteria\n",
            project.milestones.len(),
            project.risks.len(),
            project.definition_of_done.len()
        ));
        if !registered.is_empty() {
            output.push_str(&format!(
                "  {} {}\n",
                "registered:".green(),
                registered.join(", ")
            ));
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "═".repeat(60);
        format!("\n{}\n{:^60}\n{}\n", line.cyan(), title.cyan().bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        let line = "─".repeat(60);
        format!("\n{}\n{}\n{}\n", line.blue(), title.blue().bold(), line.blue())
    }

    fn footer() -> String {
        format!("\n{}\n", "═".repeat(60).cyan())
    }
}
