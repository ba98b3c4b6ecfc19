//! Markdown and JSON report generation.
//!
//! The analysis keeps full-precision percentages; rounding for display
//! happens only here.

use crate::models::{
    AdditionalInsights, HighPriorityAnalysis, LongestToSolve, Priority, PriorityBreakdown, Report,
    ReportMetadata, ResolutionTimeliness, Status, StatusBreakdown,
};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, metadata: &ReportMetadata) -> String {
    let mut output = String::new();

    output.push_str("# Ticket Analytics Report\n\n");

    output.push_str(&generate_metadata_section(metadata, report.total_issues()));
    output.push_str(&generate_status_section(&report.status_breakdown));
    output.push_str(&generate_priority_section(&report.priority_breakdown));
    output.push_str(&generate_timeliness_section(&report.resolution_timeliness));
    output.push_str(&generate_high_priority_section(
        &report.high_priority_analysis,
        &report.longest_to_solve_high_priority,
    ));
    output.push_str(&generate_insights_section(&report.additional_insights));

    output.push_str(&generate_footer());

    output
}

fn generate_metadata_section(metadata: &ReportMetadata, total_issues: usize) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Analysis Date:** {}\n",
        metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Total Issues:** {}\n", total_issues));
    section.push_str(&format!(
        "- **Analysis Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

fn generate_status_section(breakdown: &StatusBreakdown) -> String {
    let mut section = String::new();

    section.push_str("## Status Breakdown\n\n");
    section.push_str("| Status | Count | Share |\n");
    section.push_str("|:---|:---:|:---:|\n");

    for status in Status::ALL {
        section.push_str(&format!(
            "| {} | {} | {:.1}% |\n",
            status,
            breakdown.count(status),
            breakdown.percent(status)
        ));
    }
    section.push('\n');

    section
}

fn generate_priority_section(breakdown: &PriorityBreakdown) -> String {
    let mut section = String::new();

    section.push_str("## Priority Breakdown\n\n");
    section.push_str("| Priority | Count | Share |\n");
    section.push_str("|:---|:---:|:---:|\n");

    for priority in Priority::ALL {
        section.push_str(&format!(
            "| {} | {} | {:.1}% |\n",
            priority,
            breakdown.count(priority),
            breakdown.percent(priority)
        ));
    }
    section.push('\n');

    section
}

fn generate_timeliness_section(timeliness: &ResolutionTimeliness) -> String {
    let mut section = String::new();

    section.push_str("## Resolution Timeliness\n\n");
    section.push_str("| On Time | Overdue | Currently Overdue |\n");
    section.push_str("|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} ({:.1}%) | {} ({:.1}%) | {} ({:.1}%) |\n\n",
        timeliness.on_time,
        timeliness.on_time_percent,
        timeliness.overdue,
        timeliness.overdue_percent,
        timeliness.currently_overdue,
        timeliness.currently_overdue_percent
    ));

    section
}

fn generate_high_priority_section(analysis: &HighPriorityAnalysis, longest: &LongestToSolve) -> String {
    let mut section = String::new();

    section.push_str("## High Priority Resolution\n\n");

    if analysis.total_closed_high_priority == 0 {
        section.push_str("No resolved high-priority tickets in this batch.\n\n");
        return section;
    }

    section.push_str(&format!(
        "- **Resolved High Priority:** {}\n",
        analysis.total_closed_high_priority
    ));
    section.push_str(&format!(
        "- **Average Time to Close:** {:.2}h ({:.2} days)\n\n",
        analysis.average_time_to_close_hours, analysis.average_time_to_close_days
    ));

    section.push_str("### Longest to Solve\n\n");
    section.push_str("| Ticket | Hours | Days | Satisfaction |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| #{} | {:.2} | {:.2} | {} |\n\n",
        longest.issue_id,
        longest.time_to_solve_hours,
        longest.time_to_solve_days,
        longest.satisfaction_rating_score
    ));

    section
}

fn generate_insights_section(insights: &AdditionalInsights) -> String {
    let mut section = String::new();

    section.push_str("## Additional Insights\n\n");
    section.push_str(&format!(
        "- **Closed:** {} | **Open:** {}\n\n",
        insights.issues_closed_count, insights.issues_open_count
    ));

    if !insights.issues_by_type.is_empty() {
        section.push_str("### Issues by Type\n\n");
        section.push_str("| Type | Count |\n");
        section.push_str("|:---|:---:|\n");

        let mut types: Vec<_> = insights.issues_by_type.iter().collect();
        types.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (ticket_type, count) in types {
            section.push_str(&format!("| {} | {} |\n", ticket_type, count));
        }
        section.push('\n');
    }

    if !insights.average_satisfaction_by_priority.is_empty() {
        section.push_str("### Most Common Satisfaction by Priority\n\n");
        section.push_str("| Priority | Score |\n");
        section.push_str("|:---|:---:|\n");

        for (priority, score) in &insights.average_satisfaction_by_priority {
            section.push_str(&format!("| {} | {} |\n", priority, score));
        }
        section.push('\n');
    }

    section
}

fn generate_footer() -> String {
    "---\n\n*Report generated by ticketpulse*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// One-screen console summary printed after a CLI run.
pub fn generate_console_summary(report: &Report) -> String {
    let status = &report.status_breakdown;
    let timeliness = &report.resolution_timeliness;
    let high = &report.high_priority_analysis;

    let mut lines = Vec::new();
    lines.push(format!("   Total issues: {}", report.total_issues()));
    lines.push(format!(
        "   - Open: {} | Pending: {} | Hold: {} | New: {} | Solved: {} | Closed: {}",
        status.open, status.pending, status.hold, status.new, status.solved, status.closed
    ));
    let unrecognized = report.total_issues() - status.recognized_total();
    if unrecognized > 0 {
        lines.push(format!("   - Other status: {}", unrecognized));
    }
    lines.push(format!(
        "   On time: {:.1}% | Overdue: {:.1}% | Currently overdue: {}",
        timeliness.on_time_percent, timeliness.overdue_percent, timeliness.currently_overdue
    ));
    lines.push(format!(
        "   High priority avg close: {:.2}h over {} tickets",
        high.average_time_to_close_hours, high.total_closed_high_priority
    ));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_at;
    use crate::analysis::engine::test_support::sample_fixture;
    use chrono::{TimeZone, Utc};

    fn create_test_report() -> Report {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        analyze_at(&sample_fixture(), now).unwrap()
    }

    fn create_test_metadata() -> ReportMetadata {
        ReportMetadata {
            source: "https://support.example.com/api/v2/tickets.json".to_string(),
            analysis_date: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            duration_seconds: 1.25,
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let markdown = generate_markdown_report(&create_test_report(), &create_test_metadata());

        assert!(markdown.contains("# Ticket Analytics Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("https://support.example.com"));
        assert!(markdown.contains("2024-06-01 00:00:00 UTC"));
        assert!(markdown.contains("| Open | 1 | 25.0% |"));
        assert!(markdown.contains("| Closed | 2 | 50.0% |"));
        assert!(markdown.contains("| 1 (50.0%) | 1 (50.0%) | 2 (50.0%) |"));
        assert!(markdown.contains("| #3 | 36.00 | 1.50 | Bad |"));
        assert!(markdown.contains("| problem | 2 |"));
    }

    #[test]
    fn test_high_priority_section_without_data() {
        let section = generate_high_priority_section(
            &HighPriorityAnalysis::default(),
            &LongestToSolve::none(),
        );
        assert!(section.contains("No resolved high-priority tickets"));
        assert!(!section.contains("Longest to Solve"));
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(&create_test_report()).unwrap();

        assert!(json.contains("\"statusBreakdown\""));
        assert!(json.contains("\"averageSatisfactionByPriority\""));
        assert!(json.contains("\"satisfactionRatingScore\": \"Bad\""));
    }

    #[test]
    fn test_console_summary() {
        let summary = generate_console_summary(&create_test_report());
        assert!(summary.contains("Total issues: 4"));
        assert!(summary.contains("Currently overdue: 2"));
        assert!(summary.contains("36.00h over 1 tickets"));
    }
}
