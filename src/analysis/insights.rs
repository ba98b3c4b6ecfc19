//! Open-ended breakdowns: ticket types and satisfaction per priority.

use super::engine::PreparedTicket;
use crate::models::{AdditionalInsights, Status};
use std::collections::{BTreeMap, HashMap};

/// Type key used for tickets that carry no type.
pub const UNKNOWN_TYPE: &str = "unknown";

/// Satisfaction per priority is the mode of its scores; ties go to the score seen first.
pub fn additional_insights(tickets: &[PreparedTicket<'_>]) -> AdditionalInsights {
    let mut insights = AdditionalInsights {
        total_issues: tickets.len(),
        ..AdditionalInsights::default()
    };

    let mut scores_by_priority: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

    for ticket in tickets {
        let type_key = ticket.type_key.as_deref().unwrap_or(UNKNOWN_TYPE);
        *insights
            .issues_by_type
            .entry(type_key.to_string())
            .or_insert(0) += 1;

        match ticket.status {
            Some(Status::Closed) => insights.issues_closed_count += 1,
            Some(Status::Open) => insights.issues_open_count += 1,
            _ => {}
        }

        if let (Some(priority), Some(score)) = (
            ticket.priority_key.as_deref(),
            ticket.record.satisfaction_score(),
        ) {
            scores_by_priority.entry(priority).or_default().push(score);
        }
    }

    insights.average_satisfaction_by_priority = scores_by_priority
        .into_iter()
        .filter_map(|(priority, scores)| {
            mode(&scores).map(|score| (priority.to_string(), score.to_string()))
        })
        .collect();

    insights
}

/// Most frequent value; among equally frequent values the first one seen wins.
pub fn mode<'s>(values: &[&'s str]) -> Option<&'s str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(*value).or_insert(0) += 1;
    }

    let mut best: Option<(&'s str, usize)> = None;
    for value in values {
        let count = counts[value];
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((*value, count));
        }
    }

    best.map(|(value, _)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::engine::test_support::{sample_fixture, ticket, with_score, with_type};
    use crate::models::TicketRecord;

    fn run(records: &[TicketRecord]) -> AdditionalInsights {
        let tickets: Vec<_> = records.iter().map(PreparedTicket::new).collect();
        additional_insights(&tickets)
    }

    #[test]
    fn test_mode() {
        assert_eq!(mode(&["good", "bad", "good"]), Some("good"));
        assert_eq!(mode(&["bad", "good", "good", "bad"]), Some("bad"));
        assert_eq!(mode(&["offered"]), Some("offered"));
        assert_eq!(mode(&[]), None);
    }

    #[test]
    fn test_issues_by_type_lowercased() {
        let mut untyped = ticket(4, "open", "low");
        untyped.ticket_type = None;
        let records = vec![
            with_type(ticket(1, "open", "high"), "Incident"),
            with_type(ticket(2, "open", "high"), "incident"),
            with_type(ticket(3, "closed", "high"), "Task"),
            untyped,
        ];

        let insights = run(&records);

        assert_eq!(insights.total_issues, 4);
        assert_eq!(insights.issues_by_type.get("incident"), Some(&2));
        assert_eq!(insights.issues_by_type.get("task"), Some(&1));
        assert_eq!(insights.issues_by_type.get(UNKNOWN_TYPE), Some(&1));
        assert_eq!(insights.issues_open_count, 3);
        assert_eq!(insights.issues_closed_count, 1);
    }

    #[test]
    fn test_closed_and_open_are_exact_matches() {
        let records = vec![
            ticket(1, "solved", "high"),
            ticket(2, "new", "high"),
            ticket(3, "Closed", "high"),
            ticket(4, "pending", "high"),
        ];

        let insights = run(&records);

        assert_eq!(insights.issues_closed_count, 1);
        assert_eq!(insights.issues_open_count, 0);
    }

    #[test]
    fn test_satisfaction_mode_by_priority() {
        let records = vec![
            with_score(ticket(1, "closed", "High"), "good"),
            with_score(ticket(2, "closed", "high"), "bad"),
            with_score(ticket(3, "closed", "high"), "bad"),
            with_score(ticket(4, "closed", "Urgent"), "offered"),
            ticket(5, "closed", "low"),
            with_score(ticket(6, "closed", "normal"), "Good"),
        ];

        let insights = run(&records);
        let by_priority = &insights.average_satisfaction_by_priority;

        assert_eq!(by_priority.get("high").map(String::as_str), Some("bad"));
        assert_eq!(by_priority.get("urgent").map(String::as_str), Some("offered"));
        assert_eq!(by_priority.get("normal").map(String::as_str), Some("Good"));
        assert!(!by_priority.contains_key("low"));
    }

    #[test]
    fn test_sample_fixture_insights() {
        let insights = run(&sample_fixture());
        let by_priority = &insights.average_satisfaction_by_priority;

        assert_eq!(insights.issues_by_type.get("problem"), Some(&2));
        // "offered" and "Bad" tie for high; the first seen is kept.
        assert_eq!(by_priority.get("high").map(String::as_str), Some("offered"));
        assert_eq!(by_priority.get("normal").map(String::as_str), Some("good"));
        assert_eq!(by_priority.len(), 2);
    }
}
