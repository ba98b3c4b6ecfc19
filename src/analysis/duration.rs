//! Resolution time for high-priority tickets.
//!
//! Only tickets that are both high priority and resolved, with readable
//! `created` and `updated` timestamps, take part. Durations are not
//! clamped: a ticket updated before it was created contributes a
//! negative duration.

use super::engine::PreparedTicket;
use super::round2;
use crate::models::{HighPriorityAnalysis, LongestToSolve, Priority, NO_RATING};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;
const HOURS_PER_DAY: f64 = 24.0;

/// A resolved high-priority ticket and how long it took, in milliseconds.
struct Resolution<'t, 'a> {
    ticket: &'t PreparedTicket<'a>,
    millis: i64,
}

fn resolutions<'t, 'a>(tickets: &'t [PreparedTicket<'a>]) -> Vec<Resolution<'t, 'a>> {
    tickets
        .iter()
        .filter(|t| t.priority == Some(Priority::High) && t.is_resolved())
        .filter_map(|ticket| {
            let created = ticket.created?;
            let updated = ticket.updated?;
            Some(Resolution {
                ticket,
                millis: (updated - created).num_milliseconds(),
            })
        })
        .collect()
}

fn hours(millis: f64) -> f64 {
    millis / MILLIS_PER_HOUR
}

/// Average close time plus the single slowest ticket.
pub fn high_priority_analysis(
    tickets: &[PreparedTicket<'_>],
) -> (HighPriorityAnalysis, LongestToSolve) {
    let resolved = resolutions(tickets);

    if resolved.is_empty() {
        return (HighPriorityAnalysis::default(), LongestToSolve::none());
    }

    let total_millis: f64 = resolved.iter().map(|r| r.millis as f64).sum();
    let mean_hours = hours(total_millis / resolved.len() as f64);

    let analysis = HighPriorityAnalysis {
        average_time_to_close_hours: round2(mean_hours),
        average_time_to_close_days: round2(mean_hours / HOURS_PER_DAY),
        total_closed_high_priority: resolved.len(),
    };

    // Strictly greater replaces, so the earliest of equal durations wins.
    let longest = resolved
        .iter()
        .fold(None::<&Resolution>, |best, candidate| match best {
            Some(current) if candidate.millis <= current.millis => Some(current),
            _ => Some(candidate),
        })
        .map(|winner| {
            let winner_hours = hours(winner.millis as f64);
            LongestToSolve {
                issue_id: winner.ticket.record.id,
                time_to_solve_hours: round2(winner_hours),
                time_to_solve_days: round2(winner_hours / HOURS_PER_DAY),
                satisfaction_rating_score: winner
                    .ticket
                    .record
                    .satisfaction_score()
                    .unwrap_or(NO_RATING)
                    .to_string(),
            }
        })
        .unwrap_or_else(LongestToSolve::none);

    (analysis, longest)
}
