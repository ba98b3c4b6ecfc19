//! Status and priority tallies.

use super::engine::PreparedTicket;
use super::percentage;
use crate::models::{Priority, PriorityBreakdown, Status, StatusBreakdown};

/// Count tickets per recognized status. Percentages are of `total` and left unrounded.
pub fn status_breakdown(tickets: &[PreparedTicket<'_>], total: usize) -> StatusBreakdown {
    let mut breakdown = StatusBreakdown::default();

    for status in tickets.iter().filter_map(|t| t.status) {
        match status {
            Status::Open => breakdown.open += 1,
            Status::Closed => breakdown.closed += 1,
            Status::Pending => breakdown.pending += 1,
            Status::Hold => breakdown.hold += 1,
            Status::Solved => breakdown.solved += 1,
            Status::New => breakdown.new += 1,
        }
    }

    breakdown.open_percent = percentage(breakdown.open, total);
    breakdown.closed_percent = percentage(breakdown.closed, total);
    breakdown.pending_percent = percentage(breakdown.pending, total);
    breakdown.hold_percent = percentage(breakdown.hold, total);
    breakdown.solved_percent = percentage(breakdown.solved, total);
    breakdown.new_percent = percentage(breakdown.new, total);

    breakdown
}

/// Count tickets per recognized priority. Percentages are of `total` and left unrounded.
pub fn priority_breakdown(tickets: &[PreparedTicket<'_>], total: usize) -> PriorityBreakdown {
    let mut breakdown = PriorityBreakdown::default();

    for priority in tickets.iter().filter_map(|t| t.priority) {
        match priority {
            Priority::High => breakdown.high += 1,
            Priority::Normal => breakdown.normal += 1,
            Priority::Low => breakdown.low += 1,
        }
    }

    breakdown.high_percent = percentage(breakdown.high, total);
    breakdown.normal_percent = percentage(breakdown.normal, total);
    breakdown.low_percent = percentage(breakdown.low, total);

    breakdown
}
