//! Due-date performance.
//!
//! Resolved tickets are judged by when they were last updated; unresolved
//! ones by whether their due date has already passed at `now`.

use super::engine::PreparedTicket;
use super::percentage;
use crate::models::ResolutionTimeliness;
use chrono::{DateTime, Utc};

pub fn resolution_timeliness(
    tickets: &[PreparedTicket<'_>],
    total: usize,
    now: DateTime<Utc>,
) -> ResolutionTimeliness {
    let mut timeliness = ResolutionTimeliness::default();

    for ticket in tickets {
        // Unrecognized statuses belong to neither branch.
        let Some(status) = ticket.status else {
            continue;
        };
        let Some(due) = ticket.due else {
            continue;
        };

        if status.is_resolved() {
            let Some(updated) = ticket.updated else {
                continue;
            };
            if updated <= due {
                timeliness.on_time += 1;
            } else {
                timeliness.overdue += 1;
            }
        } else if now > due {
            timeliness.currently_overdue += 1;
        }
    }

    let resolved = timeliness.on_time + timeliness.overdue;
    timeliness.on_time_percent = percentage(timeliness.on_time, resolved);
    timeliness.overdue_percent = percentage(timeliness.overdue, resolved);
    timeliness.currently_overdue_percent = percentage(timeliness.currently_overdue, total);

    timeliness
}
