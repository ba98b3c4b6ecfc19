//! Report assembly.
//!
//! Validates the batch, normalizes every record once, then runs the
//! categorical, timeliness, duration and insight passes over it.

use crate::error::TicketError;
use crate::models::{normalize, parse_instant, Priority, Report, Status, TicketRecord};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::{categorical, duration, insights, timeliness};

/// A ticket with its categorical fields folded and its timestamps parsed.
///
/// A timestamp that is missing or unparseable is `None`; passes that
/// need it skip the record.
#[derive(Debug, Clone)]
pub struct PreparedTicket<'a> {
    pub record: &'a TicketRecord,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    /// Lowercased priority as sent, recognized or not.
    pub priority_key: Option<String>,
    /// Lowercased type as sent.
    pub type_key: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub due: Option<DateTime<Utc>>,
}

impl<'a> PreparedTicket<'a> {
    pub fn new(record: &'a TicketRecord) -> Self {
        let status_key = normalize(record.status.as_deref());
        let priority_key = normalize(record.priority.as_deref());

        Self {
            record,
            status: status_key.as_deref().and_then(Status::from_normalized),
            priority: priority_key.as_deref().and_then(Priority::from_normalized),
            priority_key,
            type_key: normalize(record.ticket_type.as_deref()),
            created: timestamp(record, "created", record.created.as_deref()),
            updated: timestamp(record, "updated", record.updated.as_deref()),
            due: timestamp(record, "due", record.due.as_deref()),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.status.is_some_and(|s| s.is_resolved())
    }
}

fn timestamp(record: &TicketRecord, field: &'static str, raw: Option<&str>) -> Option<DateTime<Utc>> {
    match parse_instant(field, raw) {
        Ok(instant) => Some(instant),
        Err(e) if raw.is_some() => {
            warn!("Ticket {}: {}; excluded from date calculations", record.id, e);
            None
        }
        Err(_) => {
            debug!("Ticket {} has no '{}' timestamp", record.id, field);
            None
        }
    }
}

/// Analyze a batch of tickets, evaluating overdue status against the current time.
pub fn analyze(records: &[TicketRecord]) -> Result<Report, TicketError> {
    analyze_at(records, Utc::now())
}

/// Analyze a batch of tickets against a fixed evaluation instant.
pub fn analyze_at(records: &[TicketRecord], now: DateTime<Utc>) -> Result<Report, TicketError> {
    if records.is_empty() {
        return Err(TicketError::EmptyDataset);
    }

    let total = records.len();
    info!("Analyzing {} tickets", total);

    let tickets: Vec<PreparedTicket<'_>> = records.iter().map(PreparedTicket::new).collect();

    let status_breakdown = categorical::status_breakdown(&tickets, total);
    let priority_breakdown = categorical::priority_breakdown(&tickets, total);
    let resolution_timeliness = timeliness::resolution_timeliness(&tickets, total, now);
    let (high_priority_analysis, longest_to_solve_high_priority) =
        duration::high_priority_analysis(&tickets);
    let additional_insights = insights::additional_insights(&tickets);

    debug!(
        "Analysis complete: {} on time, {} overdue, {} currently overdue, {} closed high priority",
        resolution_timeliness.on_time,
        resolution_timeliness.overdue,
        resolution_timeliness.currently_overdue,
        high_priority_analysis.total_closed_high_priority
    );

    Ok(Report {
        status_breakdown,
        priority_breakdown,
        resolution_timeliness,
        high_priority_analysis,
        longest_to_solve_high_priority,
        additional_insights,
    })
}
