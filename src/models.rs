//! Data models for ticket analytics.
//!
//! This module contains the inbound ticket record, the recognized
//! categorical values, and the report structures produced by the
//! analysis engine.

use crate::error::TicketError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Score shown when a ticket carries no satisfaction rating.
pub const NO_RATING: &str = "N/A";

/// Lowercase a free-text categorical field.
///
/// Every pass classifies on the output of this function, so a record
/// is never counted as "Open" by one pass and "open" by another.
pub fn normalize(value: Option<&str>) -> Option<String> {
    value.map(str::to_lowercase)
}

/// Ticket status values the engine counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Open,
    Closed,
    Pending,
    Hold,
    Solved,
    New,
}

impl Status {
    pub const ALL: [Status; 6] = [
        Status::Open,
        Status::Closed,
        Status::Pending,
        Status::Hold,
        Status::Solved,
        Status::New,
    ];

    /// Match an already-normalized status string.
    pub fn from_normalized(value: &str) -> Option<Self> {
        match value {
            "open" => Some(Status::Open),
            "closed" => Some(Status::Closed),
            "pending" => Some(Status::Pending),
            "hold" => Some(Status::Hold),
            "solved" => Some(Status::Solved),
            "new" => Some(Status::New),
            _ => None,
        }
    }

    /// Closed and solved tickets are resolved; everything else is still in flight.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Status::Closed | Status::Solved)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Open => write!(f, "Open"),
            Status::Closed => write!(f, "Closed"),
            Status::Pending => write!(f, "Pending"),
            Status::Hold => write!(f, "Hold"),
            Status::Solved => write!(f, "Solved"),
            Status::New => write!(f, "New"),
        }
    }
}

/// Ticket priority values the engine counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    High,
    Normal,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Normal, Priority::Low];

    /// Match an already-normalized priority string.
    pub fn from_normalized(value: &str) -> Option<Self> {
        match value {
            "high" => Some(Priority::High),
            "normal" => Some(Priority::Normal),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Normal => write!(f, "Normal"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

/// Customer satisfaction attached to a ticket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SatisfactionRating {
    #[serde(default)]
    pub score: Option<String>,
}

/// A single support ticket as delivered by the ticket source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketRecord {
    /// Ticket identity, unique within a batch.
    pub id: u64,
    /// Creation timestamp.
    #[serde(default, alias = "created_at")]
    pub created: Option<String>,
    /// Last update timestamp; for resolved tickets this is the resolution time.
    #[serde(default, alias = "updated_at")]
    pub updated: Option<String>,
    /// Due timestamp.
    #[serde(default, alias = "due_at")]
    pub due: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default, rename = "type")]
    pub ticket_type: Option<String>,
    #[serde(default)]
    pub satisfaction_rating: Option<SatisfactionRating>,
    /// Owning organization; not used by the analysis.
    #[serde(default, deserialize_with = "deserialize_identifier")]
    pub organization_id: Option<String>,
}

impl TicketRecord {
    /// Raw satisfaction score, if one was given.
    pub fn satisfaction_score(&self) -> Option<&str> {
        self.satisfaction_rating
            .as_ref()
            .and_then(|rating| rating.score.as_deref())
    }
}

/// Accept identifiers sent either as JSON strings or numbers.
fn deserialize_identifier<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Identifier {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(
        Option::<Identifier>::deserialize(deserializer)?.map(|id| match id {
            Identifier::Text(text) => text,
            Identifier::Number(number) => number.to_string(),
        }),
    )
}

/// Parse a timestamp field into an absolute instant.
///
/// Offsets are honoured; timezone-naive values are read as UTC and a
/// bare date means midnight UTC.
pub fn parse_instant(field: &'static str, raw: Option<&str>) -> Result<DateTime<Utc>, TicketError> {
    let malformed = |value: &str| TicketError::MalformedTimestamp {
        field,
        value: value.to_string(),
    };

    let raw = raw.ok_or_else(|| malformed(""))?;
    let value = raw.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| malformed(raw))
}

/// Status counts and their share of all tickets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBreakdown {
    pub open: usize,
    pub closed: usize,
    pub pending: usize,
    pub hold: usize,
    pub solved: usize,
    pub new: usize,
    pub open_percent: f64,
    pub closed_percent: f64,
    pub pending_percent: f64,
    pub hold_percent: f64,
    pub solved_percent: f64,
    pub new_percent: f64,
}

impl StatusBreakdown {
    /// Count for a single status.
    pub fn count(&self, status: Status) -> usize {
        match status {
            Status::Open => self.open,
            Status::Closed => self.closed,
            Status::Pending => self.pending,
            Status::Hold => self.hold,
            Status::Solved => self.solved,
            Status::New => self.new,
        }
    }

    /// Share of all tickets for a single status.
    pub fn percent(&self, status: Status) -> f64 {
        match status {
            Status::Open => self.open_percent,
            Status::Closed => self.closed_percent,
            Status::Pending => self.pending_percent,
            Status::Hold => self.hold_percent,
            Status::Solved => self.solved_percent,
            Status::New => self.new_percent,
        }
    }

    /// Tickets whose status was one of the recognized values.
    pub fn recognized_total(&self) -> usize {
        Status::ALL.iter().map(|s| self.count(*s)).sum()
    }
}

/// Priority counts and their share of all tickets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityBreakdown {
    pub high: usize,
    pub normal: usize,
    pub low: usize,
    pub high_percent: f64,
    pub normal_percent: f64,
    pub low_percent: f64,
}

impl PriorityBreakdown {
    pub fn count(&self, priority: Priority) -> usize {
        match priority {
            Priority::High => self.high,
            Priority::Normal => self.normal,
            Priority::Low => self.low,
        }
    }

    pub fn percent(&self, priority: Priority) -> f64 {
        match priority {
            Priority::High => self.high_percent,
            Priority::Normal => self.normal_percent,
            Priority::Low => self.low_percent,
        }
    }
}

/// How resolved tickets fared against their due dates, and how many open ones are late.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionTimeliness {
    pub on_time: usize,
    pub overdue: usize,
    pub currently_overdue: usize,
    /// Share of resolved tickets closed by their due date.
    pub on_time_percent: f64,
    /// Share of resolved tickets closed after their due date.
    pub overdue_percent: f64,
    /// Share of all tickets that are unresolved and past due.
    pub currently_overdue_percent: f64,
}

/// Mean time to close for resolved high-priority tickets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighPriorityAnalysis {
    pub average_time_to_close_hours: f64,
    pub average_time_to_close_days: f64,
    pub total_closed_high_priority: usize,
}

/// The resolved high-priority ticket that took longest to solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongestToSolve {
    pub issue_id: u64,
    pub time_to_solve_hours: f64,
    pub time_to_solve_days: f64,
    pub satisfaction_rating_score: String,
}

impl LongestToSolve {
    /// Result used when no resolved high-priority ticket exists.
    pub fn none() -> Self {
        Self {
            issue_id: 0,
            time_to_solve_hours: 0.0,
            time_to_solve_days: 0.0,
            satisfaction_rating_score: NO_RATING.to_string(),
        }
    }
}

/// Open-ended groupings over the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalInsights {
    pub total_issues: usize,
    pub issues_by_type: BTreeMap<String, usize>,
    /// Most frequent satisfaction score per priority seen in the batch.
    pub average_satisfaction_by_priority: BTreeMap<String, String>,
    pub issues_closed_count: usize,
    pub issues_open_count: usize,
}

/// The complete analytics report for one batch of tickets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub status_breakdown: StatusBreakdown,
    pub priority_breakdown: PriorityBreakdown,
    pub resolution_timeliness: ResolutionTimeliness,
    pub high_priority_analysis: HighPriorityAnalysis,
    pub longest_to_solve_high_priority: LongestToSolve,
    pub additional_insights: AdditionalInsights,
}

impl Report {
    pub fn total_issues(&self) -> usize {
        self.additional_insights.total_issues
    }
}

/// Facts about a report run that are not part of the report itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Where the tickets came from (URL or file path).
    pub source: String,
    /// When the analysis was evaluated.
    pub analysis_date: DateTime<Utc>,
    /// Fetch plus analysis time in seconds.
    pub duration_seconds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_from_normalized() {
        assert_eq!(Status::from_normalized("open"), Some(Status::Open));
        assert_eq!(Status::from_normalized("solved"), Some(Status::Solved));
        assert_eq!(Status::from_normalized("Open"), None);
        assert_eq!(Status::from_normalized("deleted"), None);
    }

    #[test]
    fn test_status_is_resolved() {
        assert!(Status::Closed.is_resolved());
        assert!(Status::Solved.is_resolved());
        assert!(!Status::Open.is_resolved());
        assert!(!Status::Pending.is_resolved());
        assert!(!Status::Hold.is_resolved());
        assert!(!Status::New.is_resolved());
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Some("HiGh")), Some("high".to_string()));
        assert_eq!(normalize(None), None);
        assert_eq!(
            Priority::from_normalized(&normalize(Some("NORMAL")).unwrap()),
            Some(Priority::Normal)
        );
    }

    #[test]
    fn test_parse_instant_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap();

        assert_eq!(
            parse_instant("created", Some("2024-03-01T10:30:00Z")).unwrap(),
            expected
        );
        assert_eq!(
            parse_instant("created", Some("2024-03-01T12:30:00+02:00")).unwrap(),
            expected
        );
        assert_eq!(
            parse_instant("created", Some("2024-03-01T10:30:00")).unwrap(),
            expected
        );
        assert_eq!(
            parse_instant("created", Some("2024-03-01 10:30:00.000")).unwrap(),
            expected
        );
        assert_eq!(
            parse_instant("due", Some("2024-03-01")).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_instant_malformed() {
        match parse_instant("due", Some("next tuesday")) {
            Err(TicketError::MalformedTimestamp { field, value }) => {
                assert_eq!(field, "due");
                assert_eq!(value, "next tuesday");
            }
            other => panic!("expected malformed timestamp, got {:?}", other),
        }

        assert!(parse_instant("due", None).is_err());
    }

    #[test]
    fn test_ticket_record_deserialize_aliases() {
        let json = r#"{
            "id": 42,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-02T00:00:00Z",
            "due_at": null,
            "status": "Solved",
            "priority": null,
            "type": "incident",
            "satisfaction_rating": {"score": "good"},
            "organization_id": 9001
        }"#;

        let record: TicketRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 42);
        assert_eq!(record.created.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(record.due, None);
        assert_eq!(record.priority, None);
        assert_eq!(record.ticket_type.as_deref(), Some("incident"));
        assert_eq!(record.satisfaction_score(), Some("good"));
        assert_eq!(record.organization_id.as_deref(), Some("9001"));
    }

    #[test]
    fn test_ticket_record_missing_optional_fields() {
        let record: TicketRecord = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(record.status, None);
        assert_eq!(record.satisfaction_score(), None);
        assert_eq!(record.organization_id, None);

        let record: TicketRecord =
            serde_json::from_str(r#"{"id": 8, "satisfaction_rating": null}"#).unwrap();
        assert_eq!(record.satisfaction_score(), None);
    }

    #[test]
    fn test_longest_to_solve_none() {
        let none = LongestToSolve::none();
        assert_eq!(none.issue_id, 0);
        assert_eq!(none.time_to_solve_hours, 0.0);
        assert_eq!(none.time_to_solve_days, 0.0);
        assert_eq!(none.satisfaction_rating_score, "N/A");
    }

    #[test]
    fn test_report_field_names() {
        let report = Report {
            status_breakdown: StatusBreakdown::default(),
            priority_breakdown: PriorityBreakdown::default(),
            resolution_timeliness: ResolutionTimeliness::default(),
            high_priority_analysis: HighPriorityAnalysis::default(),
            longest_to_solve_high_priority: LongestToSolve::none(),
            additional_insights: AdditionalInsights::default(),
        };

        let value = serde_json::to_value(&report).unwrap();
        for key in [
            "statusBreakdown",
            "priorityBreakdown",
            "resolutionTimeliness",
            "highPriorityAnalysis",
            "longestToSolveHighPriority",
            "additionalInsights",
        ] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert!(value["statusBreakdown"].get("openPercent").is_some());
        assert!(value["resolutionTimeliness"].get("currentlyOverduePercent").is_some());
        assert_eq!(value["longestToSolveHighPriority"]["issueId"], 0);
        assert!(value["additionalInsights"].get("issuesByType").is_some());
    }
}
