//! Error types for ticket acquisition and analysis.

use axum::http::StatusCode;
use thiserror::Error;

/// Placeholder used when an upstream failure carries no message.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred";

#[derive(Error, Debug)]
pub enum TicketError {
    /// The batch was missing or contained no records.
    #[error("No ticket data available")]
    EmptyDataset,

    /// A timestamp field could not be read as an instant.
    #[error("Malformed timestamp in field '{field}': {value:?}")]
    MalformedTimestamp { field: &'static str, value: String },

    /// The ticket source could not supply records.
    #[error("Failed to fetch tickets: {0}")]
    UpstreamFetch(String),
}

impl TicketError {
    /// HTTP status this error maps to at the service boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            TicketError::EmptyDataset => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message for the error body, falling back to a placeholder for blank upstream errors.
    pub fn public_message(&self) -> String {
        match self {
            TicketError::UpstreamFetch(msg) if msg.trim().is_empty() => {
                UNKNOWN_ERROR_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}
