//! Ticket acquisition.
//!
//! Tickets come either from a remote HTTP endpoint or from a local JSON
//! file. Both accept the same payload shapes: a bare array of records or
//! an envelope object with a `tickets` array.

pub mod http;

pub use http::HttpSource;

use crate::error::TicketError;
use crate::models::TicketRecord;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where a batch of tickets is read from.
#[derive(Debug, Clone)]
pub enum TicketSource {
    /// Remote endpoint, fetched once per request.
    Http(HttpSource),
    /// Local JSON file, re-read on every request.
    File(PathBuf),
}

impl TicketSource {
    /// Fetch one batch of tickets.
    pub async fn fetch(&self) -> Result<Vec<TicketRecord>, TicketError> {
        match self {
            TicketSource::Http(source) => source.fetch().await,
            TicketSource::File(path) => load_file(path).await,
        }
    }

    /// Human-readable origin for logs and report metadata.
    pub fn describe(&self) -> String {
        match self {
            TicketSource::Http(source) => source.url().to_string(),
            TicketSource::File(path) => path.display().to_string(),
        }
    }
}

/// Accepted response bodies.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TicketPayload {
    List(Vec<TicketRecord>),
    Envelope {
        #[serde(default)]
        tickets: Vec<TicketRecord>,
    },
}

impl From<TicketPayload> for Vec<TicketRecord> {
    fn from(payload: TicketPayload) -> Self {
        match payload {
            TicketPayload::List(tickets) | TicketPayload::Envelope { tickets } => tickets,
        }
    }
}

/// Decode a ticket payload from raw JSON text.
pub fn decode_payload(body: &str) -> Result<Vec<TicketRecord>, TicketError> {
    let payload: TicketPayload = serde_json::from_str(body)
        .map_err(|e| TicketError::UpstreamFetch(format!("Invalid ticket payload: {}", e)))?;

    let tickets: Vec<TicketRecord> = payload.into();
    debug!("Decoded {} tickets", tickets.len());
    Ok(tickets)
}

/// Read tickets from a local JSON file.
pub async fn load_file(path: &Path) -> Result<Vec<TicketRecord>, TicketError> {
    info!("Loading tickets from file: {}", path.display());

    let body = tokio::fs::read_to_string(path).await.map_err(|e| {
        TicketError::UpstreamFetch(format!("Failed to read {}: {}", path.display(), e))
    })?;

    decode_payload(&body)
}
