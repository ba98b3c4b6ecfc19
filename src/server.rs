//! HTTP service exposing the ticket analysis.
//!
//! Each request fetches a fresh batch from the configured source and
//! analyzes it; nothing is cached between requests.

use crate::analysis;
use crate::error::TicketError;
use crate::models::Report;
use crate::source::TicketSource;
use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// State shared across handlers.
pub struct AppState {
    pub source: TicketSource,
    /// Budget for one analysis request, fetch included.
    pub request_timeout: Duration,
}

/// Error body returned on 404 and 500 responses.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

impl IntoResponse for TicketError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/tickets/analysis", get(ticket_analysis))
        .route("/health", get(health))
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until the process is stopped.
pub async fn run(state: AppState, bind: &str) -> Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    info!("Listening on http://{}", bind);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

async fn ticket_analysis(State(state): State<Arc<AppState>>) -> Result<Json<Report>, TicketError> {
    // Dropping the fetch on timeout cancels it; no partial report is built.
    let fetched = tokio::time::timeout(state.request_timeout, state.source.fetch())
        .await
        .unwrap_or_else(|_| {
            Err(TicketError::UpstreamFetch(format!(
                "Request timed out after {}s",
                state.request_timeout.as_secs_f64()
            )))
        });

    let tickets = fetched.map_err(|e| {
        error!("Ticket fetch failed: {}", e);
        e
    })?;

    match analysis::analyze(&tickets) {
        Ok(report) => {
            info!("Served analysis of {} tickets", report.total_issues());
            Ok(Json(report))
        }
        Err(e) => {
            warn!("Analysis failed: {}", e);
            Err(e)
        }
    }
}

async fn health() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}
