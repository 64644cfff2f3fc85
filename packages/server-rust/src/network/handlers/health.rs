//! Health endpoints.
//!
//! The detailed report goes through negotiation like any other value, so
//! `Accept: application/msgpack` yields a `MsgPack` report.

use axum::extract::State;
use axum::http::request::Parts;
use axum::response::Response;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::response::Outcome;

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub state: String,
    pub uptime_secs: u64,
    /// Media types `Accept` can select, besides the default.
    pub content_types: Vec<String>,
}

/// Returns the health report in the negotiated format.
pub async fn health_handler(State(state): State<AppState>, parts: Parts) -> Response {
    let report = HealthReport {
        state: "ready".to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        content_types: state
            .writer
            .negotiator()
            .registry()
            .media_types()
            .into_iter()
            .map(str::to_string)
            .collect(),
    };

    state.writer.render(&parts, Outcome::negotiated(report))
}

/// Liveness probe: an empty 200.
pub async fn liveness_handler(State(state): State<AppState>, parts: Parts) -> Response {
    state.writer.render(&parts, ())
}
