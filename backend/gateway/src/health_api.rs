//! `GET /api/health`

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::GatewayState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub service: String,
    pub version: String,
    pub ocr_engine: String,
    pub completion_provider: String,
    pub model: String,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthReport> {
    let now = Utc::now();
    let uptime = (now - state.started_at).num_seconds().max(0) as u64;

    Json(HealthReport {
        status: "ok".into(),
        service: "textlens".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        ocr_engine: state.ocr.engine_name().to_string(),
        completion_provider: state.completion.name().to_string(),
        model: state.completion.model().to_string(),
        uptime_seconds: uptime,
        timestamp: now,
    })
}
