//! Dashboard API route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<DashboardState>`.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::engine::PauseControl;
use crate::types::{AgentStatus, ArielState, MarketTrend, Opportunity, StatusSnapshot};

/// Log lines kept in memory for `/api/ariel/logs`.
pub const MAX_LOG_ENTRIES: usize = 100;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct DashboardState {
    pub control: PauseControl,
    pub cycle_time_secs: u64,
    pub agent: RwLock<ArielState>,
    pub last_snapshot: RwLock<Option<StatusSnapshot>>,
    pub logs: RwLock<VecDeque<LogEntry>>,
}

impl DashboardState {
    pub fn new(control: PauseControl, initial_state: ArielState, cycle_time_secs: u64) -> Self {
        Self {
            control,
            cycle_time_secs,
            agent: RwLock::new(initial_state),
            last_snapshot: RwLock::new(None),
            logs: RwLock::new(VecDeque::with_capacity(MAX_LOG_ENTRIES)),
        }
    }

    /// Append a log line, dropping the oldest beyond `MAX_LOG_ENTRIES`.
    pub async fn push_log(&self, message: impl Into<String>) {
        let mut logs = self.logs.write().await;
        if logs.len() == MAX_LOG_ENTRIES {
            logs.pop_front();
        }
        logs.push_back(LogEntry {
            timestamp: Utc::now(),
            message: message.into(),
        });
    }

    /// Status as the admin sees it: the live pause flag wins over the
    /// status recorded at the last sync.
    pub fn effective_status(&self, agent: &ArielState) -> AgentStatus {
        if self.control.is_paused() && agent.status != AgentStatus::Stopped {
            AgentStatus::Paused
        } else {
            agent.status
        }
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub running: bool,
    pub paused: bool,
    pub status: AgentStatus,
    pub last_active: Option<DateTime<Utc>>,
    pub cycle_count: u64,
    pub cycles_skipped: u64,
    pub cycles_failed: u64,
    pub cycle_time_secs: u64,
    pub uptime_secs: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ControlResponse {
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogsResponse {
    pub logs: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivitiesResponse {
    pub cycle_number: Option<u64>,
    pub timestamp: Option<DateTime<Utc>>,
    pub opportunities: Vec<Opportunity>,
    pub market_trends: Vec<MarketTrend>,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

pub type AppState = Arc<DashboardState>;

/// GET /api/ariel/status
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let agent = state.agent.read().await;
    let status = state.effective_status(&agent);

    Json(StatusResponse {
        running: status.is_running(),
        paused: state.control.is_paused(),
        status,
        last_active: agent.last_cycle_at,
        cycle_count: agent.cycle_count,
        cycles_skipped: agent.cycles_skipped,
        cycles_failed: agent.cycles_failed,
        cycle_time_secs: state.cycle_time_secs,
        uptime_secs: agent.uptime().num_seconds(),
    })
}

/// POST /api/ariel/pause
pub async fn pause(State(state): State<AppState>) -> Json<ControlResponse> {
    let was_paused = state.control.pause();
    if !was_paused {
        state.push_log("Paused by admin").await;
    }
    Json(ControlResponse { status: "paused" })
}

/// POST /api/ariel/resume
pub async fn resume(State(state): State<AppState>) -> Json<ControlResponse> {
    let was_paused = state.control.resume();
    if was_paused {
        state.push_log("Resumed by admin").await;
    }
    Json(ControlResponse { status: "resumed" })
}

/// POST /api/ariel/optimize
///
/// Wakes the loop so the next cycle starts now. Refused while paused,
/// since the requested cycle would only be skipped.
pub async fn optimize(State(state): State<AppState>) -> (StatusCode, Json<MessageResponse>) {
    if state.control.is_paused() {
        return (
            StatusCode::CONFLICT,
            Json(MessageResponse {
                message: "ArielAI is paused. Resume before optimizing.",
            }),
        );
    }
    state.control.request_cycle();
    state.push_log("Optimization requested by admin").await;
    (
        StatusCode::OK,
        Json(MessageResponse {
            message: "ArielAI optimization cycle requested.",
        }),
    )
}

/// GET /api/ariel/logs
pub async fn get_logs(State(state): State<AppState>) -> Json<LogsResponse> {
    let logs = state.logs.read().await;
    Json(LogsResponse {
        logs: logs
            .iter()
            .map(|e| format!("{} {}", e.timestamp.to_rfc3339(), e.message))
            .collect(),
    })
}

/// GET /api/ariel/activities
pub async fn get_activities(State(state): State<AppState>) -> Json<ActivitiesResponse> {
    let snapshot = state.last_snapshot.read().await;
    Json(match snapshot.as_ref() {
        Some(s) => ActivitiesResponse {
            cycle_number: Some(s.cycle_number),
            timestamp: Some(s.timestamp),
            opportunities: s.opportunities.clone(),
            market_trends: s.market_trends.clone(),
        },
        None => ActivitiesResponse {
            cycle_number: None,
            timestamp: None,
            opportunities: Vec::new(),
            market_trends: Vec::new(),
        },
    })
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
