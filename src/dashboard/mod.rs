//! Admin dashboard.
//!
//! `AdminDashboard` is the orchestrator's status sink: every completed
//! cycle lands here. The same state backs an Axum server exposing the
//! `/api/ariel/*` admin API and a self-contained HTML page.

pub mod routes;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    http::{header, Method},
    response::Html,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, info};

use crate::components::StatusSink;
use crate::engine::PauseControl;
use crate::types::{ArielState, StatusSnapshot};
use routes::{AppState, DashboardState};

/// The embedded dashboard HTML (compiled into the binary).
const DASHBOARD_HTML: &str = include_str!("templates/index.html");

// ---------------------------------------------------------------------------
// Status sink
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AdminDashboard {
    state: AppState,
}

impl AdminDashboard {
    pub fn new(control: PauseControl, initial_state: ArielState, cycle_time_secs: u64) -> Self {
        Self {
            state: Arc::new(DashboardState::new(control, initial_state, cycle_time_secs)),
        }
    }

    /// Shared state for the HTTP server.
    pub fn state(&self) -> AppState {
        self.state.clone()
    }
}

#[async_trait]
impl StatusSink for AdminDashboard {
    async fn sync_status(&self, snapshot: &StatusSnapshot) -> Result<()> {
        *self.state.agent.write().await = snapshot.state.clone();
        *self.state.last_snapshot.write().await = Some(snapshot.clone());
        self.state
            .push_log(format!(
                "Cycle #{} complete: {} opportunities, {} trends",
                snapshot.cycle_number,
                snapshot.opportunities.len(),
                snapshot.market_trends.len(),
            ))
            .await;
        debug!(cycle = snapshot.cycle_number, "Dashboard synced");
        Ok(())
    }

    async fn record_state(&self, state: &ArielState) -> Result<()> {
        *self.state.agent.write().await = state.clone();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// HTTP server
// ---------------------------------------------------------------------------

/// Start the dashboard web server.
///
/// Binds before returning so a taken port is reported to the caller;
/// serving then continues on a background task.
pub async fn spawn_dashboard(state: AppState, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind dashboard port {port}"))?;
    info!(port, "Dashboard server starting on http://localhost:{port}");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "Dashboard server error");
        }
    });

    Ok(())
}

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        // Admin API
        .route("/api/ariel/status", get(routes::get_status))
        .route("/api/ariel/pause", post(routes::pause))
        .route("/api/ariel/resume", post(routes::resume))
        .route("/api/ariel/optimize", post(routes::optimize))
        .route("/api/ariel/logs", get(routes::get_logs))
        .route("/api/ariel/activities", get(routes::get_activities))
        .route("/health", get(routes::health))
        // Dashboard HTML
        .route("/", get(serve_dashboard))
        .layer(cors)
        .with_state(state)
}

async fn serve_dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
