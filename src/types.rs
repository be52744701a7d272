//! Shared types for the ARIEL orchestrator.
//!
//! These types form the data model passed between the orchestrator and
//! its collaborators. Opportunities and trends are deliberately thin
//! envelopes around an opaque JSON payload: the collaborators decide
//! what goes inside, the orchestrator only moves them along.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Opportunity
// ---------------------------------------------------------------------------

/// A discovered revenue-generating action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: String,
    pub kind: OpportunityKind,
    pub description: String,
    /// Name of the researcher that produced this opportunity.
    pub source: String,
    /// Score assigned by the producer, if any. Never computed here.
    pub score: Option<f64>,
    pub discovered_at: DateTime<Utc>,
    /// Producer-specific data, passed through untouched.
    pub payload: serde_json::Value,
}

impl fmt::Display for Opportunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.score {
            Some(score) => write!(
                f,
                "[{}] {} (score={score:.2}, via {})",
                self.kind, self.description, self.source
            ),
            None => write!(f, "[{}] {} (via {})", self.kind, self.description, self.source),
        }
    }
}

impl Opportunity {
    /// Build an opportunity with a fresh id and an empty payload.
    pub fn new(
        kind: OpportunityKind,
        description: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            description: description.into(),
            source: source.into(),
            score: None,
            discovered_at: Utc::now(),
            payload: serde_json::Value::Null,
        }
    }
}

/// Campaign family an opportunity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityKind {
    Affiliate,
    Cpa,
    Ecommerce,
    Content,
    Arbitrage,
    Other,
}

impl fmt::Display for OpportunityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpportunityKind::Affiliate => write!(f, "Affiliate"),
            OpportunityKind::Cpa => write!(f, "CPA"),
            OpportunityKind::Ecommerce => write!(f, "E-commerce"),
            OpportunityKind::Content => write!(f, "Content"),
            OpportunityKind::Arbitrage => write!(f, "Arbitrage"),
            OpportunityKind::Other => write!(f, "Other"),
        }
    }
}

// ---------------------------------------------------------------------------
// Market trend
// ---------------------------------------------------------------------------

/// An analyzed market movement for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketTrend {
    pub region: String,
    /// Growth over the analysis window, in percent.
    pub growth_pct: f64,
    pub sentiment: TrendSentiment,
    pub observed_at: DateTime<Utc>,
    pub payload: serde_json::Value,
}

impl fmt::Display for MarketTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:+.1}% ({})", self.region, self.growth_pct, self.sentiment)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendSentiment {
    Bullish,
    Stable,
    Bearish,
}

impl fmt::Display for TrendSentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendSentiment::Bullish => write!(f, "bullish"),
            TrendSentiment::Stable => write!(f, "stable"),
            TrendSentiment::Bearish => write!(f, "bearish"),
        }
    }
}

// ---------------------------------------------------------------------------
// Agent status & state
// ---------------------------------------------------------------------------

/// Orchestrator lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentStatus {
    Starting,
    Running,
    Paused,
    Stopped,
}

impl AgentStatus {
    /// The loop is alive, whether or not it is doing work.
    pub fn is_running(self) -> bool {
        matches!(self, AgentStatus::Running | AgentStatus::Paused)
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentStatus::Starting => write!(f, "🔵 STARTING"),
            AgentStatus::Running => write!(f, "🟢 RUNNING"),
            AgentStatus::Paused => write!(f, "🟡 PAUSED"),
            AgentStatus::Stopped => write!(f, "🔴 STOPPED"),
        }
    }
}

/// Persistent orchestrator state, saved to disk after each cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArielState {
    /// Cycles that ran all five steps.
    pub cycle_count: u64,
    /// Cycles skipped because the orchestrator was paused.
    pub cycles_skipped: u64,
    /// Cycles aborted by a failing step.
    pub cycles_failed: u64,
    pub paused: bool,
    pub status: AgentStatus,
    pub start_time: DateTime<Utc>,
    pub last_cycle_at: Option<DateTime<Utc>>,
}

impl Default for ArielState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ArielState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | cycles={} skipped={} failed={} | uptime={}s",
            self.status,
            self.cycle_count,
            self.cycles_skipped,
            self.cycles_failed,
            self.uptime().num_seconds(),
        )
    }
}

impl ArielState {
    pub fn new() -> Self {
        Self {
            cycle_count: 0,
            cycles_skipped: 0,
            cycles_failed: 0,
            paused: false,
            status: AgentStatus::Starting,
            start_time: Utc::now(),
            last_cycle_at: None,
        }
    }

    pub fn uptime(&self) -> chrono::Duration {
        Utc::now() - self.start_time
    }
}

// ---------------------------------------------------------------------------
// Cycle types
// ---------------------------------------------------------------------------

/// The five steps of a revenue cycle, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleStep {
    FindOpportunities,
    AnalyzeTrends,
    AcquireAssets,
    RunCampaigns,
    SyncDashboard,
}

impl fmt::Display for CycleStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleStep::FindOpportunities => write!(f, "find_opportunities"),
            CycleStep::AnalyzeTrends => write!(f, "analyze_trends"),
            CycleStep::AcquireAssets => write!(f, "acquire_assets"),
            CycleStep::RunCampaigns => write!(f, "run_campaigns"),
            CycleStep::SyncDashboard => write!(f, "sync_dashboard"),
        }
    }
}

/// Everything the dashboard receives at the end of a cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub opportunities: Vec<Opportunity>,
    pub market_trends: Vec<MarketTrend>,
    pub cycle_time_secs: u64,
    pub cycle_number: u64,
    pub timestamp: DateTime<Utc>,
    pub state: ArielState,
}

/// Summary of a completed revenue cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle_number: u64,
    pub opportunities_found: usize,
    pub trends_analyzed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cycle #{}: opportunities={} trends={} took={}ms",
            self.cycle_number,
            self.opportunities_found,
            self.trends_analyzed,
            self.duration().num_milliseconds(),
        )
    }
}

impl CycleReport {
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// What a call to `run_cycle` did.
#[derive(Debug, Clone)]
pub enum CycleOutcome {
    /// Paused: no step ran.
    Skipped,
    Completed(CycleReport),
}

impl CycleOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, CycleOutcome::Skipped)
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for ARIEL.
#[derive(Debug, thiserror::Error)]
pub enum ArielError {
    #[error("Cycle step {step} failed: {message}")]
    Step { step: CycleStep, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ArielError {
    /// Wrap a collaborator failure with the step it happened in.
    pub fn step(step: CycleStep, err: anyhow::Error) -> Self {
        ArielError::Step {
            step,
            message: format!("{err:#}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
