//! Orchestrator collaborators.
//!
//! Each role in a revenue cycle is a trait, so the orchestrator can be
//! driven by any implementation:
//! - `OpportunitySource`: discovers opportunities (`QuantumResearcher`)
//! - `TrendAnalyzer`: analyzes market trends (`NeuralAI`)
//! - `AssetProvisioner`: provisions digital assets (`AssetManager`)
//! - `CampaignRunner`: launches/optimizes campaigns (`CampaignManager`)
//! - `StatusSink`: receives the end-of-cycle snapshot and the orchestrator
//!   counters after every cycle (`AdminDashboard`)

pub mod assets;
pub mod campaigns;
pub mod neural;
pub mod quantum;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{ArielState, MarketTrend, Opportunity, StatusSnapshot};

pub use assets::AssetManager;
pub use campaigns::CampaignManager;
pub use neural::NeuralAI;
pub use quantum::QuantumResearcher;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OpportunitySource: Send + Sync {
    /// Scan for actionable opportunities.
    async fn find_opportunities(&self) -> Result<Vec<Opportunity>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrendAnalyzer: Send + Sync {
    async fn analyze_trends(&self) -> Result<Vec<MarketTrend>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetProvisioner: Send + Sync {
    /// Make sure the baseline set of assets exists. Called once at bootstrap.
    async fn ensure_minimum_assets(&self) -> Result<()>;

    /// Prepare whatever assets this cycle's opportunities need.
    async fn acquire_assets_for_opportunities(
        &self,
        opportunities: &[Opportunity],
        market_trends: &[MarketTrend],
    ) -> Result<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CampaignRunner: Send + Sync {
    async fn launch_or_optimize(
        &self,
        opportunities: &[Opportunity],
        market_trends: &[MarketTrend],
    ) -> Result<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatusSink: Send + Sync {
    /// Final step of a completed cycle.
    async fn sync_status(&self, snapshot: &StatusSnapshot) -> Result<()>;

    /// Latest counters. Pushed after every cycle whatever its outcome,
    /// and once more on shutdown.
    async fn record_state(&self, state: &ArielState) -> Result<()>;
}

/// The full set of collaborators an orchestrator runs with.
pub struct Components {
    pub quantum: Box<dyn OpportunitySource>,
    pub neural: Box<dyn TrendAnalyzer>,
    pub assets: Box<dyn AssetProvisioner>,
    pub campaigns: Box<dyn CampaignRunner>,
    pub dashboard: Box<dyn StatusSink>,
}

impl Components {
    /// Default collaborators, reporting into the given status sink.
    pub fn with_dashboard(dashboard: Box<dyn StatusSink>) -> Self {
        Self {
            quantum: Box::new(QuantumResearcher::new()),
            neural: Box::new(NeuralAI::new()),
            assets: Box::new(AssetManager::new()),
            campaigns: Box::new(CampaignManager::new()),
            dashboard,
        }
    }
}
