//! Campaign manager: affiliate / CPA / e-commerce / content campaigns.

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use super::CampaignRunner;
use crate::types::{MarketTrend, Opportunity};

/// Launches new campaigns and re-tunes running ones. No ad or affiliate
/// network is connected, so a pass has no side effects.
#[derive(Debug, Default, Clone)]
pub struct CampaignManager;

impl CampaignManager {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CampaignRunner for CampaignManager {
    async fn launch_or_optimize(
        &self,
        opportunities: &[Opportunity],
        market_trends: &[MarketTrend],
    ) -> Result<()> {
        debug!(
            opportunities = opportunities.len(),
            trends = market_trends.len(),
            "Campaign pass done"
        );
        Ok(())
    }
}
