//! Asset manager: provisioning of the digital assets campaigns run on
//! (sites, storefronts, landing pages).
//!
//! Both operations currently only record that they were asked to run;
//! there is no provisioning backend.

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use super::AssetProvisioner;
use crate::types::{MarketTrend, Opportunity};

#[derive(Debug, Default, Clone)]
pub struct AssetManager;

impl AssetManager {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AssetProvisioner for AssetManager {
    async fn ensure_minimum_assets(&self) -> Result<()> {
        debug!("Minimum asset check done");
        Ok(())
    }

    async fn acquire_assets_for_opportunities(
        &self,
        opportunities: &[Opportunity],
        market_trends: &[MarketTrend],
    ) -> Result<()> {
        debug!(
            opportunities = opportunities.len(),
            trends = market_trends.len(),
            "Asset acquisition pass done"
        );
        Ok(())
    }
}
