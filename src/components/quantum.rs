//! Quantum researcher: opportunity discovery.
//!
//! The researcher is the hook for scanning pricing feeds, affiliate
//! networks and news for revenue opportunities. No scanner is wired in
//! yet, so every scan comes back empty.

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use super::OpportunitySource;
use crate::types::Opportunity;

#[derive(Debug, Default, Clone)]
pub struct QuantumResearcher;

impl QuantumResearcher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OpportunitySource for QuantumResearcher {
    async fn find_opportunities(&self) -> Result<Vec<Opportunity>> {
        let opportunities: Vec<Opportunity> = Vec::new();
        debug!(count = opportunities.len(), "Quantum scan finished");
        Ok(opportunities)
    }
}
