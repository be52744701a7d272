//! Neural trend analysis.

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use super::TrendAnalyzer;
use crate::types::MarketTrend;

/// Market trend analyzer. Produces no trends until a model is attached.
#[derive(Debug, Default, Clone)]
pub struct NeuralAI;

impl NeuralAI {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TrendAnalyzer for NeuralAI {
    async fn analyze_trends(&self) -> Result<Vec<MarketTrend>> {
        debug!("Trend analysis finished");
        Ok(Vec::new())
    }
}
