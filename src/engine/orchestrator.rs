//! Ariel: the revenue cycle orchestrator.
//!
//! Bootstraps assets once, then repeats
//! find opportunities → analyze trends → acquire assets → run campaigns
//! → sync dashboard → sleep, for as long as the process lives. Each step
//! is awaited before the next starts. A paused orchestrator skips the
//! cycle body and sleeps the (shorter) pause interval instead.

use anyhow::Result;
use chrono::Utc;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::components::{
    AssetProvisioner, CampaignRunner, Components, OpportunitySource, StatusSink, TrendAnalyzer,
};
use crate::config::AgentConfig;
use crate::engine::control::PauseControl;
use crate::storage;
use crate::types::{
    AgentStatus, ArielError, ArielState, CycleOutcome, CycleReport, CycleStep, StatusSnapshot,
};

pub struct Ariel {
    quantum: Box<dyn OpportunitySource>,
    neural: Box<dyn TrendAnalyzer>,
    assets: Box<dyn AssetProvisioner>,
    campaigns: Box<dyn CampaignRunner>,
    dashboard: Box<dyn StatusSink>,
    cycle_time: Duration,
    pause_interval: Duration,
    control: PauseControl,
    state: ArielState,
    /// Where to persist state after each cycle. `None` disables persistence.
    state_file: Option<String>,
}

impl Ariel {
    pub fn new(cfg: &AgentConfig, components: Components, control: PauseControl) -> Self {
        if cfg.start_paused {
            control.set_paused(true);
        }
        let mut state = ArielState::new();
        state.paused = control.is_paused();

        Self {
            quantum: components.quantum,
            neural: components.neural,
            assets: components.assets,
            campaigns: components.campaigns,
            dashboard: components.dashboard,
            cycle_time: cfg.cycle_time(),
            pause_interval: cfg.pause_interval(),
            control,
            state,
            state_file: None,
        }
    }

    /// Continue from previously saved state. A saved pause is restored;
    /// a control handle that is already paused stays paused.
    ///
    /// Counters carry over; `start_time` is reset so uptime counts from
    /// this process start.
    pub fn with_state(mut self, mut state: ArielState) -> Self {
        if state.paused {
            self.control.set_paused(true);
        }
        state.paused = self.control.is_paused();
        state.status = AgentStatus::Starting;
        state.start_time = Utc::now();
        self.state = state;
        self
    }

    pub fn with_state_file(mut self, path: impl Into<String>) -> Self {
        self.state_file = Some(path.into());
        self
    }

    // -- Admin controls --------------------------------------------------

    pub fn pause(&self) {
        self.control.pause();
    }

    pub fn resume(&self) {
        self.control.resume();
    }

    pub fn is_paused(&self) -> bool {
        self.control.is_paused()
    }

    /// A handle other tasks can use to pause/resume this orchestrator.
    pub fn control(&self) -> PauseControl {
        self.control.clone()
    }

    pub fn state(&self) -> &ArielState {
        &self.state
    }

    pub fn cycle_time(&self) -> Duration {
        self.cycle_time
    }

    pub fn pause_interval(&self) -> Duration {
        self.pause_interval
    }

    // -- Lifecycle -------------------------------------------------------

    pub async fn bootstrap(&mut self) -> Result<()> {
        info!("Ariel: Bootstrapping digital assets...");
        self.assets.ensure_minimum_assets().await?;
        info!("Ariel: Asset bootstrap complete.");
        Ok(())
    }

    /// Run one cycle.
    ///
    /// When paused, no step runs: the pause interval is slept and
    /// `Skipped` returned. Otherwise the five steps run in order; the
    /// first failing step aborts the cycle with `ArielError::Step` and
    /// the remaining steps are not run. Either way the updated counters
    /// are pushed to the status sink afterwards.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome> {
        let outcome = self.advance().await;
        self.publish_state().await;
        outcome
    }

    async fn advance(&mut self) -> Result<CycleOutcome> {
        if self.control.is_paused() {
            info!("Ariel: Paused. Skipping cycle.");
            self.state.paused = true;
            self.state.status = AgentStatus::Paused;
            self.state.cycles_skipped += 1;
            tokio::time::sleep(self.pause_interval).await;
            return Ok(CycleOutcome::Skipped);
        }

        self.state.paused = false;
        self.state.status = AgentStatus::Running;

        match self.execute_steps().await {
            Ok(report) => {
                self.state.cycle_count = report.cycle_number;
                self.state.last_cycle_at = Some(report.finished_at);
                Ok(CycleOutcome::Completed(report))
            }
            Err(e) => {
                self.state.cycles_failed += 1;
                Err(e.into())
            }
        }
    }

    async fn execute_steps(&self) -> std::result::Result<CycleReport, ArielError> {
        let started_at = Utc::now();
        let cycle_number = self.state.cycle_count + 1;
        info!(cycle = cycle_number, "Ariel: Revenue cycle start.");

        // 1. Discover opportunities
        let opportunities = self
            .quantum
            .find_opportunities()
            .await
            .map_err(|e| ArielError::step(CycleStep::FindOpportunities, e))?;
        debug!(count = opportunities.len(), "Opportunities found");

        // 2. Analyze market trends
        let market_trends = self
            .neural
            .analyze_trends()
            .await
            .map_err(|e| ArielError::step(CycleStep::AnalyzeTrends, e))?;
        debug!(count = market_trends.len(), "Trends analyzed");

        // 3. Prepare assets
        self.assets
            .acquire_assets_for_opportunities(&opportunities, &market_trends)
            .await
            .map_err(|e| ArielError::step(CycleStep::AcquireAssets, e))?;

        // 4. Launch / optimize campaigns
        self.campaigns
            .launch_or_optimize(&opportunities, &market_trends)
            .await
            .map_err(|e| ArielError::step(CycleStep::RunCampaigns, e))?;

        // 5. Report
        let finished_at = Utc::now();
        let mut view = self.state.clone();
        view.cycle_count = cycle_number;
        view.last_cycle_at = Some(finished_at);

        let snapshot = StatusSnapshot {
            opportunities,
            market_trends,
            cycle_time_secs: self.cycle_time.as_secs(),
            cycle_number,
            timestamp: finished_at,
            state: view,
        };
        self.dashboard
            .sync_status(&snapshot)
            .await
            .map_err(|e| ArielError::step(CycleStep::SyncDashboard, e))?;

        info!(cycle = cycle_number, "Ariel: Revenue cycle complete.");

        Ok(CycleReport {
            cycle_number,
            opportunities_found: snapshot.opportunities.len(),
            trends_analyzed: snapshot.market_trends.len(),
            started_at,
            finished_at,
        })
    }

    /// Bootstrap, then cycle and sleep forever.
    ///
    /// Only returns if bootstrap fails.
    pub async fn run_forever(&mut self) -> Result<()> {
        self.run_until(futures::future::pending::<()>()).await
    }

    /// Same loop as [`run_forever`](Self::run_forever), but returns once
    /// `shutdown` resolves. A cycle in progress always finishes; only the
    /// inter-cycle sleep is cut short.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        self.bootstrap().await?;

        info!(
            cycle_time_secs = self.cycle_time.as_secs(),
            pause_interval_secs = self.pause_interval.as_secs(),
            "Entering main loop"
        );

        loop {
            match self.run_cycle().await {
                Ok(CycleOutcome::Completed(report)) => {
                    info!(
                        cycle = report.cycle_number,
                        opportunities = report.opportunities_found,
                        trends = report.trends_analyzed,
                        took_ms = report.duration().num_milliseconds(),
                        "Cycle complete"
                    );
                }
                Ok(CycleOutcome::Skipped) => {
                    debug!(skipped = self.state.cycles_skipped, "Cycle skipped");
                }
                Err(e) => {
                    error!(error = %e, "Cycle failed, continuing to next");
                }
            }

            self.persist();

            tokio::select! {
                _ = tokio::time::sleep(self.cycle_time) => {}
                _ = self.control.cycle_requested() => {
                    info!("Cycle requested, skipping the rest of the sleep.");
                }
                _ = &mut shutdown => {
                    info!("Shutdown signal received.");
                    break;
                }
            }
        }

        self.state.status = AgentStatus::Stopped;
        self.persist();
        self.publish_state().await;
        info!(state = %self.state, "Ariel shut down cleanly.");
        Ok(())
    }

    /// Push the counters to the status sink. A failure is logged only.
    async fn publish_state(&self) {
        if let Err(e) = self.dashboard.record_state(&self.state).await {
            warn!(error = %e, "Failed to push state to dashboard");
        }
    }

    /// Save state if a state file is configured. Failures are logged,
    /// never fatal to the loop.
    ///
    /// The pause flag is re-read first: an admin may have paused or
    /// resumed since the last cycle.
    fn persist(&mut self) {
        self.state.paused = self.control.is_paused();
        if let Some(path) = &self.state_file {
            if let Err(e) = storage::save_state(&self.state, Some(path)) {
                warn!(error = %e, path = %path, "Failed to save state");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{
        MockAssetProvisioner, MockCampaignRunner, MockOpportunitySource, MockStatusSink,
        MockTrendAnalyzer,
    };
    use crate::types::{MarketTrend, Opportunity, OpportunityKind, TrendSentiment};
    use mockall::Sequence;
    use tokio::time::Instant;

    struct Mocks {
        quantum: MockOpportunitySource,
        neural: MockTrendAnalyzer,
        assets: MockAssetProvisioner,
        campaigns: MockCampaignRunner,
        dashboard: MockStatusSink,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                quantum: MockOpportunitySource::new(),
                neural: MockTrendAnalyzer::new(),
                assets: MockAssetProvisioner::new(),
                campaigns: MockCampaignRunner::new(),
                dashboard: MockStatusSink::new(),
            }
        }

        fn into_ariel(self) -> Ariel {
            let components = Components {
                quantum: Box::new(self.quantum),
                neural: Box::new(self.neural),
                assets: Box::new(self.assets),
                campaigns: Box::new(self.campaigns),
                dashboard: Box::new(self.dashboard),
            };
            Ariel::new(&AgentConfig::default(), components, PauseControl::new())
        }
    }

    fn sample_trend() -> MarketTrend {
        MarketTrend {
            region: "Europe".into(),
            growth_pct: 4.2,
            sentiment: TrendSentiment::Stable,
            observed_at: Utc::now(),
            payload: serde_json::Value::Null,
        }
    }

    /// Mocks that succeed once per step, returning empty data.
    fn happy_mocks() -> Mocks {
        let mut m = Mocks::new();
        m.quantum.expect_find_opportunities().returning(|| Ok(Vec::new()));
        m.neural.expect_analyze_trends().returning(|| Ok(Vec::new()));
        m.assets.expect_ensure_minimum_assets().returning(|| Ok(()));
        m.assets
            .expect_acquire_assets_for_opportunities()
            .returning(|_, _| Ok(()));
        m.campaigns.expect_launch_or_optimize().returning(|_, _| Ok(()));
        m.dashboard.expect_sync_status().returning(|_| Ok(()));
        m.dashboard.expect_record_state().returning(|_| Ok(()));
        m
    }

    fn temp_state_path() -> String {
        let mut p = std::env::temp_dir();
        p.push(format!("ariel_orchestrator_state_{}.json", uuid::Uuid::new_v4()));
        p.to_string_lossy().to_string()
    }

    #[tokio::test]
    async fn test_bootstrap_ensures_minimum_assets_once() {
        let mut m = Mocks::new();
        m.assets.expect_ensure_minimum_assets().times(1).returning(|| Ok(()));
        let mut ariel = m.into_ariel();
        assert!(ariel.bootstrap().await.is_ok());
    }

    #[tokio::test]
    async fn test_bootstrap_failure_propagates() {
        let mut m = Mocks::new();
        m.assets
            .expect_ensure_minimum_assets()
            .returning(|| Err(anyhow::anyhow!("registrar unavailable")));
        let mut ariel = m.into_ariel();
        let err = ariel.bootstrap().await.unwrap_err();
        assert!(err.to_string().contains("registrar unavailable"));
    }

    #[tokio::test]
    async fn test_cycle_runs_steps_in_order() {
        let mut m = Mocks::new();
        let mut seq = Sequence::new();
        m.quantum
            .expect_find_opportunities()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(Vec::new()));
        m.neural
            .expect_analyze_trends()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(Vec::new()));
        m.assets
            .expect_acquire_assets_for_opportunities()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        m.campaigns
            .expect_launch_or_optimize()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        m.dashboard
            .expect_sync_status()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        m.dashboard
            .expect_record_state()
            .withf(|state| state.cycle_count == 1)
            .times(1)
            .returning(|_| Ok(()));

        let mut ariel = m.into_ariel();
        let outcome = ariel.run_cycle().await.unwrap();

        match outcome {
            CycleOutcome::Completed(report) => {
                assert_eq!(report.cycle_number, 1);
                assert_eq!(report.opportunities_found, 0);
                assert_eq!(report.trends_analyzed, 0);
            }
            CycleOutcome::Skipped => panic!("cycle should not be skipped"),
        }
        assert_eq!(ariel.state().cycle_count, 1);
        assert_eq!(ariel.state().status, AgentStatus::Running);
        assert!(ariel.state().last_cycle_at.is_some());
    }

    #[tokio::test]
    async fn test_results_flow_to_assets_campaigns_and_dashboard() {
        let mut m = Mocks::new();
        m.quantum.expect_find_opportunities().returning(|| {
            Ok(vec![Opportunity::new(OpportunityKind::Affiliate, "Hosting offer", "mock")])
        });
        m.neural
            .expect_analyze_trends()
            .returning(|| Ok(vec![sample_trend()]));
        m.assets
            .expect_acquire_assets_for_opportunities()
            .withf(|opps, trends| opps.len() == 1 && trends.len() == 1)
            .times(1)
            .returning(|_, _| Ok(()));
        m.campaigns
            .expect_launch_or_optimize()
            .withf(|opps, trends| {
                opps[0].kind == OpportunityKind::Affiliate && trends[0].region == "Europe"
            })
            .times(1)
            .returning(|_, _| Ok(()));
        m.dashboard
            .expect_sync_status()
            .withf(|snap| {
                snap.opportunities.len() == 1
                    && snap.market_trends.len() == 1
                    && snap.cycle_time_secs == 1800
                    && snap.cycle_number == 1
                    && snap.state.cycle_count == 1
            })
            .times(1)
            .returning(|_| Ok(()));
        m.dashboard.expect_record_state().returning(|_| Ok(()));

        let mut ariel = m.into_ariel();
        let outcome = ariel.run_cycle().await.unwrap();
        if let CycleOutcome::Completed(report) = outcome {
            assert_eq!(report.opportunities_found, 1);
            assert_eq!(report.trends_analyzed, 1);
        } else {
            panic!("expected a completed cycle");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_paused_cycle_skips_work_and_sleeps() {
        // Only the state push is expected: any step call panics.
        let mut m = Mocks::new();
        m.dashboard
            .expect_record_state()
            .withf(|state| state.cycles_skipped == 1 && state.paused)
            .times(1)
            .returning(|_| Ok(()));
        let mut ariel = m.into_ariel();
        ariel.pause();

        let start = Instant::now();
        let outcome = ariel.run_cycle().await.unwrap();

        assert!(outcome.is_skipped());
        assert!(start.elapsed() >= Duration::from_secs(60));
        assert!(start.elapsed() < Duration::from_secs(61));
        assert_eq!(ariel.state().cycles_skipped, 1);
        assert_eq!(ariel.state().cycle_count, 0);
        assert_eq!(ariel.state().status, AgentStatus::Paused);
        assert!(ariel.state().paused);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_runs_full_cycle() {
        let mut ariel = happy_mocks().into_ariel();
        ariel.pause();
        assert!(ariel.run_cycle().await.unwrap().is_skipped());

        ariel.resume();
        let outcome = ariel.run_cycle().await.unwrap();
        assert!(!outcome.is_skipped());
        assert_eq!(ariel.state().cycle_count, 1);
        assert_eq!(ariel.state().cycles_skipped, 1);
        assert!(!ariel.state().paused);
    }

    #[tokio::test]
    async fn test_failing_step_aborts_cycle() {
        let mut m = Mocks::new();
        m.quantum.expect_find_opportunities().returning(|| Ok(Vec::new()));
        m.neural
            .expect_analyze_trends()
            .returning(|| Err(anyhow::anyhow!("model offline")));
        // Later steps must not run.
        m.assets.expect_acquire_assets_for_opportunities().never();
        m.campaigns.expect_launch_or_optimize().never();
        m.dashboard.expect_sync_status().never();
        m.dashboard
            .expect_record_state()
            .withf(|state| state.cycles_failed == 1 && state.cycle_count == 0)
            .times(1)
            .returning(|_| Ok(()));

        let mut ariel = m.into_ariel();
        let err = ariel.run_cycle().await.unwrap_err();

        let step_err = err.downcast_ref::<ArielError>().expect("ArielError");
        match step_err {
            ArielError::Step { step, message } => {
                assert_eq!(*step, CycleStep::AnalyzeTrends);
                assert!(message.contains("model offline"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(ariel.state().cycles_failed, 1);
        assert_eq!(ariel.state().cycle_count, 0);
    }

    #[tokio::test]
    async fn test_dashboard_failure_counts_as_failed_cycle() {
        let mut m = happy_mocks();
        m.dashboard = MockStatusSink::new();
        m.dashboard
            .expect_sync_status()
            .returning(|_| Err(anyhow::anyhow!("dashboard gone")));
        m.dashboard.expect_record_state().returning(|_| Ok(()));

        let mut ariel = m.into_ariel();
        assert!(ariel.run_cycle().await.is_err());
        assert_eq!(ariel.state().cycles_failed, 1);
        assert!(ariel.state().last_cycle_at.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_until_spaces_cycles_by_cycle_time() {
        let mut m = Mocks::new();
        m.assets.expect_ensure_minimum_assets().times(1).returning(|| Ok(()));
        m.quantum
            .expect_find_opportunities()
            .times(3)
            .returning(|| Ok(Vec::new()));
        m.neural.expect_analyze_trends().times(3).returning(|| Ok(Vec::new()));
        m.assets
            .expect_acquire_assets_for_opportunities()
            .times(3)
            .returning(|_, _| Ok(()));
        m.campaigns
            .expect_launch_or_optimize()
            .times(3)
            .returning(|_, _| Ok(()));
        m.dashboard.expect_sync_status().times(3).returning(|_| Ok(()));
        // Once per cycle plus once on shutdown.
        m.dashboard.expect_record_state().times(4).returning(|_| Ok(()));

        let mut ariel = m.into_ariel();
        // Cycles at t=0, 1800, 3600; stop during the following sleep.
        let shutdown = tokio::time::sleep(Duration::from_secs(3601));
        ariel.run_until(shutdown).await.unwrap();

        assert_eq!(ariel.state().cycle_count, 3);
        assert_eq!(ariel.state().status, AgentStatus::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_until_survives_failing_cycles() {
        let mut m = happy_mocks();
        m.quantum = MockOpportunitySource::new();
        m.quantum
            .expect_find_opportunities()
            .times(2)
            .returning(|| Err(anyhow::anyhow!("feed timeout")));

        let mut ariel = m.into_ariel();
        ariel
            .run_until(tokio::time::sleep(Duration::from_secs(1801)))
            .await
            .unwrap();

        assert_eq!(ariel.state().cycles_failed, 2);
        assert_eq!(ariel.state().cycle_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_state_push_failure_is_not_a_cycle_failure() {
        let mut m = happy_mocks();
        m.dashboard = MockStatusSink::new();
        m.dashboard.expect_sync_status().returning(|_| Ok(()));
        m.dashboard
            .expect_record_state()
            .returning(|_| Err(anyhow::anyhow!("dashboard gone")));

        let mut ariel = m.into_ariel();
        assert!(ariel.run_cycle().await.is_ok());
        assert_eq!(ariel.state().cycles_failed, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_between_cycles_is_saved_on_shutdown() {
        let path = temp_state_path();
        let mut ariel = happy_mocks().into_ariel().with_state_file(path.clone());
        let control = ariel.control();

        // The first cycle runs unpaused; the admin pauses during the sleep.
        let shutdown = async move {
            tokio::time::sleep(Duration::from_secs(10)).await;
            control.pause();
        };
        ariel.run_until(shutdown).await.unwrap();

        assert_eq!(ariel.state().cycle_count, 1);
        assert!(ariel.state().paused);
        let saved = storage::load_state(Some(&path)).unwrap().unwrap();
        assert!(saved.paused);
        assert_eq!(saved.status, AgentStatus::Stopped);

        storage::delete_state(Some(&path)).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycle_request_cuts_sleep_short() {
        let mut ariel = happy_mocks().into_ariel();
        let control = ariel.control();

        // Cycle at t=0, requested cycle at t=100, stop at t=200.
        let shutdown = async move {
            tokio::time::sleep(Duration::from_secs(100)).await;
            control.request_cycle();
            tokio::time::sleep(Duration::from_secs(100)).await;
        };
        let start = Instant::now();
        ariel.run_until(shutdown).await.unwrap();

        assert_eq!(ariel.state().cycle_count, 2);
        assert!(start.elapsed() < Duration::from_secs(1800));
    }

    #[tokio::test]
    async fn test_run_until_bootstrap_failure_is_fatal() {
        let mut m = Mocks::new();
        m.assets
            .expect_ensure_minimum_assets()
            .returning(|| Err(anyhow::anyhow!("no credentials")));
        m.quantum.expect_find_opportunities().never();

        let mut ariel = m.into_ariel();
        assert!(ariel.run_until(futures::future::ready(())).await.is_err());
    }

    #[test]
    fn test_start_paused_config() {
        let cfg = AgentConfig {
            start_paused: true,
            ..AgentConfig::default()
        };
        let control = PauseControl::new();
        let components = Components::with_dashboard(Box::new(MockStatusSink::new()));
        let ariel = Ariel::new(&cfg, components, control.clone());
        assert!(ariel.is_paused());
        assert!(control.is_paused());
        assert!(ariel.state().paused);
    }

    #[test]
    fn test_with_state_restores_pause_flag() {
        let mut saved = ArielState::new();
        saved.cycle_count = 9;
        saved.paused = true;
        saved.status = AgentStatus::Stopped;

        let ariel = Mocks::new().into_ariel().with_state(saved);
        assert!(ariel.is_paused());
        assert_eq!(ariel.state().cycle_count, 9);
        assert_eq!(ariel.state().status, AgentStatus::Starting);
    }

    #[test]
    fn test_with_state_restarts_uptime() {
        let mut saved = ArielState::new();
        saved.cycle_count = 3;
        saved.start_time = Utc::now() - chrono::Duration::days(2);

        let ariel = Mocks::new().into_ariel().with_state(saved);
        assert_eq!(ariel.state().cycle_count, 3);
        assert!(ariel.state().uptime() < chrono::Duration::minutes(1));
    }

    #[test]
    fn test_control_handle_pauses_orchestrator() {
        let ariel = Mocks::new().into_ariel();
        let handle = ariel.control();
        handle.pause();
        assert!(ariel.is_paused());
        handle.resume();
        assert!(!ariel.is_paused());
    }
}
