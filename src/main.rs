//! ARIEL: Autonomous revenue orchestrator
//!
//! Entry point. Loads configuration, initialises structured logging,
//! restores state from disk (or creates fresh), starts the admin
//! dashboard and runs the revenue cycle loop until Ctrl+C.

use anyhow::Result;
use tracing::{error, info};

use ariel::components::Components;
use ariel::config;
use ariel::dashboard::{self, AdminDashboard};
use ariel::engine::{self, Ariel, PauseControl};
use ariel::storage;
use ariel::types::{AgentStatus, ArielState};

const BANNER: &str = r#"
    _    ____  ___ _____ _
   / \  |  _ \|_ _| ____| |
  / _ \ | |_) || ||  _| | |
 / ___ \|  _ < | || |___| |___
/_/   \_\_| \_\___|_____|_____|

  Autonomous revenue orchestrator
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    let config_path = std::env::var("ARIEL_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let cfg = config::AppConfig::load_or_default(&config_path)?;

    println!("{BANNER}");
    info!(
        agent_name = %cfg.agent.name,
        cycle_time_secs = cfg.agent.cycle_time_secs,
        pause_interval_secs = cfg.agent.pause_interval_secs,
        dashboard_port = cfg.dashboard.port,
        "ARIEL starting up"
    );

    // -- Restore or create state -----------------------------------------

    let saved = storage::load_state(Some(&cfg.agent.state_file))?;
    let mut initial_state = saved.clone().unwrap_or_else(ArielState::new);
    initial_state.status = AgentStatus::Starting;

    // -- Initialise components -------------------------------------------

    let control = PauseControl::new();
    let admin = AdminDashboard::new(control.clone(), initial_state, cfg.agent.cycle_time_secs);

    if cfg.dashboard.enabled {
        dashboard::spawn_dashboard(admin.state(), cfg.dashboard.port).await?;
    }

    let components = Components::with_dashboard(Box::new(admin));
    let mut ariel = Ariel::new(&cfg.agent, components, control)
        .with_state_file(cfg.agent.state_file.clone());
    if let Some(state) = saved {
        info!(state = %state, "Resumed from saved state");
        ariel = ariel.with_state(state);
    }

    // -- Main loop -------------------------------------------------------

    // Register the signal handler up front so Ctrl+C during the first
    // cycle is not lost. On failure the sender is dropped, which
    // `shutdown_signal` treats as "never".
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = tx.send(());
            }
            Err(e) => error!(error = %e, "Failed to listen for Ctrl+C"),
        }
    });

    info!("Entering main loop. Press Ctrl+C to stop.");
    ariel.run_until(engine::shutdown_signal(rx)).await
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ariel=info"));

    let json_logging = std::env::var("ARIEL_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
