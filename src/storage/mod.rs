//! Persistence layer.
//!
//! Saves and loads orchestrator state to/from a JSON file. The file is
//! written after every cycle and on shutdown. Failures surface as
//! `ArielError::Storage` inside the returned `anyhow::Error`.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::types::{ArielError, ArielState};

/// Default state file path.
const DEFAULT_STATE_FILE: &str = "ariel_state.json";

/// Save orchestrator state to a JSON file.
///
/// Writes to a sibling temp file first and renames it over the target,
/// so a crash mid-write never leaves a truncated state file.
pub fn save_state(state: &ArielState, path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_STATE_FILE);
    let json = serde_json::to_string_pretty(state)
        .context("Failed to serialise orchestrator state")?;

    let tmp = format!("{path}.tmp");
    std::fs::write(&tmp, &json)
        .map_err(|e| ArielError::Storage(format!("Failed to write state to {tmp}: {e}")))?;
    std::fs::rename(&tmp, path)
        .map_err(|e| ArielError::Storage(format!("Failed to move state into {path}: {e}")))?;

    debug!(path, cycles = state.cycle_count, "State saved");
    Ok(())
}

/// Load orchestrator state from a JSON file.
/// Returns None if the file doesn't exist (fresh start).
pub fn load_state(path: Option<&str>) -> Result<Option<ArielState>> {
    let path = path.unwrap_or(DEFAULT_STATE_FILE);

    if !Path::new(path).exists() {
        info!(path, "No saved state found, starting fresh");
        return Ok(None);
    }

    let json = std::fs::read_to_string(path)
        .map_err(|e| ArielError::Storage(format!("Failed to read state from {path}: {e}")))?;

    let state: ArielState = serde_json::from_str(&json)
        .map_err(|e| ArielError::Storage(format!("Failed to parse state from {path}: {e}")))?;

    info!(
        path,
        cycle_count = state.cycle_count,
        skipped = state.cycles_skipped,
        failed = state.cycles_failed,
        paused = state.paused,
        "State loaded from disk"
    );

    Ok(Some(state))
}

/// Delete the state file (for testing or reset).
pub fn delete_state(path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_STATE_FILE);
    if Path::new(path).exists() {
        std::fs::remove_file(path)
            .map_err(|e| ArielError::Storage(format!("Failed to delete state file {path}: {e}")))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
