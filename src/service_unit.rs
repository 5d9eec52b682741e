//! Service lifecycle unit — the systemd unit that owns application
//! start/stop for the host's entire uptime, independent of the bootstrap
//! executor's own lifetime.
//!
//! The main start step is a "launch and return" command (`docker-compose up
//! -d`), so the unit must stay Active after it exits: RemainAfterExit=yes.
//! Treating the unit as failed the moment the launcher exits is the classic
//! reimplementation bug.

use crate::step::{ON_STOP_SCRIPT_PATH, REGISTRY_SCRIPT_PATH};
use serde::{Deserialize, Serialize};

/// Generated unit definition. Created once at generation time, persists on
/// the host indefinitely, mutated only by the host's init system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceUnitSpec {
    pub description: String,
    /// Start preconditions. network-online.target and network.target are
    /// required so ExecStop still has connectivity to tear containers down
    /// during host shutdown.
    pub requires: Vec<String>,
    pub after: Vec<String>,
    pub service_type: String,
    /// The main command launches detached and returns; the unit is Active
    /// once it exits successfully.
    pub remain_after_exit: bool,
    pub working_dir: String,
    /// Pre-start hook: registry login + pulls + teardown.
    pub exec_start_pre: String,
    pub exec_start: String,
    /// Stop commands, in order. The second entry is the shutdown hook that
    /// protects against data loss on host termination.
    pub exec_stop: Vec<String>,
    pub timeout_start_secs: u64,
    /// The platform may only grant ~2 minutes before force-killing the unit;
    /// the generous bound is a known, accepted mismatch.
    pub timeout_stop_secs: u64,
    pub wanted_by: String,
}

impl Default for ServiceUnitSpec {
    fn default() -> Self {
        Self {
            description: "Docker Compose Application Service".to_string(),
            requires: vec![
                "docker.service".to_string(),
                "network-online.target".to_string(),
                "network.target".to_string(),
            ],
            after: vec!["docker.service".to_string()],
            service_type: "oneshot".to_string(),
            remain_after_exit: true,
            working_dir: "/home/ec2-user".to_string(),
            exec_start_pre: REGISTRY_SCRIPT_PATH.to_string(),
            exec_start: "/usr/bin/docker-compose up -d --no-build".to_string(),
            exec_stop: vec![
                "/usr/bin/docker-compose down".to_string(),
                ON_STOP_SCRIPT_PATH.to_string(),
            ],
            timeout_start_secs: 0,
            timeout_stop_secs: 300,
            wanted_by: "multi-user.target".to_string(),
        }
    }
}

impl ServiceUnitSpec {
    /// Render the unit file text. Static given the spec; no per-render state.
    pub fn render(&self) -> String {
        let mut unit = String::new();

        unit.push_str("[Unit]\n");
        unit.push_str(&format!("Description={}\n", self.description));
        unit.push_str(&format!("Requires={}\n", self.requires.join(", ")));
        unit.push_str(&format!("After={}\n", self.after.join(", ")));

        unit.push_str("\n[Service]\n");
        unit.push_str(&format!("Type={}\n", self.service_type));
        unit.push_str(&format!(
            "RemainAfterExit={}\n",
            if self.remain_after_exit { "yes" } else { "no" }
        ));
        unit.push_str(&format!("WorkingDirectory={}\n", self.working_dir));
        unit.push_str(&format!("ExecStartPre={}\n", self.exec_start_pre));
        unit.push_str(&format!("ExecStart={}\n", self.exec_start));
        for stop in &self.exec_stop {
            unit.push_str(&format!("ExecStop={}\n", stop));
        }
        unit.push_str(&format!("TimeoutStartSec={}\n", self.timeout_start_secs));
        unit.push_str(&format!("TimeoutStopSec={}\n", self.timeout_stop_secs));

        unit.push_str("\n[Install]\n");
        unit.push_str(&format!("WantedBy={}\n", self.wanted_by));

        unit
    }
}

/// Unit lifecycle state as driven by the host's init system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    Inactive,
    Starting,
    Active,
    Stopping,
    Failed,
}

/// Init-system events driving [`UnitState`] transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitEvent {
    /// Boot (or the explicit first-boot start) requested a start.
    Start,
    /// Pre-start hook and main command exited zero.
    StartSucceeded,
    /// Pre-start hook or main command exited non-zero.
    StartFailed,
    /// Shutdown (or explicit stop) requested a stop.
    Stop,
    /// All stop commands exited zero.
    StopSucceeded,
    /// A stop command exited non-zero or was force-killed.
    StopFailed,
}

impl UnitState {
    /// Advance the state machine. Events that are invalid in the current
    /// state leave it unchanged.
    pub fn next(self, event: UnitEvent) -> UnitState {
        match (self, event) {
            (UnitState::Inactive, UnitEvent::Start) => UnitState::Starting,
            (UnitState::Starting, UnitEvent::StartSucceeded) => UnitState::Active,
            (UnitState::Starting, UnitEvent::StartFailed) => UnitState::Failed,
            (UnitState::Active, UnitEvent::Stop) => UnitState::Stopping,
            (UnitState::Stopping, UnitEvent::StopSucceeded) => UnitState::Inactive,
            (UnitState::Stopping, UnitEvent::StopFailed) => UnitState::Failed,
            (state, _) => state,
        }
    }
}
