//! Bootstrap executor — the first-boot-only interpreter for config sets.
//!
//! Walks the ordered step list, applying each step and halting on the first
//! hard failure. Strictly single-threaded, sequential, blocking per step; the
//! whole run is bounded by one wall-clock timeout. Keeping the application
//! running afterwards is the service unit's job, not this executor's.

use crate::config::BootstrapConfig;
use crate::error::BootstrapError;
use crate::outcome::{BootstrapOutcome, TIMEOUT_EXIT_CODE};
use crate::progress::ProgressReporter;
use crate::step::{ConfigSet, ConfigSetGroup, Step};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Default wall-clock bound for a whole bootstrap run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(240);

struct StepFailure {
    exit_code: i32,
    detail: String,
}

pub struct BootstrapExecutor {
    /// Host filesystem root. Fixed absolute artifact paths are rebased under
    /// it, so tests can run against a scratch directory.
    root: PathBuf,
    timeout: Duration,
}

impl BootstrapExecutor {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn from_config(root: impl Into<PathBuf>, config: &BootstrapConfig) -> Self {
        Self::new(root).with_timeout(Duration::from_secs(config.timeout_secs))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Execute the named group: its config sets in declared order, their
    /// steps strictly in order, all under one timeout.
    ///
    /// Err is reserved for an unknown group name (a caller contract
    /// violation); every runtime failure is a `Failure` outcome.
    pub async fn run_group(
        &self,
        group: &ConfigSetGroup,
        name: &str,
        progress: Arc<dyn ProgressReporter>,
    ) -> Result<BootstrapOutcome, BootstrapError> {
        let sets = group.resolve(name)?;
        let steps: Vec<&Step> = sets.iter().flat_map(|set| set.steps.iter()).collect();

        tracing::info!(
            "[BootstrapExecutor] Running group '{}' ({} sets, {} steps)",
            name,
            sets.len(),
            steps.len()
        );

        Ok(self.run_bounded(name, &steps, progress.as_ref()).await)
    }

    /// Execute a single config set under the timeout.
    pub async fn run_set(
        &self,
        set: &ConfigSet,
        progress: Arc<dyn ProgressReporter>,
    ) -> BootstrapOutcome {
        let steps: Vec<&Step> = set.steps.iter().collect();
        self.run_bounded(&set.name, &steps, progress.as_ref()).await
    }

    async fn run_bounded(
        &self,
        label: &str,
        steps: &[&Step],
        progress: &dyn ProgressReporter,
    ) -> BootstrapOutcome {
        match tokio::time::timeout(self.timeout, self.run_steps(label, steps, progress)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::error!(
                    "[BootstrapExecutor] '{}' exceeded the {}s bound, aborting",
                    label,
                    self.timeout.as_secs()
                );
                BootstrapOutcome::Failure(TIMEOUT_EXIT_CODE)
            }
        }
    }

    async fn run_steps(
        &self,
        label: &str,
        steps: &[&Step],
        progress: &dyn ProgressReporter,
    ) -> BootstrapOutcome {
        let total = steps.len().max(1) as u32;

        for (index, step) in steps.iter().enumerate() {
            let display_name = step.display_name();
            progress.emit_detailed(
                index as u32 * 100 / total,
                format!("Executing {}", display_name),
                Some(label.to_string()),
                Some(display_name.clone()),
            );

            let step_start = Instant::now();
            match self.apply_step(step).await {
                Ok(()) => {
                    tracing::info!(
                        "[BootstrapExecutor] Step '{}' completed in {}ms",
                        display_name,
                        step_start.elapsed().as_millis()
                    );
                }
                Err(failure) => {
                    tracing::error!(
                        "[BootstrapExecutor] Step '{}' failed (exit {}): {}",
                        display_name,
                        failure.exit_code,
                        failure.detail
                    );
                    return BootstrapOutcome::Failure(failure.exit_code);
                }
            }
        }

        progress.emit(100, format!("'{}' complete", label));
        BootstrapOutcome::Success
    }

    async fn apply_step(&self, step: &Step) -> Result<(), StepFailure> {
        match step {
            Step::MaterializeFile { path, contents } => {
                let target = self.rebase(path);
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent).map_err(|e| StepFailure {
                        exit_code: 1,
                        detail: format!("mkdir {}: {}", parent.display(), e),
                    })?;
                }
                // Unconditional overwrite: idempotent by design.
                std::fs::write(&target, contents).map_err(|e| StepFailure {
                    exit_code: 1,
                    detail: format!("write {}: {}", target.display(), e),
                })
            }
            Step::RunCommand { shell_line } => {
                let output = Command::new("sh")
                    .arg("-c")
                    .arg(shell_line)
                    .current_dir(&self.root)
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped())
                    .kill_on_drop(true)
                    .output()
                    .await
                    .map_err(|e| StepFailure {
                        exit_code: 1,
                        detail: format!("spawn failed: {}", e),
                    })?;

                if output.status.success() {
                    return Ok(());
                }

                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(StepFailure {
                    exit_code: output.status.code().unwrap_or(-1),
                    detail: stderr.lines().last().unwrap_or("no output").to_string(),
                })
            }
        }
    }

    /// Map a fixed absolute host path under the executor's root.
    fn rebase(&self, path: &str) -> PathBuf {
        let relative = Path::new(path).strip_prefix("/").unwrap_or(Path::new(path));
        self.root.join(relative)
    }
}
