//! Completion signal emitter — the two-call handshake reporting bootstrap
//! outcome to the external provisioning system.
//!
//! Fire-once, block-until-acked: the provisioning system suspends its own
//! higher-level operation until the signal arrives or its timeout elapses.
//! There is no retry on send failure — an un-acknowledged attempt must never
//! be reported as successful by omission.

use crate::error::BootstrapError;
use crate::outcome::BootstrapOutcome;
use std::process::Stdio;
use tokio::process::Command;

/// Placeholder replaced by the reported exit status in the signal command.
const CODE_PLACEHOLDER: &str = "{code}";

/// Build the init-phase invocation for an identifying triple.
pub fn init_command_line(
    cfn_bin_dir: &str,
    stack_name: &str,
    resource_id: &str,
    region: &str,
) -> String {
    format!(
        "{}/cfn-init -v --stack {} --resource {} --region {}",
        cfn_bin_dir, stack_name, resource_id, region
    )
}

/// Build the status-report invocation for the same triple. `{code}` is
/// substituted at emit time.
pub fn signal_command_line(
    cfn_bin_dir: &str,
    stack_name: &str,
    resource_id: &str,
    region: &str,
) -> String {
    format!(
        "{}/cfn-signal -e {} --stack {} --resource {} --region {}",
        cfn_bin_dir, CODE_PLACEHOLDER, stack_name, resource_id, region
    )
}

/// One-shot emitter for a single provisioning attempt.
pub struct CompletionSignal {
    stack_name: String,
    resource_id: String,
    region: String,
    init_command: String,
    signal_command: String,
    fired: bool,
}

impl CompletionSignal {
    pub fn new(
        stack_name: impl Into<String>,
        resource_id: impl Into<String>,
        region: impl Into<String>,
        cfn_bin_dir: &str,
    ) -> Self {
        let stack_name = stack_name.into();
        let resource_id = resource_id.into();
        let region = region.into();
        let init_command = init_command_line(cfn_bin_dir, &stack_name, &resource_id, &region);
        let signal_command = signal_command_line(cfn_bin_dir, &stack_name, &resource_id, &region);
        Self {
            stack_name,
            resource_id,
            region,
            init_command,
            signal_command,
            fired: false,
        }
    }

    /// Override both transport commands. The signal command may carry
    /// `{code}` where the reported status belongs. Used by tests and by
    /// provisioning systems with a different signaling agent.
    pub fn with_commands(mut self, init_command: String, signal_command: String) -> Self {
        self.init_command = init_command;
        self.signal_command = signal_command;
        self
    }

    pub fn identifiers(&self) -> (&str, &str, &str) {
        (&self.stack_name, &self.resource_id, &self.region)
    }

    /// Run the handshake: init call, then the status report.
    ///
    /// The reported code is the outcome's exit code when bootstrap failed;
    /// on bootstrap success it is the init invocation's own exit status, so
    /// a failed metadata application is never masked. Either call failing to
    /// send is fatal. A second emit on the same emitter is a contract error.
    pub async fn emit(&mut self, outcome: BootstrapOutcome) -> Result<(), BootstrapError> {
        if self.fired {
            return Err(BootstrapError::Signal(format!(
                "Completion signal for resource '{}' already emitted",
                self.resource_id
            )));
        }
        self.fired = true;

        tracing::info!(
            "[CompletionSignal] Reporting outcome for stack '{}' resource '{}'",
            self.stack_name,
            self.resource_id
        );

        let init_code = run_shell(&self.init_command)
            .await
            .map_err(BootstrapError::Signal)?;

        let reported_code = match outcome {
            BootstrapOutcome::Success => init_code,
            BootstrapOutcome::Failure(code) => code,
        };

        let signal_line = self
            .signal_command
            .replace(CODE_PLACEHOLDER, &reported_code.to_string());
        let signal_code = run_shell(&signal_line)
            .await
            .map_err(BootstrapError::Signal)?;

        if signal_code != 0 {
            return Err(BootstrapError::Signal(format!(
                "Signal send for resource '{}' exited {}",
                self.resource_id, signal_code
            )));
        }

        tracing::info!(
            "[CompletionSignal] Reported exit status {} for resource '{}'",
            reported_code,
            self.resource_id
        );
        Ok(())
    }
}

async fn run_shell(shell_line: &str) -> Result<i32, String> {
    let output = Command::new("sh")
        .arg("-c")
        .arg(shell_line)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| format!("Failed to run '{}': {}", shell_line, e))?;

    Ok(output.status.code().unwrap_or(-1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_lines_share_the_triple() {
        let init = init_command_line("/opt/aws/bin", "my-stack", "my-ec2", "us-east-1");
        let signal = signal_command_line("/opt/aws/bin", "my-stack", "my-ec2", "us-east-1");
        let identifiers = "--stack my-stack --resource my-ec2 --region us-east-1";
        assert!(init.ends_with(identifiers));
        assert!(signal.ends_with(identifiers));
        assert!(signal.contains("-e {code}"));
    }

    #[tokio::test]
    async fn emit_is_fire_once() {
        let mut emitter = CompletionSignal::new("stack", "resource", "region", "/opt/aws/bin")
            .with_commands("true".to_string(), "true".to_string());

        emitter.emit(BootstrapOutcome::Success).await.unwrap();
        let err = emitter.emit(BootstrapOutcome::Success).await.unwrap_err();
        assert!(matches!(err, BootstrapError::Signal(_)));
    }

    #[tokio::test]
    async fn failed_send_is_fatal() {
        let mut emitter = CompletionSignal::new("stack", "resource", "region", "/opt/aws/bin")
            .with_commands("true".to_string(), "false".to_string());

        let err = emitter.emit(BootstrapOutcome::Success).await.unwrap_err();
        assert!(matches!(err, BootstrapError::Signal(_)));
    }

    #[tokio::test]
    async fn reports_failure_code_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("signal.log");
        let mut emitter = CompletionSignal::new("stack", "resource", "region", "/opt/aws/bin")
            .with_commands(
                "true".to_string(),
                format!("echo {} >> {}", CODE_PLACEHOLDER, log.display()),
            );

        emitter.emit(BootstrapOutcome::Failure(7)).await.unwrap();
        let logged = std::fs::read_to_string(&log).unwrap();
        assert_eq!(logged.trim(), "7");
    }
}
