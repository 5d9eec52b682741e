//! Terminal result of a bootstrap run.

/// Exit code reported when the bootstrap run exceeds its wall-clock bound.
/// Matches the coreutils `timeout` convention.
pub const TIMEOUT_EXIT_CODE: i32 = 124;

/// Terminal outcome of one provisioning attempt. Produced exactly once;
/// never retried locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// All steps completed.
    Success,
    /// First failing step's exit code, or [`TIMEOUT_EXIT_CODE`].
    Failure(i32),
}

impl BootstrapOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BootstrapOutcome::Success)
    }

    /// Numeric code surfaced through the completion handshake.
    pub fn exit_code(&self) -> i32 {
        match self {
            BootstrapOutcome::Success => 0,
            BootstrapOutcome::Failure(code) => *code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(BootstrapOutcome::Success.exit_code(), 0);
        assert_eq!(BootstrapOutcome::Failure(7).exit_code(), 7);
        assert!(!BootstrapOutcome::Failure(TIMEOUT_EXIT_CODE).is_success());
    }
}
