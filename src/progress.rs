//! Progress types for bootstrap execution.

use serde::{Deserialize, Serialize};

/// Progress of one bootstrap run.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct StepProgress {
    pub percentage: u32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_name: Option<String>,
}

impl StepProgress {
    pub fn new(set_name: Option<String>, percentage: u32, message: String) -> Self {
        Self {
            percentage,
            message,
            set_name,
            step_name: None,
        }
    }
}

/// Progress reporter for bootstrap runs.
pub trait ProgressReporter: Send + Sync + 'static {
    fn emit(&self, percentage: u32, message: String);

    /// Emit progress with set and step metadata.
    fn emit_detailed(
        &self,
        percentage: u32,
        message: String,
        _set_name: Option<String>,
        _step_name: Option<String>,
    ) {
        self.emit(percentage, message);
    }
}

/// Channel-based progress reporter.
pub struct ChannelProgressReporter {
    sender: tokio::sync::mpsc::Sender<StepProgress>,
    set_name: Option<String>,
}

impl ChannelProgressReporter {
    pub fn new(sender: tokio::sync::mpsc::Sender<StepProgress>) -> Self {
        Self {
            sender,
            set_name: None,
        }
    }

    pub fn with_set_name(
        sender: tokio::sync::mpsc::Sender<StepProgress>,
        set_name: String,
    ) -> Self {
        Self {
            sender,
            set_name: Some(set_name),
        }
    }
}

impl ProgressReporter for ChannelProgressReporter {
    fn emit(&self, percentage: u32, message: String) {
        self.emit_detailed(percentage, message, None, None);
    }

    fn emit_detailed(
        &self,
        percentage: u32,
        message: String,
        set_name: Option<String>,
        step_name: Option<String>,
    ) {
        let mut progress = StepProgress::new(self.set_name.clone(), percentage, message);
        if progress.set_name.is_none() {
            progress.set_name = set_name;
        }
        progress.step_name = step_name;
        let _ = self.sender.try_send(progress);
    }
}

/// Reporter that discards all progress. For callers without a channel.
pub struct NullProgressReporter;

impl ProgressReporter for NullProgressReporter {
    fn emit(&self, _percentage: u32, _message: String) {}
}
