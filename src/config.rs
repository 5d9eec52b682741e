//! Bootstrap configuration.
//! Loaded from host-bootstrap.toml; every field has a default.

use crate::error::BootstrapError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tunables for one bootstrap run. Artifact paths are fixed (see
/// [`crate::step`]); this only carries the knobs deployments actually vary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Wall-clock bound for the whole bootstrap sequence, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log sink group declared in the runtime logging config.
    #[serde(default = "default_log_group")]
    pub log_group: String,

    /// Directory holding the provisioning system's signaling tools.
    #[serde(default = "default_cfn_bin_dir")]
    pub cfn_bin_dir: String,
}

fn default_timeout_secs() -> u64 {
    240
}

fn default_log_group() -> String {
    "docker-compose-app".to_string()
}

fn default_cfn_bin_dir() -> String {
    "/opt/aws/bin".to_string()
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            log_group: default_log_group(),
            cfn_bin_dir: default_cfn_bin_dir(),
        }
    }
}

impl BootstrapConfig {
    /// Load configuration, probing the working directory and `search_dir`.
    /// Falls back to defaults when no file is found.
    pub fn load(search_dir: &Path) -> Result<Self, BootstrapError> {
        let config_paths = vec![
            PathBuf::from("host-bootstrap.toml"),
            search_dir.join("host-bootstrap.toml"),
        ];

        for path in config_paths {
            if path.exists() {
                let content = std::fs::read_to_string(&path)?;
                let config: BootstrapConfig = toml::from_str(&content).map_err(|e| {
                    BootstrapError::Config(format!(
                        "Failed to parse config file {:?}: {}",
                        path, e
                    ))
                })?;

                tracing::info!("Loaded bootstrap config from {:?}", path);
                return Ok(config);
            }
        }

        tracing::warn!("No host-bootstrap.toml found, using defaults");
        Ok(Self::default())
    }
}
