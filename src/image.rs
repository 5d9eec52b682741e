//! Registry image references pulled onto the host at setup time.

use serde::{Deserialize, Serialize};

/// A container image stored in a registry, pulled by tag during registry
/// setup. Order of references is insertion order and determines pull order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryImage {
    /// Registry account that owns the repository
    pub account_id: String,
    /// Region of the registry endpoint
    pub region: String,
    /// Repository URI (e.g., "123456789012.dkr.ecr.us-east-1.amazonaws.com/app")
    pub repository_uri: String,
}

impl RegistryImage {
    pub fn new(
        account_id: impl Into<String>,
        region: impl Into<String>,
        repository_uri: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            region: region.into(),
            repository_uri: repository_uri.into(),
        }
    }

    /// Reference actually pulled on the host. Always `:latest`.
    pub fn pull_reference(&self) -> String {
        format!("{}:latest", self.repository_uri)
    }
}

/// Registry endpoint the runtime logs into before pulling.
pub fn registry_host(account_id: &str, region: &str) -> String {
    format!("{}.dkr.ecr.{}.amazonaws.com", account_id, region)
}
