//! Entry point: plan a host bootstrap or adopt a pre-built host.

use crate::config::BootstrapConfig;
use crate::error::BootstrapError;
use crate::image::RegistryImage;
use crate::scripts::{GenerateInputs, GeneratedArtifacts, ScriptGenerator};
use crate::signal::CompletionSignal;
use crate::step::{default_config_sets, ConfigSetGroup};

/// Opaque handle to a host the caller built themselves. Generation is
/// skipped entirely; the core has no authority over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostHandle {
    pub instance_id: String,
}

/// What to bootstrap: generate everything from a descriptor, or use a
/// fully-formed host supplied by the caller.
#[derive(Debug, Clone)]
pub enum HostBootstrap {
    Generate(HostPlan),
    UseProvided(HostHandle),
}

/// Result of resolving a [`HostBootstrap`].
#[derive(Debug)]
pub enum Provisioned {
    Generated(ProvisionedHost),
    Provided(HostHandle),
}

impl HostBootstrap {
    pub fn resolve(self, config: &BootstrapConfig) -> Result<Provisioned, BootstrapError> {
        match self {
            HostBootstrap::Generate(plan) => Ok(Provisioned::Generated(plan.build(config)?)),
            HostBootstrap::UseProvided(handle) => {
                tracing::info!(
                    "[HostBootstrap] Using caller-provided host '{}', skipping generation",
                    handle.instance_id
                );
                Ok(Provisioned::Provided(handle))
            }
        }
    }
}

/// Inputs for one generated host. Account and regions are explicit here and
/// threaded through generation; nothing is ambient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPlan {
    /// Application descriptor, copied verbatim to the host. Opaque to the
    /// core: transported, never parsed.
    pub descriptor: String,
    pub account_id: String,
    /// Region the images are pulled from.
    pub registry_region: String,
    /// Region the host runs in. May differ from the registry region.
    pub host_region: String,
    pub stack_name: String,
    pub resource_id: String,
    pub images: Vec<RegistryImage>,
}

impl HostPlan {
    /// Reject contract violations before any artifact is produced.
    ///
    /// An empty descriptor is rejected, never defaulted: an empty compose
    /// file provisions a host that runs nothing, which the completion
    /// handshake would then report as success.
    pub fn validate(&self) -> Result<(), BootstrapError> {
        let required = [
            ("descriptor", &self.descriptor),
            ("account_id", &self.account_id),
            ("registry_region", &self.registry_region),
            ("host_region", &self.host_region),
            ("stack_name", &self.stack_name),
            ("resource_id", &self.resource_id),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(BootstrapError::Config(format!(
                    "HostPlan field '{}' must not be empty",
                    field
                )));
            }
        }

        // Default flow: all image references share one account/region pair.
        for image in &self.images {
            if image.account_id != self.account_id || image.region != self.registry_region {
                return Err(BootstrapError::Config(format!(
                    "Image '{}' belongs to {}/{}, plan expects {}/{}",
                    image.repository_uri,
                    image.account_id,
                    image.region,
                    self.account_id,
                    self.registry_region
                )));
            }
        }

        Ok(())
    }

    /// Validate, generate all artifacts, and sequence them. Deterministic:
    /// equal plans produce byte-identical artifacts.
    pub fn build(self, config: &BootstrapConfig) -> Result<ProvisionedHost, BootstrapError> {
        self.validate()?;

        let generator = ScriptGenerator::new()?;
        let artifacts = generator.generate(&GenerateInputs {
            descriptor: &self.descriptor,
            account_id: &self.account_id,
            registry_region: &self.registry_region,
            host_region: &self.host_region,
            stack_name: &self.stack_name,
            resource_id: &self.resource_id,
            images: &self.images,
            log_group: &config.log_group,
            cfn_bin_dir: &config.cfn_bin_dir,
        })?;

        let config_sets = default_config_sets(&artifacts);

        tracing::info!(
            "[HostBootstrap] Generated artifacts for resource '{}' ({} images)",
            self.resource_id,
            self.images.len()
        );

        Ok(ProvisionedHost {
            artifacts,
            config_sets,
            stack_name: self.stack_name,
            resource_id: self.resource_id,
            host_region: self.host_region,
            cfn_bin_dir: config.cfn_bin_dir.clone(),
        })
    }
}

/// A planned host: artifacts, their ordered delivery, and the identifiers
/// the completion handshake reports with.
#[derive(Debug)]
pub struct ProvisionedHost {
    pub artifacts: GeneratedArtifacts,
    pub config_sets: ConfigSetGroup,
    pub stack_name: String,
    pub resource_id: String,
    pub host_region: String,
    cfn_bin_dir: String,
}

impl ProvisionedHost {
    /// User-data text for the host: the completion-signal script.
    pub fn user_data(&self) -> &str {
        &self.artifacts.signal_script
    }

    /// One-shot emitter bound to this host's identifying triple.
    pub fn completion_signal(&self) -> CompletionSignal {
        CompletionSignal::new(
            &self.stack_name,
            &self.resource_id,
            &self.host_region,
            &self.cfn_bin_dir,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> HostPlan {
        HostPlan {
            descriptor: "services:\n  web:\n    image: nginx\n".to_string(),
            account_id: "123456789012".to_string(),
            registry_region: "us-east-1".to_string(),
            host_region: "us-east-1".to_string(),
            stack_name: "my-stack".to_string(),
            resource_id: "my-ec2".to_string(),
            images: vec![],
        }
    }

    #[test]
    fn empty_descriptor_is_rejected() {
        let mut p = plan();
        p.descriptor = "   ".to_string();
        assert!(matches!(p.validate(), Err(BootstrapError::Config(_))));
    }

    #[test]
    fn foreign_image_account_is_rejected() {
        let mut p = plan();
        p.images
            .push(RegistryImage::new("999", "us-east-1", "999.dkr/x"));
        assert!(p.validate().is_err());
    }

    #[test]
    fn use_provided_skips_generation() {
        let bootstrap = HostBootstrap::UseProvided(HostHandle {
            instance_id: "i-0abc".to_string(),
        });
        let resolved = bootstrap.resolve(&BootstrapConfig::default()).unwrap();
        assert!(matches!(
            resolved,
            Provisioned::Provided(HostHandle { ref instance_id }) if instance_id.as_str() == "i-0abc"
        ));
    }
}
