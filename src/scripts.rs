//! Script generator — deterministic text artifacts for the host bootstrap.
//!
//! Pure string rendering: given the same inputs the generated artifacts are
//! byte-identical (no timestamps, random ids, or map-ordered output).

use crate::error::BootstrapError;
use crate::image::{registry_host, RegistryImage};
use crate::render::TemplateRenderer;
use crate::service_unit::ServiceUnitSpec;
use crate::step::REGISTRY_SCRIPT_PATH;
use serde::Serialize;
use tera::Context;

/// Everything the generator renders. Owned by the generator; the sequencer
/// owns ordering, the host owns execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifacts {
    /// Container runtime logging config (daemon.json)
    pub logging_config: String,
    /// Application descriptor, copied byte-for-byte. Never parsed.
    pub descriptor: String,
    pub install_script: String,
    pub service_unit: String,
    pub registry_script: String,
    pub on_stop_script: String,
    /// User-data script carrying the two-call completion handshake
    pub signal_script: String,
}

/// Inputs for one generation pass. All fields are explicit; region/account
/// are never ambient state.
#[derive(Debug, Clone, Copy)]
pub struct GenerateInputs<'a> {
    pub descriptor: &'a str,
    pub account_id: &'a str,
    pub registry_region: &'a str,
    pub host_region: &'a str,
    pub stack_name: &'a str,
    pub resource_id: &'a str,
    pub images: &'a [RegistryImage],
    pub log_group: &'a str,
    pub cfn_bin_dir: &'a str,
}

/// Docker daemon.json shape. Serialized from a struct, not a map, so field
/// order is fixed.
#[derive(Serialize)]
struct DaemonConfig<'a> {
    #[serde(rename = "log-driver")]
    log_driver: &'a str,
    #[serde(rename = "log-opts")]
    log_opts: LogOpts<'a>,
}

#[derive(Serialize)]
struct LogOpts<'a> {
    #[serde(rename = "awslogs-region")]
    region: &'a str,
    #[serde(rename = "awslogs-group")]
    group: &'a str,
    #[serde(rename = "awslogs-create-group")]
    create_group: bool,
}

pub struct ScriptGenerator {
    renderer: TemplateRenderer,
}

impl ScriptGenerator {
    pub fn new() -> Result<Self, BootstrapError> {
        Ok(Self {
            renderer: TemplateRenderer::from_embedded()?,
        })
    }

    /// Render all artifacts for one host.
    pub fn generate(&self, inputs: &GenerateInputs) -> Result<GeneratedArtifacts, BootstrapError> {
        Ok(GeneratedArtifacts {
            logging_config: self.logging_config(inputs.host_region, inputs.log_group)?,
            descriptor: inputs.descriptor.to_string(),
            install_script: self.install_script()?,
            service_unit: ServiceUnitSpec::default().render(),
            registry_script: self.registry_setup_script(
                inputs.account_id,
                inputs.registry_region,
                inputs.images,
            )?,
            on_stop_script: self.on_stop_script()?,
            signal_script: self.signal_script(
                inputs.stack_name,
                inputs.resource_id,
                inputs.host_region,
                inputs.cfn_bin_dir,
            )?,
        })
    }

    /// Routes container logs to the centralized sink, declares the sink
    /// group, and permits on-demand sink creation.
    pub fn logging_config(&self, region: &str, group: &str) -> Result<String, BootstrapError> {
        let config = DaemonConfig {
            log_driver: "awslogs",
            log_opts: LogOpts {
                region,
                group,
                create_group: true,
            },
        };
        serde_json::to_string_pretty(&config)
            .map_err(|e| BootstrapError::Template(format!("Failed to render daemon.json: {}", e)))
    }

    /// Updates the package index, installs the container runtime, fetches the
    /// orchestration CLI by platform-architecture pattern (it is not in the
    /// OS package index), and enables the runtime and application unit for
    /// start-on-boot.
    pub fn install_script(&self) -> Result<String, BootstrapError> {
        let mut context = Context::new();
        context.insert("registry_script_path", REGISTRY_SCRIPT_PATH);
        self.renderer.render("install.sh", &context)
    }

    /// Registry setup script, shaped by the image list:
    /// - zero images: a single teardown command;
    /// - N images: login, N pulls in insertion order, then the same teardown.
    ///
    /// The teardown tail is the single merge point of both branches. A
    /// skipped or failed login must not change what the pre-start hook
    /// guarantees, so the tail is unconditional.
    pub fn registry_setup_script(
        &self,
        account_id: &str,
        region: &str,
        images: &[RegistryImage],
    ) -> Result<String, BootstrapError> {
        let pull_references: Vec<String> =
            images.iter().map(|i| i.repository_uri.clone()).collect();

        let mut context = Context::new();
        context.insert("script_path", REGISTRY_SCRIPT_PATH);
        context.insert("ecr_region", region);
        context.insert("registry_host", &registry_host(account_id, region));
        context.insert("images", &pull_references);
        self.renderer.render("registry-setup.sh", &context)
    }

    /// Completion-signal user-data: install the signaling agent, run the
    /// init-phase invocation, then report that invocation's exit status back
    /// with identical identifying parameters.
    pub fn signal_script(
        &self,
        stack_name: &str,
        resource_id: &str,
        region: &str,
        cfn_bin_dir: &str,
    ) -> Result<String, BootstrapError> {
        let mut context = Context::new();
        context.insert("stack_name", stack_name);
        context.insert("resource_id", resource_id);
        context.insert("region", region);
        context.insert("cfn_bin_dir", cfn_bin_dir);
        self.renderer.render("cfn-signal.sh", &context)
    }

    pub fn on_stop_script(&self) -> Result<String, BootstrapError> {
        self.renderer.render("on-stop.sh", &Context::new())
    }
}

/// Command lines of a script: non-empty lines that are not comments. Used by
/// callers and tests reasoning about script shape.
pub fn command_lines(script: &str) -> Vec<&str> {
    script
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_config_is_deterministic() {
        let generator = ScriptGenerator::new().unwrap();
        let a = generator.logging_config("us-east-1", "my-app").unwrap();
        let b = generator.logging_config("us-east-1", "my-app").unwrap();
        assert_eq!(a, b);
        assert!(a.contains("\"log-driver\": \"awslogs\""));
        assert!(a.contains("\"awslogs-group\": \"my-app\""));
        assert!(a.contains("\"awslogs-create-group\": true"));
    }

    #[test]
    fn install_script_fetches_compose_and_enables_units() {
        let generator = ScriptGenerator::new().unwrap();
        let script = generator.install_script().unwrap();
        assert!(script.contains("yum install -y docker"));
        assert!(script.contains("docker-compose-$(uname -s)-$(uname -m)"));
        assert!(script.contains("chmod +x /home/ec2-user/docker-compose-setup.sh"));
        assert!(script.contains("systemctl enable docker"));
        assert!(script.contains("systemctl enable docker-compose-app"));
    }

    #[test]
    fn signal_script_uses_one_triple_for_both_calls() {
        let generator = ScriptGenerator::new().unwrap();
        let script = generator
            .signal_script("my-stack", "my-ec2", "us-east-1", "/opt/aws/bin")
            .unwrap();
        let identifiers = "--stack my-stack --resource my-ec2 --region us-east-1";
        assert_eq!(script.matches(identifiers).count(), 2);
        assert!(script.contains("cfn-init -v"));
        assert!(script.contains("cfn-signal -e $?"));
    }
}
