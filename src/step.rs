//! Provisioning steps and config-set sequencing.
//!
//! A [`Step`] either materializes a file at a fixed host path or runs a
//! shell command. Execution order is the contract: later steps may depend on
//! earlier ones (a chmod must precede an execute).

use crate::error::BootstrapError;
use crate::scripts::GeneratedArtifacts;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fixed host paths for the generated artifacts.
pub const LOGGING_CONFIG_PATH: &str = "/etc/docker/daemon.json";
pub const DESCRIPTOR_PATH: &str = "/home/ec2-user/docker-compose.yml";
pub const INSTALL_SCRIPT_PATH: &str = "/etc/install.sh";
pub const SERVICE_UNIT_PATH: &str = "/etc/systemd/system/docker-compose-app.service";
pub const REGISTRY_SCRIPT_PATH: &str = "/home/ec2-user/docker-compose-setup.sh";
pub const ON_STOP_SCRIPT_PATH: &str = "/home/ec2-user/on-stop.sh";

/// Unit name the install script enables and the final step starts.
pub const SERVICE_UNIT_NAME: &str = "docker-compose-app.service";

/// Name of the install config set.
pub const INSTALL_SET: &str = "install";
/// Group executed by the bootstrap executor.
pub const DEFAULT_GROUP: &str = "default";

/// One provisioning step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// Write `contents` to `path`, overwriting unconditionally.
    MaterializeFile { path: String, contents: String },
    /// Run a shell line synchronously; non-zero exit halts the sequence.
    RunCommand { shell_line: String },
}

impl Step {
    pub fn file(path: impl Into<String>, contents: impl Into<String>) -> Self {
        Step::MaterializeFile {
            path: path.into(),
            contents: contents.into(),
        }
    }

    pub fn command(shell_line: impl Into<String>) -> Self {
        Step::RunCommand {
            shell_line: shell_line.into(),
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Step::MaterializeFile { path, .. } => format!("write {}", path),
            Step::RunCommand { shell_line } => format!("run {}", shell_line),
        }
    }
}

/// Named ordered sequence of steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSet {
    pub name: String,
    pub steps: Vec<Step>,
}

impl ConfigSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Config sets plus named groups over them. Exactly one group is selected
/// per executor run; the indirection lets future variants (e.g. a
/// "recovery" set) be added without changing the invocation contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSetGroup {
    sets: HashMap<String, ConfigSet>,
    groups: HashMap<String, Vec<String>>,
}

impl ConfigSetGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_set(&mut self, set: ConfigSet) {
        self.sets.insert(set.name.clone(), set);
    }

    pub fn add_group(&mut self, name: impl Into<String>, set_names: Vec<String>) {
        self.groups.insert(name.into(), set_names);
    }

    pub fn set(&self, name: &str) -> Option<&ConfigSet> {
        self.sets.get(name)
    }

    /// Resolve a group to its config sets, in declared order.
    pub fn resolve(&self, group: &str) -> Result<Vec<&ConfigSet>, BootstrapError> {
        let set_names = self
            .groups
            .get(group)
            .ok_or_else(|| BootstrapError::Config(format!("Unknown config set group: {}", group)))?;

        set_names
            .iter()
            .map(|name| {
                self.sets.get(name).ok_or_else(|| {
                    BootstrapError::Config(format!(
                        "Group '{}' references unknown config set: {}",
                        group, name
                    ))
                })
            })
            .collect()
    }
}

/// Assemble the "install" config set from generated artifacts, in the fixed
/// order the first boot depends on.
pub fn install_config_set(artifacts: &GeneratedArtifacts) -> ConfigSet {
    let mut set = ConfigSet::new(INSTALL_SET);

    set.push(Step::file(LOGGING_CONFIG_PATH, &artifacts.logging_config));
    set.push(Step::file(DESCRIPTOR_PATH, &artifacts.descriptor));
    set.push(Step::file(INSTALL_SCRIPT_PATH, &artifacts.install_script));
    set.push(Step::file(SERVICE_UNIT_PATH, &artifacts.service_unit));
    set.push(Step::file(REGISTRY_SCRIPT_PATH, &artifacts.registry_script));
    set.push(Step::command(format!("chmod +x {}", INSTALL_SCRIPT_PATH)));
    set.push(Step::command(INSTALL_SCRIPT_PATH));
    set.push(Step::file(ON_STOP_SCRIPT_PATH, &artifacts.on_stop_script));
    set.push(Step::command(format!("chmod +x {}", ON_STOP_SCRIPT_PATH)));

    // A unit enabled for start-on-boot does not retroactively start on the
    // current boot; the very first boot needs this explicit start.
    set.push(Step::command(format!(
        "sudo systemctl start {}",
        SERVICE_UNIT_NAME
    )));

    set
}

/// The default group: exactly one entry, mapping "default" to the install set.
pub fn default_config_sets(artifacts: &GeneratedArtifacts) -> ConfigSetGroup {
    let mut group = ConfigSetGroup::new();
    group.add_set(install_config_set(artifacts));
    group.add_group(DEFAULT_GROUP, vec![INSTALL_SET.to_string()]);
    group
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifacts() -> GeneratedArtifacts {
        GeneratedArtifacts {
            logging_config: "{}".to_string(),
            descriptor: "services: {}".to_string(),
            install_script: "#!/bin/sh\n".to_string(),
            service_unit: "[Unit]\n".to_string(),
            registry_script: "#!/bin/sh\n".to_string(),
            on_stop_script: "#!/bin/sh\n".to_string(),
            signal_script: "#!/bin/bash -x\n".to_string(),
        }
    }

    #[test]
    fn resolve_unknown_group_fails() {
        let group = default_config_sets(&artifacts());
        assert!(group.resolve("recovery").is_err());
        assert_eq!(group.resolve(DEFAULT_GROUP).unwrap().len(), 1);
    }

    #[test]
    fn install_set_starts_with_files_and_ends_with_unit_start() {
        let set = install_config_set(&artifacts());
        assert!(matches!(
            &set.steps[0],
            Step::MaterializeFile { path, .. } if path == LOGGING_CONFIG_PATH
        ));
        assert!(matches!(
            set.steps.last().unwrap(),
            Step::RunCommand { shell_line } if shell_line.ends_with(SERVICE_UNIT_NAME)
        ));
    }
}
