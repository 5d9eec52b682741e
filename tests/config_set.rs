//! Ordering and determinism of the install config set.

use compose_bootstrap::step::{
    DEFAULT_GROUP, DESCRIPTOR_PATH, INSTALL_SCRIPT_PATH, LOGGING_CONFIG_PATH, ON_STOP_SCRIPT_PATH,
    REGISTRY_SCRIPT_PATH, SERVICE_UNIT_PATH,
};
use compose_bootstrap::{BootstrapConfig, HostPlan, RegistryImage, Step};

fn plan() -> HostPlan {
    HostPlan {
        descriptor: "services:\n  web:\n    image: nginx\n  db:\n    image: postgres\n".to_string(),
        account_id: "123456789012".to_string(),
        registry_region: "us-east-1".to_string(),
        host_region: "us-west-2".to_string(),
        stack_name: "my-stack".to_string(),
        resource_id: "my-ec2".to_string(),
        images: vec![RegistryImage::new(
            "123456789012",
            "us-east-1",
            "123456789012.dkr.ecr.us-east-1.amazonaws.com/web",
        )],
    }
}

fn file_position(steps: &[Step], path: &str) -> usize {
    steps
        .iter()
        .position(|s| matches!(s, Step::MaterializeFile { path: p, .. } if p == path))
        .unwrap_or_else(|| panic!("no MaterializeFile step for {}", path))
}

fn command_position(steps: &[Step], needle: &str) -> usize {
    steps
        .iter()
        .position(|s| matches!(s, Step::RunCommand { shell_line } if shell_line.contains(needle)))
        .unwrap_or_else(|| panic!("no RunCommand step containing {}", needle))
}

#[test]
fn install_set_order_is_fixed() {
    let host = plan().build(&BootstrapConfig::default()).unwrap();
    let sets = host.config_sets.resolve(DEFAULT_GROUP).unwrap();
    assert_eq!(sets.len(), 1);
    let steps = &sets[0].steps;

    let logging = file_position(steps, LOGGING_CONFIG_PATH);
    let descriptor = file_position(steps, DESCRIPTOR_PATH);
    let install = file_position(steps, INSTALL_SCRIPT_PATH);
    let unit = file_position(steps, SERVICE_UNIT_PATH);
    let registry = file_position(steps, REGISTRY_SCRIPT_PATH);
    let on_stop = file_position(steps, ON_STOP_SCRIPT_PATH);

    let chmod_install = command_position(steps, &format!("chmod +x {}", INSTALL_SCRIPT_PATH));
    let run_install = steps
        .iter()
        .position(|s| matches!(s, Step::RunCommand { shell_line } if shell_line == INSTALL_SCRIPT_PATH))
        .unwrap();
    let start_unit = command_position(steps, "systemctl start docker-compose-app.service");

    // Logging config before descriptor, before scripts, before commands.
    assert!(logging < descriptor);
    assert!(descriptor < install);
    assert!(install < unit);
    assert!(unit < registry);
    assert!(registry < chmod_install);
    assert!(chmod_install < run_install);
    assert!(run_install < on_stop);
    assert!(on_stop < start_unit);

    // The explicit first-boot start is the final step.
    assert_eq!(start_unit, steps.len() - 1);
}

#[test]
fn descriptor_is_copied_byte_for_byte() {
    let p = plan();
    let descriptor = p.descriptor.clone();
    let host = p.build(&BootstrapConfig::default()).unwrap();
    let sets = host.config_sets.resolve(DEFAULT_GROUP).unwrap();

    let step = sets[0]
        .steps
        .iter()
        .find(|s| matches!(s, Step::MaterializeFile { path, .. } if path == DESCRIPTOR_PATH))
        .unwrap();
    match step {
        Step::MaterializeFile { contents, .. } => assert_eq!(*contents, descriptor),
        _ => unreachable!(),
    }
}

#[test]
fn rebuilding_the_same_plan_is_byte_identical() {
    let config = BootstrapConfig::default();
    let a = plan().build(&config).unwrap();
    let b = plan().build(&config).unwrap();

    assert_eq!(a.artifacts, b.artifacts);
    assert_eq!(a.config_sets, b.config_sets);
}
