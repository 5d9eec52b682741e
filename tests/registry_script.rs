//! Shape tests for the generated registry setup script.
//!
//! The teardown tail is the single merge point of both branches: with or
//! without images, the last command is always the same stack teardown.

use compose_bootstrap::scripts::{command_lines, ScriptGenerator};
use compose_bootstrap::RegistryImage;

const TEARDOWN: &str = "/usr/bin/docker-compose down";

fn generator() -> ScriptGenerator {
    ScriptGenerator::new().expect("embedded templates must load")
}

#[test]
fn zero_images_is_teardown_only() {
    let script = generator()
        .registry_setup_script("123456789012", "us-east-1", &[])
        .unwrap();

    let commands = command_lines(&script);
    assert_eq!(commands, vec![TEARDOWN]);
}

#[test]
fn n_images_is_login_pulls_teardown() {
    let images = vec![
        RegistryImage::new("123456789012", "us-east-1", "123456789012.dkr.ecr.us-east-1.amazonaws.com/api"),
        RegistryImage::new("123456789012", "us-east-1", "123456789012.dkr.ecr.us-east-1.amazonaws.com/web"),
    ];
    let script = generator()
        .registry_setup_script("123456789012", "us-east-1", &images)
        .unwrap();

    let commands = command_lines(&script);
    assert_eq!(commands.len(), 1 + images.len() + 1);

    assert!(commands[0].starts_with("/usr/bin/aws ecr get-login-password --region us-east-1"));
    assert!(commands[0].contains("--password-stdin 123456789012.dkr.ecr.us-east-1.amazonaws.com"));

    // Pulls in insertion order.
    assert_eq!(
        commands[1],
        "/usr/bin/docker pull 123456789012.dkr.ecr.us-east-1.amazonaws.com/api:latest"
    );
    assert_eq!(
        commands[2],
        "/usr/bin/docker pull 123456789012.dkr.ecr.us-east-1.amazonaws.com/web:latest"
    );

    assert_eq!(*commands.last().unwrap(), TEARDOWN);
}

#[test]
fn both_branches_end_with_the_identical_teardown_line() {
    let generator = generator();
    let without = generator
        .registry_setup_script("123", "eu-west-1", &[])
        .unwrap();
    let with = generator
        .registry_setup_script(
            "123",
            "eu-west-1",
            &[RegistryImage::new("123", "eu-west-1", "123.dkr/x")],
        )
        .unwrap();

    let last_without = *command_lines(&without).last().unwrap();
    let last_with = *command_lines(&with).last().unwrap();
    assert_eq!(last_without, last_with);
    assert_eq!(last_with, TEARDOWN);
}

#[test]
fn generation_is_deterministic() {
    let generator = generator();
    let images = vec![RegistryImage::new("123", "us-east-1", "123.dkr/x")];
    let a = generator
        .registry_setup_script("123", "us-east-1", &images)
        .unwrap();
    let b = generator
        .registry_setup_script("123", "us-east-1", &images)
        .unwrap();
    assert_eq!(a, b);
}
