//! Embedded bootstrap templates - compiled into the binary so the library is
//! self-contained and produces byte-identical artifacts for equal inputs.
//!
//! Templates are loaded at compile time via `include_str!` and registered
//! with the [`TemplateRenderer`](crate::render::TemplateRenderer).

/// Install script: package index update, container runtime, orchestration CLI
pub static INSTALL_SH: &str = include_str!("../templates/install.sh.j2");

/// Registry setup script: login + pulls + teardown (or teardown only)
pub static REGISTRY_SETUP_SH: &str = include_str!("../templates/registry-setup.sh.j2");

/// Completion-signal user-data script (two-call cfn handshake)
pub static CFN_SIGNAL_SH: &str = include_str!("../templates/cfn-signal.sh.j2");

/// Shutdown hook run by the service unit's second ExecStop
pub static ON_STOP_SH: &str = include_str!("../templates/on-stop.sh");

/// All embedded templates as (name, content) pairs for registration with Tera.
pub const ALL_TEMPLATES: &[(&str, &str)] = &[
    ("install.sh", INSTALL_SH),
    ("registry-setup.sh", REGISTRY_SETUP_SH),
    ("cfn-signal.sh", CFN_SIGNAL_SH),
    ("on-stop.sh", ON_STOP_SH),
];
