//! compose-bootstrap — host bootstrap pipeline for multi-container apps.
//!
//! Turns a freshly launched virtual machine into a machine that runs a
//! Docker Compose application continuously: deterministic script generation,
//! ordered config-set sequencing, a first-boot executor with a hard timeout,
//! a one-shot completion handshake, and a boot-surviving service unit.
//! Surrounding resource composition (network, identity, firewall, registry)
//! is the caller's concern; this crate only takes its opaque identifiers.

pub mod config;
pub mod error;
pub mod executor;
pub mod host;
pub mod image;
pub mod outcome;
pub mod progress;
pub mod render;
pub mod scripts;
pub mod service_unit;
pub mod signal;
pub mod step;
pub mod templates;

pub use config::BootstrapConfig;
pub use error::BootstrapError;
pub use executor::BootstrapExecutor;
pub use host::{HostBootstrap, HostHandle, HostPlan, Provisioned, ProvisionedHost};
pub use image::RegistryImage;
pub use outcome::{BootstrapOutcome, TIMEOUT_EXIT_CODE};
pub use progress::{ChannelProgressReporter, NullProgressReporter, ProgressReporter, StepProgress};
pub use render::TemplateRenderer;
pub use scripts::{GenerateInputs, GeneratedArtifacts, ScriptGenerator};
pub use service_unit::{ServiceUnitSpec, UnitEvent, UnitState};
pub use signal::CompletionSignal;
pub use step::{ConfigSet, ConfigSetGroup, Step};
