//! Blueprint Core - template registry and scaffolding pipeline
//!
//! This library turns a remote template registry into runnable scaffolds.
//! Each registry entry names a backend (`nix`, `cookiecutter` or `gitRepo`);
//! the factory binds it to a build strategy, and the driver walks one
//! selected template through schema retrieval, input collection, encoding
//! and the build itself.
//!
//! # Architecture
//!
//! - **Layer 1: Core Operations** - registry and schema retrieval, schema
//!   parsing, value encoding, external tool invocation
//! - **Layer 2: Orchestration** - `ScaffoldDriver` plus the `Prompter` trait
//!   for plugging in any UI
//! - **Layer 3: CLI/TUI Interface** - optional cliclack prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based interactive flow
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use blueprint_core::{BackendContext, ScaffoldDriver, ScaffoldRequest, SourceClient, SourceConfig};
//!
//! let context = BackendContext::system(SourceClient::new(SourceConfig::from_env()?)?);
//! let load = blueprint_core::load_registry(&context).await?;
//! let mut driver = ScaffoldDriver::new(&load.instances);
//! let report = driver.run(&request, &mut my_prompter).await?;
//! ```

pub mod backends;
pub mod collect;
pub mod config;
pub mod driver;
pub mod error;
pub mod runtime;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use backends::{Backend, BackendContext, EncodedConfig};
pub use collect::{collect_values, Prompter};
pub use config::SourceConfig;
pub use driver::{DriverState, ScaffoldDriver, ScaffoldReport, ScaffoldRequest, SchemaState};
pub use error::{ErrorKind, Result, ScaffoldError};
pub use runtime::{CommandRunner, SystemRunner};
pub use templates::{
    load_registry, CollectedValues, ConfigSchema, RegistryLoad, SourceClient, TemplateDescriptor,
    TemplateInstance, TemplateKind,
};

#[cfg(feature = "tui")]
pub use tui::run;
