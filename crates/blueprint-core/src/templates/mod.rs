//! Template registry, schemas and collected values
//!
//! This module provides:
//! - Registry and descriptor types (`TemplateDescriptor`, `TemplateKind`)
//! - Remote retrieval of the registry and per-template schemas
//! - Schema parsing into typed fields and the collected-values container
//! - The factory turning descriptors into `TemplateInstance`s

pub mod descriptor;
pub mod fetcher;
pub mod instance;
pub mod registry;
pub mod schema;
pub mod values;
pub mod version;

pub use descriptor::{
    RegistryEntry, RegistryManifest, TemplateDescriptor, TemplateKind, DEFAULT_CONFIG_PATH,
};
pub use fetcher::SourceClient;
pub use instance::TemplateInstance;
pub use registry::{build_registry, instantiate, load_registry, RegistryLoad, SkippedTemplate};
pub use schema::{ConfigSchema, FieldKind, FieldSpec};
pub use values::CollectedValues;
pub use version::{check_registry_version, REGISTRY_VERSION};
