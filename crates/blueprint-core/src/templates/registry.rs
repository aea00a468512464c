//! Template factory: descriptors in, usable instances out
//!
//! Failures are per template. A descriptor that cannot be instantiated is
//! reported in [`RegistryLoad::skipped`] and the rest of the registry loads.

use super::descriptor::{TemplateDescriptor, TemplateKind};
use super::instance::TemplateInstance;
use super::version::{check_registry_version, REGISTRY_VERSION};
use super::SourceClient;
use crate::backends::{
    Backend, BackendContext, CookiecutterBackend, GitRepoBackend, NixBackend,
};
use crate::error::{Result, ScaffoldError};
use std::sync::Arc;

/// Command suggested when the registry is newer than this build
pub const UPGRADE_COMMAND: &str = "cargo install blueprint --force";

/// A registry entry that could not be turned into a [`TemplateInstance`]
#[derive(Debug)]
pub struct SkippedTemplate {
    pub name: String,
    pub error: ScaffoldError,
}

/// Result of loading the registry
#[derive(Debug, Default)]
pub struct RegistryLoad {
    pub instances: Vec<TemplateInstance>,
    pub skipped: Vec<SkippedTemplate>,
    /// Set when the registry declares a version this build does not expect
    pub version_warning: Option<String>,
}

/// Construct the backend named by the descriptor's kind
pub fn instantiate(
    descriptor: TemplateDescriptor,
    context: &BackendContext,
) -> Result<TemplateInstance> {
    let descriptor = Arc::new(descriptor);
    let runner = Arc::clone(&context.runner);

    let backend = match &descriptor.kind {
        TemplateKind::Nix => Backend::Nix(NixBackend::new(Arc::clone(&descriptor), runner)),
        TemplateKind::Cookiecutter => {
            Backend::Cookiecutter(CookiecutterBackend::new(Arc::clone(&descriptor), runner))
        }
        TemplateKind::GitRepo => {
            Backend::GitRepo(GitRepoBackend::new(Arc::clone(&descriptor), runner))
        }
        TemplateKind::Unknown(kind) => {
            return Err(ScaffoldError::UnknownBackend {
                template: descriptor.name.clone(),
                kind: kind.clone(),
            })
        }
    };

    Ok(TemplateInstance::new(
        descriptor,
        backend,
        context.client.clone(),
    ))
}

/// Instantiate every descriptor, collecting failures instead of aborting
pub fn build_registry(
    descriptors: Vec<TemplateDescriptor>,
    context: &BackendContext,
) -> RegistryLoad {
    let mut load = RegistryLoad::default();
    for descriptor in descriptors {
        let name = descriptor.name.clone();
        match instantiate(descriptor, context) {
            Ok(instance) => load.instances.push(instance),
            Err(error) => {
                tracing::warn!(template = %name, %error, "skipping template");
                load.skipped.push(SkippedTemplate { name, error });
            }
        }
    }
    load
}

/// Fetch the registry named by the client's config and instantiate its templates
///
/// Only a failure to fetch or parse the registry document itself is an
/// error; malformed entries and unknown kinds end up in `skipped`.
pub async fn load_registry(context: &BackendContext) -> Result<RegistryLoad> {
    let client: &SourceClient = &context.client;
    let manifest = client.fetch_registry().await?;
    let default_branch = client.config().branch.clone();

    let version_warning = manifest
        .version_string()
        .and_then(|found| check_registry_version(REGISTRY_VERSION, &found, UPGRADE_COMMAND));
    if let Some(warning) = &version_warning {
        tracing::warn!("{}", warning);
    }

    let mut descriptors = Vec::new();
    let mut malformed = Vec::new();
    for entry in manifest.entries() {
        match entry {
            Ok(entry) => descriptors.push(entry.into_descriptor(&default_branch)),
            Err((name, e)) => {
                tracing::warn!(template = %name, error = %e, "skipping malformed registry entry");
                malformed.push(SkippedTemplate {
                    name: name.clone(),
                    error: ScaffoldError::retrieval(format!("registry entry '{}'", name), e),
                });
            }
        }
    }

    let mut load = build_registry(descriptors, context);
    malformed.append(&mut load.skipped);
    load.skipped = malformed;
    load.version_warning = version_warning;
    Ok(load)
}
