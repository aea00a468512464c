//! Build strategies, one per template kind
//!
//! Every backend answers the same four questions: is its tool available,
//! what schema does the template declare, how are collected values encoded
//! for the tool, and how is the project built. [`Backend`] dispatches them
//! by variant.

pub mod cookiecutter;
pub mod copier;
pub mod git_repo;
pub mod nix;

pub use cookiecutter::CookiecutterBackend;
pub use copier::copy_tree;
pub use git_repo::GitRepoBackend;
pub use nix::NixBackend;

use crate::error::{Result, ScaffoldError};
use crate::runtime::{CommandRunner, SystemRunner};
use crate::templates::{CollectedValues, ConfigSchema, SourceClient, TemplateDescriptor};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Collaborators every backend is constructed with
#[derive(Clone)]
pub struct BackendContext {
    pub client: SourceClient,
    pub runner: Arc<dyn CommandRunner>,
}

impl BackendContext {
    pub fn new(client: SourceClient, runner: Arc<dyn CommandRunner>) -> Self {
        Self { client, runner }
    }

    /// Context that runs tools on the host
    pub fn system(client: SourceClient) -> Self {
        Self::new(client, Arc::new(SystemRunner))
    }
}

/// Collected values in the form a backend's tool takes them
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedConfig {
    /// Nix attribute set literal
    Nix(String),
    /// JSON object used as Cookiecutter's extra context
    Json(String),
    /// Backend takes no configuration
    Empty,
}

impl EncodedConfig {
    pub fn as_str(&self) -> &str {
        match self {
            EncodedConfig::Nix(s) | EncodedConfig::Json(s) => s,
            EncodedConfig::Empty => "",
        }
    }
}

impl fmt::Display for EncodedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub enum Backend {
    Nix(NixBackend),
    Cookiecutter(CookiecutterBackend),
    GitRepo(GitRepoBackend),
}

impl Backend {
    /// Short name of the backend, as written in the registry
    pub fn kind_name(&self) -> &'static str {
        match self {
            Backend::Nix(_) => "nix",
            Backend::Cookiecutter(_) => "cookiecutter",
            Backend::GitRepo(_) => "gitRepo",
        }
    }

    /// External tool this backend shells out to
    pub fn tool(&self) -> &'static str {
        match self {
            Backend::Nix(_) => nix::NIX_TOOL,
            Backend::Cookiecutter(_) => cookiecutter::PYTHON_TOOL,
            Backend::GitRepo(_) => git_repo::GIT_TOOL,
        }
    }

    /// Whether the build makes its own project folder inside the output directory
    pub fn creates_project_dir(&self) -> bool {
        matches!(self, Backend::Cookiecutter(_))
    }

    /// Only Nix is probed; the other tools are assumed present
    pub fn check_availability(&self) -> Result<bool> {
        match self {
            Backend::Nix(nix) => nix.check_availability(),
            Backend::Cookiecutter(_) | Backend::GitRepo(_) => Ok(true),
        }
    }

    /// Fetch the template's schema; `None` for backends that take no input
    pub async fn fetch_schema(
        &self,
        client: &SourceClient,
        descriptor: &TemplateDescriptor,
    ) -> Result<Option<ConfigSchema>> {
        match self {
            Backend::Nix(_) | Backend::Cookiecutter(_) => {
                client.fetch_schema(descriptor).await.map(Some)
            }
            Backend::GitRepo(_) => Ok(None),
        }
    }

    /// Pure and deterministic for a given input
    pub fn encode(&self, values: &CollectedValues) -> EncodedConfig {
        match self {
            Backend::Nix(_) => EncodedConfig::Nix(nix::encode_attr_set(values.as_map())),
            Backend::Cookiecutter(_) => EncodedConfig::Json(values.to_json_string()),
            Backend::GitRepo(_) => EncodedConfig::Empty,
        }
    }

    /// Materialise the project under `output_dir`
    ///
    /// Existing content is neither cleaned nor merged, so re-running into a
    /// populated directory may fail.
    pub fn build(&self, name: &str, config: &EncodedConfig, output_dir: &Path) -> Result<()> {
        match (self, config) {
            (Backend::Nix(nix), EncodedConfig::Nix(attrs)) => nix.build(attrs, output_dir),
            (Backend::Nix(nix), EncodedConfig::Empty) => nix.build("{ }", output_dir),
            (Backend::Cookiecutter(cc), EncodedConfig::Json(json)) => cc.build(json, output_dir),
            (Backend::Cookiecutter(cc), EncodedConfig::Empty) => cc.build("{}", output_dir),
            (Backend::GitRepo(git), _) => git.build(output_dir),
            (backend, _) => Err(ScaffoldError::build(
                name,
                format!(
                    "configuration was not encoded for the {} backend",
                    backend.kind_name()
                ),
            )),
        }
    }
}
