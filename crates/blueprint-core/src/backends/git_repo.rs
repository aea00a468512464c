//! Plain repositories, materialised with a shallow clone

use crate::error::{Result, ScaffoldError};
use crate::runtime::{CommandRunner, Invocation};
use crate::templates::TemplateDescriptor;
use std::path::Path;
use std::sync::Arc;

pub const GIT_TOOL: &str = "git";

pub struct GitRepoBackend {
    descriptor: Arc<TemplateDescriptor>,
    runner: Arc<dyn CommandRunner>,
}

impl GitRepoBackend {
    pub fn new(descriptor: Arc<TemplateDescriptor>, runner: Arc<dyn CommandRunner>) -> Self {
        Self { descriptor, runner }
    }

    pub fn clone_invocation(&self, output_dir: &Path) -> Invocation {
        Invocation::new(GIT_TOOL).args([
            "clone".to_string(),
            "--depth".to_string(),
            "1".to_string(),
            "--branch".to_string(),
            self.descriptor.branch.clone(),
            self.descriptor.repository_url(),
            output_dir.display().to_string(),
        ])
    }

    pub fn build(&self, output_dir: &Path) -> Result<()> {
        let name = &self.descriptor.name;
        std::fs::create_dir_all(output_dir).map_err(|e| {
            ScaffoldError::build(
                name,
                format!("failed to create {}: {}", output_dir.display(), e),
            )
        })?;

        let out = self
            .runner
            .run(&self.clone_invocation(output_dir))
            .map_err(|e| ScaffoldError::build(name, format!("failed to run git: {}", e)))?;

        if out.success {
            Ok(())
        } else {
            Err(ScaffoldError::build(name, out.diagnostic()))
        }
    }
}
