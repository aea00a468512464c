//! Cookiecutter templates, rendered through the engine's Python entry point

use crate::error::{Result, ScaffoldError};
use crate::runtime::{CommandRunner, Invocation};
use crate::templates::TemplateDescriptor;
use std::path::Path;
use std::sync::Arc;

pub const PYTHON_TOOL: &str = "python3";

/// Calls `cookiecutter.main.cookiecutter` with arguments taken from argv:
/// template, checkout, output_dir, extra_context (JSON)
const RENDER_SCRIPT: &str = "\
import json, sys
from cookiecutter.main import cookiecutter
cookiecutter(
    sys.argv[1],
    checkout=sys.argv[2],
    no_input=True,
    output_dir=sys.argv[3],
    extra_context=json.loads(sys.argv[4]),
)
";

pub struct CookiecutterBackend {
    descriptor: Arc<TemplateDescriptor>,
    runner: Arc<dyn CommandRunner>,
}

impl CookiecutterBackend {
    pub fn new(descriptor: Arc<TemplateDescriptor>, runner: Arc<dyn CommandRunner>) -> Self {
        Self { descriptor, runner }
    }

    /// Template reference in cookiecutter's `gh:` abbreviation
    pub fn template_ref(&self) -> String {
        format!(
            "gh:{}/{}",
            self.descriptor.organization, self.descriptor.repository
        )
    }

    pub fn render_invocation(&self, extra_context: &str, output_dir: &Path) -> Invocation {
        Invocation::new(PYTHON_TOOL).args([
            "-c".to_string(),
            RENDER_SCRIPT.to_string(),
            self.template_ref(),
            self.descriptor.branch.clone(),
            output_dir.display().to_string(),
            extra_context.to_string(),
        ])
    }

    /// Render with `no_input` forced; prompting already happened during collection
    pub fn build(&self, extra_context: &str, output_dir: &Path) -> Result<()> {
        let name = &self.descriptor.name;
        let out = self
            .runner
            .run(&self.render_invocation(extra_context, output_dir))
            .map_err(|e| ScaffoldError::build(name, format!("failed to run cookiecutter: {}", e)))?;

        if out.success {
            Ok(())
        } else {
            Err(ScaffoldError::build(name, out.diagnostic()))
        }
    }
}
