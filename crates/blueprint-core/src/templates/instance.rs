//! A registry descriptor bound to its build strategy

use super::{CollectedValues, ConfigSchema, SourceClient, TemplateDescriptor};
use crate::backends::{Backend, EncodedConfig};
use crate::error::Result;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// The unit handed to callers: one template, one backend, never shared
pub struct TemplateInstance {
    descriptor: Arc<TemplateDescriptor>,
    backend: Backend,
    client: SourceClient,
}

impl TemplateInstance {
    pub(crate) fn new(
        descriptor: Arc<TemplateDescriptor>,
        backend: Backend,
        client: SourceClient,
    ) -> Self {
        Self {
            descriptor,
            backend,
            client,
        }
    }

    pub fn descriptor(&self) -> &TemplateDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn description(&self) -> &str {
        &self.descriptor.description
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn check_availability(&self) -> Result<bool> {
        self.backend.check_availability()
    }

    /// Fetched fresh on every call
    pub async fn fetch_schema(&self) -> Result<Option<ConfigSchema>> {
        self.backend
            .fetch_schema(&self.client, &self.descriptor)
            .await
    }

    pub fn encode(&self, values: &CollectedValues) -> EncodedConfig {
        self.backend.encode(values)
    }

    pub fn build(&self, config: &EncodedConfig, output_dir: &Path) -> Result<()> {
        tracing::info!(
            template = %self.descriptor.name,
            backend = self.backend.kind_name(),
            output_dir = %output_dir.display(),
            "building template"
        );
        self.backend
            .build(&self.descriptor.name, config, output_dir)
    }
}

impl fmt::Display for TemplateInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.descriptor.fmt(f)
    }
}

impl fmt::Debug for TemplateInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateInstance")
            .field("name", &self.descriptor.name)
            .field("backend", &self.backend.kind_name())
            .finish()
    }
}
