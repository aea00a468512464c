//! The scaffolding pipeline for one selected template
//!
//! `Listing → Selected → SchemaLoaded|NoSchema → Collecting → Encoded →
//! Building → Done`, with `Failed` reachable from any step after selection.

use crate::collect::{collect_values, Prompter};
use crate::error::{ErrorKind, Result, ScaffoldError};
use crate::templates::{ConfigSchema, TemplateInstance};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Listing,
    Selected,
    SchemaLoaded,
    NoSchema,
    Collecting,
    Encoded,
    Building,
    Done,
    Failed,
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DriverState::Listing => "listing",
            DriverState::Selected => "selected",
            DriverState::SchemaLoaded => "schema-loaded",
            DriverState::NoSchema => "no-schema",
            DriverState::Collecting => "collecting",
            DriverState::Encoded => "encoded",
            DriverState::Building => "building",
            DriverState::Done => "done",
            DriverState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// How the schema step ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    Loaded,
    NoSchema,
}

#[derive(Debug, Clone)]
pub struct ScaffoldRequest {
    /// Position in the listed instances
    pub index: usize,
    pub output_dir: PathBuf,
    /// Skip the summary confirmation
    pub auto_confirm: bool,
}

#[derive(Debug, Clone)]
pub struct ScaffoldReport {
    pub template: String,
    pub output_dir: PathBuf,
    pub state_trail: Vec<DriverState>,
    pub schema_state: SchemaState,
}

/// Runs one scaffold over a listing of instances
///
/// A driver is used for a single run; its state and trail describe that run.
pub struct ScaffoldDriver<'a> {
    instances: &'a [TemplateInstance],
    state: DriverState,
    trail: Vec<DriverState>,
}

impl<'a> ScaffoldDriver<'a> {
    pub fn new(instances: &'a [TemplateInstance]) -> Self {
        Self {
            instances,
            state: DriverState::Listing,
            trail: vec![DriverState::Listing],
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn trail(&self) -> &[DriverState] {
        &self.trail
    }

    pub fn instances(&self) -> &'a [TemplateInstance] {
        self.instances
    }

    /// Look up an instance without changing state
    pub fn select(&self, index: usize) -> Result<&'a TemplateInstance> {
        self.instances
            .get(index)
            .ok_or(ScaffoldError::InvalidSelection {
                index,
                available: self.instances.len(),
            })
    }

    /// Drive the selected template from schema retrieval to a built project
    ///
    /// An out-of-range index leaves the driver in `Listing`; every other
    /// failure moves it to `Failed` and is returned unchanged.
    pub async fn run<P: Prompter + ?Sized>(
        &mut self,
        request: &ScaffoldRequest,
        prompter: &mut P,
    ) -> Result<ScaffoldReport> {
        let instance = self.select(request.index)?;
        self.transition(DriverState::Selected);

        match instance.check_availability() {
            Ok(true) => {}
            Ok(false) => {
                return self.fail(ScaffoldError::UnavailableBackend {
                    template: instance.name().to_string(),
                    tool: instance.backend().tool().to_string(),
                })
            }
            Err(e) => return self.fail(e),
        }

        let (schema, schema_state) = match instance.fetch_schema().await {
            Ok(Some(schema)) => (schema, SchemaState::Loaded),
            Ok(None) => (ConfigSchema::default(), SchemaState::NoSchema),
            Err(e) if e.kind() == ErrorKind::Authentication => return self.fail(e),
            Err(e) => {
                tracing::warn!(template = %instance.name(), error = %e, "continuing without a schema");
                (ConfigSchema::default(), SchemaState::NoSchema)
            }
        };
        self.transition(match schema_state {
            SchemaState::Loaded => DriverState::SchemaLoaded,
            SchemaState::NoSchema => DriverState::NoSchema,
        });

        self.transition(DriverState::Collecting);
        let values = match collect_values(&schema, prompter) {
            Ok(values) => values,
            Err(e) => return self.fail(e),
        };

        let encoded = instance.encode(&values);
        self.transition(DriverState::Encoded);
        tracing::debug!(template = %instance.name(), config = %encoded, "encoded configuration");

        if !request.auto_confirm {
            match prompter.confirm_build(instance.name(), &values.summary_rows()) {
                Ok(true) => {}
                Ok(false) => {
                    return self.fail(ScaffoldError::Collection("cancelled by user".to_string()))
                }
                Err(e) => return self.fail(ScaffoldError::Collection(e.to_string())),
            }
        }

        self.transition(DriverState::Building);
        if let Err(e) = instance.build(&encoded, &request.output_dir) {
            return self.fail(e);
        }
        self.transition(DriverState::Done);

        Ok(ScaffoldReport {
            template: instance.name().to_string(),
            output_dir: request.output_dir.clone(),
            state_trail: self.trail.clone(),
            schema_state,
        })
    }

    fn transition(&mut self, next: DriverState) {
        tracing::debug!(from = %self.state, to = %next, "driver transition");
        self.state = next;
        self.trail.push(next);
    }

    fn fail<T>(&mut self, error: ScaffoldError) -> Result<T> {
        self.transition(DriverState::Failed);
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::BackendContext;
    use crate::collect::testing::ScriptedPrompter;
    use crate::config::SourceConfig;
    use crate::runtime::command::testing::RecordingRunner;
    use crate::templates::{
        build_registry, SourceClient, TemplateDescriptor, TemplateKind, DEFAULT_CONFIG_PATH,
    };
    use std::sync::Arc;
    use url::Url;

    fn descriptor(name: &str, kind: &str) -> TemplateDescriptor {
        TemplateDescriptor {
            name: name.to_string(),
            description: String::new(),
            kind: TemplateKind::from(kind),
            organization: "org".into(),
            repository: name.to_string(),
            branch: "main".into(),
            config_path: DEFAULT_CONFIG_PATH.into(),
        }
    }

    // Nothing listens on port 9 locally, so schema fetches fail fast
    fn unreachable_client() -> SourceClient {
        let api = Url::parse("http://127.0.0.1:9").unwrap();
        SourceClient::new(SourceConfig::default().with_api_url(api)).unwrap()
    }

    fn instances(runner: Arc<RecordingRunner>, kinds: &[(&str, &str)]) -> Vec<TemplateInstance> {
        let context = BackendContext::new(unreachable_client(), runner);
        let descriptors = kinds.iter().map(|(n, k)| descriptor(n, k)).collect();
        build_registry(descriptors, &context).instances
    }

    fn request(index: usize, dir: &std::path::Path) -> ScaffoldRequest {
        ScaffoldRequest {
            index,
            output_dir: dir.join("project"),
            auto_confirm: false,
        }
    }

    #[tokio::test]
    async fn test_git_repo_runs_to_done() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = Arc::new(RecordingRunner::new());
        let list = instances(runner.clone(), &[("starter", "gitRepo")]);
        let mut prompter = ScriptedPrompter::new(vec![]);

        let mut driver = ScaffoldDriver::new(&list);
        let report = driver.run(&request(0, tmp.path()), &mut prompter).await.unwrap();

        assert_eq!(report.template, "starter");
        assert_eq!(report.schema_state, SchemaState::NoSchema);
        assert_eq!(
            report.state_trail,
            [
                DriverState::Listing,
                DriverState::Selected,
                DriverState::NoSchema,
                DriverState::Collecting,
                DriverState::Encoded,
                DriverState::Building,
                DriverState::Done,
            ]
        );
        assert_eq!(driver.state(), DriverState::Done);
        assert!(tmp.path().join("project").is_dir());
        assert_eq!(prompter.summaries.len(), 1);

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "git");
    }

    #[tokio::test]
    async fn test_out_of_range_index_stays_in_listing() {
        let tmp = tempfile::tempdir().unwrap();
        let list = instances(Arc::new(RecordingRunner::new()), &[("starter", "gitRepo")]);
        let mut driver = ScaffoldDriver::new(&list);

        let err = driver
            .run(&request(3, tmp.path()), &mut ScriptedPrompter::new(vec![]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSelection);
        assert_eq!(driver.state(), DriverState::Listing);
        assert_eq!(driver.trail(), [DriverState::Listing]);
    }

    #[tokio::test]
    async fn test_unavailable_nix_fails_before_schema() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = Arc::new(
            RecordingRunner::new()
                .respond(Err(std::io::Error::from(std::io::ErrorKind::NotFound))),
        );
        let list = instances(runner.clone(), &[("python", "nix")]);
        let mut driver = ScaffoldDriver::new(&list);

        let err = driver
            .run(&request(0, tmp.path()), &mut ScriptedPrompter::new(vec![]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnavailableBackend);
        assert!(err.to_string().contains("`nix`"));
        assert_eq!(
            driver.trail(),
            [DriverState::Listing, DriverState::Selected, DriverState::Failed]
        );
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_schema_retrieval_failure_degrades_to_no_schema() {
        let tmp = tempfile::tempdir().unwrap();
        let store = tempfile::tempdir().unwrap();
        std::fs::write(store.path().join("flake.nix"), "{}").unwrap();

        let runner = Arc::new(
            RecordingRunner::new()
                .succeed("nix (Nix) 2.18.1\n")
                .succeed(&format!("{}\n", store.path().display())),
        );
        let list = instances(runner.clone(), &[("python", "nix")]);
        let mut driver = ScaffoldDriver::new(&list);

        let report = driver
            .run(&request(0, tmp.path()), &mut ScriptedPrompter::new(vec![]))
            .await
            .unwrap();
        assert_eq!(report.schema_state, SchemaState::NoSchema);
        assert!(report.output_dir.join("flake.nix").is_file());

        let calls = runner.calls();
        assert_eq!(calls[1].args[0], "build");
        assert!(calls[1].args.last().unwrap().contains("args = { };"));
    }

    #[tokio::test]
    async fn test_declined_confirmation_fails_without_building() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = Arc::new(RecordingRunner::new());
        let list = instances(runner.clone(), &[("starter", "gitRepo")]);
        let mut prompter = ScriptedPrompter::new(vec![]);
        prompter.proceed = false;

        let mut driver = ScaffoldDriver::new(&list);
        let err = driver.run(&request(0, tmp.path()), &mut prompter).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Collection);
        assert_eq!(driver.state(), DriverState::Failed);
        assert!(!driver.trail().contains(&DriverState::Building));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_build_failure_carries_tool_output() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = Arc::new(
            RecordingRunner::new().fail(128, "fatal: Remote branch main not found in upstream origin"),
        );
        let list = instances(runner, &[("starter", "gitRepo")]);
        let mut driver = ScaffoldDriver::new(&list);

        let mut req = request(0, tmp.path());
        req.auto_confirm = true;
        let err = driver
            .run(&req, &mut ScriptedPrompter::new(vec![]))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Build);
        assert!(err.to_string().contains("Remote branch main not found"));
        assert_eq!(
            driver.trail()[driver.trail().len() - 2..],
            [DriverState::Building, DriverState::Failed]
        );
    }
}
