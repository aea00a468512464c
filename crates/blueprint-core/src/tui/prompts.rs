//! Charm-style CLI prompts using cliclack

use crate::backends::BackendContext;
use crate::collect::Prompter;
use crate::config::{credentials, SourceConfig};
use crate::driver::{ScaffoldDriver, ScaffoldRequest, SchemaState};
use crate::templates::{load_registry, SourceClient, TemplateInstance};
use anyhow::Result;
use console::style;
use std::io;
use std::path::PathBuf;

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Registry index of the template to use
    pub template: Option<usize>,

    /// Project directory to create
    pub directory: Option<PathBuf>,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// [`Prompter`] backed by cliclack's inline prompts
#[derive(Debug, Default, Clone, Copy)]
pub struct CliclackPrompter;

impl Prompter for CliclackPrompter {
    fn input(&mut self, prompt: &str, default: Option<&str>) -> io::Result<Option<String>> {
        let mut input = cliclack::input(prompt).required(false);
        if let Some(default) = default {
            input = input.placeholder(default).default_input(default);
        }
        let answer: String = input.interact()?;
        Ok((!answer.trim().is_empty()).then_some(answer))
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> io::Result<Option<bool>> {
        cliclack::confirm(prompt)
            .initial_value(default)
            .interact()
            .map(Some)
    }

    fn select(
        &mut self,
        prompt: &str,
        choices: &[String],
        default: Option<&str>,
    ) -> io::Result<Option<String>> {
        let mut select = cliclack::select(prompt);
        for choice in choices {
            select = select.item(choice.clone(), choice, "");
        }
        if let Some(default) = default.filter(|d| choices.iter().any(|c| c == d)) {
            select = select.initial_value(default.to_string());
        }
        select.interact().map(Some)
    }

    fn multiselect(
        &mut self,
        prompt: &str,
        choices: &[String],
        defaults: &[String],
    ) -> io::Result<Option<Vec<String>>> {
        let mut multi = cliclack::multiselect(prompt);
        for choice in choices {
            multi = multi.item(choice.clone(), choice, "");
        }
        multi
            .initial_values(defaults.to_vec())
            .required(false)
            .interact()
            .map(Some)
    }

    fn confirm_build(&mut self, template: &str, summary: &[(String, String)]) -> io::Result<bool> {
        if summary.is_empty() {
            cliclack::log::info("This template takes no configuration")?;
        } else {
            let width = summary.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
            let body = summary
                .iter()
                .map(|(key, value)| format!("{:width$}  {}", style(key).bold(), value, width = width))
                .collect::<Vec<_>>()
                .join("\n");
            cliclack::note("Configuration", body)?;
        }

        let proceed = cliclack::confirm(format!("Create project from {}?", template))
            .initial_value(true)
            .interact()?;
        if proceed {
            cliclack::log::step(format!("Building {}, this may take a while...", template))?;
        }
        Ok(proceed)
    }
}

/// Run the interactive create flow against the registry named by `config`
pub async fn run(config: SourceConfig, args: CreateArgs) -> Result<()> {
    cliclack::intro(style(" blueprint ").on_cyan().black())?;

    match credentials::github_username() {
        Some(user) => cliclack::log::info(format!("GitHub user: {}", user))?,
        None if config.token.is_none() => cliclack::log::warning(
            "No GitHub credential found; private registries will be rejected",
        )?,
        None => {}
    }

    let context = BackendContext::system(SourceClient::new(config)?);
    let instances = load_templates(&context).await?;

    let index = select_template(&instances, args.template)?;
    let output_dir = select_directory(&instances[index], &args)?;

    let request = ScaffoldRequest {
        index,
        output_dir,
        auto_confirm: args.yes,
    };
    let mut driver = ScaffoldDriver::new(&instances);
    let report = driver.run(&request, &mut CliclackPrompter).await?;

    if report.schema_state == SchemaState::NoSchema {
        cliclack::log::remark("No configuration schema was used for this template")?;
    }

    cliclack::outro(format!(
        "Project {} created in {}",
        style(&report.template).green(),
        report.output_dir.display()
    ))?;

    Ok(())
}

async fn load_templates(context: &BackendContext) -> Result<Vec<TemplateInstance>> {
    let spinner = cliclack::spinner();
    spinner.start("Loading templates...");

    let load = match load_registry(context).await {
        Ok(load) => load,
        Err(e) => {
            spinner.error("Failed to load templates");
            return Err(e.into());
        }
    };
    spinner.stop(format!("{} templates available", load.instances.len()));

    if let Some(warning) = &load.version_warning {
        cliclack::log::warning(format!(
            "Version warning: {}",
            warning.lines().next().unwrap_or(warning)
        ))?;
    }
    for skipped in &load.skipped {
        cliclack::log::warning(format!("Skipping {}: {}", skipped.name, skipped.error))?;
    }

    if load.instances.is_empty() {
        anyhow::bail!("No templates found.");
    }
    Ok(load.instances)
}

fn select_template(instances: &[TemplateInstance], specified: Option<usize>) -> Result<usize> {
    if let Some(index) = specified {
        let instance = instances.get(index).ok_or_else(|| {
            anyhow::anyhow!(
                "Template {} not found. Run `blueprint list` to see the {} available templates.",
                index,
                instances.len()
            )
        })?;
        cliclack::log::info(format!(
            "Template: {} - {}",
            instance.name(),
            instance.description()
        ))?;
        return Ok(index);
    }

    if let [only] = instances {
        cliclack::log::info(format!(
            "Using template: {} - {}",
            only.name(),
            only.description()
        ))?;
        return Ok(0);
    }

    let mut select = cliclack::select("Select a template");
    for (idx, instance) in instances.iter().enumerate() {
        select = select.item(
            idx,
            instance.name(),
            format!("{} [{}]", instance.description(), instance.backend().kind_name()),
        );
    }
    Ok(select.interact()?)
}

/// `.` when the backend makes its own folder, `./<template name>` otherwise
fn default_directory(instance: &TemplateInstance) -> String {
    if instance.backend().creates_project_dir() {
        ".".to_string()
    } else {
        format!("./{}", instance.name())
    }
}

fn select_directory(instance: &TemplateInstance, args: &CreateArgs) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let path = if let Some(dir) = &args.directory {
        let p = if dir.is_absolute() {
            dir.clone()
        } else {
            current_dir.join(dir)
        };
        cliclack::log::info(format!("Using directory: {}", p.display()))?;
        p
    } else {
        let default = default_directory(instance);
        let input: String = cliclack::input("Project directory")
            .placeholder(&default)
            .default_input(&default)
            .interact()?;

        if input.is_empty() || input == "." {
            current_dir
        } else {
            let p = PathBuf::from(&input);
            if p.is_absolute() {
                p
            } else {
                current_dir.join(p)
            }
        }
    };

    if let Some(parent) = path.parent() {
        if !parent.exists() && parent != std::path::Path::new("") {
            anyhow::bail!("Parent directory does not exist: {}", parent.display());
        }
    }

    // Builds neither clean nor merge existing content
    if path.is_dir() {
        if let Ok(entries) = std::fs::read_dir(&path) {
            let count = entries.count();
            if count > 0 {
                cliclack::log::warning(format!("Directory has {} existing items", count))?;

                let confirm = if args.yes {
                    true
                } else {
                    cliclack::confirm("Continue anyway?")
                        .initial_value(false)
                        .interact()?
                };

                if !confirm {
                    anyhow::bail!("Setup cancelled.");
                }
            }
        }
    }

    Ok(path)
}
