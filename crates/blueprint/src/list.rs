//! Non-interactive registry listing

use anyhow::Result;
use blueprint_core::templates::{load_registry, RegistryLoad};
use blueprint_core::{BackendContext, SourceClient, SourceConfig, TemplateDescriptor};
use colored::Colorize;

pub async fn run(config: SourceConfig, json: bool) -> Result<()> {
    let context = BackendContext::system(SourceClient::new(config)?);
    let load = load_registry(&context).await?;

    if json {
        let descriptors: Vec<&TemplateDescriptor> =
            load.instances.iter().map(|i| i.descriptor()).collect();
        println!("{}", serde_json::to_string_pretty(&descriptors)?);
    } else {
        print!("{}", render(&load));
    }

    for skipped in &load.skipped {
        eprintln!(
            "{} skipped {}: {}",
            "warning:".yellow().bold(),
            skipped.name,
            skipped.error
        );
    }
    if let Some(warning) = &load.version_warning {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }
    Ok(())
}

fn render(load: &RegistryLoad) -> String {
    if load.instances.is_empty() {
        return format!("{}\n", "No templates found.".dimmed());
    }
    load.instances
        .iter()
        .enumerate()
        .map(|(idx, instance)| {
            format!(
                "[{}] {} - {} {}\n",
                idx,
                instance.name().bold(),
                instance.description(),
                format!("({})", instance.backend().kind_name()).dimmed()
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_core::templates::build_registry;
    use blueprint_core::TemplateKind;

    fn descriptor(name: &str, kind: &str) -> TemplateDescriptor {
        TemplateDescriptor {
            name: name.to_string(),
            description: format!("{} starter", name),
            kind: TemplateKind::from(kind),
            organization: "org".into(),
            repository: name.to_string(),
            branch: "main".into(),
            config_path: "config.yaml".into(),
        }
    }

    #[test]
    fn renders_indexed_lines() {
        colored::control::set_override(false);
        let context = BackendContext::system(SourceClient::new(SourceConfig::default()).unwrap());
        let load = build_registry(
            vec![descriptor("python", "nix"), descriptor("web", "gitRepo")],
            &context,
        );

        assert_eq!(
            render(&load),
            "[0] python - python starter (nix)\n[1] web - web starter (gitRepo)\n"
        );
    }
}
