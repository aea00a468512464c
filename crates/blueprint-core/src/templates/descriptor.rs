//! Registry document and template descriptor types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Schema file used when a registry entry has no `configPath`
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Build strategy named by a registry entry's `type`
///
/// Unrecognized strings are kept as [`TemplateKind::Unknown`] so the
/// descriptor can still be listed and the factory can report the reason.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TemplateKind {
    Nix,
    Cookiecutter,
    GitRepo,
    Unknown(String),
}

impl TemplateKind {
    pub fn as_str(&self) -> &str {
        match self {
            TemplateKind::Nix => "nix",
            TemplateKind::Cookiecutter => "cookiecutter",
            TemplateKind::GitRepo => "gitRepo",
            TemplateKind::Unknown(raw) => raw,
        }
    }
}

impl From<String> for TemplateKind {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "nix" => TemplateKind::Nix,
            "cookiecutter" => TemplateKind::Cookiecutter,
            "gitRepo" | "git_repo" | "git" => TemplateKind::GitRepo,
            _ => TemplateKind::Unknown(raw),
        }
    }
}

impl From<&str> for TemplateKind {
    fn from(raw: &str) -> Self {
        TemplateKind::from(raw.to_string())
    }
}

impl From<TemplateKind> for String {
    fn from(kind: TemplateKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One template as published in the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: TemplateKind,
    pub organization: String,
    pub repository: String,
    pub branch: String,
    /// Path of the template's own schema file; unused by git templates
    pub config_path: String,
}

impl TemplateDescriptor {
    /// HTTPS clone URL of the template repository
    pub fn repository_url(&self) -> String {
        format!(
            "https://github.com/{}/{}.git",
            self.organization, self.repository
        )
    }

    /// Web URL of the configured branch
    pub fn browse_url(&self) -> String {
        format!(
            "https://github.com/{}/{}/tree/{}",
            self.organization, self.repository, self.branch
        )
    }
}

impl fmt::Display for TemplateDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} <{}>",
            self.name,
            self.description,
            self.browse_url()
        )
    }
}

/// A registry entry exactly as written in the registry document
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: TemplateKind,
    pub organization: String,
    pub repository: String,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default, rename = "configPath", alias = "config_path")]
    pub config_path: Option<String>,
}

impl RegistryEntry {
    /// Fill in defaults: the registry branch and [`DEFAULT_CONFIG_PATH`]
    pub fn into_descriptor(self, default_branch: &str) -> TemplateDescriptor {
        TemplateDescriptor {
            name: self.name,
            description: self.description,
            kind: self.kind,
            organization: self.organization,
            repository: self.repository,
            branch: self
                .branch
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| default_branch.to_string()),
            config_path: self
                .config_path
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string()),
        }
    }
}

/// Root registry document (`templates.yaml`)
///
/// Entries stay as raw YAML until [`RegistryManifest::entries`] so one
/// malformed entry cannot fail the whole document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryManifest {
    #[serde(default)]
    pub version: Option<serde_yaml::Value>,

    #[serde(default)]
    pub templates: Vec<serde_yaml::Value>,
}

impl RegistryManifest {
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let manifest: Option<RegistryManifest> = serde_yaml::from_str(content)?;
        Ok(manifest.unwrap_or_default())
    }

    /// Version string of the registry, whether written as a string or a number
    pub fn version_string(&self) -> Option<String> {
        match self.version.as_ref()? {
            serde_yaml::Value::String(s) => Some(s.clone()),
            serde_yaml::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Parse each entry independently, labelling failures with the entry's name or position
    pub fn entries(&self) -> Vec<Result<RegistryEntry, (String, serde_yaml::Error)>> {
        self.templates
            .iter()
            .enumerate()
            .map(|(idx, raw)| {
                serde_yaml::from_value::<RegistryEntry>(raw.clone()).map_err(|e| {
                    let label = raw
                        .get("name")
                        .and_then(|n| n.as_str())
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("entry #{}", idx + 1));
                    (label, e)
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY: &str = r#"
version: "1.0.0"
templates:
  - name: python
    description: Python project with uv
    type: nix
    organization: A3DAndre
    repository: demo
  - name: data-pipeline
    description: Cookiecutter pipeline
    type: cookiecutter
    organization: A3Data
    repository: cookie-pipeline
    branch: develop
    configPath: cookiecutter.yaml
  - name: starter
    description: Plain starter repo
    type: gitRepo
    organization: org
    repository: repo
  - description: entry without a name
    type: nix
"#;

    #[test]
    fn test_parse_registry() {
        let manifest = RegistryManifest::from_yaml(REGISTRY).unwrap();
        assert_eq!(manifest.version_string().as_deref(), Some("1.0.0"));

        let entries = manifest.entries();
        assert_eq!(entries.len(), 4);
        assert!(entries[3].is_err());
        assert_eq!(entries[3].as_ref().unwrap_err().0, "entry #4");

        let descriptors: Vec<_> = entries
            .into_iter()
            .filter_map(Result::ok)
            .map(|e| e.into_descriptor("main"))
            .collect();

        assert_eq!(descriptors[0].kind, TemplateKind::Nix);
        assert_eq!(descriptors[0].branch, "main");
        assert_eq!(descriptors[0].config_path, DEFAULT_CONFIG_PATH);

        assert_eq!(descriptors[1].kind, TemplateKind::Cookiecutter);
        assert_eq!(descriptors[1].branch, "develop");
        assert_eq!(descriptors[1].config_path, "cookiecutter.yaml");

        assert_eq!(descriptors[2].kind, TemplateKind::GitRepo);
        assert_eq!(
            descriptors[2].repository_url(),
            "https://github.com/org/repo.git"
        );
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let kind: TemplateKind = serde_yaml::from_str("copier").unwrap();
        assert_eq!(kind, TemplateKind::Unknown("copier".to_string()));
        assert_eq!(kind.to_string(), "copier");
        assert_eq!(TemplateKind::from("git_repo"), TemplateKind::GitRepo);
    }

    #[test]
    fn test_numeric_version_and_empty_document() {
        let manifest = RegistryManifest::from_yaml("version: 1\ntemplates: []\n").unwrap();
        assert_eq!(manifest.version_string().as_deref(), Some("1"));

        let empty = RegistryManifest::from_yaml("").unwrap();
        assert!(empty.templates.is_empty());
        assert!(empty.version_string().is_none());
    }

    #[test]
    fn test_descriptor_display_and_json() {
        let descriptor = TemplateDescriptor {
            name: "starter".into(),
            description: "Plain starter repo".into(),
            kind: TemplateKind::GitRepo,
            organization: "org".into(),
            repository: "repo".into(),
            branch: "main".into(),
            config_path: DEFAULT_CONFIG_PATH.into(),
        };
        assert_eq!(
            descriptor.to_string(),
            "starter - Plain starter repo <https://github.com/org/repo/tree/main>"
        );

        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["type"], "gitRepo");
        assert_eq!(json["configPath"], "config.yaml");
    }
}
