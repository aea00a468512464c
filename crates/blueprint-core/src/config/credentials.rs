//! GitHub token lookup

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const TOKEN_ENVS: &[&str] = &["GITHUB_TOKEN", "GH_TOKEN"];
const GITHUB_HOST: &str = "github.com";

/// One host entry of the gh CLI `hosts.yml`
#[derive(Debug, Deserialize)]
struct HostEntry {
    #[serde(default)]
    oauth_token: Option<String>,
    #[serde(default)]
    user: Option<String>,
}

/// Resolve a bearer token: environment first, then the gh CLI login
pub fn resolve_token() -> Option<String> {
    for name in TOKEN_ENVS {
        if let Ok(token) = std::env::var(name) {
            if !token.trim().is_empty() {
                tracing::debug!(source = name, "using token from environment");
                return Some(token.trim().to_string());
            }
        }
    }

    let path = gh_hosts_path()?;
    let token = token_from_hosts_file(&path);
    if token.is_some() {
        tracing::debug!(path = %path.display(), "using token from gh CLI");
    }
    token
}

/// Login name recorded by the gh CLI, if any
pub fn github_username() -> Option<String> {
    let path = gh_hosts_path()?;
    read_github_entry(&path).and_then(|entry| entry.user)
}

fn gh_hosts_path() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("GH_CONFIG_DIR") {
        return Some(PathBuf::from(dir).join("hosts.yml"));
    }
    dirs::home_dir().map(|home| home.join(".config").join("gh").join("hosts.yml"))
}

fn read_github_entry(path: &Path) -> Option<HostEntry> {
    let content = std::fs::read_to_string(path).ok()?;
    let mut hosts: HashMap<String, HostEntry> = match serde_yaml::from_str(&content) {
        Ok(hosts) => hosts,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable gh hosts file");
            return None;
        }
    };
    hosts.remove(GITHUB_HOST)
}

pub(crate) fn token_from_hosts_file(path: &Path) -> Option<String> {
    read_github_entry(path)
        .and_then(|entry| entry.oauth_token)
        .filter(|token| !token.is_empty())
}
