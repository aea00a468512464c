//! Registry location and credentials
//!
//! A [`SourceConfig`] is built once per process and threaded into the
//! [`SourceClient`](crate::templates::SourceClient). Nothing here is global.

pub mod credentials;

use crate::error::{Result, ScaffoldError};
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_REGISTRY_OWNER: &str = "A3DAndre";
pub const DEFAULT_REGISTRY_REPO: &str = "templates-cli";
pub const DEFAULT_REGISTRY_BRANCH: &str = "main";
pub const DEFAULT_REGISTRY_PATH: &str = "templates.yaml";

/// Environment variables overriding the defaults above
pub const API_URL_ENV: &str = "BLUEPRINT_API_URL";
pub const REGISTRY_OWNER_ENV: &str = "BLUEPRINT_REGISTRY_OWNER";
pub const REGISTRY_REPO_ENV: &str = "BLUEPRINT_REGISTRY_REPO";
pub const REGISTRY_BRANCH_ENV: &str = "BLUEPRINT_REGISTRY_BRANCH";
pub const REGISTRY_PATH_ENV: &str = "BLUEPRINT_REGISTRY_PATH";

/// Where the registry lives and how to authenticate against it
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Base URL of the contents API (GitHub or a compatible server)
    pub api_url: Url,
    pub owner: String,
    pub repo: String,
    /// Registry branch; also the default branch for descriptors that omit one
    pub branch: String,
    /// Path of the registry document inside the repository
    pub path: String,
    /// Bearer token sent with every request, if any
    pub token: Option<String>,
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            owner: DEFAULT_REGISTRY_OWNER.to_string(),
            repo: DEFAULT_REGISTRY_REPO.to_string(),
            branch: DEFAULT_REGISTRY_BRANCH.to_string(),
            path: DEFAULT_REGISTRY_PATH.to_string(),
            token: None,
            user_agent: concat!("blueprint/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl SourceConfig {
    /// Defaults, overridden by environment variables, with the credential resolved
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url_str) = std::env::var(API_URL_ENV) {
            config.api_url = Url::parse(&url_str).map_err(|e| {
                ScaffoldError::retrieval("registry", format!("invalid API URL '{}': {}", url_str, e))
            })?;
        }
        if let Ok(owner) = std::env::var(REGISTRY_OWNER_ENV) {
            config.owner = owner;
        }
        if let Ok(repo) = std::env::var(REGISTRY_REPO_ENV) {
            config.repo = repo;
        }
        if let Ok(branch) = std::env::var(REGISTRY_BRANCH_ENV) {
            config.branch = branch;
        }
        if let Ok(path) = std::env::var(REGISTRY_PATH_ENV) {
            config.path = path;
        }

        config.token = credentials::resolve_token();
        Ok(config)
    }

    /// Point at another registry repository, keeping unspecified parts
    pub fn with_registry(
        mut self,
        owner: Option<String>,
        repo: Option<String>,
        branch: Option<String>,
    ) -> Self {
        if let Some(owner) = owner {
            self.owner = owner;
        }
        if let Some(repo) = repo {
            self.repo = repo;
        }
        if let Some(branch) = branch {
            self.branch = branch;
        }
        self
    }

    pub fn with_api_url(mut self, api_url: Url) -> Self {
        self.api_url = api_url;
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }
}
