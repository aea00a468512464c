//! Retrieval of the registry document and template schemas
//!
//! Both live in GitHub repositories and are read through the contents API
//! with the raw media type, so no base64 decoding is needed.

use super::descriptor::{RegistryManifest, TemplateDescriptor};
use super::schema::ConfigSchema;
use crate::config::SourceConfig;
use crate::error::{Result, ScaffoldError};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use url::Url;

const RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";

/// HTTP client bound to one [`SourceConfig`]
#[derive(Debug, Clone)]
pub struct SourceClient {
    config: SourceConfig,
    client: reqwest::Client,
}

impl SourceClient {
    pub fn new(config: SourceConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(&config.user_agent);
        // Local mirrors are never reached through a proxy
        if is_loopback(&config.api_url) {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| ScaffoldError::retrieval("HTTP client", e))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// `{api}/repos/{owner}/{repo}/contents/{path}?ref={branch}`, preserving any base path
    pub fn contents_url(&self, owner: &str, repo: &str, path: &str, branch: &str) -> Result<Url> {
        let mut url = self.config.api_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ScaffoldError::retrieval(
                    path,
                    format!("API URL cannot have path segments: {}", self.config.api_url),
                )
            })?;
            segments
                .pop_if_empty()
                .extend(["repos", owner, repo, "contents"])
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        url.query_pairs_mut().append_pair("ref", branch);
        Ok(url)
    }

    /// Fetch one file's raw text
    ///
    /// 401 is reported as [`ScaffoldError::Authentication`], as are 403 and
    /// 404 when no token was sent. Every other failure, including an empty
    /// body, is a [`ScaffoldError::Retrieval`].
    pub async fn fetch_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: &str,
    ) -> Result<String> {
        let url = self.contents_url(owner, repo, path, branch)?;
        tracing::debug!(%url, "fetching remote file");

        let mut request = self.client.get(url.clone()).header(ACCEPT, RAW_MEDIA_TYPE);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ScaffoldError::retrieval(url.as_str(), e))?;

        check_status(&url, response.status(), self.config.token.is_some())?;

        let content = response
            .text()
            .await
            .map_err(|e| ScaffoldError::retrieval(url.as_str(), e))?;
        if content.trim().is_empty() {
            return Err(ScaffoldError::retrieval(url.as_str(), "empty response body"));
        }
        Ok(content)
    }

    /// Fetch and parse the registry document named by the config
    pub async fn fetch_registry(&self) -> Result<RegistryManifest> {
        let content = self
            .fetch_file(
                &self.config.owner,
                &self.config.repo,
                &self.config.path,
                &self.config.branch,
            )
            .await?;
        RegistryManifest::from_yaml(&content).map_err(|e| {
            ScaffoldError::retrieval(format!("registry {}", self.config.path), e)
        })
    }

    /// Fetch and parse a template's schema file (`configPath`) from its own repository
    pub async fn fetch_schema(&self, descriptor: &TemplateDescriptor) -> Result<ConfigSchema> {
        let content = self
            .fetch_file(
                &descriptor.organization,
                &descriptor.repository,
                &descriptor.config_path,
                &descriptor.branch,
            )
            .await?;
        ConfigSchema::from_yaml(&content)
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain == "localhost",
        Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

/// Map a response status onto the error taxonomy
pub(crate) fn check_status(url: &Url, status: StatusCode, authenticated: bool) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }
    // GitHub hides private repositories from anonymous callers behind 403/404
    let message = match status {
        StatusCode::UNAUTHORIZED if authenticated => Some("credential rejected"),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND
            if !authenticated =>
        {
            Some("no credential available")
        }
        _ => None,
    };
    if let Some(message) = message {
        return Err(ScaffoldError::Authentication {
            url: url.to_string(),
            message: format!("{} (HTTP {})", message, status.as_u16()),
        });
    }
    Err(ScaffoldError::retrieval(
        url.as_str(),
        format!("HTTP {}", status),
    ))
}
