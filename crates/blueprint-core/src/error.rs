//! Error taxonomy for registry loading, schema retrieval and builds

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScaffoldError>;

/// Coarse classification of a [`ScaffoldError`]
///
/// Callers branch on this instead of matching individual variants, e.g. to
/// tell the user to re-authenticate rather than retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authentication,
    Retrieval,
    UnavailableBackend,
    Build,
    UnknownBackend,
    Collection,
    InvalidSelection,
    Io,
}

#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// Credential rejected (HTTP 401), or missing where the remote hides the resource
    #[error("authentication failed for {url}: {message}")]
    Authentication { url: String, message: String },

    /// Any other failure fetching registry or schema data
    #[error("failed to retrieve {what}: {reason}")]
    Retrieval { what: String, reason: String },

    #[error("template '{template}' needs `{tool}`, which is not installed or not on PATH")]
    UnavailableBackend { template: String, tool: String },

    /// The external build/render/clone step failed; `diagnostic` is the tool's own output
    #[error("failed to build template '{template}':\n{diagnostic}")]
    Build { template: String, diagnostic: String },

    #[error("template '{template}' has unrecognized type '{kind}'")]
    UnknownBackend { template: String, kind: String },

    #[error("input collection failed: {0}")]
    Collection(String),

    #[error("template index {index} out of range ({available} available)")]
    InvalidSelection { index: usize, available: usize },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ScaffoldError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::Retrieval { .. } => ErrorKind::Retrieval,
            Self::UnavailableBackend { .. } => ErrorKind::UnavailableBackend,
            Self::Build { .. } => ErrorKind::Build,
            Self::UnknownBackend { .. } => ErrorKind::UnknownBackend,
            Self::Collection(_) => ErrorKind::Collection,
            Self::InvalidSelection { .. } => ErrorKind::InvalidSelection,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn retrieval(what: impl Into<String>, reason: impl ToString) -> Self {
        Self::Retrieval {
            what: what.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn build(template: impl Into<String>, diagnostic: impl ToString) -> Self {
        Self::Build {
            template: template.into(),
            diagnostic: diagnostic.to_string(),
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Hint shown to the user next to the error message
    pub fn hint(&self) -> Option<&'static str> {
        match self.kind() {
            ErrorKind::Authentication => {
                Some("Run `gh auth login` or set GITHUB_TOKEN, then try again.")
            }
            ErrorKind::UnavailableBackend => {
                Some("Install the missing tool (https://nixos.org/download) and try again.")
            }
            ErrorKind::Build => Some(
                "To report a bug, open an issue at https://github.com/A3Data/templates-cli/issues",
            ),
            _ => None,
        }
    }
}
