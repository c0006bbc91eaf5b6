use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::FetchError;

/// Workflow file the build watchdog reads when no path is given
pub const DEFAULT_WORKFLOW_PATH: &str = ".github/workflows/build.yaml";

/// A file in a hosted repository, pinned to a commit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkflowFileRequest {
    pub org: String,
    pub repo: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub path: String,
}

impl WorkflowFileRequest {
    pub fn new(
        org: impl Into<String>,
        repo: impl Into<String>,
        git_ref: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            org: org.into(),
            repo: repo.into(),
            git_ref: git_ref.into(),
            path: path.into(),
        }
    }

    /// Rejects blank components and `.`/`..` segments in the ref or path.
    /// Nothing else about the ref or path is inspected.
    pub fn validate(&self) -> Result<(), FetchError> {
        let fields = [
            ("org", &self.org),
            ("repo", &self.repo),
            ("ref", &self.git_ref),
            ("path", &self.path),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(FetchError::InvalidRequest(format!("{} must not be empty", name)));
            }
        }

        for (name, value) in [("ref", &self.git_ref), ("path", &self.path)] {
            if value.split('/').any(|segment| segment == "." || segment == "..") {
                return Err(FetchError::InvalidRequest(format!(
                    "{} must not contain '.' or '..' segments: {:?}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Appends `<org>/<repo>/raw/<ref>/<path>` to the base path.
    ///
    /// Each component stays inside the path: characters such as `?` and `#`
    /// are percent-encoded rather than starting a query or fragment. Any
    /// query or fragment on `base` is dropped.
    pub fn raw_file_url(&self, base: &Url) -> Result<Url, FetchError> {
        self.validate()?;

        let mut joined = base.clone();
        joined.set_query(None);
        joined.set_fragment(None);

        joined
            .path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl {
                url: base.to_string(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            })?
            .pop_if_empty()
            .push(&self.org)
            .push(&self.repo)
            .push("raw")
            .extend(self.git_ref.split('/'))
            .extend(self.path.split('/'));

        Ok(joined)
    }
}
