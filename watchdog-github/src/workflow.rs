use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use tracing::{debug, info, warn};
use watchdog_core::{FetchError, TransportError, WorkflowFileRequest};

use crate::site::GitHubApiSite;

/// Fetch a raw file from `<base>/<org>/<repo>/raw/<ref>/<path>`.
///
/// One GET, no retries, nothing cached. Any non-2xx answer is an error:
/// 404 becomes [`FetchError::NotFound`], everything else [`FetchError::Remote`].
pub async fn get_workflow_file(
    site: &GitHubApiSite,
    org: &str,
    repo: &str,
    git_ref: &str,
    path: &str,
) -> Result<String, FetchError> {
    let request = WorkflowFileRequest::new(org, repo, git_ref, path);
    fetch_workflow_file(site, &request).await
}

pub async fn fetch_workflow_file(
    site: &GitHubApiSite,
    request: &WorkflowFileRequest,
) -> Result<String, FetchError> {
    let url = site.raw_file_url(request)?;

    info!("Fetching workflow file from: {}", url);

    let response = site.client().get(&url).await.map_err(|source| match source {
        TransportError::Body(reason) => FetchError::Decode {
            url: url.to_string(),
            reason,
        },
        source => FetchError::Transport {
            url: url.to_string(),
            source,
        },
    })?;

    if response.status == StatusCode::NOT_FOUND {
        warn!(url = %url, "Workflow file not found");
        return Err(FetchError::NotFound {
            url: url.to_string(),
        });
    }

    if !response.status.is_success() {
        warn!(url = %url, status = response.status.as_u16(), "Remote refused workflow file request");
        return Err(FetchError::Remote {
            url: url.to_string(),
            status: response.status.as_u16(),
        });
    }

    debug!(
        url = %url,
        content_type = ?response.headers.get(CONTENT_TYPE),
        bytes = response.body.len(),
        "Workflow file received"
    );

    String::from_utf8(response.body).map_err(|e| FetchError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}
