//! Shared HTTP plumbing for the search providers.

use std::time::Duration;

use sourcer_core::error::SearchError;
use tracing::warn;

pub(crate) fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
}

pub(crate) fn send_error(e: reqwest::Error) -> SearchError {
    if e.is_timeout() {
        SearchError::Network(format!("request timed out: {e}"))
    } else {
        SearchError::Network(e.to_string())
    }
}

/// Map non-success statuses onto the search error taxonomy.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, SearchError> {
    let status = response.status().as_u16();
    match status {
        200..=299 => Ok(response),
        401 | 403 => Err(SearchError::AuthenticationFailed(format!(
            "search provider rejected the API key (status {status})"
        ))),
        _ => {
            let message = response.text().await.unwrap_or_default();
            Err(SearchError::ApiError {
                status_code: status,
                message,
            })
        }
    }
}
