pub mod openmeteo;
pub mod types;
pub mod weatherapi;

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("request to {provider} failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("{provider} reported an error: {reason}")]
    Provider {
        provider: &'static str,
        reason: String,
    },
    #[error("failed to decode {provider} payload: {source}")]
    Decode {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Issue a GET request and return the parsed JSON body.
///
/// Transport failures and non-success statuses surface immediately; no
/// retries are attempted. In-band provider error fields are the callers'
/// concern since each provider encodes them differently.
pub(crate) async fn get_json(
    client: &Client,
    provider: &'static str,
    url: &str,
    params: &[(&str, &str)],
) -> Result<Value, UpstreamError> {
    let response = client
        .get(url)
        .query(params)
        .send()
        .await
        .map_err(|source| UpstreamError::Transport { provider, source })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| UpstreamError::Transport { provider, source })?;

    if !status.is_success() {
        return Err(UpstreamError::Status {
            provider,
            status,
            body: truncate_body(&body),
        });
    }

    serde_json::from_str(&body).map_err(|source| UpstreamError::Decode { provider, source })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_body_short_input_unchanged() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn test_truncate_body_caps_long_input() {
        let long = "x".repeat(500);
        let truncated = truncate_body(&long);
        assert_eq!(truncated.len(), 203);
        assert!(truncated.ends_with("..."));
    }
}
