// ApiError - Failure taxonomy for remote calls
//
// Every remote failure is surfaced once at the command boundary;
// there is no retry, no backoff, no circuit breaking.

use std::time::Duration;
use thiserror::Error;

/// Errors from talking to the directory or a node service
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Parse(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Pass a response through, or turn a non-2xx status into ApiError::Server
pub(crate) async fn expect_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Server {
            status: status.as_u16(),
            body,
        })
    }
}

/// Shared HTTP client configuration for both services
pub(crate) fn http_client() -> Result<reqwest::Client, ApiError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .connect_timeout(Duration::from_secs(5))
        .build()?;
    Ok(client)
}
