//! Evaluation endpoint client.
//!
//! [`EvaluationSource`] is the seam between the controller and the network:
//! [`HttpSource`] talks to the real server with a blocking `ureq` agent,
//! tests substitute scripted sources.

use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::config::ServerConfig;
use crate::model::EvaluationResponse;

/// Transport or decoding failure while fetching an evaluation.
///
/// Every variant collapses to the same generic notice in the UI; the detail
/// only reaches the log.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, DNS, TLS or timeout failure.
    #[error("request to {url} failed: {message}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Underlying transport error text.
        message: String,
    },
    /// Non-2xx response without an `error` body.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// The body could not be read.
    #[error("failed to read response body: {0}")]
    Body(#[from] std::io::Error),
    /// The body is not valid JSON or lacks a series.
    #[error("malformed evaluation payload: {0}")]
    Parse(#[from] serde_json::Error),
    /// The request worker panicked before producing an outcome.
    #[error("evaluation worker panicked: {0}")]
    Panicked(String),
}

/// Something that can run one evaluation request.
pub trait EvaluationSource: Send + Sync {
    /// Issues one request and blocks until it settles.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] for transport or decoding failures.
    /// Application-level failures are `Ok(EvaluationResponse::Failed(_))`.
    fn fetch(&self) -> Result<EvaluationResponse, FetchError>;
}

/// `GET` client for the evaluation endpoint.
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    agent: ureq::Agent,
}

impl HttpSource {
    /// Builds a client for `url` with the given request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    /// Builds a client from the `[server]` config section.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            config.evaluate_url(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Target URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl EvaluationSource for HttpSource {
    fn fetch(&self) -> Result<EvaluationResponse, FetchError> {
        debug!(url = %self.url, "requesting evaluation");
        match self.agent.get(&self.url).call() {
            Ok(resp) => {
                let body = resp.into_string()?;
                Ok(EvaluationResponse::from_json(&body)?)
            }
            // The upstream reports failures as 404/500 with an `error` body.
            Err(ureq::Error::Status(status, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                match EvaluationResponse::from_json(&body) {
                    Ok(failed @ EvaluationResponse::Failed(_)) => Ok(failed),
                    _ => Err(FetchError::Status {
                        url: self.url.clone(),
                        status,
                    }),
                }
            }
            Err(ureq::Error::Transport(t)) => Err(FetchError::Transport {
                url: self.url.clone(),
                message: t.to_string(),
            }),
        }
    }
}
