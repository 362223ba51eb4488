use std::time::Duration;
use thiserror::Error;

/// Failure talking to a device over HTTP.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {peer} timed out after {timeout:?}")]
    Timeout { peer: String, timeout: Duration },

    #[error("request to {peer} failed: {source}")]
    Request {
        peer: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{peer} responded with status {status}: {body}")]
    Status {
        peer: String,
        status: u16,
        body: String,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl TransportError {
    pub fn peer(&self) -> Option<&str> {
        match self {
            Self::Timeout { peer, .. } | Self::Request { peer, .. } | Self::Status { peer, .. } => {
                Some(peer)
            }
            Self::Client(_) => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
