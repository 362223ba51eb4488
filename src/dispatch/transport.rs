//! HTTP transport shared by peer dispatch and the local device adapter.
//!
//! Devices expose `putxml` for commands and `getxml` for status reads, both
//! behind HTTP Basic auth and usually with a self-signed certificate.

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::RequestBuilder;
use std::time::Duration;
use tracing::debug;

use super::error::TransportError;
use crate::config::TransportConfig;
use crate::registry::Credentials;

#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    scheme: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(
        scheme: &str,
        timeout: Duration,
        accept_invalid_certs: bool,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(TransportError::Client)?;

        Ok(Self {
            client,
            scheme: scheme.to_string(),
            timeout,
        })
    }

    pub fn from_config(config: &TransportConfig) -> Result<Self, TransportError> {
        Self::new(
            &config.scheme,
            Duration::from_secs(config.timeout_seconds),
            config.accept_invalid_certs,
        )
    }

    /// Posts an XML command document to `address` and returns the response body.
    pub async fn post_xml(
        &self,
        address: &str,
        credentials: &Credentials,
        document: String,
    ) -> Result<String, TransportError> {
        let url = format!("{}://{}/putxml", self.scheme, address);
        debug!("POST {} ({} bytes)", url, document.len());
        let request = self
            .client
            .post(&url)
            .header(AUTHORIZATION, credentials.authorization())
            .header(CONTENT_TYPE, "text/xml")
            .body(document);
        self.execute(address, request).await
    }

    /// Reads the status subtree at `location`, e.g. `/Status/Call`.
    pub async fn get_xml(
        &self,
        address: &str,
        credentials: &Credentials,
        location: &str,
    ) -> Result<String, TransportError> {
        let url = format!("{}://{}/getxml", self.scheme, address);
        debug!("GET {} location={}", url, location);
        let request = self
            .client
            .get(&url)
            .query(&[("location", location)])
            .header(AUTHORIZATION, credentials.authorization())
            .header(ACCEPT, "text/xml");
        self.execute(address, request).await
    }

    async fn execute(&self, peer: &str, request: RequestBuilder) -> Result<String, TransportError> {
        let response = request.send().await.map_err(|e| self.classify(peer, e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(peer, e))?;

        if !status.is_success() {
            return Err(TransportError::Status {
                peer: peer.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    fn classify(&self, peer: &str, error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout {
                peer: peer.to_string(),
                timeout: self.timeout,
            }
        } else {
            TransportError::Request {
                peer: peer.to_string(),
                source: error,
            }
        }
    }
}
