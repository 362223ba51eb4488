//! Remote command dispatch to peer devices.
//!
//! Two fan-out flavours are offered: [`CommandDispatch::send_all`] keeps the
//! all-or-nothing behaviour (any failed peer fails the whole batch and hides
//! the successes), while [`CommandDispatch::send_each`] reports every peer on
//! its own. Neither retries.

pub mod command;
pub mod error;
pub mod transport;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, info};

use crate::registry::Endpoint;
use crate::xapi::status;

pub use command::{normalise_remote_uri, JoinMeeting, PeerCommand, CONTACT_NAME_LOCATION};
pub use error::TransportError;
pub use transport::HttpTransport;

/// Result of one command against one peer.
#[derive(Debug)]
pub struct PeerOutcome {
    pub endpoint: Endpoint,
    pub result: Result<String, TransportError>,
}

impl PeerOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

#[async_trait]
pub trait CommandDispatch: Send + Sync {
    /// Sends one command to one peer and returns the response body.
    async fn send(&self, endpoint: &Endpoint, command: &PeerCommand)
        -> Result<String, TransportError>;

    /// Looks up a peer's display name. Any failure yields `None`.
    async fn display_name(&self, endpoint: &Endpoint) -> Option<String>;

    /// Sends to every peer concurrently and waits for all of them. The first
    /// failure, in endpoint order, becomes the aggregate result.
    async fn send_all(
        &self,
        endpoints: &[Endpoint],
        command: &PeerCommand,
    ) -> Result<Vec<String>, TransportError> {
        let results = join_all(endpoints.iter().map(|endpoint| self.send(endpoint, command))).await;
        results.into_iter().collect()
    }

    /// Sends to every peer concurrently and reports each outcome.
    async fn send_each(&self, endpoints: &[Endpoint], command: &PeerCommand) -> Vec<PeerOutcome> {
        let results = join_all(endpoints.iter().map(|endpoint| self.send(endpoint, command))).await;
        endpoints
            .iter()
            .cloned()
            .zip(results)
            .map(|(endpoint, result)| PeerOutcome { endpoint, result })
            .collect()
    }
}

/// Dispatches commands over HTTPS using each peer's own credentials.
#[derive(Clone)]
pub struct RemoteDispatcher {
    transport: HttpTransport,
}

impl RemoteDispatcher {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl CommandDispatch for RemoteDispatcher {
    async fn send(
        &self,
        endpoint: &Endpoint,
        command: &PeerCommand,
    ) -> Result<String, TransportError> {
        let document = command.to_document();
        info!(
            "Sending {} to {} ({})",
            command.name(),
            endpoint.role,
            endpoint.address
        );
        self.transport
            .post_xml(&endpoint.address, &endpoint.credentials, document.to_xml())
            .await
    }

    async fn display_name(&self, endpoint: &Endpoint) -> Option<String> {
        match self
            .transport
            .get_xml(&endpoint.address, &endpoint.credentials, CONTACT_NAME_LOCATION)
            .await
        {
            Ok(body) => status::leaf(&body, "Name").filter(|name| !name.is_empty()),
            Err(e) => {
                debug!("Display name lookup for {} failed: {}", endpoint.address, e);
                None
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ParticipantRole;
    use crate::registry::{Credentials, Role};
    use std::time::Duration;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn endpoint_at(language: &str, address: String) -> Endpoint {
        Endpoint {
            role: Role::from_language(language),
            serial: format!("SN-{language}"),
            address,
            credentials: Credentials::new("admin", "secret"),
        }
    }

    fn dispatcher(timeout: Duration) -> RemoteDispatcher {
        RemoteDispatcher::new(HttpTransport::new("http", timeout, true).unwrap())
    }

    async fn healthy_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/putxml"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<Command>OK</Command>"))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_send_join_document() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/putxml"))
            .and(body_string_contains("<Number>alice@webex.com</Number>"))
            .and(body_string_contains("<Pin>1234</Pin>"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let peer = endpoint_at("fr", server.address().to_string());
        let join = JoinMeeting::new("sip:alice@webex.com", ParticipantRole::Guest, Some("1234#"));
        let body = dispatcher(Duration::from_secs(5))
            .send(&peer, &PeerCommand::Join(join))
            .await
            .unwrap();
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_send_all_succeeds_when_every_peer_responds() {
        let server = healthy_server().await;
        let peers = vec![
            endpoint_at("es", server.address().to_string()),
            endpoint_at("fr", server.address().to_string()),
        ];

        let bodies = dispatcher(Duration::from_secs(5))
            .send_all(&peers, &PeerCommand::Disconnect)
            .await
            .unwrap();
        assert_eq!(bodies.len(), 2);
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_send_all_fails_whole_when_one_peer_times_out() {
        let fast = healthy_server().await;
        let slow = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&slow)
            .await;

        let peers = vec![
            endpoint_at("es", fast.address().to_string()),
            endpoint_at("fr", slow.address().to_string()),
            endpoint_at("de", fast.address().to_string()),
        ];

        let dispatcher = dispatcher(Duration::from_millis(300));
        let err = dispatcher
            .send_all(&peers, &PeerCommand::Disconnect)
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        // Both healthy peers were still contacted.
        assert_eq!(fast.received_requests().await.unwrap().len(), 2);

        let outcomes = dispatcher.send_each(&peers, &PeerCommand::Disconnect).await;
        let successes: Vec<bool> = outcomes.iter().map(PeerOutcome::is_success).collect();
        assert_eq!(successes, vec![true, false, true]);
        assert_eq!(outcomes[1].endpoint.serial, "SN-fr");
    }

    #[tokio::test]
    async fn test_unreachable_peer_is_request_error() {
        // Nothing listens on the discard port.
        let peer = endpoint_at("fr", "127.0.0.1:9".to_string());
        let err = dispatcher(Duration::from_secs(2))
            .send(&peer, &PeerCommand::Disconnect)
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Request { .. } | TransportError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_display_name_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getxml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<?xml version="1.0"?><Status><UserInterface><ContactInfo><Name>Floor Room</Name></ContactInfo></UserInterface></Status>"#,
            ))
            .mount(&server)
            .await;

        let peer = endpoint_at("floor", server.address().to_string());
        let name = dispatcher(Duration::from_secs(5)).display_name(&peer).await;
        assert_eq!(name.as_deref(), Some("Floor Room"));
    }

    #[tokio::test]
    async fn test_display_name_failure_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let peer = endpoint_at("floor", server.address().to_string());
        assert_eq!(dispatcher(Duration::from_secs(5)).display_name(&peer).await, None);
    }
}
