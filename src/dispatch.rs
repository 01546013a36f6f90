//! Webhook delivery

use ureq::Agent;

use crate::embed::WebhookMessage;
use crate::error::HandlerError;

/// Something that can POST a JSON body and report the HTTP status
pub trait Transport {
    fn post_json(&self, url: &str, body: &str) -> Result<u16, HandlerError>;
}

/// Blocking HTTP transport backed by ureq
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        // Remote rejections are reported as a status code, not as an error
        let config = Agent::config_builder().http_status_as_error(false).build();
        Self { agent: config.into() }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn post_json(&self, url: &str, body: &str) -> Result<u16, HandlerError> {
        let response = self
            .agent
            .post(url)
            .header("Content-Type", "application/json")
            .send(body.as_bytes())
            .map_err(|e| HandlerError::Transport(format!("HTTP request failed: {}", e)))?;

        Ok(response.status().as_u16())
    }
}

/// Encode `message` and send it once. Any completed request counts as delivered.
pub fn dispatch(url: &str, message: &WebhookMessage, transport: &dyn Transport) -> Result<u16, HandlerError> {
    let body = serde_json::to_string(message)?;
    log::debug!("Webhook body: {}", body);

    let status = transport.post_json(url, &body)?;
    if (200..300).contains(&status) {
        log::info!("Webhook accepted message with status {}", status);
    } else {
        log::warn!("Webhook responded with status {}; not treated as a failure", status);
    }

    Ok(status)
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::config::HandlerConfig;
    use crate::embed::Embed;
    use crate::event::EventView;

    /// Records every request instead of touching the network
    pub struct RecordingTransport {
        pub requests: RefCell<Vec<(String, String)>>,
        pub response: Result<u16, String>,
    }

    impl RecordingTransport {
        pub fn responding(status: u16) -> Self {
            Self {
                requests: RefCell::new(Vec::new()),
                response: Ok(status),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                requests: RefCell::new(Vec::new()),
                response: Err(message.to_string()),
            }
        }

        pub fn calls(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl Transport for RecordingTransport {
        fn post_json(&self, url: &str, body: &str) -> Result<u16, HandlerError> {
            self.requests.borrow_mut().push((url.to_string(), body.to_string()));
            self.response.clone().map_err(HandlerError::Transport)
        }
    }

    fn message() -> WebhookMessage {
        let view = EventView {
            entity_name: "web01".to_string(),
            check_name: "disk".to_string(),
            status: 0,
            output: "OK".to_string(),
        };
        let config = HandlerConfig::default();
        WebhookMessage::new(Embed::from_event(&view, &config), &config)
    }

    #[test]
    fn test_dispatch_posts_envelope() {
        let transport = RecordingTransport::responding(204);
        let status = dispatch("https://discord.example/hook", &message(), &transport).unwrap();

        assert_eq!(status, 204);
        let requests = transport.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "https://discord.example/hook");

        let body: serde_json::Value = serde_json::from_str(&requests[0].1).unwrap();
        assert_eq!(body["embeds"][0]["description"], "OK");
        assert_eq!(body["embeds"][0]["title"], "Description");
    }

    #[test]
    fn test_remote_rejection_is_success() {
        let transport = RecordingTransport::responding(500);
        assert_eq!(dispatch("https://discord.example/hook", &message(), &transport).unwrap(), 500);
    }

    #[test]
    fn test_transport_failure_propagates() {
        let transport = RecordingTransport::failing("connection refused");
        let err = dispatch("https://discord.example/hook", &message(), &transport).unwrap_err();
        assert!(matches!(err, HandlerError::Transport(_)));
        assert_eq!(transport.calls(), 1);
    }
}
