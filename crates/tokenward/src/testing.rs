//! Test doubles for the capability traits
//!
//! [`MockTransport`] replaces the HTTP transport with scripted responses and
//! records every request it receives, so tests can assert on wire bodies and
//! on the number of token endpoint calls without a network.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::TransportError;
use crate::traits::{TokenEndpointRequest, TokenEndpointResponse, TransportClient};

enum ScriptedResult {
    Response(TokenEndpointResponse),
    Error(String),
}

/// Scripted token endpoint transport
///
/// Responses are consumed in FIFO order; a request arriving with an empty
/// script fails with a transport error naming the problem. An optional
/// per-call delay keeps the token manager's refresh critical section open
/// long enough for concurrency tests to pile up waiters.
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<ScriptedResult>>,
    requests: Mutex<Vec<TokenEndpointRequest>>,
    delay: Option<Duration>,
}

impl MockTransport {
    /// Create an empty transport; script responses before use
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport that sleeps for `delay` before answering each call
    #[must_use]
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay: Some(delay), ..Self::default() }
    }

    /// Queue a response with the given status and body
    pub fn push_response(&self, status: u16, body: impl Into<Vec<u8>>) {
        self.script
            .lock()
            .push_back(ScriptedResult::Response(TokenEndpointResponse {
                status,
                body: body.into(),
            }));
    }

    /// Queue a transport-level failure
    pub fn push_error(&self, message: &str) {
        self.script.lock().push_back(ScriptedResult::Error(message.to_string()));
    }

    /// Number of requests received so far
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// All requests received so far, in arrival order
    #[must_use]
    pub fn requests(&self) -> Vec<TokenEndpointRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl TransportClient for MockTransport {
    async fn send(
        &self,
        request: TokenEndpointRequest,
    ) -> Result<TokenEndpointResponse, TransportError> {
        self.requests.lock().push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.script.lock().pop_front();
        match next {
            Some(ScriptedResult::Response(response)) => Ok(response),
            Some(ScriptedResult::Error(message)) => Err(message.into()),
            None => Err("mock transport received a request with no scripted response".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for the mock transport.
    use url::Url;

    use super::*;

    fn request() -> TokenEndpointRequest {
        TokenEndpointRequest {
            url: Url::parse("https://auth.example.com/oauth/token").unwrap(),
            basic_auth: None,
            form: vec![("grant_type".to_string(), "password".to_string())],
        }
    }

    /// Validates scripted responses are consumed in FIFO order and every
    /// request is recorded.
    #[tokio::test]
    async fn responses_are_fifo_and_requests_recorded() {
        let transport = MockTransport::new();
        transport.push_response(200, &b"first"[..]);
        transport.push_error("second fails");

        let first = transport.send(request()).await.unwrap();
        assert_eq!(first.status, 200);
        assert_eq!(first.body, b"first");

        let second = transport.send(request()).await;
        assert!(second.is_err());

        assert_eq!(transport.request_count(), 2);
        assert_eq!(transport.requests()[0].form[0].1, "password");
    }

    /// Validates the empty-script fallback is a transport error.
    #[tokio::test]
    async fn unscripted_request_is_a_transport_error() {
        let transport = MockTransport::new();
        let result = transport.send(request()).await;
        assert!(result.unwrap_err().to_string().contains("no scripted response"));
    }
}
