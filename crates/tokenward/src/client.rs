//! Default collaborator implementations
//!
//! The reqwest-backed transport, the serde_json token response parser, and
//! the Authorization-header authenticator. The token manager wires these up
//! by default; applications swap in their own implementations through the
//! capability traits.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Client;
use tracing::warn;

use crate::error::TransportError;
use crate::traits::{
    RequestAuthenticator, TokenEndpointRequest, TokenEndpointResponse, TokenResponseParser,
    TransportClient,
};
use crate::types::{Credential, TokenResponse};

/// Reqwest-backed token endpoint transport
///
/// POSTs the request's form pairs (reqwest sets the
/// `application/x-www-form-urlencoded` content type and percent-encodes the
/// body) and applies HTTP Basic authentication when the request carries
/// client credentials.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with a default client (30 second timeout)
    #[must_use]
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|error| {
                warn!(%error, "reqwest client builder failed, falling back to a default client without a timeout");
                Client::new()
            });
        Self { client }
    }

    /// Create a transport from an existing reqwest client
    ///
    /// Use this to share connection pools or apply custom TLS/proxy settings.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransportClient for HttpTransport {
    async fn send(
        &self,
        request: TokenEndpointRequest,
    ) -> Result<TokenEndpointResponse, TransportError> {
        let mut builder = self.client.post(request.url).form(&request.form);
        if let Some((id, secret)) = &request.basic_auth {
            builder = builder.basic_auth(id, Some(secret));
        }

        let response = builder.send().await.map_err(|e| Box::new(e) as TransportError)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| Box::new(e) as TransportError)?.to_vec();

        Ok(TokenEndpointResponse { status, body })
    }
}

/// JSON token response parser
///
/// Decodes the RFC 6749 §5.1 success body and resolves the relative
/// `expires_in` into an absolute expiry at parse time. Unusable responses
/// are rejected here, at exchange time: an empty `access_token`, an
/// `expires_in` beyond the representable date range, or token fields that
/// cannot be carried in an Authorization header.
#[derive(Debug, Clone, Default)]
pub struct JsonTokenResponseParser;

impl TokenResponseParser for JsonTokenResponseParser {
    fn parse(&self, body: &[u8]) -> Result<Credential, String> {
        let response: TokenResponse =
            serde_json::from_slice(body).map_err(|e| format!("not a token response: {e}"))?;

        if response.access_token.is_empty() {
            return Err("token response carried an empty access_token".to_string());
        }

        let header = format!("{} {}", response.token_type, response.access_token);
        if HeaderValue::from_str(&header).is_err() {
            return Err(
                "token response fields not representable in an Authorization header".to_string()
            );
        }

        response.into_credential(Utc::now())
    }
}

/// Authorization-header request authenticator
///
/// Formats `Authorization: {token_type} {access_token}` from the credential,
/// e.g. `Authorization: Bearer MTQzM2U3YTI3`.
///
/// A credential whose fields cannot form a valid header value is logged and
/// the request returned unsigned. [`JsonTokenResponseParser`] rejects such
/// credentials at exchange time, so this path is only reachable through a
/// custom parser or a hand-built credential.
#[derive(Debug, Clone, Default)]
pub struct HeaderAuthenticator;

impl RequestAuthenticator for HeaderAuthenticator {
    fn attach(&self, mut request: reqwest::Request, credential: &Credential) -> reqwest::Request {
        let value = format!("{} {}", credential.token_type, credential.access_token);
        match HeaderValue::from_str(&value) {
            Ok(mut header) => {
                header.set_sensitive(true);
                request.headers_mut().insert(AUTHORIZATION, header);
            }
            Err(_) => {
                warn!("access token not representable as a header value, request left unsigned");
            }
        }
        request
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for the default collaborators.
    use reqwest::Method;
    use url::Url;

    use super::*;

    /// Validates `JsonTokenResponseParser` behavior for a well-formed
    /// success body.
    ///
    /// Assertions:
    /// - Confirms token fields are decoded.
    /// - Ensures `expires_in` produced an absolute expiry.
    #[test]
    fn parser_accepts_success_body() {
        let body = br#"{"access_token":"at","token_type":"Bearer","expires_in":3600,"refresh_token":"rt"}"#;

        let credential = JsonTokenResponseParser.parse(body).unwrap();
        assert_eq!(credential.access_token, "at");
        assert_eq!(credential.token_type, "Bearer");
        assert_eq!(credential.refresh_token.as_deref(), Some("rt"));
        assert!(credential.expires_at.is_some());
        assert!(!credential.is_expired());
    }

    /// Validates `JsonTokenResponseParser` rejection paths.
    ///
    /// Assertions:
    /// - Ensures a non-JSON body is rejected.
    /// - Ensures a JSON body missing `access_token` is rejected.
    /// - Ensures an empty `access_token` is rejected.
    #[test]
    fn parser_rejects_unusable_bodies() {
        assert!(JsonTokenResponseParser.parse(b"<html>nope</html>").is_err());
        assert!(JsonTokenResponseParser.parse(br#"{"token_type":"Bearer"}"#).is_err());
        assert!(JsonTokenResponseParser
            .parse(br#"{"access_token":"","token_type":"Bearer"}"#)
            .is_err());
    }

    /// Validates `JsonTokenResponseParser` handling of `expires_in` values
    /// that cannot be resolved to an absolute expiry.
    ///
    /// Assertions:
    /// - Ensures an `expires_in` of `i64::MAX` yields a parse error rather
    ///   than a panic.
    /// - Ensures an in-range delta overflowing the date range also yields a
    ///   parse error.
    #[test]
    fn parser_rejects_out_of_range_expires_in() {
        let huge =
            br#"{"access_token":"at","token_type":"Bearer","expires_in":9223372036854775807}"#;
        assert!(JsonTokenResponseParser.parse(huge).is_err());

        let overflowing =
            br#"{"access_token":"at","token_type":"Bearer","expires_in":10000000000000}"#;
        assert!(JsonTokenResponseParser.parse(overflowing).is_err());
    }

    /// Validates `JsonTokenResponseParser` rejection of token fields that
    /// cannot be carried in an Authorization header.
    ///
    /// Assertions:
    /// - Ensures an access token containing a newline is rejected at parse
    ///   time, before it could produce an unsigned request downstream.
    #[test]
    fn parser_rejects_header_unrepresentable_tokens() {
        let newline_token = br#"{"access_token":"at\ninjected","token_type":"Bearer"}"#;
        assert!(JsonTokenResponseParser.parse(newline_token).is_err());
    }

    /// Validates `HeaderAuthenticator` formatting of the Authorization
    /// header.
    ///
    /// Assertions:
    /// - Confirms the header value equals `"{token_type} {access_token}"`.
    #[test]
    fn authenticator_formats_authorization_header() {
        let credential = Credential::new(
            "MTQzM2U3YTI3".to_string(),
            "Bearer".to_string(),
            None,
            None,
        );
        let url = Url::parse("https://api.example.com/resource").unwrap();
        let request = reqwest::Request::new(Method::GET, url);

        let signed = HeaderAuthenticator.attach(request, &credential);
        let header = signed.headers().get(AUTHORIZATION).unwrap();
        assert_eq!(header.as_bytes(), b"Bearer MTQzM2U3YTI3");
    }
}
