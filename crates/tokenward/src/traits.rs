//! Capability traits for external collaborators
//!
//! These traits enable dependency injection and testing by abstracting the
//! external collaborators of the token manager: the HTTP transport, the
//! credential store, the token response decoder, and the request
//! authenticator. Default implementations live in [`crate::client`],
//! [`crate::store`], and [`crate::keychain`].

use async_trait::async_trait;
use url::Url;

use crate::error::TransportError;
use crate::types::Credential;

/// A token endpoint request prepared by the token manager
///
/// The transport owns the wire details: percent-encoding the form pairs into
/// an `application/x-www-form-urlencoded` POST body and encoding the Basic
/// authorization header from the credential pair.
#[derive(Debug, Clone)]
pub struct TokenEndpointRequest {
    /// Token endpoint URL
    pub url: Url,

    /// HTTP Basic credentials `(client_id, client_secret)`; present only for
    /// confidential clients
    pub basic_auth: Option<(String, String)>,

    /// Ordered form body pairs
    pub form: Vec<(String, String)>,
}

/// Raw token endpoint response: status code plus unparsed body bytes
#[derive(Debug, Clone)]
pub struct TokenEndpointResponse {
    /// HTTP status code
    pub status: u16,

    /// Raw response body
    pub body: Vec<u8>,
}

/// Trait for the HTTP transport executing token endpoint requests
///
/// One-shot: a single request in, a raw response or a transport-level error
/// out. Implementations must not interpret the response body; decoding is the
/// [`TokenResponseParser`]'s concern.
#[async_trait]
pub trait TransportClient: Send + Sync {
    /// Execute a token endpoint request
    ///
    /// # Errors
    /// Returns the underlying network failure verbatim; HTTP error statuses
    /// are not transport errors and must be returned as a response.
    async fn send(&self, request: TokenEndpointRequest)
        -> Result<TokenEndpointResponse, TransportError>;
}

/// Trait for credential persistence
///
/// Synchronous and thread-safe: the token manager calls `get`/`set` from
/// whichever task currently holds the admission gate, so implementations must
/// be safe to call from any thread. The credential is only ever replaced
/// wholesale, never edited in place.
pub trait TokenStore: Send + Sync {
    /// Current stored credential, if any
    fn get(&self) -> Option<Credential>;

    /// Replace the stored credential; `None` clears the store
    fn set(&self, credential: Option<Credential>);
}

/// Trait for decoding a successful token endpoint body into a credential
pub trait TokenResponseParser: Send + Sync {
    /// Parse a token response body
    ///
    /// # Errors
    /// Returns a description of why the body is not a usable token response;
    /// the token manager surfaces it as `AuthError::InvalidResponseData`.
    fn parse(&self, body: &[u8]) -> Result<Credential, String>;
}

/// Trait for attaching a credential to an outbound request
///
/// Must behave as a pure function: no shared state, the returned request is
/// derived only from its inputs. The signature is infallible, so an
/// implementation that cannot attach a given credential must still return
/// the request; it should log the degrade, and the paired
/// [`TokenResponseParser`] should reject such credentials at exchange time
/// so they never reach the store.
pub trait RequestAuthenticator: Send + Sync {
    /// Attach the credential to the request and return it
    fn attach(&self, request: reqwest::Request, credential: &Credential) -> reqwest::Request;
}
