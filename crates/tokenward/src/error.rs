//! Error taxonomy for token lifecycle operations
//!
//! All failures surface through [`AuthError`], a closed taxonomy. The one
//! policy decision living here is domain classification: which failures are
//! attributable to the auth domain (and therefore clear a stored credential
//! when a refresh fails) versus plain transport failures (which never do).

use std::fmt;

use serde::Deserialize;

/// Boxed transport-level error, passed through verbatim.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Errors from token lifecycle operations
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No usable credential and no way to obtain one without user interaction
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    /// The token endpoint answered, but the body was not usable: HTTP 200
    /// with an unparseable credential, or non-200 with an unparseable
    /// protocol error
    #[error("invalid token endpoint response: {0}")]
    InvalidResponseData(String),

    /// Server-reported grant rejection (RFC 6749 §5.2)
    #[error("token endpoint rejected the grant: {0}")]
    OAuth(OAuthProtocolError),

    /// Underlying network failure, unchanged from the transport
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),
}

impl AuthError {
    /// Whether this failure belongs to the auth domain
    ///
    /// Exactly two domains are recognized: this library's own errors and the
    /// OAuth protocol error domain. A refresh attempt failing in the auth
    /// domain clears the stored credential; a transport failure is passed
    /// through with the credential left intact, so transient connectivity
    /// loss never destroys a still-possibly-valid refresh token.
    #[must_use]
    pub fn is_auth_domain(&self) -> bool {
        match self {
            Self::NotAuthorized(_) | Self::InvalidResponseData(_) | Self::OAuth(_) => true,
            Self::Transport(_) => false,
        }
    }
}

impl From<OAuthProtocolError> for AuthError {
    fn from(err: OAuthProtocolError) -> Self {
        Self::OAuth(err)
    }
}

/// OAuth error response from the authorization server
///
/// Standard OAuth 2.0 error response format (RFC 6749 §5.2); deserializes
/// straight from the non-200 response body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OAuthProtocolError {
    /// Machine-readable error code, e.g. `invalid_grant` or `invalid_client`
    pub error: String,

    /// Optional human-readable description
    pub error_description: Option<String>,

    /// Optional URI with further information
    pub error_uri: Option<String>,
}

impl fmt::Display for OAuthProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(description) => write!(f, "{}: {}", self.error, description),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for OAuthProtocolError {}

#[cfg(test)]
mod tests {
    //! Unit tests for error classification.
    use super::*;

    fn protocol_error(code: &str) -> OAuthProtocolError {
        OAuthProtocolError {
            error: code.to_string(),
            error_description: None,
            error_uri: None,
        }
    }

    /// Validates `AuthError::is_auth_domain` over the full taxonomy.
    ///
    /// Assertions:
    /// - Ensures `NotAuthorized`, `InvalidResponseData`, and `OAuth` are
    ///   classified as auth-domain.
    /// - Ensures `Transport` is not.
    #[test]
    fn auth_domain_classification_covers_taxonomy() {
        assert!(AuthError::NotAuthorized("no token".to_string()).is_auth_domain());
        assert!(AuthError::InvalidResponseData("bad body".to_string()).is_auth_domain());
        assert!(AuthError::OAuth(protocol_error("invalid_grant")).is_auth_domain());

        let transport = AuthError::Transport("connection refused".into());
        assert!(!transport.is_auth_domain());
    }

    /// Validates `OAuthProtocolError` deserialization from an RFC 6749 §5.2
    /// error body.
    ///
    /// Assertions:
    /// - Confirms the error code, description, and URI are decoded.
    /// - Confirms a minimal body with only `error` decodes.
    #[test]
    fn protocol_error_deserializes_from_wire_body() {
        let err: OAuthProtocolError = serde_json::from_str(
            r#"{"error":"invalid_grant","error_description":"expired","error_uri":"https://errors.example/ig"}"#,
        )
        .unwrap();
        assert_eq!(err.error, "invalid_grant");
        assert_eq!(err.error_description.as_deref(), Some("expired"));
        assert_eq!(err.error_uri.as_deref(), Some("https://errors.example/ig"));

        let minimal: OAuthProtocolError =
            serde_json::from_str(r#"{"error":"invalid_client"}"#).unwrap();
        assert_eq!(minimal.error, "invalid_client");
        assert!(minimal.error_description.is_none());
    }

    /// Validates the protocol error display format.
    ///
    /// Assertions:
    /// - Confirms the description is appended after the code when present.
    /// - Confirms the bare code is used otherwise.
    #[test]
    fn protocol_error_display() {
        let mut err = protocol_error("invalid_grant");
        assert_eq!(err.to_string(), "invalid_grant");

        err.error_description = Some("The refresh token is invalid".to_string());
        assert_eq!(err.to_string(), "invalid_grant: The refresh token is invalid");
    }

    /// Validates that transport errors preserve the underlying message.
    #[test]
    fn transport_error_passes_message_through() {
        let err = AuthError::Transport("dns failure: no such host".into());
        assert!(err.to_string().contains("dns failure: no such host"));
    }
}
