//! OAuth 2.0 types and structures
//!
//! Defines the credential value type, client identification, token endpoint
//! configuration, and the RFC 6749 wire-format structs shared by the rest of
//! the crate.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// One token issuance from the authorization server
///
/// Immutable value type: the token manager never edits a stored credential in
/// place, it always replaces the whole value. Equality is structural over all
/// four fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Opaque access token for API authentication
    pub access_token: String,

    /// Token type (typically "Bearer"); used verbatim when formatting the
    /// Authorization header
    pub token_type: String,

    /// Absolute expiration timestamp (UTC)
    /// `None` means the token never expires and is never auto-refreshed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Refresh token for obtaining new access tokens
    /// Optional because some OAuth providers don't issue refresh tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl Credential {
    /// Create a new credential
    ///
    /// # Arguments
    /// * `access_token` - The access token
    /// * `token_type` - Token type, e.g. "Bearer"
    /// * `expires_at` - Optional absolute expiry
    /// * `refresh_token` - Optional refresh token
    #[must_use]
    pub fn new(
        access_token: String,
        token_type: String,
        expires_at: Option<DateTime<Utc>>,
        refresh_token: Option<String>,
    ) -> Self {
        Self { access_token, token_type, expires_at, refresh_token }
    }

    /// Check whether the access token is expired at the given instant
    ///
    /// Expiry comparison is strict: `expires_at < now` is expired, an expiry
    /// exactly equal to `now` is still valid. A credential without an expiry
    /// is always valid.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if expires_at < now)
    }

    /// Check whether the access token is expired right now
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Copy of this credential with the expiry forced to the unix epoch
    ///
    /// All other fields, notably the refresh token, are preserved. Storing
    /// the result routes the next `authenticate_request` call into the
    /// refresh path instead of a full re-login.
    #[must_use]
    pub fn invalidated(&self) -> Self {
        Self { expires_at: Some(DateTime::UNIX_EPOCH), ..self.clone() }
    }
}

/// OAuth client identification for token endpoint requests
///
/// A configured secret selects HTTP Basic authentication on token requests;
/// without one the `client_id` is sent as a form body parameter instead.
/// The two are exclusive, never combined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    /// OAuth client ID
    pub id: String,

    /// OAuth client secret (confidential clients only)
    pub secret: Option<String>,
}

impl ClientCredentials {
    /// Create client credentials
    ///
    /// # Arguments
    /// * `id` - OAuth client ID
    /// * `secret` - Client secret, or `None` for public clients
    #[must_use]
    pub fn new(id: String, secret: Option<String>) -> Self {
        Self { id, secret }
    }
}

/// Token endpoint configuration
///
/// Constructed by the application; the library does no config-file or
/// environment loading of its own.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// Absolute URL of the token endpoint
    pub token_url: Url,

    /// Client identification sent with every token request
    pub client: ClientCredentials,
}

impl OAuthConfig {
    /// Create a new token endpoint configuration
    #[must_use]
    pub fn new(token_url: Url, client: ClientCredentials) -> Self {
        Self { token_url, client }
    }
}

/// Successful token response from the authorization server
///
/// Standard OAuth 2.0 token response format (RFC 6749 §5.1). `expires_in` is
/// a delta in seconds from the response time; the parser converts it to an
/// absolute timestamp when building the [`Credential`].
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: Option<i64>,
    pub refresh_token: Option<String>,
}

impl TokenResponse {
    /// Convert the wire response into a credential, resolving the relative
    /// `expires_in` against `now`.
    ///
    /// # Errors
    /// Returns a message when `expires_in` cannot be resolved to an absolute
    /// timestamp: the delta is out of range, or the sum overflows the
    /// representable date range. Token endpoint input is untrusted, so this
    /// is a parse failure, never a panic.
    pub fn into_credential(self, now: DateTime<Utc>) -> Result<Credential, String> {
        let expires_at = match self.expires_in {
            Some(seconds) => Some(
                Duration::try_seconds(seconds)
                    .and_then(|delta| now.checked_add_signed(delta))
                    .ok_or_else(|| format!("expires_in out of range: {seconds}"))?,
            ),
            None => None,
        };

        Ok(Credential {
            access_token: self.access_token,
            token_type: self.token_type,
            expires_at,
            refresh_token: self.refresh_token,
        })
    }
}
