//! Authorization grants and their form-parameter encoding
//!
//! An [`AuthorizationGrant`] is built per token request and never stored.
//! Each variant maps deterministically to a `grant_type` form parameter plus
//! its variant-specific parameters (RFC 6749 §4.3, §6, §4.5).

use std::collections::HashMap;

/// An OAuth 2.0 authorization grant
///
/// Covers the resource owner password grant, the refresh token grant, and
/// arbitrary extension grants identified by URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationGrant {
    /// Resource owner password credentials grant (RFC 6749 §4.3)
    ResourceOwnerPassword {
        /// Resource owner username
        username: String,
        /// Resource owner password
        password: String,
    },

    /// Refresh token grant (RFC 6749 §6)
    RefreshToken {
        /// Refresh token issued with an earlier credential
        refresh_token: String,
    },

    /// Extension grant identified by an absolute URI (RFC 6749 §4.5)
    Extension {
        /// Grant type URI, e.g. `urn:ietf:params:oauth:grant-type:saml2-bearer`
        grant_type: String,
        /// Caller-supplied grant parameters
        parameters: HashMap<String, String>,
    },
}

impl AuthorizationGrant {
    /// Resource owner password grant
    #[must_use]
    pub fn password(username: String, password: String) -> Self {
        Self::ResourceOwnerPassword { username, password }
    }

    /// Refresh token grant
    #[must_use]
    pub fn refresh_token(refresh_token: String) -> Self {
        Self::RefreshToken { refresh_token }
    }

    /// Extension grant with a caller-chosen grant type URI
    #[must_use]
    pub fn extension(grant_type: String, parameters: HashMap<String, String>) -> Self {
        Self::Extension { grant_type, parameters }
    }

    /// The `grant_type` parameter value for this grant
    #[must_use]
    pub fn grant_type(&self) -> &str {
        match self {
            Self::ResourceOwnerPassword { .. } => "password",
            Self::RefreshToken { .. } => "refresh_token",
            Self::Extension { grant_type, .. } => grant_type,
        }
    }

    /// Encode the grant as ordered form pairs for the token request body
    ///
    /// For extension grants the caller-supplied parameters are written first
    /// (sorted by key for a stable body) and any caller-supplied `grant_type`
    /// entry is dropped; the grant's own `grant_type` is written last so a
    /// colliding caller parameter can never silently clobber it.
    #[must_use]
    pub fn parameters(&self) -> Vec<(String, String)> {
        match self {
            Self::ResourceOwnerPassword { username, password } => vec![
                ("grant_type".to_string(), "password".to_string()),
                ("username".to_string(), username.clone()),
                ("password".to_string(), password.clone()),
            ],
            Self::RefreshToken { refresh_token } => vec![
                ("grant_type".to_string(), "refresh_token".to_string()),
                ("refresh_token".to_string(), refresh_token.clone()),
            ],
            Self::Extension { grant_type, parameters } => {
                let mut pairs: Vec<(String, String)> = parameters
                    .iter()
                    .filter(|(key, _)| key.as_str() != "grant_type")
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect();
                pairs.sort();
                pairs.push(("grant_type".to_string(), grant_type.clone()));
                pairs
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for grant encoding.
    use super::*;

    /// Validates `AuthorizationGrant::refresh_token` wire encoding.
    ///
    /// Assertions:
    /// - Confirms the form-encoded body equals
    ///   `grant_type=refresh_token&refresh_token=abc`.
    #[test]
    fn refresh_grant_encodes_to_expected_body() {
        let grant = AuthorizationGrant::refresh_token("abc".to_string());

        let body = serde_urlencoded::to_string(grant.parameters()).unwrap();
        assert_eq!(body, "grant_type=refresh_token&refresh_token=abc");
    }

    /// Validates `AuthorizationGrant::password` parameter mapping.
    ///
    /// Assertions:
    /// - Confirms `grant_type()` equals `"password"`.
    /// - Confirms the pairs carry username and password.
    #[test]
    fn password_grant_parameters() {
        let grant = AuthorizationGrant::password("alice".to_string(), "s3cret".to_string());

        assert_eq!(grant.grant_type(), "password");
        assert_eq!(
            grant.parameters(),
            vec![
                ("grant_type".to_string(), "password".to_string()),
                ("username".to_string(), "alice".to_string()),
                ("password".to_string(), "s3cret".to_string()),
            ]
        );
    }

    /// Validates extension grant clobber protection for the `grant_type`
    /// parameter.
    ///
    /// Assertions:
    /// - Ensures exactly one `grant_type` pair survives.
    /// - Confirms the surviving value is the grant's own URI, written last.
    /// - Confirms other caller parameters are preserved.
    #[test]
    fn extension_grant_type_cannot_be_clobbered() {
        let mut parameters = HashMap::new();
        parameters.insert("assertion".to_string(), "token-xyz".to_string());
        parameters.insert("grant_type".to_string(), "attacker-controlled".to_string());

        let grant = AuthorizationGrant::extension(
            "urn:ietf:params:oauth:grant-type:saml2-bearer".to_string(),
            parameters,
        );
        let pairs = grant.parameters();

        let grant_types: Vec<_> = pairs.iter().filter(|(key, _)| key == "grant_type").collect();
        assert_eq!(grant_types.len(), 1);
        assert_eq!(
            pairs.last(),
            Some(&(
                "grant_type".to_string(),
                "urn:ietf:params:oauth:grant-type:saml2-bearer".to_string()
            ))
        );
        assert!(pairs.contains(&("assertion".to_string(), "token-xyz".to_string())));
    }

    /// Validates that extension parameters are emitted in a stable order.
    #[test]
    fn extension_parameters_are_sorted_for_stable_bodies() {
        let mut parameters = HashMap::new();
        parameters.insert("zeta".to_string(), "1".to_string());
        parameters.insert("alpha".to_string(), "2".to_string());

        let grant = AuthorizationGrant::extension("urn:example:grant".to_string(), parameters);
        let keys: Vec<_> = grant.parameters().into_iter().map(|(key, _)| key).collect();

        assert_eq!(keys, vec!["alpha", "zeta", "grant_type"]);
    }
}
