//! Token lifecycle management with single-flight refresh
//!
//! [`TokenManager`] decides, per outbound request, whether the stored
//! credential is usable as-is, must be refreshed first, or requires the
//! caller to re-authenticate:
//!
//! - no stored credential → `NotAuthorized`
//! - credential valid (no expiry, or expiry not yet passed) → attach
//! - credential expired with a refresh token → one refresh exchange, then
//!   attach on success
//! - credential expired without a refresh token → `NotAuthorized`
//!
//! Every lifecycle operation runs behind a single admission gate (a tokio
//! mutex held across the store check *and* any token endpoint round-trip), so
//! at most one refresh is in flight at a time and every admitted caller
//! re-reads the current store state instead of reusing a stale decision.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::client::{HeaderAuthenticator, JsonTokenResponseParser};
use crate::error::{AuthError, OAuthProtocolError};
use crate::grant::AuthorizationGrant;
use crate::traits::{
    RequestAuthenticator, TokenEndpointRequest, TokenResponseParser, TokenStore, TransportClient,
};
use crate::types::{Credential, OAuthConfig};

/// Token lifecycle orchestrator
///
/// Generic over the transport and store so applications and tests inject
/// their own; the response parser and request authenticator default to the
/// crate's JSON and Authorization-header implementations and can be swapped
/// with [`TokenManager::with_parser`] / [`TokenManager::with_authenticator`].
pub struct TokenManager<T, S>
where
    T: TransportClient,
    S: TokenStore,
{
    config: OAuthConfig,
    transport: Arc<T>,
    store: Arc<S>,
    parser: Box<dyn TokenResponseParser>,
    authenticator: Box<dyn RequestAuthenticator>,
    /// Single-flight admission gate: held for the full critical section of
    /// every lifecycle operation, including refresh network I/O. FIFO-fair,
    /// so waiters are admitted in arrival order and each re-reads the store.
    admission: Mutex<()>,
}

impl<T, S> TokenManager<T, S>
where
    T: TransportClient,
    S: TokenStore,
{
    /// Create a token manager with the default parser and authenticator
    ///
    /// # Arguments
    /// * `config` - Token endpoint URL and client credentials
    /// * `transport` - HTTP transport for token endpoint requests
    /// * `store` - Credential persistence
    #[must_use]
    pub fn new(config: OAuthConfig, transport: Arc<T>, store: Arc<S>) -> Self {
        Self {
            config,
            transport,
            store,
            parser: Box::new(JsonTokenResponseParser),
            authenticator: Box::new(HeaderAuthenticator),
            admission: Mutex::new(()),
        }
    }

    /// Replace the token response parser
    #[must_use]
    pub fn with_parser(mut self, parser: Box<dyn TokenResponseParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Replace the request authenticator
    #[must_use]
    pub fn with_authenticator(mut self, authenticator: Box<dyn RequestAuthenticator>) -> Self {
        self.authenticator = authenticator;
        self
    }

    /// Exchange an authorization grant for a credential
    ///
    /// The primitive behind both explicit login (password or extension
    /// grants) and internal refresh. On success the stored credential is
    /// replaced wholesale. A failed explicit exchange leaves any stored
    /// credential untouched; only refresh failures clear it (see
    /// [`TokenManager::authenticate_request`]).
    ///
    /// # Errors
    /// * `Transport` - the request never produced an HTTP response
    /// * `OAuth` - the server rejected the grant with an RFC 6749 §5.2 body
    /// * `InvalidResponseData` - the response body was unusable
    pub async fn request_access_token(
        &self,
        grant: AuthorizationGrant,
    ) -> Result<Credential, AuthError> {
        let _admitted = self.admission.lock().await;
        self.exchange(&grant).await
    }

    /// Authenticate an outbound request with the stored credential
    ///
    /// Refreshes the credential first when it is expired and refreshable.
    /// Credential-clearing policy on refresh failure: auth-domain failures
    /// (protocol rejection, unusable response) clear the store, transport
    /// failures leave it intact.
    ///
    /// # Errors
    /// * `NotAuthorized` - no credential, or expired with no refresh token
    /// * any error of [`TokenManager::request_access_token`] from the refresh
    pub async fn authenticate_request(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Request, AuthError> {
        let _admitted = self.admission.lock().await;

        let Some(credential) = self.store.get() else {
            return Err(AuthError::NotAuthorized("no access token stored".to_string()));
        };

        if !credential.is_expired() {
            debug!("stored access token valid, attaching");
            return Ok(self.authenticator.attach(request, &credential));
        }

        let Some(refresh_token) = credential.refresh_token.clone() else {
            return Err(AuthError::NotAuthorized(
                "access token expired and no refresh token available".to_string(),
            ));
        };

        debug!("access token expired, refreshing");
        match self.exchange(&AuthorizationGrant::refresh_token(refresh_token)).await {
            Ok(fresh) => Ok(self.authenticator.attach(request, &fresh)),
            Err(err) => {
                if err.is_auth_domain() {
                    warn!(error = %err, "refresh rejected by auth domain, clearing stored credential");
                    self.store.set(None);
                }
                Err(err)
            }
        }
    }

    /// Force the stored credential to expire
    ///
    /// Replaces it with a copy whose expiry is the unix epoch, refresh token
    /// preserved: the next `authenticate_request` refreshes instead of
    /// demanding a full re-login. No-op when the store is empty.
    pub async fn invalidate_access_token(&self) {
        let _admitted = self.admission.lock().await;
        if let Some(credential) = self.store.get() {
            debug!("invalidating stored access token");
            self.store.set(Some(credential.invalidated()));
        }
    }

    /// Remove the stored credential entirely
    ///
    /// The next `authenticate_request` fails with `NotAuthorized` until a new
    /// credential is obtained.
    pub async fn clear_access_token(&self) {
        let _admitted = self.admission.lock().await;
        debug!("clearing stored access token");
        self.store.set(None);
    }

    /// Whether a credential is currently stored (valid or not)
    ///
    /// Lock-free snapshot; lifecycle mutations all go through the admission
    /// gate.
    #[must_use]
    pub fn has_access_token(&self) -> bool {
        self.store.get().is_some()
    }

    /// One token endpoint round-trip. Callers hold the admission gate.
    async fn exchange(&self, grant: &AuthorizationGrant) -> Result<Credential, AuthError> {
        let mut form = grant.parameters();
        let basic_auth = match &self.config.client.secret {
            Some(secret) => Some((self.config.client.id.clone(), secret.clone())),
            None => {
                form.push(("client_id".to_string(), self.config.client.id.clone()));
                None
            }
        };

        let request =
            TokenEndpointRequest { url: self.config.token_url.clone(), basic_auth, form };
        let response = self.transport.send(request).await.map_err(AuthError::Transport)?;

        if response.status == 200 {
            let credential =
                self.parser.parse(&response.body).map_err(AuthError::InvalidResponseData)?;
            self.store.set(Some(credential.clone()));
            info!(grant_type = grant.grant_type(), "token exchange succeeded, credential stored");
            Ok(credential)
        } else {
            match serde_json::from_slice::<OAuthProtocolError>(&response.body) {
                Ok(protocol) => Err(AuthError::OAuth(protocol)),
                Err(_) => Err(AuthError::InvalidResponseData(format!(
                    "token endpoint returned HTTP {} with an unrecognized body",
                    response.status
                ))),
            }
        }
    }
}
