//! OAuth 2.0 Token Lifecycle for API Clients
//!
//! This crate manages the client side of OAuth 2.0 token handling for
//! applications that talk to a protected API: obtaining an access token,
//! signing outbound requests with it, refreshing it when it expires, and
//! deciding when the caller must re-authenticate.
//!
//! # Features
//!
//! - **Grant Exchange**: Resource-owner password, refresh-token, and
//!   extension grants (RFC 6749 §4.3, §6, §4.5)
//! - **Token Lifecycle**: Per-request validity check with automatic refresh
//!   of expired, refreshable credentials
//! - **Single-Flight Refresh**: Concurrent callers over an expired
//!   credential share one token endpoint round-trip
//! - **Pluggable Seams**: Transport, credential store, response parsing, and
//!   request signing are all trait-injected
//! - **Keychain Storage**: Optional persistent credential storage via
//!   platform keychains
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   TokenManager   │  Lifecycle state machine + single-flight gate
//! └────────┬─────────┘
//!          │
//!          ├──► TransportClient        (HTTP to the token endpoint)
//!          ├──► TokenStore             (MemoryTokenStore / KeychainTokenStore)
//!          ├──► TokenResponseParser    (token endpoint body → Credential)
//!          └──► RequestAuthenticator   (Credential → signed request)
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use tokenward::{
//!     AuthorizationGrant, ClientCredentials, HttpTransport, MemoryTokenStore, OAuthConfig,
//!     TokenManager,
//! };
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OAuthConfig::new(
//!         Url::parse("https://auth.example.com/oauth/token")?,
//!         ClientCredentials::new("my-client".to_string(), None),
//!     );
//!     let manager = TokenManager::new(
//!         config,
//!         Arc::new(HttpTransport::new()),
//!         Arc::new(MemoryTokenStore::new()),
//!     );
//!
//!     // Explicit login with the resource owner's credentials
//!     let grant = AuthorizationGrant::password("alice".to_string(), "s3cret".to_string());
//!     manager.request_access_token(grant).await?;
//!
//!     // Sign an outbound API request; refreshes first if the token expired
//!     let request = reqwest::Request::new(
//!         reqwest::Method::GET,
//!         Url::parse("https://api.example.com/resource")?,
//!     );
//!     let signed = manager.authenticate_request(request).await?;
//!     let response = reqwest::Client::new().execute(signed).await?;
//!     println!("status: {}", response.status());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - **[`types`]**: Core types (`Credential`, `OAuthConfig`, `TokenResponse`)
//! - **[`grant`]**: Authorization grants and their wire parameters
//! - **[`error`]**: The [`AuthError`] taxonomy and RFC 6749 §5.2 errors
//! - **[`traits`]**: Injection seams (transport, store, parser, signer)
//! - **[`client`]**: Default reqwest transport, JSON parser, header signer
//! - **[`store`]**: In-memory credential store
//! - **[`keychain`]**: Platform-keychain credential store
//! - **[`token_manager`]**: The lifecycle orchestrator
//! - **[`testing`]**: Scripted transport for tests

pub mod client;
pub mod error;
pub mod grant;
pub mod keychain;
pub mod store;
pub mod testing;
pub mod token_manager;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use client::{HeaderAuthenticator, HttpTransport, JsonTokenResponseParser};
pub use error::{AuthError, OAuthProtocolError, TransportError};
pub use grant::AuthorizationGrant;
pub use keychain::{KeychainError, KeychainTokenStore};
pub use store::MemoryTokenStore;
pub use token_manager::TokenManager;
pub use traits::{
    RequestAuthenticator, TokenEndpointRequest, TokenEndpointResponse, TokenResponseParser,
    TokenStore, TransportClient,
};
pub use types::{ClientCredentials, Credential, OAuthConfig, TokenResponse};
