//
//  gw2api
//  api/session.rs
//
//  Created by Ngonidzashe Mangudya on 2026/03/02.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Session and Token Management
//!
//! A [`Session`] owns zero-or-one API token and performs every request the
//! higher layers make. Setting a token eagerly fetches and caches its
//! metadata from `v2/tokeninfo`, so permission-scope gates can be evaluated
//! pre-flight without further network calls.
//!
//! ## Overview
//!
//! - Tokens are opaque bearer strings created on the Guild Wars 2 account
//!   site; each grants a fixed set of permission scopes (`account`,
//!   `inventories`, `characters`, ...)
//! - A session without a token can still use every public catalog endpoint
//! - The token is fixed for the session's lifetime; rotation is not modeled
//!
//! ## Example
//!
//! ```rust,no_run
//! use gw2api::api::session::Session;
//!
//! # async fn example() -> Result<(), gw2api::ApiError> {
//! let mut session = Session::new()?;
//! let info = session.load_token_from_file("token.txt").await?;
//! println!("authenticated as {}", info);
//! # Ok(())
//! # }
//! ```
//!
//! ## Sharing
//!
//! Entities and collections hold an `Arc<Session>`; set the token first, then
//! wrap the session. The token and its cached metadata are read-only after
//! `set_token` completes, so concurrent readers need no locking.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::api::common::ApiError;
use crate::api::transport::Transport;

/// The token-metadata endpoint queried on credential assignment.
pub const TOKEN_INFO_ENDPOINT: &str = "v2/tokeninfo";

/// Metadata about an API token, fetched from `v2/tokeninfo`.
///
/// Created by [`Session::set_token`] as a side effect of credential
/// assignment; read by any component that gates on required scopes.
///
/// # Fields
///
/// | Field | Description |
/// |-------|-------------|
/// | `id` | The token's own identifier, when the API reports one |
/// | `name` | The label the account holder gave the token |
/// | `permissions` | The set of permission scopes the token grants |
#[derive(Debug, Clone, Deserialize)]
pub struct TokenInfo {
    /// The token's identifier as reported by the API.
    #[serde(default)]
    pub id: Option<String>,

    /// The label the account holder gave the token at creation time.
    #[serde(default)]
    pub name: String,

    /// The permission scopes the token grants.
    #[serde(default)]
    pub permissions: HashSet<String>,
}

impl TokenInfo {
    /// Checks whether this token grants a single permission scope.
    pub fn grants(&self, scope: &str) -> bool {
        self.permissions.contains(scope)
    }
}

impl fmt::Display for TokenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut scopes: Vec<&str> = self.permissions.iter().map(String::as_str).collect();
        scopes.sort_unstable();
        write!(f, "\"{}\" with scopes {}", self.name, scopes.join(", "))
    }
}

/// A connection to the Guild Wars 2 API with an optional bearer token.
///
/// The session is the single chokepoint for network access: every entity,
/// enumeration, and owned collection routes its requests through
/// [`request`](Self::request), which handles the pre-flight auth gate and
/// bearer-header derivation before delegating to the [`Transport`].
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use gw2api::api::session::Session;
///
/// # async fn example() -> Result<(), gw2api::ApiError> {
/// let mut session = Session::new()?;
/// session.set_token("XXXX-...-XXXX").await?;
///
/// // Single-writer-then-readers: wrap after the token is in place.
/// let session = Arc::new(session);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Session {
    /// The HTTP transport used for all requests.
    transport: Transport,
    /// The bearer token, if one has been set.
    token: Option<String>,
    /// Cached metadata for the token, fetched on assignment.
    token_info: Option<TokenInfo>,
}

impl Session {
    /// Creates an unauthenticated session against the production API host.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::RequestFailed`] if the HTTP client could not be
    /// constructed.
    pub fn new() -> Result<Self, ApiError> {
        Ok(Self {
            transport: Transport::new()?,
            token: None,
            token_info: None,
        })
    }

    /// Creates an unauthenticated session against an arbitrary base URL.
    ///
    /// Intended for tests that point the client at a local HTTP stub.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self {
            transport: Transport::with_base_url(base_url)?,
            token: None,
            token_info: None,
        })
    }

    /// Stores a token and eagerly fetches its metadata.
    ///
    /// The metadata fetch doubles as validation: an invalid token fails the
    /// `v2/tokeninfo` request and the error propagates to the caller. The
    /// token itself stays stored either way - a deliberate asymmetry kept
    /// from the reference behavior, so a transient network failure does not
    /// silently discard the credential.
    ///
    /// # Parameters
    ///
    /// - `token` - The opaque bearer string
    ///
    /// # Returns
    ///
    /// A reference to the cached [`TokenInfo`] on success.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::RequestFailed`] if the metadata fetch fails.
    pub async fn set_token(&mut self, token: impl Into<String>) -> Result<&TokenInfo, ApiError> {
        self.token = Some(token.into());
        tracing::debug!("token set, fetching token info");
        let value = self.request(TOKEN_INFO_ENDPOINT, &[], true).await?;
        let info: TokenInfo = serde_json::from_value(value)
            .map_err(|e| ApiError::request_failed(TOKEN_INFO_ENDPOINT, e))?;
        tracing::debug!(token_name = %info.name, "token info cached");
        Ok(self.token_info.insert(info))
    }

    /// Reads a token from a text file and stores it.
    ///
    /// The entire file content is read and surrounding whitespace is trimmed,
    /// so a trailing newline in the file never becomes part of the
    /// credential.
    ///
    /// # Parameters
    ///
    /// - `path` - Path to the token file
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Io`] if the file is absent or unreadable, or
    /// [`ApiError::RequestFailed`] if the subsequent metadata fetch fails.
    pub async fn load_token_from_file(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<&TokenInfo, ApiError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading token from file");
        let raw = tokio::fs::read_to_string(path).await?;
        self.set_token(raw.trim()).await
    }

    /// Returns the cached token metadata, if a token has been set and its
    /// metadata fetch succeeded.
    pub fn token_info(&self) -> Option<&TokenInfo> {
        self.token_info.as_ref()
    }

    /// Whether a token is currently stored.
    ///
    /// Note that a stored token whose metadata fetch failed still counts;
    /// see [`set_token`](Self::set_token).
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Performs one API request.
    ///
    /// When `auth` is `true` and no token is set, this fails immediately
    /// with [`ApiError::AuthorizationRequired`] - the transport is never
    /// reached. Otherwise the request is delegated to the transport with an
    /// `Authorization: Bearer <token>` header attached whenever a token is
    /// present, regardless of `auth`.
    ///
    /// # Parameters
    ///
    /// - `path` - Relative endpoint path, e.g. `"v2/account/bank"`
    /// - `params` - Query parameters
    /// - `auth` - Whether the endpoint requires authentication
    ///
    /// # Returns
    ///
    /// The decoded JSON response value.
    pub async fn request(
        &self,
        path: &str,
        params: &[(&str, String)],
        auth: bool,
    ) -> Result<Value, ApiError> {
        if auth && self.token.is_none() {
            tracing::warn!(path, "authenticated request attempted with no token");
            return Err(ApiError::AuthorizationRequired);
        }
        let headers: Vec<(&str, String)> = match &self.token {
            Some(token) => vec![("Authorization", format!("Bearer {}", token))],
            None => Vec::new(),
        };
        self.transport.request(path, params, None, &headers).await
    }

    /// Verifies that the token grants every scope in `required`.
    ///
    /// An empty requirement always passes. A non-empty requirement with no
    /// cached token metadata fails with [`ApiError::AuthorizationRequired`];
    /// a missing grant fails with [`ApiError::MissingScope`] naming the
    /// first scope the token lacks.
    pub fn check_scopes(&self, required: &[&str]) -> Result<(), ApiError> {
        if required.is_empty() {
            return Ok(());
        }
        let info = self
            .token_info
            .as_ref()
            .ok_or(ApiError::AuthorizationRequired)?;
        for scope in required {
            if !info.grants(scope) {
                return Err(ApiError::MissingScope {
                    scope: (*scope).to_string(),
                });
            }
        }
        Ok(())
    }
}
