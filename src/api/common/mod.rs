//
//  gw2api
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/03/02.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Common API Types for the Guild Wars 2 Client
//!
//! This module provides the shared building blocks used across every layer of
//! the client: the unified error type and the resource identity type.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all API operations
//! - [`Id`] - A resource identity, numeric (`26706`) or textual (`"Paglian"`)
//!
//! # Example
//!
//! ```rust
//! use gw2api::api::common::{ApiError, Id};
//!
//! fn handle_result<T>(result: Result<T, ApiError>) {
//!     match result {
//!         Ok(_) => println!("Success!"),
//!         Err(ApiError::AuthorizationRequired) => println!("Please set a token first"),
//!         Err(ApiError::MissingScope { scope }) => println!("Token lacks scope: {}", scope),
//!         Err(e) => println!("Error: {}", e),
//!     }
//! }
//!
//! let world: Id = Id::from(1021u64);
//! let character: Id = Id::from("Paglian");
//! assert_eq!(world.to_string(), "1021");
//! assert_eq!(character.to_string(), "Paglian");
//! ```
//!
//! # Notes
//!
//! - All types implement `Debug` for easy inspection
//! - `Id` serializes untagged, matching the wire shape of id-catalog responses

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Unified error type for all Guild Wars 2 API operations.
///
/// `ApiError` covers the full failure taxonomy of the client. It implements
/// the standard `Error` trait via `thiserror` for ergonomic error handling
/// with the `?` operator.
///
/// # Variants
///
/// | Variant | Raised | Network call made |
/// |---------|--------|-------------------|
/// | `AuthorizationRequired` | Authenticated call with no token set | No (pre-flight) |
/// | `MissingScope` | Token lacks a declared permission scope | No (pre-flight) |
/// | `RequestFailed` | Connection, non-2xx status, or JSON decode failure | Yes |
/// | `Io` | Local token-file read failure | No |
///
/// # Example
///
/// ```rust
/// use gw2api::api::common::ApiError;
///
/// fn fetch_bank() -> Result<(), ApiError> {
///     Err(ApiError::MissingScope { scope: "inventories".to_string() })
/// }
///
/// match fetch_bank() {
///     Err(ApiError::MissingScope { scope }) => {
///         eprintln!("re-issue the token with the {} scope", scope);
///     }
///     other => drop(other),
/// }
/// ```
///
/// # Notes
///
/// - Transport-specific error types (`reqwest`, status codes, decode errors)
///   never surface as distinct variants; they are all wrapped in
///   `RequestFailed` together with the attempted URL.
/// - Nothing in this crate retries automatically, and nothing is
///   logged-and-swallowed; every error propagates to the immediate caller.
#[derive(Error, Debug)]
pub enum ApiError {
    /// An authenticated request was attempted with no token set.
    ///
    /// Raised pre-flight: no network call is made. Set a token with
    /// `Session::set_token` or `Session::load_token_from_file` first.
    #[error(
        "this request requires authentication that is not present; \
         set a token with set_token() or load_token_from_file() first"
    )]
    AuthorizationRequired,

    /// The configured token lacks a permission scope the component requires.
    ///
    /// Raised pre-flight at construction time of the gated component, before
    /// any resolution work happens.
    ///
    /// # Parameters
    ///
    /// - `scope` - The first required scope the token does not grant
    #[error("the configured token lacks the required permission scope \"{scope}\"")]
    MissingScope {
        /// The missing permission scope name.
        scope: String,
    },

    /// A request reached the network and failed.
    ///
    /// Covers connection failures, non-2xx responses, and malformed JSON
    /// bodies. The attempted URL is always carried alongside the underlying
    /// cause.
    ///
    /// # Parameters
    ///
    /// - `url` - The full URL that was attempted
    /// - `source` - The underlying transport, status, or decode error
    #[error("request to {url} failed: {source}")]
    RequestFailed {
        /// The full URL that was attempted.
        url: String,
        /// The underlying cause.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A local token file could not be read.
    ///
    /// Surfaced immediately by `Session::load_token_from_file`.
    #[error("failed to read token file: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Wraps an underlying cause into [`ApiError::RequestFailed`].
    ///
    /// Accepts anything convertible into a boxed error, which includes
    /// `reqwest::Error`, `serde_json::Error`, and `anyhow::Error`.
    pub(crate) fn request_failed(
        url: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::RequestFailed {
            url: url.into(),
            source: source.into(),
        }
    }
}

/// A resource identity within one endpoint's namespace.
///
/// Most Guild Wars 2 resources use numeric ids (items, worlds, colors), but
/// some are addressed by strings (quaggans by slug, characters by name,
/// guilds by GUID). `Id` covers both without forcing callers to stringify
/// up-front.
///
/// # Example
///
/// ```rust
/// use gw2api::api::common::Id;
///
/// let ids = [Id::from(42u64), Id::from("rain")];
/// let joined: Vec<String> = ids.iter().map(Id::to_string).collect();
/// assert_eq!(joined, ["42", "rain"]);
/// ```
///
/// # Notes
///
/// - Deserializes untagged: a JSON number becomes `Number`, a JSON string
///   becomes `Name`. Catalog-id listing endpoints return arrays of exactly
///   these two shapes.
/// - Implements `Hash`/`Eq` so resolved entities can be paired back to their
///   originating references by identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    /// A numeric identity, e.g. item `26706` or world `1021`.
    Number(u64),
    /// A textual identity, e.g. quaggan `"rain"` or character `"Paglian"`.
    Name(String),
}

impl Id {
    /// Extracts an identity from a raw JSON value.
    ///
    /// Returns `None` for anything that is not a non-negative number or a
    /// string; callers treat such values as unusable references.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().map(Id::Number),
            Value::String(s) => Some(Id::Name(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{}", n),
            Id::Name(s) => f.write_str(s),
        }
    }
}

impl From<u64> for Id {
    fn from(value: u64) -> Self {
        Id::Number(value)
    }
}

impl From<u32> for Id {
    fn from(value: u32) -> Self {
        Id::Number(u64::from(value))
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::Name(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id::Name(value)
    }
}

/// Names a JSON value's shape for error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
