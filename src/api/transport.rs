//
//  gw2api
//  api/transport.rs
//
//  Created by Ngonidzashe Mangudya on 2026/03/02.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # HTTP Transport for the Guild Wars 2 API
//!
//! This module performs the actual HTTP work: one GET (or POST, when a body
//! is supplied) against the base URL plus a relative endpoint path, with
//! query-string building, header merging, and uniform error translation.
//!
//! ## Features
//!
//! - URL joining against a fixed (but test-overridable) base URL
//! - Standard percent-encoding for query parameters, with one deliberate
//!   exception: commas in id-list values stay literal, because the API
//!   expects `?ids=1,2,3` unescaped
//! - Caller headers merged over the base header set
//! - Every transport failure (connection, non-2xx status, malformed JSON)
//!   translated into a single [`ApiError::RequestFailed`] carrying the URL
//! - No retries, no timeout overrides, no redirect handling beyond the
//!   underlying stack's defaults

use reqwest::Client;
use serde_json::Value;

use crate::api::common::ApiError;

/// The production Guild Wars 2 API host.
pub const DEFAULT_BASE_URL: &str = "https://api.guildwars2.com";

/// The HTTP transport layer.
///
/// Owns a single [`reqwest::Client`] (connection pooling comes for free) and
/// the base URL every relative endpoint path is joined against.
///
/// # Creating a transport
///
/// ```rust,no_run
/// use gw2api::api::transport::Transport;
///
/// // Production host
/// let transport = Transport::new()?;
///
/// // Overridden host, used by the test suite to point at a local stub
/// let stubbed = Transport::with_base_url("http://127.0.0.1:8080")?;
/// # Ok::<(), gw2api::ApiError>(())
/// ```
///
/// # Notes
///
/// - The transport itself knows nothing about authentication; the session
///   layer supplies the `Authorization` header through the `headers`
///   parameter of [`request`](Self::request).
/// - A custom `User-Agent: gw2api/<version>` is set on every request.
#[derive(Debug, Clone)]
pub struct Transport {
    /// The underlying HTTP client.
    http: Client,
    /// The base URL relative endpoint paths are joined against.
    base_url: String,
}

impl Transport {
    /// Creates a transport against the production API host.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::RequestFailed`] if the HTTP client could not be
    /// constructed.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a transport against an arbitrary base URL.
    ///
    /// Intended for tests that point the client at a local HTTP stub.
    ///
    /// # Parameters
    ///
    /// - `base_url` - The scheme-and-host prefix, e.g. `http://127.0.0.1:9000`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::RequestFailed`] if the HTTP client could not be
    /// constructed.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let base_url = base_url.into();
        let http = Client::builder()
            .user_agent(format!("gw2api/{}", crate::VERSION))
            .build()
            .map_err(|e| ApiError::request_failed(base_url.clone(), e))?;
        Ok(Self { http, base_url })
    }

    /// Returns the base URL this transport targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Performs one HTTP request and decodes the response body as JSON.
    ///
    /// The method is GET unless `body` is supplied, in which case it is POST
    /// with a JSON body. No concrete Guild Wars 2 endpoint currently takes a
    /// body, but the wire contract allows it.
    ///
    /// # Parameters
    ///
    /// - `path` - Relative endpoint path, e.g. `"v2/items"`
    /// - `query` - Query parameters; id-list values keep their commas literal
    /// - `body` - Optional JSON body; its presence selects POST
    /// - `headers` - Caller headers, merged over the base header set
    ///
    /// # Returns
    ///
    /// The decoded JSON value: a single object, a homogeneous array of
    /// objects, or an array of bare ids, depending on the endpoint.
    ///
    /// # Errors
    ///
    /// Any connection failure, non-2xx status, or JSON decode failure is
    /// translated into [`ApiError::RequestFailed`] carrying the attempted
    /// URL. Failures surface immediately; nothing is retried.
    pub async fn request(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        headers: &[(&str, String)],
    ) -> Result<Value, ApiError> {
        let url = self.build_url(path, query);
        tracing::debug!(%url, post = body.is_some(), "requesting");

        let mut request = match body {
            Some(payload) => self.http.post(&url).json(payload),
            None => self.http.get(&url),
        };
        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::request_failed(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::debug!(%url, %status, "non-success response");
            return Err(ApiError::request_failed(
                &url,
                anyhow::anyhow!("unexpected status {}: {}", status, text),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::request_failed(&url, e))
    }

    /// Joins the base URL with a relative path and an encoded query string.
    ///
    /// Commas in parameter values are kept literal; the API rejects
    /// percent-encoded separators in id-list parameters.
    fn build_url(&self, path: &str, query: &[(&str, String)]) -> String {
        let mut url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        if !query.is_empty() {
            let encoded = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())))
                .finish()
                .replace("%2C", ",");
            url.push('?');
            url.push_str(&encoded);
        }
        url
    }
}
