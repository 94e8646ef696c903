//
//  gw2api
//  api/entity.rs
//
//  Created by Ngonidzashe Mangudya on 2026/03/02.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Entity: a Single Addressable Resource
//!
//! An [`Entity`] is one resource instance materialized from one JSON object.
//! The Guild Wars 2 API adds fields to responses without notice, so the
//! entity is a schemaless ordered key/value store with typed accessors:
//! every key present in the originating record is readable, unchanged -
//! unknown fields are never rejected or dropped. This permissiveness is
//! deliberate (forward compatibility), not an accident.
//!
//! ## Example
//!
//! ```rust
//! use gw2api::api::entity::{Entity, RawRecord};
//! use gw2api::api::v2::Items;
//!
//! let record: RawRecord = serde_json::from_str(
//!     r#"{"id": 26706, "name": "Zho's Mask", "rarity": "Exotic"}"#,
//! ).unwrap();
//!
//! let item = Entity::<Items>::from_record(record);
//! assert_eq!(item.get_u64("id"), Some(26706));
//! assert_eq!(item.get_str("rarity"), Some("Exotic"));
//! assert_eq!(item.to_string(), r#"<Item "Zho's Mask">"#);
//! ```

use std::fmt;
use std::marker::PhantomData;

use serde_json::Value;

use crate::api::common::{json_kind, ApiError, Id};
use crate::api::resource::Resource;
use crate::api::session::Session;

/// One raw resource instance as returned by the API: an ordered mapping from
/// field name to JSON value. Never mutated after receipt; consumed once to
/// populate an [`Entity`].
pub type RawRecord = serde_json::Map<String, Value>;

/// How an entity was originally materialized, so `refresh` can re-issue the
/// same fetch.
#[derive(Clone)]
enum Origin {
    /// Fetched via `?id=<id>` against the resource endpoint.
    Query(Id),
    /// Fetched from a path-addressed endpoint (`v2/account`, `v2/guild/<id>`).
    Path(String),
    /// Built from a pre-fetched record; nothing to re-issue.
    Detached,
}

/// A single addressable resource instance of kind `R`.
///
/// Populated from exactly one JSON object. Identity is the `id` field,
/// unique within the resource endpoint's namespace.
///
/// # Invariants
///
/// - Every key of the originating record is present with an unchanged value;
///   nothing is renamed, nothing is silently dropped.
/// - Immutable in practice after population. The two sanctioned mutations
///   are [`refresh`](Self::refresh) (re-fetch and merge) and
///   [`merge`](Self::merge) (overlay application by an owned collection).
///
/// # Type parameters
///
/// - `R` - The [`Resource`] marker supplying endpoint, kind, and auth config
pub struct Entity<R: Resource> {
    fields: RawRecord,
    origin: Origin,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Entity<R> {
    /// Builds an entity from a pre-fetched record. No network call is made.
    pub fn from_record(record: RawRecord) -> Self {
        Self {
            fields: record,
            origin: Origin::Detached,
            _resource: PhantomData,
        }
    }

    /// Builds an entity from a raw catalog value, keeping its id as the
    /// refresh origin. Returns `None` for non-object values.
    pub(crate) fn from_catalog(value: Value) -> Option<Self> {
        match value {
            Value::Object(record) => {
                let origin = record
                    .get("id")
                    .and_then(Id::from_value)
                    .map_or(Origin::Detached, Origin::Query);
                Some(Self {
                    fields: record,
                    origin,
                    _resource: PhantomData,
                })
            }
            _ => None,
        }
    }

    /// Fetches one entity by identity via `?id=` against `R::ENDPOINT`.
    ///
    /// Honors `R::AUTH` and gates on `R::REQUIRED_SCOPES` pre-flight.
    ///
    /// # Errors
    ///
    /// - [`ApiError::MissingScope`] when the token lacks a required scope
    /// - [`ApiError::AuthorizationRequired`] for authenticated resources
    ///   with no token set
    /// - [`ApiError::RequestFailed`] for transport failures or a response
    ///   that is not a JSON object
    pub async fn fetch(session: &Session, id: impl Into<Id>) -> Result<Self, ApiError> {
        session.check_scopes(R::REQUIRED_SCOPES)?;
        let id = id.into();
        let value = session
            .request(R::ENDPOINT, &[("id", id.to_string())], R::AUTH)
            .await?;
        match value {
            Value::Object(record) => Ok(Self {
                fields: record,
                origin: Origin::Query(id),
                _resource: PhantomData,
            }),
            other => Err(ApiError::request_failed(
                R::ENDPOINT,
                anyhow::anyhow!(
                    "expected a JSON object for {} {}, got {}",
                    R::KIND,
                    id,
                    json_kind(&other)
                ),
            )),
        }
    }

    /// Fetches one entity from a path-addressed endpoint.
    ///
    /// Some resources are addressed by path rather than query parameter:
    /// `v2/account` (no id at all) and `v2/guild/<id>`. Honors `R::AUTH`
    /// and gates on `R::REQUIRED_SCOPES` like [`fetch`](Self::fetch).
    pub async fn fetch_path(session: &Session, path: impl Into<String>) -> Result<Self, ApiError> {
        session.check_scopes(R::REQUIRED_SCOPES)?;
        let path = path.into();
        let value = session.request(&path, &[], R::AUTH).await?;
        match value {
            Value::Object(record) => Ok(Self {
                fields: record,
                origin: Origin::Path(path),
                _resource: PhantomData,
            }),
            other => Err(ApiError::request_failed(
                path,
                anyhow::anyhow!(
                    "expected a JSON object for {}, got {}",
                    R::KIND,
                    json_kind(&other)
                ),
            )),
        }
    }

    /// Re-issues the originating fetch and merges the result over the
    /// current fields.
    ///
    /// Merge semantics, not replace semantics: fields present in the new
    /// response overwrite their old values, fields absent from the new
    /// response survive. Entities built from pre-fetched records have no
    /// originating request to re-issue; for them this is a no-op.
    pub async fn refresh(&mut self, session: &Session) -> Result<(), ApiError> {
        let value = match self.origin.clone() {
            Origin::Query(id) => {
                session
                    .request(R::ENDPOINT, &[("id", id.to_string())], R::AUTH)
                    .await?
            }
            Origin::Path(path) => session.request(&path, &[], R::AUTH).await?,
            Origin::Detached => return Ok(()),
        };
        match value {
            Value::Object(record) => {
                self.merge(&record);
                Ok(())
            }
            other => Err(ApiError::request_failed(
                R::ENDPOINT,
                anyhow::anyhow!(
                    "expected a JSON object refreshing {}, got {}",
                    R::KIND,
                    json_kind(&other)
                ),
            )),
        }
    }

    /// Returns a field by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns a field as a string slice, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Returns a field as a `u64`, if present and a non-negative number.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.fields.get(key).and_then(Value::as_u64)
    }

    /// The entity's identity, when an `id` field is present.
    pub fn id(&self) -> Option<Id> {
        self.fields.get("id").and_then(Id::from_value)
    }

    /// The entity's `name` field, when present and a string.
    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    /// All fields, in server order.
    pub fn fields(&self) -> &RawRecord {
        &self.fields
    }

    /// Merges an overlay record into this entity. Overlay values win on
    /// conflict; fields absent from the overlay are untouched.
    pub fn merge(&mut self, overlay: &RawRecord) {
        for (key, value) in overlay {
            self.fields.insert(key.clone(), value.clone());
        }
    }

    /// Best-effort display field: `name`, falling back to `id`, falling
    /// back to a placeholder.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name() {
            return name.to_string();
        }
        if let Some(id) = self.id() {
            return id.to_string();
        }
        "?".to_string()
    }

    /// A multi-line dump of every field, for interactive inspection.
    ///
    /// ```text
    /// <Item "Zho's Mask">
    ///                   id: 26706
    ///                 name: "Zho's Mask"
    ///               rarity: "Exotic"
    /// ```
    pub fn details(&self) -> String {
        let mut out = format!("{}", self);
        for (key, value) in &self.fields {
            out.push_str(&format!("\n{:>20}: {}", key, value));
        }
        out
    }
}

impl<R: Resource> Clone for Entity<R> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            origin: self.origin.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> fmt::Debug for Entity<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("kind", &R::KIND)
            .field("fields", &self.fields)
            .finish()
    }
}

impl<R: Resource> fmt::Display for Entity<R> {
    /// Renders `<Kind "display name">`, e.g. `<World "Sanctum of Rall">`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} \"{}\">", R::KIND, self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::v2::{Items, Worlds};
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_round_trip_preserves_every_field() {
        let raw = record(json!({
            "id": 26706,
            "name": "Zho's Mask",
            "rarity": "Exotic",
            "details": {"type": "Helm", "defense": 121},
            "some_future_field": [1, 2, 3]
        }));
        let keys: Vec<String> = raw.keys().cloned().collect();

        let item = Entity::<Items>::from_record(raw.clone());

        assert_eq!(item.fields().len(), keys.len());
        for key in keys {
            assert_eq!(item.get(&key), raw.get(&key), "field {} changed", key);
        }
    }

    #[test]
    fn test_display_name_fallbacks() {
        let named = Entity::<Items>::from_record(record(json!({"id": 1, "name": "Widget"})));
        assert_eq!(named.display_name(), "Widget");
        assert_eq!(named.to_string(), "<Item \"Widget\">");

        let id_only = Entity::<Items>::from_record(record(json!({"id": 77})));
        assert_eq!(id_only.display_name(), "77");

        let empty = Entity::<Items>::from_record(RawRecord::new());
        assert_eq!(empty.display_name(), "?");
    }

    #[test]
    fn test_merge_overlay_wins_and_keeps_existing() {
        let mut item = Entity::<Items>::from_record(record(json!({
            "id": 5,
            "name": "Widget",
            "rarity": "Fine"
        })));
        item.merge(&record(json!({"count": 3, "name": "Renamed"})));

        assert_eq!(item.get_u64("count"), Some(3));
        assert_eq!(item.name(), Some("Renamed"));
        // untouched fields survive the merge
        assert_eq!(item.get_str("rarity"), Some("Fine"));
    }

    #[test]
    fn test_details_lists_every_field() {
        let item = Entity::<Items>::from_record(record(json!({"id": 5, "name": "Widget"})));
        let details = item.details();
        assert!(details.starts_with("<Item \"Widget\">"));
        assert!(details.contains("id: 5"));
        assert!(details.contains("name: \"Widget\""));
    }

    #[tokio::test]
    async fn test_fetch_by_id_uses_id_parameter() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v2/worlds")
            .match_query(mockito::Matcher::UrlEncoded("id".into(), "1021".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 1021, "name": "Sanctum of Rall", "population": "High"}"#)
            .expect(1)
            .create_async()
            .await;

        let session = Session::with_base_url(server.url()).unwrap();
        let world = Entity::<Worlds>::fetch(&session, 1021u64).await.unwrap();

        assert_eq!(world.id(), Some(Id::Number(1021)));
        assert_eq!(world.name(), Some("Sanctum of Rall"));
        assert_eq!(world.get_str("population"), Some("High"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_non_object_response_is_request_failed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v2/worlds")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[1021]")
            .create_async()
            .await;

        let session = Session::with_base_url(server.url()).unwrap();
        let err = Entity::<Worlds>::fetch(&session, 1021u64).await.unwrap_err();
        assert!(matches!(err, ApiError::RequestFailed { .. }));
    }

    #[tokio::test]
    async fn test_refresh_merges_instead_of_replacing() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("GET", "/v2/worlds")
            .match_query(mockito::Matcher::UrlEncoded("id".into(), "1021".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 1021, "name": "Sanctum of Rall", "population": "High"}"#)
            .create_async()
            .await;

        let session = Session::with_base_url(server.url()).unwrap();
        let mut world = Entity::<Worlds>::fetch(&session, 1021u64).await.unwrap();

        // second response drops the population field and renames the world
        first.remove_async().await;
        server
            .mock("GET", "/v2/worlds")
            .match_query(mockito::Matcher::UrlEncoded("id".into(), "1021".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 1021, "name": "Renamed Rall"}"#)
            .create_async()
            .await;

        world.refresh(&session).await.unwrap();

        assert_eq!(world.name(), Some("Renamed Rall"));
        // absent fields are not removed by a refresh
        assert_eq!(world.get_str("population"), Some("High"));
    }

    #[tokio::test]
    async fn test_refresh_of_detached_entity_is_a_no_op() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let session = Session::with_base_url(server.url()).unwrap();
        let mut item = Entity::<Items>::from_record(record(json!({"id": 5})));
        item.refresh(&session).await.unwrap();
        mock.assert_async().await;
    }
}
