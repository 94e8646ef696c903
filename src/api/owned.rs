//
//  gw2api
//  api/owned.rs
//
//  Created by Ngonidzashe Mangudya on 2026/03/02.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # OwnedCollection: Account- and Character-Scoped Resolution
//!
//! An [`OwnedCollection`] is a caller-scoped subset of a resource: the items
//! in the account bank, the materials store, the character roster. The
//! scoped endpoint returns a reference list - bare ids, or partial records
//! like `{"id": 19700, "count": 250}` whose extra fields exist only in the
//! scoped view - and the collection resolves those references into full
//! entities on refresh.
//!
//! ## Resolution strategies
//!
//! - **Via the public catalog** (`S::VIA_CATALOG`): ids are batch-fetched
//!   through an [`Enumeration`] and each reference's overlay fields are
//!   merged onto the canonically fetched entity. This is the path for
//!   endpoints that only return overlays - the canonical object must come
//!   from the catalog.
//! - **Direct** (no companion catalog): each reference resolves
//!   independently and concurrently on a bounded pool - bare ids trigger
//!   per-id fetches, embedded records resolve locally with no network call.
//!
//! ## Leniency
//!
//! References that are unusable - `null` (an empty bank slot), or an object
//! without an id - are silently dropped, never raised. A collection refresh
//! favors partial success over total failure.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::api::common::{json_kind, ApiError, Id};
use crate::api::entity::{Entity, RawRecord};
use crate::api::enumeration::Enumeration;
use crate::api::resource::Scoped;
use crate::api::session::Session;

/// A caller-scoped collection of resource `S::Of`, resolved lazily.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use gw2api::api::owned::OwnedCollection;
/// use gw2api::api::session::Session;
/// use gw2api::api::v2::Bank;
///
/// # async fn example() -> Result<(), gw2api::ApiError> {
/// let mut session = Session::new()?;
/// session.set_token("XXXX-...-XXXX").await?;
/// let session = Arc::new(session);
///
/// let mut bank = OwnedCollection::<Bank>::fetch(session).await?;
/// for item in bank.entries().await? {
///     println!("{} x {}", item, item.get_u64("count").unwrap_or(0));
/// }
/// # Ok(())
/// # }
/// ```
///
/// # Notes
///
/// - Construction gates on `S::REQUIRED_SCOPES` and fails with
///   [`ApiError::MissingScope`] before anything is resolved.
/// - [`entries`](Self::entries) triggers exactly one
///   [`refresh`](Self::refresh) on first use; call `refresh` explicitly to
///   force re-resolution.
pub struct OwnedCollection<S: Scoped> {
    session: Arc<Session>,
    refs: Option<Vec<Value>>,
    resolved: Option<Vec<Entity<S::Of>>>,
}

impl<S: Scoped> OwnedCollection<S> {
    /// Creates the collection by fetching its reference list from
    /// `S::ENDPOINT` immediately.
    ///
    /// # Errors
    ///
    /// - [`ApiError::MissingScope`] when the token lacks a required scope
    /// - [`ApiError::AuthorizationRequired`] when `S::AUTH` and no token set
    /// - [`ApiError::RequestFailed`] when the listing fetch fails or does
    ///   not return an array
    pub async fn fetch(session: Arc<Session>) -> Result<Self, ApiError> {
        session.check_scopes(S::REQUIRED_SCOPES)?;
        let refs = Self::fetch_refs(&session).await?;
        Ok(Self {
            session,
            refs: Some(refs),
            resolved: None,
        })
    }

    /// Creates the collection without any network traffic; the reference
    /// list is fetched on first resolution.
    ///
    /// Still gates on `S::REQUIRED_SCOPES` immediately, so a token missing
    /// a scope is rejected at construction, not at first use.
    pub fn lazy(session: Arc<Session>) -> Result<Self, ApiError> {
        session.check_scopes(S::REQUIRED_SCOPES)?;
        Ok(Self {
            session,
            refs: None,
            resolved: None,
        })
    }

    /// Creates the collection from an explicit reference list.
    ///
    /// No network call is made until the first resolution. Still gates on
    /// `S::REQUIRED_SCOPES`.
    pub fn from_refs(session: Arc<Session>, refs: Vec<Value>) -> Result<Self, ApiError> {
        session.check_scopes(S::REQUIRED_SCOPES)?;
        Ok(Self {
            session,
            refs: Some(refs),
            resolved: None,
        })
    }

    async fn fetch_refs(session: &Session) -> Result<Vec<Value>, ApiError> {
        let value = session.request(S::ENDPOINT, &[], S::AUTH).await?;
        let refs = match value {
            Value::Array(items) => items,
            other => {
                return Err(ApiError::request_failed(
                    S::ENDPOINT,
                    anyhow::anyhow!(
                        "expected a reference array from {}, got {}",
                        S::ENDPOINT,
                        json_kind(&other)
                    ),
                ))
            }
        };
        tracing::debug!(kind = S::KIND, refs = refs.len(), "reference list fetched");
        Ok(refs)
    }

    /// The raw reference list backing this collection; empty until it has
    /// been fetched.
    pub fn refs(&self) -> &[Value] {
        self.refs.as_deref().unwrap_or(&[])
    }

    /// Number of resolved entities; `0` before the first resolution.
    pub fn count(&self) -> usize {
        self.resolved.as_ref().map_or(0, Vec::len)
    }

    /// Whether the collection has been resolved.
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    /// Returns the resolved entities, resolving on first use.
    ///
    /// Exactly one [`refresh`](Self::refresh) is triggered no matter how
    /// many times this is called before it.
    pub async fn entries(&mut self) -> Result<&[Entity<S::Of>], ApiError> {
        if self.resolved.is_none() {
            self.refresh().await?;
        }
        Ok(self.resolved.as_deref().unwrap_or(&[]))
    }

    /// Resolves every usable reference into an entity.
    ///
    /// Unusable references (`null`, objects without an id) are dropped
    /// silently. With a companion catalog (`S::VIA_CATALOG`) resolution goes
    /// through batched [`Enumeration::get_many`] calls with overlay merging;
    /// otherwise each reference resolves independently on a bounded
    /// concurrent pool, reassembled in reference order.
    pub async fn refresh(&mut self) -> Result<&[Entity<S::Of>], ApiError> {
        if self.refs.is_none() {
            self.refs = Some(Self::fetch_refs(&self.session).await?);
        }
        let usable = Self::usable_refs(self.refs());
        let resolved = if S::VIA_CATALOG {
            self.resolve_via_catalog(usable).await?
        } else {
            self.resolve_direct(usable).await?
        };
        tracing::debug!(kind = S::KIND, count = resolved.len(), "collection resolved");
        Ok(self.resolved.insert(resolved).as_slice())
    }

    /// Extracts `(identity, overlay)` pairs from the raw references,
    /// dropping anything without a usable identity.
    fn usable_refs(refs: &[Value]) -> Vec<(Id, Option<RawRecord>)> {
        refs.iter()
            .filter_map(|reference| match reference {
                Value::Object(record) => match record.get("id").and_then(Id::from_value) {
                    Some(id) => Some((id, Some(record.clone()))),
                    None => {
                        tracing::debug!(kind = S::KIND, "skipping reference without id");
                        None
                    }
                },
                other => match Id::from_value(other) {
                    Some(id) => Some((id, None)),
                    None => {
                        tracing::debug!(kind = S::KIND, "skipping unusable reference");
                        None
                    }
                },
            })
            .collect()
    }

    /// Resolves references through the public catalog of `S::Of`.
    ///
    /// Bare-id reference lists delegate wholesale and keep server response
    /// order. When any reference carries overlay fields, resolved entities
    /// are re-paired by identity in reference order and each overlay is
    /// merged on top (overlay fields win). Ids the server did not return
    /// are absent from the output.
    async fn resolve_via_catalog(
        &self,
        refs: Vec<(Id, Option<RawRecord>)>,
    ) -> Result<Vec<Entity<S::Of>>, ApiError> {
        let catalog = Enumeration::<S::Of>::new(Arc::clone(&self.session));
        let ids: Vec<Id> = refs.iter().map(|(id, _)| id.clone()).collect();
        let fetched = catalog.get_many(&ids).await?;

        if refs.iter().all(|(_, overlay)| overlay.is_none()) {
            return Ok(fetched);
        }

        // The same item can occupy several slots, so pair by lookup rather
        // than removal.
        let by_id: HashMap<Id, Entity<S::Of>> = fetched
            .into_iter()
            .filter_map(|entity| entity.id().map(|id| (id, entity)))
            .collect();

        let mut resolved = Vec::with_capacity(refs.len());
        for (id, overlay) in refs {
            let Some(mut entity) = by_id.get(&id).cloned() else {
                tracing::debug!(kind = S::KIND, %id, "id absent from catalog response");
                continue;
            };
            if let Some(overlay) = overlay {
                entity.merge(&overlay);
            }
            resolved.push(entity);
        }
        Ok(resolved)
    }

    /// Resolves references independently on a bounded concurrent pool.
    ///
    /// Embedded records resolve locally; bare ids fetch by id. Completion
    /// order is unconstrained; results are reassembled in reference order
    /// before returning.
    async fn resolve_direct(
        &self,
        refs: Vec<(Id, Option<RawRecord>)>,
    ) -> Result<Vec<Entity<S::Of>>, ApiError> {
        let total = refs.len();
        let limit = std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(4);
        let semaphore = Arc::new(Semaphore::new(limit));
        let mut tasks: JoinSet<(usize, Result<Entity<S::Of>, ApiError>)> = JoinSet::new();

        for (index, (id, record)) in refs.into_iter().enumerate() {
            let session = Arc::clone(&self.session);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                // the semaphore only closes on shutdown; a failed acquire
                // just runs the task ungated
                let _permit = semaphore.acquire_owned().await.ok();
                let entity = match record {
                    Some(record) => Ok(Entity::<S::Of>::from_record(record)),
                    None => Entity::<S::Of>::fetch(&session, id).await,
                };
                (index, entity)
            });
        }

        let mut indexed = Vec::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            let (index, result) =
                joined.map_err(|e| ApiError::request_failed(S::ENDPOINT, e))?;
            indexed.push((index, result?));
        }
        indexed.sort_by_key(|(index, _)| *index);
        Ok(indexed.into_iter().map(|(_, entity)| entity).collect())
    }
}

impl<S: Scoped> fmt::Debug for OwnedCollection<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedCollection")
            .field("kind", &S::KIND)
            .field("refs", &self.refs.as_ref().map(Vec::len))
            .field("resolved", &self.resolved.as_ref().map(Vec::len))
            .finish()
    }
}

impl<S: Scoped> fmt::Display for OwnedCollection<S> {
    /// Renders `<Bank 24 items>`, or `<Bank (unresolved)>` before the first
    /// resolution.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.resolved {
            Some(entities) => write!(f, "<{} {} items>", S::KIND, entities.len()),
            None => write!(f, "<{} (unresolved)>", S::KIND),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::resource::{Resource, Scoped};
    use serde_json::json;

    struct TestItems;
    impl Resource for TestItems {
        const ENDPOINT: &'static str = "v2/items";
        const KIND: &'static str = "Item";
    }

    /// Overlay references resolved through the public items catalog.
    struct TestBank;
    impl Scoped for TestBank {
        type Of = TestItems;
        const ENDPOINT: &'static str = "v2/account/bank";
        const KIND: &'static str = "Bank";
        const AUTH: bool = false;
        const VIA_CATALOG: bool = true;
    }

    /// Direct per-reference resolution, no companion catalog.
    struct TestRoster;
    impl Scoped for TestRoster {
        type Of = TestItems;
        const ENDPOINT: &'static str = "v2/account/roster";
        const KIND: &'static str = "Roster";
        const AUTH: bool = false;
    }

    /// Scope-gated collection for the permission tests.
    struct TestGated;
    impl Scoped for TestGated {
        type Of = TestItems;
        const ENDPOINT: &'static str = "v2/account/gated";
        const KIND: &'static str = "Gated";
        const AUTH: bool = false;
        const REQUIRED_SCOPES: &'static [&'static str] = &["inventories"];
    }

    async fn session_with_permissions(
        server: &mut mockito::ServerGuard,
        permissions: &[&str],
    ) -> Arc<Session> {
        let quoted: Vec<String> = permissions.iter().map(|p| format!("\"{}\"", p)).collect();
        server
            .mock("GET", "/v2/tokeninfo")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(
                r#"{{"id": "T", "name": "test key", "permissions": [{}]}}"#,
                quoted.join(",")
            ))
            .create_async()
            .await;
        let mut session = Session::with_base_url(server.url()).unwrap();
        session.set_token("secret").await.unwrap();
        Arc::new(session)
    }

    #[tokio::test]
    async fn test_overlay_fields_merge_onto_canonical_entities() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v2/items")
            .match_query(mockito::Matcher::UrlEncoded("ids".into(), "5,7".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": 5, "name": "Widget"}, {"id": 7, "name": "Gadget"}]"#)
            .create_async()
            .await;

        let session = Arc::new(Session::with_base_url(server.url()).unwrap());
        let refs = vec![json!({"id": 5, "count": 3}), json!({"id": 7, "count": 1})];
        let mut bank = OwnedCollection::<TestBank>::from_refs(session, refs).unwrap();

        let entries = bank.refresh().await.unwrap();
        assert_eq!(entries.len(), 2);
        // canonical fields and overlay fields side by side, reference order
        assert_eq!(entries[0].name(), Some("Widget"));
        assert_eq!(entries[0].get_u64("count"), Some(3));
        assert_eq!(entries[1].name(), Some("Gadget"));
        assert_eq!(entries[1].get_u64("count"), Some(1));
    }

    #[tokio::test]
    async fn test_bare_ids_delegate_wholesale_to_the_catalog() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v2/items")
            .match_query(mockito::Matcher::UrlEncoded("ids".into(), "5,7".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            // response order differs from request order on purpose
            .with_body(r#"[{"id": 7, "name": "Gadget"}, {"id": 5, "name": "Widget"}]"#)
            .create_async()
            .await;

        let session = Arc::new(Session::with_base_url(server.url()).unwrap());
        let refs = vec![json!(5), json!(7)];
        let mut collection = OwnedCollection::<TestBank>::from_refs(session, refs).unwrap();

        let entries = collection.refresh().await.unwrap();
        let ids: Vec<u64> = entries.iter().filter_map(|e| e.get_u64("id")).collect();
        // wholesale delegation keeps server response order
        assert_eq!(ids, vec![7, 5]);
    }

    #[tokio::test]
    async fn test_duplicate_ids_resolve_per_reference() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v2/items")
            .match_query(mockito::Matcher::UrlEncoded("ids".into(), "5,5".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": 5, "name": "Widget"}]"#)
            .create_async()
            .await;

        let session = Arc::new(Session::with_base_url(server.url()).unwrap());
        let refs = vec![json!({"id": 5, "count": 3}), json!({"id": 5, "count": 250})];
        let mut bank = OwnedCollection::<TestBank>::from_refs(session, refs).unwrap();

        let entries = bank.refresh().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].get_u64("count"), Some(3));
        assert_eq!(entries[1].get_u64("count"), Some(250));
    }

    #[tokio::test]
    async fn test_malformed_references_are_dropped_not_raised() {
        let mut server = mockito::Server::new_async().await;
        for id in [2u64, 9u64] {
            server
                .mock("GET", "/v2/items")
                .match_query(mockito::Matcher::UrlEncoded("id".into(), id.to_string()))
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(format!(r#"{{"id": {}, "name": "Item {}"}}"#, id, id))
                .create_async()
                .await;
        }

        let session = Arc::new(Session::with_base_url(server.url()).unwrap());
        let refs = vec![json!(2), Value::Null, json!(9)];
        let mut roster = OwnedCollection::<TestRoster>::from_refs(session, refs).unwrap();

        let entries = roster.refresh().await.unwrap();
        assert_eq!(entries.len(), 2);
        let ids: Vec<u64> = entries.iter().filter_map(|e| e.get_u64("id")).collect();
        // reference order survives the concurrent fan-out
        assert_eq!(ids, vec![2, 9]);
    }

    #[tokio::test]
    async fn test_embedded_records_resolve_without_network() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let session = Arc::new(Session::with_base_url(server.url()).unwrap());
        let refs = vec![json!({"id": 1, "name": "Embedded"})];
        let mut roster = OwnedCollection::<TestRoster>::from_refs(session, refs).unwrap();

        let entries = roster.refresh().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name(), Some("Embedded"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_lazy_entries_trigger_exactly_one_fetch_sequence() {
        let mut server = mockito::Server::new_async().await;
        let listing = server
            .mock("GET", "/v2/account/roster")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[2, 9]")
            .expect(1)
            .create_async()
            .await;
        let mut per_id = Vec::new();
        for id in [2u64, 9u64] {
            per_id.push(
                server
                    .mock("GET", "/v2/items")
                    .match_query(mockito::Matcher::UrlEncoded("id".into(), id.to_string()))
                    .with_status(200)
                    .with_header("content-type", "application/json")
                    .with_body(format!(r#"{{"id": {}}}"#, id))
                    .expect(1)
                    .create_async()
                    .await,
            );
        }

        let session = Arc::new(Session::with_base_url(server.url()).unwrap());
        let mut roster = OwnedCollection::<TestRoster>::fetch(session).await.unwrap();
        assert!(!roster.is_resolved());

        // two iterations, one underlying fetch sequence
        assert_eq!(roster.entries().await.unwrap().len(), 2);
        assert_eq!(roster.entries().await.unwrap().len(), 2);
        assert_eq!(roster.count(), 2);

        listing.assert_async().await;
        for mock in per_id {
            mock.assert_async().await;
        }
    }

    #[tokio::test]
    async fn test_scope_gate_rejects_missing_permission() {
        let mut server = mockito::Server::new_async().await;
        let session = session_with_permissions(&mut server, &["account"]).await;

        let err = OwnedCollection::<TestGated>::from_refs(session, vec![]).unwrap_err();
        match err {
            ApiError::MissingScope { scope } => assert_eq!(scope, "inventories"),
            other => panic!("expected MissingScope, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_scope_gate_accepts_granted_permission() {
        let mut server = mockito::Server::new_async().await;
        let session =
            session_with_permissions(&mut server, &["account", "inventories"]).await;

        assert!(OwnedCollection::<TestGated>::from_refs(session, vec![]).is_ok());
    }

    #[tokio::test]
    async fn test_display_reports_resolution_state() {
        let server = mockito::Server::new_async().await;
        let session = Arc::new(Session::with_base_url(server.url()).unwrap());
        let mut collection = OwnedCollection::<TestRoster>::from_refs(
            session,
            vec![json!({"id": 1, "name": "A"})],
        )
        .unwrap();

        assert_eq!(collection.to_string(), "<Roster (unresolved)>");
        let debug = format!("{:?}", collection);
        assert!(debug.contains("Roster"), "unexpected debug output: {}", debug);

        collection.refresh().await.unwrap();
        assert_eq!(collection.to_string(), "<Roster 1 items>");
    }
}
