//
//  gw2api
//  api/enumeration.rs
//
//  Created by Ngonidzashe Mangudya on 2026/03/02.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Enumeration: the Public Catalog of a Resource Type
//!
//! An [`Enumeration`] represents the full catalog an endpoint exposes: every
//! item, every world, every color. It supports listing all valid ids,
//! resolving one id, resolving the whole catalog via the `all` sentinel, and
//! resolving an id list in chunked batches.
//!
//! ## Chunking
//!
//! The API rejects id-list requests above a fixed count, so
//! [`get_many`](Enumeration::get_many) splits its input into groups of at
//! most [`ID_BATCH_SIZE`] ids and issues one request per group.
//!
//! ## Ordering and absence
//!
//! The server does not guarantee that a batch response echoes request order,
//! and ids the server considers invalid are simply absent from the response
//! (never padded with placeholders). Callers must treat
//! [`get_many`](Enumeration::get_many) output as unordered with respect to
//! the input and must not assume positional correspondence.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;

use crate::api::common::{json_kind, ApiError, Id};
use crate::api::entity::Entity;
use crate::api::resource::Resource;
use crate::api::session::Session;

/// Maximum number of ids per batched request.
///
/// The API historically rejects id lists above a fixed count; staying at 20
/// keeps every batch well inside the limit.
pub const ID_BATCH_SIZE: usize = 20;

/// The public catalog of resource type `R`.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use gw2api::api::enumeration::Enumeration;
/// use gw2api::api::session::Session;
/// use gw2api::api::v2::Worlds;
///
/// # async fn example() -> Result<(), gw2api::ApiError> {
/// let session = Arc::new(Session::new()?);
/// let worlds = Enumeration::<Worlds>::new(session);
///
/// let all_ids = worlds.ids().await?;
/// let one = worlds.get(1021u64).await?;
/// println!("{} of {} worlds: {}", 1, all_ids.len(), one);
/// # Ok(())
/// # }
/// ```
pub struct Enumeration<R: Resource> {
    session: Arc<Session>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Enumeration<R> {
    /// Creates a catalog handle over a shared session.
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            _resource: PhantomData,
        }
    }

    /// Fetches the full id catalog for this resource type.
    ///
    /// The endpoint returns an array of bare ids (numbers or strings);
    /// anything else in the array is skipped.
    pub async fn ids(&self) -> Result<Vec<Id>, ApiError> {
        let value = self.session.request(R::ENDPOINT, &[], R::AUTH).await?;
        match value {
            Value::Array(items) => Ok(items.iter().filter_map(Id::from_value).collect()),
            other => Err(ApiError::request_failed(
                R::ENDPOINT,
                anyhow::anyhow!(
                    "expected an id array listing {}, got {}",
                    R::ENDPOINT,
                    json_kind(&other)
                ),
            )),
        }
    }

    /// Fetches one entity by identity.
    pub async fn get(&self, id: impl Into<Id>) -> Result<Entity<R>, ApiError> {
        Entity::fetch(&self.session, id).await
    }

    /// Fetches every entity in the catalog via the `all` sentinel.
    pub async fn get_all(&self) -> Result<Vec<Entity<R>>, ApiError> {
        self.page(&[("ids", "all".to_string())]).await
    }

    /// Fetches a list of entities by identity, in batches.
    ///
    /// Ids are chunked into groups of at most [`ID_BATCH_SIZE`]; each group
    /// becomes one `?ids=a,b,c` request and the results are flattened.
    ///
    /// # Returns
    ///
    /// The resolved entities, in server response order batch by batch -
    /// unordered with respect to `ids`. Ids the server does not recognize
    /// are absent from the result; the output length may be smaller than the
    /// input length and positions do not correspond.
    pub async fn get_many(&self, ids: &[Id]) -> Result<Vec<Entity<R>>, ApiError> {
        let mut entities = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(ID_BATCH_SIZE) {
            let joined = chunk
                .iter()
                .map(Id::to_string)
                .collect::<Vec<_>>()
                .join(",");
            tracing::debug!(endpoint = R::ENDPOINT, batch = %joined, "fetching id batch");
            entities.extend(self.page(&[("ids", joined)]).await?);
        }
        Ok(entities)
    }

    /// Issues one listing request and maps each returned object to an
    /// entity. Non-object entries are skipped.
    async fn page(&self, params: &[(&str, String)]) -> Result<Vec<Entity<R>>, ApiError> {
        let value = self.session.request(R::ENDPOINT, params, R::AUTH).await?;
        match value {
            Value::Array(items) => Ok(items
                .into_iter()
                .filter_map(Entity::from_catalog)
                .collect()),
            other => Err(ApiError::request_failed(
                R::ENDPOINT,
                anyhow::anyhow!(
                    "expected an entity array from {}, got {}",
                    R::ENDPOINT,
                    json_kind(&other)
                ),
            )),
        }
    }
}
