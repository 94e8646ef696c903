//
//  gw2api
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/03/02.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Guild Wars 2 API Client Library
//!
//! An async client for the read-mostly Guild Wars 2 REST API, exposing every
//! versioned endpoint through three generic access shapes instead of one
//! hand-written type per endpoint.
//!
//! ## Overview
//!
//! The API adds response fields without notice and serves hundreds of
//! endpoint shapes; this client stays schemaless on purpose. Every record is
//! an ordered field store with typed accessors, and each endpoint is a
//! zero-sized marker declaring its path, auth requirement, and permission
//! scopes.
//!
//! ## Features
//!
//! - **Three access shapes**: [`Entity`] (one record), [`Enumeration`] (a
//!   public catalog with id listing and batched fetches), [`OwnedCollection`]
//!   (an account- or character-scoped subset with overlay merging)
//! - **Forward-compatible records**: unknown response fields are kept, never
//!   rejected
//! - **Scope gating up front**: missing token permissions fail before any
//!   network traffic
//! - **Bounded concurrency**: per-reference resolution fans out on a pool
//!   sized to the host, results in reference order
//!
//! ## Module Structure
//!
//! - [`api::transport`]: HTTP plumbing over `reqwest`
//! - [`api::session`]: token storage, token metadata, scope checks
//! - [`api::entity`], [`api::enumeration`], [`api::owned`]: the access shapes
//! - [`api::resource`]: the endpoint marker traits
//! - [`api::v2`]: the concrete `v2/` endpoint catalog and the [`Account`]
//!   composition
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gw2api::{Enumeration, Session};
//! use gw2api::api::v2::{Account, Worlds};
//!
//! # async fn example() -> Result<(), gw2api::ApiError> {
//! // public data needs no token
//! let session = Arc::new(Session::new()?);
//! let worlds = Enumeration::<Worlds>::new(Arc::clone(&session));
//! println!("{} worlds", worlds.ids().await?.len());
//!
//! // account data needs one
//! let mut session = Session::new()?;
//! let info = session.set_token("XXXX-...-XXXX").await?;
//! println!("authenticated as {}", info);
//!
//! let account = Account::fetch(Arc::new(session)).await?;
//! println!("home world: {}", account.world().await?);
//! # Ok(())
//! # }
//! ```
//!
//! [`Account`]: api::v2::Account

pub mod api;

pub use api::common::{ApiError, Id};
pub use api::entity::{Entity, RawRecord};
pub use api::enumeration::Enumeration;
pub use api::owned::OwnedCollection;
pub use api::resource::{Resource, Scoped};
pub use api::session::{Session, TokenInfo};
pub use api::transport::Transport;

/// Crate version, injected into the default HTTP user agent.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
