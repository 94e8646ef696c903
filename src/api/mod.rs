//
//  gw2api
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/03/02.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Guild Wars 2 API Client Layers
//!
//! The client is layered bottom-up:
//!
//! - [`transport`] - HTTP plumbing: URL building, query encoding, decoding
//! - [`session`] - token storage, token metadata, scope checks
//! - [`entity`] / [`enumeration`] / [`owned`] - the three access shapes:
//!   one record, a public catalog, a caller-scoped collection
//! - [`resource`] - the marker traits tying an endpoint to those shapes
//! - [`v2`] - the concrete `v2/` endpoint catalog
//!
//! [`common`] carries the error and identity types shared by all of them.

pub mod common;
pub mod entity;
pub mod enumeration;
pub mod owned;
pub mod resource;
pub mod session;
pub mod transport;
pub mod v2;

pub use common::{ApiError, Id};
pub use entity::{Entity, RawRecord};
pub use enumeration::Enumeration;
pub use owned::OwnedCollection;
pub use resource::{Resource, Scoped};
pub use session::{Session, TokenInfo};
pub use transport::Transport;
