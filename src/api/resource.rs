//
//  gw2api
//  api/resource.rs
//
//  Created by Ngonidzashe Mangudya on 2026/03/02.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Resource Descriptors
//!
//! Concrete endpoints are configuration, not code: a marker type implementing
//! [`Resource`] (a public catalog resource) or [`Scoped`] (an account- or
//! character-scoped listing) supplies the endpoint path, a display kind, the
//! auth requirement, and the permission scopes the holder's token must grant.
//! The generic layers ([`Entity`](crate::api::entity::Entity),
//! [`Enumeration`](crate::api::enumeration::Enumeration),
//! [`OwnedCollection`](crate::api::owned::OwnedCollection)) are parameterized
//! over these markers; there is no inheritance chain anywhere.
//!
//! # Example
//!
//! ```rust
//! use gw2api::api::resource::Resource;
//!
//! struct Dungeons;
//!
//! impl Resource for Dungeons {
//!     const ENDPOINT: &'static str = "v2/dungeons";
//!     const KIND: &'static str = "Dungeon";
//! }
//!
//! assert_eq!(Dungeons::ENDPOINT, "v2/dungeons");
//! assert!(!Dungeons::AUTH);
//! ```

/// A publicly addressable resource type.
///
/// Implementors are zero-sized marker types; all configuration lives in
/// associated consts. See [`crate::api::v2`] for the built-in catalog.
///
/// # Associated consts
///
/// | Const | Default | Meaning |
/// |-------|---------|---------|
/// | `ENDPOINT` | - | Relative, versioned endpoint path (e.g. `v2/items`) |
/// | `KIND` | - | Human-readable type name used in display output |
/// | `AUTH` | `false` | Whether fetches against `ENDPOINT` need a token |
/// | `REQUIRED_SCOPES` | `&[]` | Permission scopes the token must grant |
pub trait Resource: Send + Sync + 'static {
    /// Relative endpoint path, e.g. `"v2/worlds"`.
    const ENDPOINT: &'static str;

    /// Human-readable resource kind, e.g. `"World"`.
    const KIND: &'static str;

    /// Whether requests against this endpoint must be authenticated.
    const AUTH: bool = false;

    /// Permission scopes the session's token must grant before a fetch is
    /// attempted. Checked pre-flight; a missing grant fails with
    /// [`ApiError::MissingScope`](crate::api::common::ApiError::MissingScope).
    const REQUIRED_SCOPES: &'static [&'static str] = &[];
}

/// A caller-scoped listing of some [`Resource`].
///
/// A scoped listing (the account bank, the materials store, the character
/// roster) returns a reference list: bare ids, or partial records carrying
/// overlay fields such as `count` that exist only in the scoped view. The
/// companion-catalog flag decides how those references are resolved into full
/// entities.
///
/// # Associated items
///
/// | Item | Default | Meaning |
/// |------|---------|---------|
/// | `Of` | - | The catalog resource the references point into |
/// | `ENDPOINT` | - | The scoped listing endpoint (e.g. `v2/account/bank`) |
/// | `KIND` | - | Human-readable collection name |
/// | `AUTH` | `true` | Whether the listing fetch needs a token |
/// | `REQUIRED_SCOPES` | `&[]` | Scopes gated at collection construction |
/// | `VIA_CATALOG` | `false` | Resolve through `Enumeration<Of>` and merge overlays |
///
/// # Notes
///
/// - With `VIA_CATALOG = true`, references are resolved in id batches through
///   the public catalog and overlay fields are merged onto the canonical
///   entities. This is the path for endpoints that only return
///   `{id, count}`-style overlays.
/// - With `VIA_CATALOG = false`, each reference is resolved independently and
///   concurrently: bare ids trigger per-id fetches, embedded records resolve
///   locally without a network call.
pub trait Scoped: Send + Sync + 'static {
    /// The catalog resource the scoped references resolve into.
    type Of: Resource;

    /// Relative endpoint path of the scoped listing, e.g. `"v2/account/bank"`.
    const ENDPOINT: &'static str;

    /// Human-readable collection name, e.g. `"Bank"`.
    const KIND: &'static str;

    /// Whether the listing fetch must be authenticated.
    const AUTH: bool = true;

    /// Permission scopes gated at collection construction time.
    const REQUIRED_SCOPES: &'static [&'static str] = &[];

    /// Whether references resolve through the public catalog of
    /// [`Self::Of`] with overlay merging, instead of per-reference fetches.
    const VIA_CATALOG: bool = false;
}
