//
//  gw2api
//  api/v2/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/03/02.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Version 2 Endpoint Catalog
//!
//! The concrete wiring of the generic client onto the `v2/` surface of the
//! Guild Wars 2 API. Each public catalog endpoint is a zero-sized marker
//! implementing [`Resource`], each account- or character-scoped listing is a
//! marker implementing [`Scoped`]; the generic [`Entity`],
//! [`Enumeration`](crate::api::enumeration::Enumeration) and
//! [`OwnedCollection`](crate::api::owned::OwnedCollection) types do the
//! actual work.
//!
//! Adding a new endpoint is one marker impl: name the path, name the kind,
//! declare auth and scopes. No per-endpoint structs, no per-endpoint schema.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gw2api::api::enumeration::Enumeration;
//! use gw2api::api::session::Session;
//! use gw2api::api::v2::Quaggans;
//!
//! # async fn example() -> Result<(), gw2api::ApiError> {
//! let session = Arc::new(Session::new()?);
//! let quaggans = Enumeration::<Quaggans>::new(session);
//! println!("{}", quaggans.get("rain").await?);
//! # Ok(())
//! # }
//! ```

pub mod account;

use crate::api::common::ApiError;
use crate::api::entity::Entity;
use crate::api::resource::{Resource, Scoped};
use crate::api::session::Session;

pub use account::Account;

macro_rules! public_resource {
    ($(#[$doc:meta])* $marker:ident, $endpoint:literal, $kind:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy)]
        pub struct $marker;

        impl Resource for $marker {
            const ENDPOINT: &'static str = $endpoint;
            const KIND: &'static str = $kind;
        }
    };
}

public_resource!(
    /// The item catalog: weapons, armor, trophies, consumables.
    Items, "v2/items", "Item"
);
public_resource!(
    /// The world (server) list.
    Worlds, "v2/worlds", "World"
);
public_resource!(
    /// Dye colors, with per-material tinting data.
    Colors, "v2/colors", "Color"
);
public_resource!(
    /// Quaggan images, addressed by slug.
    Quaggans, "v2/quaggans", "Quaggan"
);
public_resource!(
    /// Wallet currency definitions.
    Currencies, "v2/currencies", "Currency"
);
public_resource!(
    /// Miniature pets.
    Minis, "v2/minis", "Mini"
);
public_resource!(
    /// Crafting recipes.
    Recipes, "v2/recipes", "Recipe"
);
public_resource!(
    /// Wardrobe skins.
    Skins, "v2/skins", "Skin"
);
public_resource!(
    /// World map continents.
    Continents, "v2/continents", "Continent"
);
public_resource!(
    /// Individual maps.
    Maps, "v2/maps", "Map"
);
public_resource!(
    /// Achievement definitions.
    Achievements, "v2/achievements", "Achievement"
);

/// Playable characters on the authenticated account, addressed by name.
///
/// Unlike the public catalogs above, every character fetch requires the
/// session token, so the marker carries `AUTH` and its scopes.
#[derive(Debug, Clone, Copy)]
pub struct Characters;

impl Resource for Characters {
    const ENDPOINT: &'static str = "v2/characters";
    const KIND: &'static str = "Character";
    const AUTH: bool = true;
    const REQUIRED_SCOPES: &'static [&'static str] = &["account", "characters"];
}

/// A guild, addressed by GUID through `v2/guild/{id}`.
///
/// Guilds are path-addressed rather than query-addressed, so there is no
/// catalog [`Enumeration`](crate::api::enumeration::Enumeration) for them; use [`fetch_guild`].
#[derive(Debug, Clone, Copy)]
pub struct Guilds;

impl Resource for Guilds {
    const ENDPOINT: &'static str = "v2/guild";
    const KIND: &'static str = "Guild";
}

/// Fetches one guild by its GUID.
///
/// # Example
///
/// ```rust,no_run
/// # async fn example(session: &gw2api::Session) -> Result<(), gw2api::ApiError> {
/// let guild = gw2api::api::v2::fetch_guild(
///     session,
///     "4BBB52AA-D768-4FC6-8EDE-C299F2822F0F",
/// ).await?;
/// println!("[{}] {}", guild.get_str("tag").unwrap_or("?"), guild);
/// # Ok(())
/// # }
/// ```
pub async fn fetch_guild(session: &Session, guild_id: &str) -> Result<Entity<Guilds>, ApiError> {
    Entity::fetch_path(session, format!("v2/guild/{}", guild_id)).await
}

/// A single item record.
pub type Item = Entity<Items>;
/// A single world record.
pub type World = Entity<Worlds>;
/// A single dye color record.
pub type Color = Entity<Colors>;
/// A single quaggan record.
pub type Quaggan = Entity<Quaggans>;
/// A single currency record.
pub type Currency = Entity<Currencies>;
/// A single mini record.
pub type Mini = Entity<Minis>;
/// A single recipe record.
pub type Recipe = Entity<Recipes>;
/// A single skin record.
pub type Skin = Entity<Skins>;
/// A single continent record.
pub type Continent = Entity<Continents>;
/// A single map record.
pub type Map = Entity<Maps>;
/// A single achievement record.
pub type Achievement = Entity<Achievements>;
/// A single character record.
pub type Character = Entity<Characters>;
/// A single guild record.
pub type Guild = Entity<Guilds>;

macro_rules! scoped_collection {
    ($(#[$doc:meta])* $marker:ident, $of:ty, $endpoint:literal, $kind:literal,
     scopes: [$($scope:literal),+], via_catalog: $via:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy)]
        pub struct $marker;

        impl Scoped for $marker {
            type Of = $of;
            const ENDPOINT: &'static str = $endpoint;
            const KIND: &'static str = $kind;
            const REQUIRED_SCOPES: &'static [&'static str] = &[$($scope),+];
            const VIA_CATALOG: bool = $via;
        }
    };
}

scoped_collection!(
    /// The account bank: slot references carrying `count` and binding
    /// overlays, `null` for empty slots.
    Bank, Items, "v2/account/bank", "Bank",
    scopes: ["account", "inventories"], via_catalog: true
);
scoped_collection!(
    /// The material storage tab.
    Materials, Items, "v2/account/materials", "Materials",
    scopes: ["account", "inventories"], via_catalog: true
);
scoped_collection!(
    /// Wallet balances: currency references carrying a `value` overlay.
    Wallet, Currencies, "v2/account/wallet", "Wallet",
    scopes: ["account", "wallet"], via_catalog: true
);
scoped_collection!(
    /// Miniatures unlocked on the account, as bare ids.
    AccountMinis, Minis, "v2/account/minis", "AccountMinis",
    scopes: ["account", "unlocks"], via_catalog: true
);
scoped_collection!(
    /// Achievement progress: references carrying `current`/`max`/`done`
    /// overlays.
    AccountAchievements, Achievements, "v2/account/achievements", "AccountAchievements",
    scopes: ["account", "progression"], via_catalog: true
);
scoped_collection!(
    /// The character roster: bare names, each resolved with its own
    /// authenticated fetch (there is no public character catalog).
    CharacterRoster, Characters, "v2/characters", "CharacterRoster",
    scopes: ["account", "characters"], via_catalog: false
);

/// The authenticated account singleton behind `v2/account`.
///
/// Path-addressed with no id namespace; fetched through
/// [`Account`](account::Account) rather than an [`Enumeration`](crate::api::enumeration::Enumeration).
#[derive(Debug, Clone, Copy)]
pub struct Accounts;

impl Resource for Accounts {
    const ENDPOINT: &'static str = "v2/account";
    const KIND: &'static str = "Account";
    const AUTH: bool = true;
    const REQUIRED_SCOPES: &'static [&'static str] = &["account"];
}
