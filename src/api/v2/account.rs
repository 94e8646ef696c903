//
//  gw2api
//  api/v2/account.rs
//
//  Created by Ngonidzashe Mangudya on 2026/03/02.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # The Authenticated Account
//!
//! [`Account`] wraps the `v2/account` record and hangs the account-scoped
//! collections (bank, materials, wallet, minis, achievements, characters)
//! off it as accessors. It owns its session handle, so the collections it
//! hands out are independently usable.

use std::fmt;
use std::sync::Arc;

use crate::api::common::ApiError;
use crate::api::entity::Entity;
use crate::api::owned::OwnedCollection;
use crate::api::session::Session;
use crate::api::v2::{
    self, AccountAchievements, AccountMinis, Accounts, Bank, CharacterRoster, Guilds, Materials,
    Wallet, Worlds,
};

/// The authenticated account: its core record plus its scoped collections.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use gw2api::api::session::Session;
/// use gw2api::api::v2::Account;
///
/// # async fn example() -> Result<(), gw2api::ApiError> {
/// let mut session = Session::new()?;
/// session.set_token("XXXX-...-XXXX").await?;
///
/// let account = Account::fetch(Arc::new(session)).await?;
/// println!("playing on {}", account.world().await?);
///
/// let mut wallet = account.wallet()?;
/// for currency in wallet.entries().await? {
///     println!("{}: {}", currency, currency.get_u64("value").unwrap_or(0));
/// }
/// # Ok(())
/// # }
/// ```
///
/// # Notes
///
/// - Fetching requires a token with the `account` scope; each collection
///   accessor additionally gates on its own scopes at construction.
pub struct Account {
    session: Arc<Session>,
    entity: Entity<Accounts>,
}

impl Account {
    /// Fetches the `v2/account` record for the session's token.
    ///
    /// # Errors
    ///
    /// - [`ApiError::AuthorizationRequired`] when no token is set
    /// - [`ApiError::MissingScope`] when the token lacks the `account` scope
    /// - [`ApiError::RequestFailed`] when the fetch itself fails
    pub async fn fetch(session: Arc<Session>) -> Result<Self, ApiError> {
        let entity = Entity::fetch_path(&session, "v2/account").await?;
        Ok(Self { session, entity })
    }

    /// The underlying account record.
    pub fn entity(&self) -> &Entity<Accounts> {
        &self.entity
    }

    /// The account's home world, resolved from its `world` id field.
    ///
    /// # Errors
    ///
    /// [`ApiError::RequestFailed`] when the record carries no usable world
    /// id or the world fetch fails.
    pub async fn world(&self) -> Result<Entity<Worlds>, ApiError> {
        let world_id = self.entity.get_u64("world").ok_or_else(|| {
            ApiError::request_failed(
                "v2/account",
                anyhow::anyhow!("account record carries no world id"),
            )
        })?;
        Entity::fetch(&self.session, world_id).await
    }

    /// The guilds this account belongs to, resolved one by one from the
    /// record's `guilds` id list.
    ///
    /// An account with no guilds yields an empty vector.
    pub async fn guilds(&self) -> Result<Vec<Entity<Guilds>>, ApiError> {
        let ids: Vec<String> = self
            .entity
            .get("guilds")
            .and_then(|v| v.as_array())
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| id.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let mut guilds = Vec::with_capacity(ids.len());
        for id in ids {
            guilds.push(v2::fetch_guild(&self.session, &id).await?);
        }
        Ok(guilds)
    }

    /// The account bank. Requires the `inventories` scope.
    pub fn bank(&self) -> Result<OwnedCollection<Bank>, ApiError> {
        self.collection()
    }

    /// The material storage. Requires the `inventories` scope.
    pub fn materials(&self) -> Result<OwnedCollection<Materials>, ApiError> {
        self.collection()
    }

    /// The currency wallet. Requires the `wallet` scope.
    pub fn wallet(&self) -> Result<OwnedCollection<Wallet>, ApiError> {
        self.collection()
    }

    /// Unlocked miniatures. Requires the `unlocks` scope.
    pub fn minis(&self) -> Result<OwnedCollection<AccountMinis>, ApiError> {
        self.collection()
    }

    /// Achievement progress. Requires the `progression` scope.
    pub fn achievements(&self) -> Result<OwnedCollection<AccountAchievements>, ApiError> {
        self.collection()
    }

    /// The character roster. Requires the `characters` scope.
    pub fn characters(&self) -> Result<OwnedCollection<CharacterRoster>, ApiError> {
        self.collection()
    }

    fn collection<S: crate::api::resource::Scoped>(
        &self,
    ) -> Result<OwnedCollection<S>, ApiError> {
        OwnedCollection::lazy(Arc::clone(&self.session))
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("entity", &self.entity)
            .finish()
    }
}

impl fmt::Display for Account {
    /// Renders the account record's display form, e.g. `<Account "Teyo.1234">`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.entity.fmt(f)
    }
}
