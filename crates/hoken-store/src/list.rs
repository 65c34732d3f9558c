//! Whole-list JSON stores for policies and claims

use std::marker::PhantomData;

use hoken_domain::{Claim, ClaimRepository, Policy, PolicyRepository};
use hoken_types::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::storage::KeyValueStore;

/// Storage key for the policy list
pub const POLICIES_KEY: &str = "nihon-hoken-policies";

/// Storage key for the claim list
pub const CLAIMS_KEY: &str = "nihon-hoken-claims";

/// A `Vec<T>` serialized as one JSON value under a fixed key
pub struct JsonListStore<T, S> {
    storage: S,
    key: &'static str,
    _marker: PhantomData<T>,
}

pub type PolicyStore<S> = JsonListStore<Policy, S>;
pub type ClaimStore<S> = JsonListStore<Claim, S>;

impl<S: KeyValueStore> JsonListStore<Policy, S> {
    pub fn policies(storage: S) -> Self {
        Self::new(storage, POLICIES_KEY)
    }
}

impl<S: KeyValueStore> JsonListStore<Claim, S> {
    pub fn claims(storage: S) -> Self {
        Self::new(storage, CLAIMS_KEY)
    }
}

impl<T, S> JsonListStore<T, S>
where
    T: Serialize + DeserializeOwned,
    S: KeyValueStore,
{
    pub fn new(storage: S, key: &'static str) -> Self {
        Self {
            storage,
            key,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Read the stored list. Unreadable JSON is an error so the stored
    /// records are never overwritten by an empty list.
    pub fn load(&self) -> Result<Vec<T>> {
        let Some(raw) = self.storage.get(self.key)? else {
            return Ok(Vec::new());
        };
        let items = serde_json::from_str(&raw)?;
        Ok(items)
    }

    /// Overwrite the stored list
    pub fn save(&self, items: &[T]) -> Result<()> {
        let raw = serde_json::to_string_pretty(items)?;
        self.storage.set(self.key, &raw)?;
        debug!(key = self.key, count = items.len(), "stored list written");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.storage.remove(self.key)?;
        Ok(())
    }
}

impl<S: KeyValueStore> PolicyRepository for JsonListStore<Policy, S> {
    fn load_all(&self) -> Result<Vec<Policy>> {
        self.load()
    }

    fn save_all(&self, policies: &[Policy]) -> Result<()> {
        self.save(policies)
    }

    fn clear(&self) -> Result<()> {
        JsonListStore::clear(self)
    }
}

impl<S: KeyValueStore> ClaimRepository for JsonListStore<Claim, S> {
    fn load_all(&self) -> Result<Vec<Claim>> {
        self.load()
    }

    fn save_all(&self, claims: &[Claim]) -> Result<()> {
        self.save(claims)
    }

    fn clear(&self) -> Result<()> {
        JsonListStore::clear(self)
    }
}
