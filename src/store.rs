//! In-memory document store
//!
//! One typed collection per resource, each an FxHashMap keyed by document id
//! behind its own `RwLock`. Locks are held for a single operation only; query
//! results are cloned out so callers never hold a guard.
//!
//! Iteration order of a collection is unspecified: callers sort.

use crate::models::{
    Alert, Field, RiskPrediction, SoilHealthRecord, SpectralHealthRecord, TemporalRecord, User,
};
use rustc_hash::FxHashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// A record with a stable document id
pub trait Document: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
}

macro_rules! impl_document {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Document for $ty {
                fn id(&self) -> Uuid {
                    self.id
                }
            }
        )*
    };
}

impl_document!(Field, Alert, SoilHealthRecord, SpectralHealthRecord, TemporalRecord, RiskPrediction);

impl Document for User {
    fn id(&self) -> Uuid {
        self.id.0
    }
}

/// Typed collection of documents
pub struct Collection<T> {
    name: &'static str,
    docs: RwLock<FxHashMap<Uuid, T>>,
}

impl<T: Document> Collection<T> {
    pub fn new(name: &'static str) -> Self {
        Collection {
            name,
            docs: RwLock::new(FxHashMap::default()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    // A panic while holding a guard cannot leave a half-written document:
    // every write replaces or mutates a single entry.
    fn read(&self) -> RwLockReadGuard<'_, FxHashMap<Uuid, T>> {
        self.docs.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, FxHashMap<Uuid, T>> {
        self.docs.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert(&self, doc: T) -> T {
        self.write().insert(doc.id(), doc.clone());
        tracing::trace!("{}: inserted {}", self.name, doc.id());
        doc
    }

    /// Insert unless an existing document conflicts with it.
    ///
    /// The check and the insert happen under one write lock. On conflict the
    /// existing document is returned.
    pub fn insert_unique<F>(&self, doc: T, conflicts: F) -> Result<T, T>
    where
        F: Fn(&T, &T) -> bool,
    {
        let mut docs = self.write();
        if let Some(existing) = docs.values().find(|existing| conflicts(existing, &doc)) {
            return Err(existing.clone());
        }
        docs.insert(doc.id(), doc.clone());
        Ok(doc)
    }

    pub fn get(&self, id: Uuid) -> Option<T> {
        self.read().get(&id).cloned()
    }

    pub fn find<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.read().values().filter(|doc| predicate(doc)).cloned().collect()
    }

    /// Any one matching document. Use with predicates that match at most one.
    pub fn find_one<F>(&self, predicate: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        self.read().values().find(|doc| predicate(doc)).cloned()
    }

    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&T) -> bool,
    {
        self.read().values().filter(|doc| predicate(doc)).count()
    }

    /// Apply `change` to the document with `id`, returning the new version.
    pub fn update<F>(&self, id: Uuid, change: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        let mut docs = self.write();
        let doc = docs.get_mut(&id)?;
        change(doc);
        Some(doc.clone())
    }

    /// Apply a fallible change; the stored document is only replaced on `Ok`.
    pub fn try_update<F, E>(&self, id: Uuid, change: F) -> Option<Result<T, E>>
    where
        F: FnOnce(&T, &FxHashMap<Uuid, T>) -> Result<T, E>,
    {
        let mut docs = self.write();
        let current = docs.get(&id)?;
        let result = change(current, &docs);
        Some(result.map(|updated| {
            docs.insert(id, updated.clone());
            updated
        }))
    }

    pub fn remove(&self, id: Uuid) -> Option<T> {
        self.write().remove(&id)
    }

    /// Remove every matching document, returning how many went.
    pub fn remove_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&T) -> bool,
    {
        let mut docs = self.write();
        let before = docs.len();
        docs.retain(|_, doc| !predicate(doc));
        before - docs.len()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

/// All collections of the monitor
pub struct Store {
    pub users: Collection<User>,
    pub fields: Collection<Field>,
    pub alerts: Collection<Alert>,
    pub soil_health: Collection<SoilHealthRecord>,
    pub spectral_health: Collection<SpectralHealthRecord>,
    pub temporal: Collection<TemporalRecord>,
    pub risk_predictions: Collection<RiskPrediction>,
}

impl Store {
    pub fn new() -> Self {
        Store {
            users: Collection::new("users"),
            fields: Collection::new("fields"),
            alerts: Collection::new("alerts"),
            soil_health: Collection::new("soil_health"),
            spectral_health: Collection::new("spectral_health"),
            temporal: Collection::new("temporal_analysis"),
            risk_predictions: Collection::new("risk_predictions"),
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
