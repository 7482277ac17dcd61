//! Keyed reconciliation of a displayed collection against a fresh listing.
//!
//! Items are matched by key alone. A key present on both sides keeps its item
//! (only the configuration is refreshed), new keys get a freshly created item,
//! and keys missing from the listing are dropped. Presentation state keyed to
//! an item therefore survives refreshes.

use std::{fmt::Display, hash::Hash};

use indexmap::{IndexMap, map::Entry};
use tracing::debug;

use crate::error::ReconcileError;

/// Keys touched by one [`reconcile`] pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconcileReport<K> {
    pub updated: Vec<K>,
    pub created: Vec<K>,
    pub removed: Vec<K>,
}

impl<K> Default for ReconcileReport<K> {
    fn default() -> Self {
        Self {
            updated: Vec::new(),
            created: Vec::new(),
            removed: Vec::new(),
        }
    }
}

impl<K> ReconcileReport<K> {
    /// True when the pass neither created nor removed anything.
    pub fn is_structurally_unchanged(&self) -> bool {
        self.created.is_empty() && self.removed.is_empty()
    }
}

/// Key a freshly fetched collection, rejecting items without a key and
/// duplicate keys.
pub fn index_by_key<K, C, I, F>(items: I, mut key_of: F) -> Result<IndexMap<K, C>, ReconcileError>
where
    K: Hash + Eq + Display,
    I: IntoIterator<Item = C>,
    F: FnMut(&C) -> Option<K>,
{
    let mut indexed = IndexMap::new();
    for (position, item) in items.into_iter().enumerate() {
        let key = key_of(&item).ok_or(ReconcileError::MissingKey { position })?;
        match indexed.entry(key) {
            Entry::Occupied(entry) => {
                return Err(ReconcileError::DuplicateKey {
                    key: entry.key().to_string(),
                });
            }
            Entry::Vacant(entry) => {
                entry.insert(item);
            }
        }
    }
    Ok(indexed)
}

/// Bring `existing` in line with `incoming`.
///
/// `update` is called for every key present on both sides and `create` for
/// every key only in `incoming`. The resulting collection follows the order
/// of `incoming`. Survivors are updated where they sit and the new collection
/// is swapped in only after every callback has returned, so a caller holding
/// `existing` behind a lock exposes either the old or the new key set, never a
/// mix. If a callback panics, `existing` keeps every item it had. Removed items
/// are dropped.
pub fn reconcile<K, I, C, U, N>(existing: &mut IndexMap<K, I>, incoming: IndexMap<K, C>, mut update: U, mut create: N) -> ReconcileReport<K>
where
    K: Hash + Eq + Clone,
    U: FnMut(&mut I, C),
    N: FnMut(&K, C) -> I,
{
    let mut report = ReconcileReport::default();
    // `None` marks a survivor still stored in `existing`.
    let mut order: Vec<(K, Option<I>)> = Vec::with_capacity(incoming.len());

    for (key, config) in incoming {
        match existing.get_mut(&key) {
            Some(item) => {
                update(item, config);
                report.updated.push(key.clone());
                order.push((key, None));
            }
            None => {
                report.created.push(key.clone());
                let item = create(&key, config);
                order.push((key, Some(item)));
            }
        }
    }

    let mut next = IndexMap::with_capacity(order.len());
    for (key, fresh) in order {
        let Some(item) = fresh.or_else(|| existing.shift_remove(&key)) else {
            continue;
        };
        next.insert(key, item);
    }
    report.removed = std::mem::replace(existing, next).into_keys().collect();

    debug!(
        updated = report.updated.len(),
        created = report.created.len(),
        removed = report.removed.len(),
        "reconciled keyed collection"
    );
    report
}
