//! Document storage backend.
//!
//! An embedded, in-process document store: each entity kind lives in
//! its own [`Collection`], an ordered map of documents keyed by a
//! store-assigned sequence ID. The collections mirror a
//! document-database layout (one collection per entity, no joins, no
//! cross-collection constraints enforced by the engine) while staying
//! hermetic, which is what lets the contract test suite run the same
//! scenarios against both backends.
//!
//! This backend also carries the ancillary activity collections
//! (browsing history, wishlists, notifications, admin and error logs),
//! which have no relational counterpart.

mod activity;
mod cart;
mod catalog;
mod identity;
mod orders;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::{
    AdminLogEntry, BrowsingEvent, CartItem, Category, ErrorLogEntry, Notification, Order, Product,
    User, WishlistEntry,
};

/// An ordered collection of documents keyed by sequence ID.
///
/// IDs are assigned monotonically starting at 1 and never reused, so
/// iteration order is insertion order.
pub struct Collection<T> {
    rows: RwLock<BTreeMap<i64, T>>,
    seq: AtomicI64,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            seq: AtomicI64::new(0),
        }
    }
}

impl<T: Clone> Collection<T> {
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<i64, T>> {
        self.rows.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<i64, T>> {
        self.rows.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Next sequence ID.
    fn next_id(&self) -> i64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Insert a document built from its assigned ID.
    pub fn insert_with(&self, build: impl FnOnce(i64) -> T) -> T {
        let id = self.next_id();
        let doc = build(id);
        self.write().insert(id, doc.clone());
        doc
    }

    pub fn get(&self, id: i64) -> Option<T> {
        self.read().get(&id).cloned()
    }

    /// All documents matching the predicate, in ID order.
    pub fn find(&self, mut pred: impl FnMut(&T) -> bool) -> Vec<T> {
        self.read().values().filter(|t| pred(t)).cloned().collect()
    }

    /// First document matching the predicate, with its ID.
    pub fn find_one(&self, mut pred: impl FnMut(&T) -> bool) -> Option<(i64, T)> {
        self.read()
            .iter()
            .find(|(_, t)| pred(t))
            .map(|(id, t)| (*id, t.clone()))
    }

    /// Mutate a document in place; `None` if the ID does not exist.
    pub fn update_with<R>(&self, id: i64, apply: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.write().get_mut(&id).map(apply)
    }

    pub fn remove(&self, id: i64) -> Option<T> {
        self.write().remove(&id)
    }

    /// Remove every document matching the predicate; returns the count.
    pub fn remove_where(&self, mut pred: impl FnMut(&T) -> bool) -> u64 {
        let mut rows = self.write();
        let before = rows.len();
        rows.retain(|_, t| !pred(t));
        (before - rows.len()) as u64
    }

    pub fn all(&self) -> Vec<T> {
        self.read().values().cloned().collect()
    }
}

/// A user document: the public record plus its credential hash.
#[derive(Clone)]
pub struct UserDoc {
    pub user: User,
    pub password_hash: String,
}

/// The document storage backend.
///
/// One struct implements every store trait, including
/// [`crate::store::ActivityStore`].
#[derive(Default)]
pub struct DocumentStore {
    users: Collection<UserDoc>,
    categories: Collection<Category>,
    products: Collection<Product>,
    cart_items: Collection<CartItem>,
    orders: Collection<Order>,
    history: Collection<BrowsingEvent>,
    wishlists: Collection<WishlistEntry>,
    notifications: Collection<Notification>,
    admin_log: Collection<AdminLogEntry>,
    error_log: Collection<ErrorLogEntry>,
}

impl DocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic_and_stable() {
        let coll: Collection<String> = Collection::default();
        let a = coll.insert_with(|id| format!("doc-{id}"));
        let b = coll.insert_with(|id| format!("doc-{id}"));
        assert_eq!(a, "doc-1");
        assert_eq!(b, "doc-2");

        coll.remove(1).unwrap();
        let c = coll.insert_with(|id| format!("doc-{id}"));
        assert_eq!(c, "doc-3");
    }

    #[test]
    fn test_remove_where_counts() {
        let coll: Collection<i64> = Collection::default();
        for n in 0..5 {
            coll.insert_with(|_| n);
        }
        assert_eq!(coll.remove_where(|n| n % 2 == 0), 3);
        assert_eq!(coll.all(), vec![1, 3]);
    }
}
