//! In-process datastore client.
//!
//! Each entity kind gets its own [`Store`], a table of rows keyed by an
//! opaque url-safe string. Rows may carry a parent scope, an arbitrary
//! string used only to group rows for `children_of` queries (answers
//! under a question key, photos under a user id).
//!
//! All mutation happens under the table's write lock, so a
//! read-modify-write through [`Store::update`] is atomic.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::AppError;

/// Typed key for a stored row. Serializes to `kind-serial`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    kind: &'static str,
    serial: u64,
}

impl Key {
    pub fn urlsafe(&self) -> String {
        format!("{}-{}", self.kind, self.serial)
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

#[derive(Debug, Clone)]
pub struct Row<T> {
    pub key: Key,
    pub parent: Option<String>,
    pub entity: T,
}

pub struct Store<T> {
    kind: &'static str,
    inner: RwLock<Table<T>>,
}

struct Table<T> {
    rows: BTreeMap<u64, Row<T>>,
    next_serial: u64,
}

impl<T: Clone> Store<T> {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            inner: RwLock::new(Table {
                rows: BTreeMap::new(),
                next_serial: 1,
            }),
        }
    }

    /// Parse a url-safe key string against this store's kind.
    pub fn key(&self, urlsafe: &str) -> Result<Key, AppError> {
        let bad = || AppError::BadKey(urlsafe.to_string());

        let (kind, serial) = urlsafe.rsplit_once('-').ok_or_else(bad)?;
        if kind != self.kind {
            return Err(bad());
        }
        let serial = serial.parse().map_err(|_| bad())?;

        Ok(Key {
            kind: self.kind,
            serial,
        })
    }

    pub fn insert(&self, parent: Option<&str>, entity: T) -> Key {
        let mut table = self.inner.write().unwrap();

        let key = Key {
            kind: self.kind,
            serial: table.next_serial,
        };
        table.next_serial += 1;

        table.rows.insert(
            key.serial,
            Row {
                key: key.clone(),
                parent: parent.map(str::to_owned),
                entity,
            },
        );

        key
    }

    pub fn get(&self, key: &Key) -> Option<T> {
        if key.kind != self.kind {
            return None;
        }

        let table = self.inner.read().unwrap();
        table.rows.get(&key.serial).map(|row| row.entity.clone())
    }

    /// Mutate a row in place. Returns false if the row does not exist.
    pub fn update(&self, key: &Key, mutate: impl FnOnce(&mut T)) -> bool {
        if key.kind != self.kind {
            return false;
        }

        let mut table = self.inner.write().unwrap();
        match table.rows.get_mut(&key.serial) {
            Some(row) => {
                mutate(&mut row.entity);
                true
            }
            None => false,
        }
    }

    pub fn delete(&self, key: &Key) -> bool {
        if key.kind != self.kind {
            return false;
        }

        let mut table = self.inner.write().unwrap();
        table.rows.remove(&key.serial).is_some()
    }

    /// Snapshot of every row, in insertion order.
    pub fn rows(&self) -> Vec<Row<T>> {
        let table = self.inner.read().unwrap();
        table.rows.values().cloned().collect()
    }

    /// Snapshot of the rows under a parent scope, in insertion order.
    pub fn children_of(&self, parent: &str) -> Vec<Row<T>> {
        let table = self.inner.read().unwrap();
        table
            .rows
            .values()
            .filter(|row| row.parent.as_deref() == Some(parent))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_round_trip() {
        let store: Store<String> = Store::new("note");
        let key = store.insert(None, "hello".to_string());

        assert_eq!(key.urlsafe(), "note-1");
        let parsed = store.key(&key.urlsafe()).unwrap();
        assert_eq!(parsed, key);
        assert_eq!(store.get(&parsed), Some("hello".to_string()));
    }

    #[test]
    fn malformed_keys_are_rejected() {
        let store: Store<String> = Store::new("note");

        assert!(store.key("garbage").is_err());
        assert!(store.key("note-abc").is_err());
        assert!(store.key("other-1").is_err());
    }

    #[test]
    fn lookup_misses_return_none() {
        let store: Store<String> = Store::new("note");
        let key = store.insert(None, "x".to_string());

        assert!(store.delete(&key));
        assert!(!store.delete(&key));
        assert_eq!(store.get(&key), None);
        assert!(!store.update(&key, |_| {}));
    }

    #[test]
    fn children_are_scoped_to_their_parent() {
        let store: Store<u32> = Store::new("item");
        store.insert(Some("a"), 1);
        store.insert(Some("b"), 2);
        store.insert(Some("a"), 3);
        store.insert(None, 4);

        let children: Vec<u32> = store
            .children_of("a")
            .into_iter()
            .map(|row| row.entity)
            .collect();
        assert_eq!(children, vec![1, 3]);
    }

    #[test]
    fn update_mutates_in_place() {
        let store: Store<u32> = Store::new("item");
        let key = store.insert(None, 1);

        assert!(store.update(&key, |n| *n += 10));
        assert_eq!(store.get(&key), Some(11));
    }
}
