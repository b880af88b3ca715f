//! Case-insensitive map that remembers the first casing it saw
//!
//! SSH keywords are case-insensitive (`HostName`, `hostname` and `HOSTNAME`
//! are the same keyword) but hand-written files have a casing we want to
//! keep when rewriting a line. Lookups fold the key; iteration yields the
//! casing under which the key was first inserted.

use std::collections::HashMap;
use std::fmt;

/// Ordered map with case-insensitive string keys.
///
/// Iteration follows insertion order. Re-inserting an existing key (in any
/// casing) replaces the value but keeps the original casing and position.
#[derive(Clone, PartialEq, Eq)]
pub struct CaseInsensitiveMap<V> {
    slots: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

fn fold(key: &str) -> String {
    key.to_lowercase()
}

impl<V> CaseInsensitiveMap<V> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(&fold(key))
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(&fold(key)).map(|&i| &self.slots[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let i = self.index.get(&fold(key)).copied()?;
        Some(&mut self.slots[i].1)
    }

    /// The casing under which `key` was first inserted.
    pub fn original_key(&self, key: &str) -> Option<&str> {
        self.index
            .get(&fold(key))
            .map(|&i| self.slots[i].0.as_str())
    }

    /// Insert or replace. Returns the previous value, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        let folded = fold(&key);
        match self.index.get(&folded).copied() {
            Some(i) => Some(std::mem::replace(&mut self.slots[i].1, value)),
            None => {
                self.index.insert(folded, self.slots.len());
                self.slots.push((key, value));
                None
            }
        }
    }

    /// Insert ahead of every other key, taking `key`'s casing.
    /// Returns the previous value, if any.
    pub fn insert_first(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        let previous = self.remove(&key).map(|(_, v)| v);
        for pos in self.index.values_mut() {
            *pos += 1;
        }
        self.index.insert(fold(&key), 0);
        self.slots.insert(0, (key, value));
        previous
    }

    /// Get the value for `key`, inserting `default()` first if absent.
    pub fn entry_or_insert_with(&mut self, key: &str, default: impl FnOnce() -> V) -> &mut V {
        let existing = self.index.get(&fold(key)).copied();
        let i = match existing {
            Some(i) => i,
            None => {
                self.insert(key, default());
                self.slots.len() - 1
            }
        };
        &mut self.slots[i].1
    }

    /// Remove `key`, returning its original casing and value.
    pub fn remove(&mut self, key: &str) -> Option<(String, V)> {
        let i = self.index.remove(&fold(key))?;
        let removed = self.slots.remove(i);
        for pos in self.index.values_mut() {
            if *pos > i {
                *pos -= 1;
            }
        }
        Some(removed)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.slots.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.slots.iter_mut().map(|(_, v)| v)
    }
}

impl<V> Default for CaseInsensitiveMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for CaseInsensitiveMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for CaseInsensitiveMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V> IntoIterator for CaseInsensitiveMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter()
    }
}
