//! An insertion-ordered keyed collection.
//!
//! Listings are reported in the order plates were added, so the in-memory
//! representation keeps entries in a vector rather than a hash map. The
//! collections held by the tracker are small enough that linear lookup is not
//! a concern.

use std::{fmt, iter, marker::PhantomData, slice, str::FromStr};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, MapAccess, Visitor},
    ser::SerializeMap,
};

/// A mapping from keys to records that remembers insertion order.
///
/// Serialized as a JSON object whose keys are the [`Display`](fmt::Display)
/// form of `K`, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table<K, R> {
    entries: Vec<(K, R)>,
}

impl<K, R> Default for Table<K, R> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq, R> Table<K, R> {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The number of entries in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if an entry exists for `key`.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: PartialEq<Q>,
        Q: ?Sized,
    {
        self.position(key).is_some()
    }

    /// Returns the record stored under `key`.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&R>
    where
        K: PartialEq<Q>,
        Q: ?Sized,
    {
        self.position(key).map(|i| &self.entries[i].1)
    }

    /// Returns a mutable reference to the record stored under `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut R>
    where
        K: PartialEq<Q>,
        Q: ?Sized,
    {
        self.position(key).map(|i| &mut self.entries[i].1)
    }

    /// Inserts a record under `key`.
    ///
    /// An existing record keeps its position and is replaced; a new key is
    /// appended. Returns the replaced record, if any.
    pub fn insert(&mut self, key: K, record: R) -> Option<R> {
        if let Some(i) = self.position(&key) {
            return Some(std::mem::replace(&mut self.entries[i].1, record));
        }
        self.entries.push((key, record));
        None
    }

    /// Removes the entry for `key`, preserving the order of the others.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<R>
    where
        K: PartialEq<Q>,
        Q: ?Sized,
    {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    /// Iterates over the entries in insertion order.
    #[must_use]
    pub fn iter(&self) -> Entries<'_, K, R> {
        self.into_iter()
    }

    /// Iterates over the keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: PartialEq<Q>,
        Q: ?Sized,
    {
        self.entries.iter().position(|(k, _)| k == key)
    }
}

impl<K, R> Table<K, R>
where
    K: PartialEq + Copy + From<u32> + Into<u32>,
{
    /// The identifier the next appended record should use.
    ///
    /// This is one more than the number of entries. A hand-edited document may
    /// contain larger identifiers than that, in which case the identifier
    /// after the largest one is used so that no record is overwritten.
    #[must_use]
    pub fn next_id(&self) -> K {
        let count = u32::try_from(self.len()).unwrap_or(u32::MAX);
        let largest: u32 = self.keys().map(|&k| k.into()).max().unwrap_or(0);
        K::from(count.max(largest).saturating_add(1))
    }
}

/// Borrowing iterator over the entries of a [`Table`].
pub type Entries<'a, K, R> = iter::Map<slice::Iter<'a, (K, R)>, fn(&'a (K, R)) -> (&'a K, &'a R)>;

impl<'a, K, R> IntoIterator for &'a Table<K, R> {
    type Item = (&'a K, &'a R);
    type IntoIter = Entries<'a, K, R>;

    fn into_iter(self) -> Self::IntoIter {
        let split: fn(&'a (K, R)) -> (&'a K, &'a R) = |(k, r)| (k, r);
        self.entries.iter().map(split)
    }
}

impl<K, R> Serialize for Table<K, R>
where
    K: fmt::Display,
    R: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, record) in self {
            map.serialize_entry(&key.to_string(), record)?;
        }
        map.end()
    }
}

impl<'de, K, R> Deserialize<'de> for Table<K, R>
where
    K: FromStr + PartialEq,
    K::Err: fmt::Display,
    R: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TableVisitor(PhantomData))
    }
}

struct TableVisitor<K, R>(PhantomData<(K, R)>);

impl<'de, K, R> Visitor<'de> for TableVisitor<K, R>
where
    K: FromStr + PartialEq,
    K::Err: fmt::Display,
    R: Deserialize<'de>,
{
    type Value = Table<K, R>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of records")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut table = Table::new();
        while let Some((raw, record)) = access.next_entry::<String, R>()? {
            let key = raw
                .parse::<K>()
                .map_err(|e| de::Error::custom(format!("invalid key '{raw}': {e}")))?;
            if table.insert(key, record).is_some() {
                return Err(de::Error::custom(format!("duplicate key '{raw}'")));
            }
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Id(u32);

    impl From<u32> for Id {
        fn from(value: u32) -> Self {
            Self(value)
        }
    }

    impl From<Id> for u32 {
        fn from(id: Id) -> Self {
            id.0
        }
    }

    #[test]
    fn remove_preserves_order_of_remaining_entries() {
        let mut table: Table<String, u8> = Table::new();
        table.insert("c".to_string(), 1);
        table.insert("a".to_string(), 2);
        table.insert("b".to_string(), 3);

        assert_eq!(table.remove("a"), Some(2));

        let keys: Vec<_> = table.keys().cloned().collect();
        assert_eq!(keys, ["c", "b"]);
    }

    #[test]
    fn insert_existing_key_replaces_in_place() {
        let mut table: Table<String, u8> = Table::new();
        table.insert("x".to_string(), 1);
        table.insert("y".to_string(), 2);

        assert_eq!(table.insert("x".to_string(), 9), Some(1));
        assert_eq!(table.iter().next(), Some((&"x".to_string(), &9)));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn insert_new_key_appends() {
        let mut table: Table<String, u8> = Table::new();
        table.insert("b".to_string(), 1);

        assert_eq!(table.insert("a".to_string(), 2), None);

        let mut entries = Vec::new();
        for (key, &record) in &table {
            entries.push((key.as_str(), record));
        }
        assert_eq!(entries, [("b", 1), ("a", 2)]);
    }

    #[test]
    fn next_id_counts_from_one() {
        let mut table: Table<Id, ()> = Table::new();
        assert_eq!(table.next_id(), Id(1));

        table.insert(Id(1), ());
        table.insert(Id(2), ());
        assert_eq!(table.next_id(), Id(3));
    }

    #[test]
    fn next_id_skips_past_sparse_identifiers() {
        let mut table: Table<Id, ()> = Table::new();
        table.insert(Id(7), ());

        assert_eq!(table.next_id(), Id(8));
    }

    #[test]
    fn json_keeps_document_order() {
        let json = r#"{"zeta": 1, "alpha": 2, "mid": 3}"#;
        let table: Table<String, u8> = serde_json::from_str(json).unwrap();

        let keys: Vec<_> = table.keys().cloned().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
        assert_eq!(
            serde_json::to_string(&table).unwrap(),
            r#"{"zeta":1,"alpha":2,"mid":3}"#
        );
    }

    #[test]
    fn unparseable_key_is_rejected() {
        let json = r#"{"one": 1}"#;
        let error = serde_json::from_str::<Table<u32, u8>>(json).unwrap_err();

        assert!(error.to_string().contains("invalid key 'one'"));
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let json = r#"{"a": 1, "a": 2}"#;
        let error = serde_json::from_str::<Table<String, u8>>(json).unwrap_err();

        assert!(error.to_string().contains("duplicate key 'a'"));
    }
}
