//! A filesystem backed store of named collections
//!
//! Each collection lives in its own JSON document inside the data directory
//! and is always read and written as a whole.

use std::{
    fmt, fs,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use tempfile::NamedTempFile;

use crate::Error;

/// The named collections persisted by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Registered accounts, keyed by user id.
    Users,
    /// Plate listings, keyed by plate number.
    LicensePlates,
    /// Completed sales, keyed by sale id.
    Sales,
}

impl Collection {
    /// The name of the collection, as used for its document.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::LicensePlates => "license_plates",
            Self::Sales => "sales",
        }
    }

    /// The file name of the collection's document.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}.json", self.name())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Loads and saves whole collections as JSON documents in a directory.
#[derive(Debug, Clone)]
pub struct RecordStore {
    root: PathBuf,
    pretty: bool,
}

impl RecordStore {
    /// Opens a store rooted at the given directory.
    ///
    /// The directory does not need to exist until the first save.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root, pretty: true }
    }

    /// Sets whether documents are pretty printed when saved.
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// The directory documents are stored in.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The path of the document backing `collection`.
    #[must_use]
    pub fn path(&self, collection: Collection) -> PathBuf {
        self.root.join(collection.file_name())
    }

    /// Loads the persisted snapshot of a collection.
    ///
    /// A missing document is an empty collection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the document exists but cannot be read,
    /// and [`Error::StorageCorrupt`] if it cannot be parsed.
    pub fn load<T>(&self, collection: Collection) -> Result<T, Error>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.path(collection);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No {collection} document at {}, starting empty", path.display());
                return Ok(T::default());
            }
            Err(source) => return Err(Error::Storage { collection, source }),
        };

        tracing::debug!("Loaded {collection} from {}", path.display());
        serde_json::from_str(&content)
            .map_err(|source| Error::StorageCorrupt { collection, source })
    }

    /// Replaces the persisted snapshot of a collection.
    ///
    /// The document is written to a temporary file in the same directory and
    /// then renamed over the old one, so a concurrent or subsequent load sees
    /// either the old snapshot or the new one, never a partial write.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the directory cannot be created or the
    /// document cannot be written.
    pub fn save<T>(&self, collection: Collection, value: &T) -> Result<(), Error>
    where
        T: Serialize,
    {
        let storage = |source| Error::Storage { collection, source };

        fs::create_dir_all(&self.root).map_err(storage)?;
        let mut file = NamedTempFile::new_in(&self.root).map_err(storage)?;
        {
            let mut writer = BufWriter::new(file.as_file_mut());
            self.write_json(&mut writer, value).map_err(storage)?;
            writer.flush().map_err(storage)?;
        }

        let path = self.path(collection);
        file.persist(&path).map_err(|e| storage(e.error))?;
        tracing::debug!("Saved {collection} to {}", path.display());
        Ok(())
    }

    fn write_json<W: Write, T: Serialize>(&self, writer: W, value: &T) -> io::Result<()> {
        if self.pretty {
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
            value.serialize(&mut serializer)?;
        } else {
            serde_json::to_writer(writer, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::storage::Table;

    fn setup_temp_store() -> (TempDir, RecordStore) {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let store = RecordStore::new(tmp.path().to_path_buf());
        (tmp, store)
    }

    #[test]
    fn missing_document_loads_empty() {
        let (_tmp, store) = setup_temp_store();

        let table: Table<String, String> = store.load(Collection::LicensePlates).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn save_then_load_returns_same_table() {
        let (_tmp, store) = setup_temp_store();
        let mut table: Table<String, String> = Table::new();
        table.insert("B".to_string(), "second".to_string());
        table.insert("A".to_string(), "first".to_string());

        store.save(Collection::Users, &table).unwrap();
        let loaded: Table<String, String> = store.load(Collection::Users).unwrap();

        assert_eq!(loaded, table);
    }

    #[test]
    fn save_creates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let store = RecordStore::new(tmp.path().join("nested").join("data"));

        store
            .save(Collection::Sales, &Table::<String, u8>::new())
            .unwrap();

        assert!(store.path(Collection::Sales).exists());
    }

    #[test]
    fn save_uses_four_space_indentation() {
        let (_tmp, store) = setup_temp_store();
        let mut table: Table<String, u8> = Table::new();
        table.insert("A".to_string(), 1);

        store.save(Collection::LicensePlates, &table).unwrap();
        let content = fs::read_to_string(store.path(Collection::LicensePlates)).unwrap();

        assert_eq!(content, "{\n    \"A\": 1\n}");
    }

    #[test]
    fn save_leaves_no_temporary_files() {
        let (tmp, store) = setup_temp_store();

        store.save(Collection::Users, &Table::<String, u8>::new()).unwrap();
        store.save(Collection::Users, &Table::<String, u8>::new()).unwrap();

        let entries: Vec<_> = fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn corrupt_document_is_reported() {
        let (_tmp, store) = setup_temp_store();
        fs::write(store.path(Collection::Sales), "{ not json").unwrap();

        let error = store.load::<Table<String, u8>>(Collection::Sales).unwrap_err();
        assert!(matches!(
            error,
            Error::StorageCorrupt {
                collection: Collection::Sales,
                ..
            }
        ));
    }
}
