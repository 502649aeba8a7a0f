//! In-memory file index.
//!
//! Provides [`FileIndex`], a [`FileResolver`] over a fixed set of storages
//! and the files indexed in them.

use std::collections::HashMap;

use crate::storage::{FileResolver, StorageError, StoredFile};

/// Backend identifier for error messages.
const BACKEND: &str = "Index";

/// A file entry registered with [`FileIndex::with_file`].
#[derive(Clone, Debug)]
pub struct IndexedFile {
    /// Stable file id.
    pub uid: u64,
    /// Identifier inside the storage (e.g., "/doc.pdf").
    pub identifier: String,
    /// Human readable title.
    pub title: Option<String>,
}

#[derive(Debug)]
struct IndexedStorage {
    uid: u32,
    /// Normalized base path: no leading slash, trailing slash (e.g., "fileadmin/").
    base_path: String,
    files: HashMap<String, IndexedFile>,
}

/// File index mapping combined identifiers to stored files.
///
/// # Example
///
/// ```
/// use relink_storage::{FileIndex, FileResolver, IndexedFile};
///
/// let index = FileIndex::new()
///     .with_storage(1, "fileadmin/")
///     .with_file(1, IndexedFile { uid: 7, identifier: "/doc.pdf".to_owned(), title: None });
///
/// let file = index.file_from_combined_identifier("/fileadmin/doc.pdf").unwrap();
/// assert_eq!(file.uid, 7);
/// ```
#[derive(Debug, Default)]
pub struct FileIndex {
    storages: Vec<IndexedStorage>,
}

impl FileIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a storage located at `base_path` below the public directory.
    #[must_use]
    pub fn with_storage(mut self, uid: u32, base_path: impl AsRef<str>) -> Self {
        self.storages.push(IndexedStorage {
            uid,
            base_path: normalize_base_path(base_path.as_ref()),
            files: HashMap::new(),
        });
        self
    }

    /// Register a file in the storage with the given uid.
    ///
    /// Files referencing an unregistered storage are skipped.
    #[must_use]
    pub fn with_file(mut self, storage: u32, file: IndexedFile) -> Self {
        if let Some(target) = self.storages.iter_mut().find(|s| s.uid == storage) {
            target.files.insert(file.identifier.clone(), file);
        } else {
            tracing::warn!(
                storage,
                identifier = %file.identifier,
                "File references unknown storage, skipping"
            );
        }
        self
    }

    /// Split a combined identifier into its storage and storage identifier.
    fn split_combined(&self, combined: &str) -> Result<(&IndexedStorage, String), StorageError> {
        if let Some((prefix, identifier)) = combined.split_once(':')
            && !prefix.is_empty()
            && prefix.bytes().all(|b| b.is_ascii_digit())
        {
            let storage = prefix
                .parse::<u32>()
                .ok()
                .and_then(|uid| self.storages.iter().find(|s| s.uid == uid))
                .ok_or_else(|| {
                    StorageError::invalid_path(combined).with_backend(BACKEND)
                })?;
            return Ok((storage, with_leading_slash(identifier)));
        }

        let relative = combined.trim_start_matches('/');
        self.storages
            .iter()
            .filter(|s| relative.starts_with(&s.base_path))
            .max_by_key(|s| s.base_path.len())
            .map(|s| (s, with_leading_slash(&relative[s.base_path.len()..])))
            .ok_or_else(|| StorageError::invalid_path(combined).with_backend(BACKEND))
    }
}

impl FileResolver for FileIndex {
    fn file_from_combined_identifier(&self, identifier: &str) -> Result<StoredFile, StorageError> {
        let (storage, storage_identifier) = self.split_combined(identifier)?;
        let file = storage
            .files
            .get(&storage_identifier)
            .ok_or_else(|| StorageError::not_found(identifier).with_backend(BACKEND))?;

        Ok(StoredFile {
            uid: file.uid,
            storage: storage.uid,
            name: file
                .identifier
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_owned(),
            identifier: file.identifier.clone(),
            title: file.title.clone(),
        })
    }
}

fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    }
}

fn with_leading_slash(identifier: &str) -> String {
    if identifier.starts_with('/') {
        identifier.to_owned()
    } else {
        format!("/{identifier}")
    }
}
