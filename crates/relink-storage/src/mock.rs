//! Mock storage implementations for testing.
//!
//! Provides [`MockFileResolver`] and [`MockPublicDir`] for unit testing
//! without filesystem access.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::storage::{FileResolver, PublicDir, StorageError, StorageErrorKind, StoredFile};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

/// Mock file resolver for testing.
///
/// Maps combined identifiers to stored files in memory. Identifiers that
/// were not registered resolve to an `InvalidPath` error, like a path that
/// carries no storage identifier.
///
/// # Example
///
/// ```ignore
/// use relink_storage::{FileResolver, MockFileResolver};
///
/// let files = MockFileResolver::new().with_file("/fileadmin/doc.pdf", 7, "Annual report");
/// assert_eq!(files.file_from_combined_identifier("/fileadmin/doc.pdf").unwrap().uid, 7);
/// ```
#[derive(Debug, Default)]
pub struct MockFileResolver {
    files: RwLock<HashMap<String, StoredFile>>,
    failures: RwLock<HashMap<String, StorageErrorKind>>,
    lookups: RwLock<Vec<String>>,
}

impl MockFileResolver {
    /// Create a new empty mock resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file under a combined identifier.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(
        self,
        identifier: impl Into<String>,
        uid: u64,
        title: impl Into<String>,
    ) -> Self {
        let identifier: String = identifier.into();
        let name = identifier
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_owned();
        self.files.write().unwrap().insert(
            identifier.clone(),
            StoredFile {
                uid,
                storage: 1,
                identifier,
                name,
                title: Some(title.into()),
            },
        );
        self
    }

    /// Make lookups of an identifier fail with the given error kind.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failure(self, identifier: impl Into<String>, kind: StorageErrorKind) -> Self {
        self.failures
            .write()
            .unwrap()
            .insert(identifier.into(), kind);
        self
    }

    /// Identifiers looked up so far, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.read().unwrap().clone()
    }
}

impl FileResolver for MockFileResolver {
    fn file_from_combined_identifier(&self, identifier: &str) -> Result<StoredFile, StorageError> {
        self.lookups.write().unwrap().push(identifier.to_owned());

        if let Some(kind) = self.failures.write().unwrap().remove(identifier) {
            return Err(StorageError::new(kind)
                .with_identifier(identifier)
                .with_backend(BACKEND)
                .with_detail("simulated failure"));
        }

        self.files
            .read()
            .unwrap()
            .get(identifier)
            .cloned()
            .ok_or_else(|| StorageError::invalid_path(identifier).with_backend(BACKEND))
    }
}

/// Mock public directory for testing.
#[derive(Debug, Default)]
pub struct MockPublicDir {
    paths: RwLock<HashSet<String>>,
}

impl MockPublicDir {
    /// Create a new empty mock directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a URL path as existing.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_path(self, path: impl Into<String>) -> Self {
        self.paths.write().unwrap().insert(path.into());
        self
    }
}

impl PublicDir for MockPublicDir {
    fn exists(&self, path: &str) -> bool {
        self.paths.read().unwrap().contains(path)
    }
}
