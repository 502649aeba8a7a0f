//! Storage traits and error types.
//!
//! Provides the [`FileResolver`] trait for looking up stored files by
//! combined identifier, the [`PublicDir`] trait for probing the public
//! document root, and [`StorageError`] for unified error handling across
//! backends.
//!
//! # Path Convention
//!
//! Paths handed to [`PublicDir::exists`] are **URL paths**, already
//! percent-decoded, relative to the public document root:
//! - `"/fileadmin/doc.pdf"` - file below a storage
//! - `"/robots.txt"` - file outside any storage
//!
//! Combined identifiers handed to [`FileResolver`] are either
//! `"<storage uid>:<identifier>"` (`"1:/doc.pdf"`) or a bare public path
//! (`"/fileadmin/doc.pdf"`) that is mapped onto a storage by its base path.

/// A file tracked by a storage, with an id independent of its location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredFile {
    /// Stable file id.
    pub uid: u64,
    /// Uid of the storage holding the file.
    pub storage: u32,
    /// Identifier inside the storage (e.g., "/doc.pdf").
    pub identifier: String,
    /// File name (last identifier segment).
    pub name: String,
    /// Human readable title, if indexed with one.
    pub title: Option<String>,
}

impl StoredFile {
    /// Title if present, otherwise the file name.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

/// What went wrong in a storage lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// The storage has no file with that identifier.
    NotFound,
    /// The identifier names no known storage.
    InvalidPath,
    /// The storage backend cannot be queried.
    Unavailable,
}

impl StorageErrorKind {
    fn describe(self) -> &'static str {
        match self {
            Self::NotFound => "Not found",
            Self::InvalidPath => "Invalid identifier",
            Self::Unavailable => "Unavailable",
        }
    }
}

/// Failed stored-file lookup.
///
/// Displays as `[Backend] Kind: detail (identifier: 1:/doc.pdf)`, leaving out
/// the parts that are not set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Combined identifier that was looked up.
    pub identifier: Option<String>,
    /// Backend that failed (e.g., "Index", "Mock").
    pub backend: Option<&'static str>,
    /// Backend-specific detail.
    pub detail: Option<String>,
}

impl StorageError {
    /// Create an error of the given kind.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            identifier: None,
            backend: None,
            detail: None,
        }
    }

    /// Attach the identifier that was looked up.
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Attach the backend name.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach a backend-specific detail message.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// No file with `identifier` in its storage.
    #[must_use]
    pub fn not_found(identifier: impl Into<String>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_identifier(identifier)
    }

    /// `identifier` names no known storage.
    #[must_use]
    pub fn invalid_path(identifier: impl Into<String>) -> Self {
        Self::new(StorageErrorKind::InvalidPath).with_identifier(identifier)
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }
        f.write_str(self.kind.describe())?;
        if let Some(detail) = &self.detail {
            write!(f, ": {detail}")?;
        }
        if let Some(identifier) = &self.identifier {
            write!(f, " (identifier: {identifier})")?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {}

/// Lookup of stored files by combined identifier.
pub trait FileResolver: Send + Sync {
    /// Resolve a stored file from a combined storage+path identifier.
    ///
    /// # Arguments
    ///
    /// * `identifier` - `"1:/doc.pdf"` or a bare public path `"/fileadmin/doc.pdf"`
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] with kind [`StorageErrorKind::InvalidPath`] when the
    /// identifier names no known storage, [`StorageErrorKind::NotFound`] when the
    /// storage has no file with that identifier.
    fn file_from_combined_identifier(&self, identifier: &str) -> Result<StoredFile, StorageError>;
}

/// Existence probe for the public document root.
pub trait PublicDir: Send + Sync {
    /// Check if a filesystem object exists at the given URL path.
    ///
    /// Returns `false` on errors (treats errors as "doesn't exist").
    fn exists(&self, path: &str) -> bool;
}
