//! Storage abstraction for Relink.
//!
//! This crate answers the two questions the link resolver asks about files:
//! does something exist at a public path, and which stored file does a
//! combined storage+path identifier designate. This enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Backend flexibility** (in-memory index, database-backed file index)
//! - **Clean separation** between link resolution and I/O operations
//!
//! # Architecture
//!
//! The crate provides:
//! - [`FileResolver`] trait with `file_from_combined_identifier()`
//! - [`PublicDir`] trait with `exists()`
//! - [`FileIndex`] in-memory implementation of [`FileResolver`]
//! - [`FsPublicDir`] filesystem implementation of [`PublicDir`]
//! - [`MockFileResolver`] and [`MockPublicDir`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use relink_storage::{FileIndex, FileResolver, FsPublicDir, IndexedFile, PublicDir};
//!
//! let public = FsPublicDir::new(PathBuf::from("public"));
//! let index = FileIndex::new().with_storage(1, "fileadmin/");
//! if public.exists("/fileadmin/doc.pdf") {
//!     let file = index.file_from_combined_identifier("/fileadmin/doc.pdf")?;
//!     println!("{}: {}", file.uid, file.display_title());
//! }
//! ```

mod fs;
mod index;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::FsPublicDir;
pub use index::{FileIndex, IndexedFile};
#[cfg(feature = "mock")]
pub use mock::{MockFileResolver, MockPublicDir};
pub use storage::{FileResolver, PublicDir, StorageError, StorageErrorKind, StoredFile};
