//! Filesystem public directory.
//!
//! Provides [`FsPublicDir`] for probing files below the public document root.

use std::path::{Component, Path, PathBuf};

use crate::storage::PublicDir;

/// Public document root on the local filesystem.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use relink_storage::{FsPublicDir, PublicDir};
///
/// let public = FsPublicDir::new(PathBuf::from("public"));
/// assert!(public.exists("/fileadmin/doc.pdf"));
/// ```
#[derive(Debug)]
pub struct FsPublicDir {
    /// Root directory served by the web server.
    root: PathBuf,
}

impl FsPublicDir {
    /// Create a probe rooted at `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Root directory of this probe.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a URL path onto the filesystem.
    ///
    /// Rejects paths containing parent directory components (`..`) so a probe
    /// never leaves the public root.
    fn full_path(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

        if escapes {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl PublicDir for FsPublicDir {
    fn exists(&self, path: &str) -> bool {
        self.full_path(path).is_some_and(|p| p.exists())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn create_public_dir() -> tempfile::TempDir {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp_dir.path().join("fileadmin/reports")).unwrap();
        fs::write(temp_dir.path().join("fileadmin/doc.pdf"), "%PDF").unwrap();
        fs::write(temp_dir.path().join("fileadmin/reports/2024 q1.pdf"), "%PDF").unwrap();
        temp_dir
    }

    #[test]
    fn test_fs_public_dir_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FsPublicDir>();
    }

    #[test]
    fn test_exists_file() {
        let temp_dir = create_public_dir();
        let public = FsPublicDir::new(temp_dir.path().to_path_buf());

        assert!(public.exists("/fileadmin/doc.pdf"));
        assert!(public.exists("fileadmin/doc.pdf"));
    }

    #[test]
    fn test_exists_decoded_path() {
        let temp_dir = create_public_dir();
        let public = FsPublicDir::new(temp_dir.path().to_path_buf());

        assert!(public.exists("/fileadmin/reports/2024 q1.pdf"));
    }

    #[test]
    fn test_exists_directory() {
        let temp_dir = create_public_dir();
        let public = FsPublicDir::new(temp_dir.path().to_path_buf());

        assert!(public.exists("/fileadmin/reports"));
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = create_public_dir();
        let public = FsPublicDir::new(temp_dir.path().to_path_buf());

        assert!(!public.exists("/fileadmin/missing.pdf"));
    }

    #[test]
    fn test_missing_root() {
        let public = FsPublicDir::new(PathBuf::from("/nonexistent"));

        assert!(!public.exists("/fileadmin/doc.pdf"));
    }

    #[test]
    fn test_rejects_parent_components() {
        let temp_dir = create_public_dir();
        let public = FsPublicDir::new(temp_dir.path().join("fileadmin"));

        assert!(public.exists("/doc.pdf"));
        assert!(!public.exists("/../fileadmin/doc.pdf"));
        assert!(!public.exists("/reports/../doc.pdf"));
    }
}
