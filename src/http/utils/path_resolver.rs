use log::warn;
use std::path::{Path, PathBuf};

use crate::http::ApiError;

/// Maps a bare filename from the URL onto the served directory.
pub struct PathResolver<'a> {
    files_dir: &'a Path,
}

impl<'a> PathResolver<'a> {
    /// `files_dir` must already be canonical.
    pub fn new(files_dir: &'a Path) -> Self {
        Self { files_dir }
    }

    pub fn resolve(&self, filename: &str) -> Result<PathBuf, ApiError> {
        if filename.is_empty()
            || filename == "."
            || filename == ".."
            || filename.contains(['/', '\\', '\0'])
        {
            warn!("Rejected filename {:?}", filename);
            return Err(ApiError::InvalidFilename);
        }

        let resolved = self.files_dir.join(filename);

        // A symlink inside the directory may still point outside of it.
        match resolved.canonicalize() {
            Ok(canonical) if !canonical.starts_with(self.files_dir) => {
                warn!("Access outside the files directory: {:?}", canonical);
                Err(ApiError::InvalidFilename)
            }
            _ => Ok(resolved),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_resolve_inside_dir() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let resolver = PathResolver::new(&root);

        assert_eq!(resolver.resolve("big-data.json").unwrap(), root.join("big-data.json"));
    }

    #[test]
    fn traversal_and_separators_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let resolver = PathResolver::new(&root);

        for name in ["", ".", "..", "../etc/passwd", "a/b.json", "a\\b.json"] {
            assert!(
                matches!(resolver.resolve(name), Err(ApiError::InvalidFilename)),
                "{name:?} should be rejected"
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn escaping_symlink_is_rejected() {
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.txt"), "s").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        std::os::unix::fs::symlink(outside.path().join("secret.txt"), root.join("link.txt"))
            .unwrap();

        let resolver = PathResolver::new(&root);
        assert!(resolver.resolve("link.txt").is_err());
    }
}
