use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::{fs, io::AsyncWriteExt};

use super::capability::{DirEntry, DirectoryHandle, DirectoryPicker, FileHandle};
use super::StorageError;

/// File handle backed by a path on the local disk.
#[derive(Debug, Clone)]
pub struct FsFile {
    path: PathBuf,
}

impl FsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FileHandle for FsFile {
    async fn read_text(&self) -> Result<String, StorageError> {
        let bytes = fs::read(&self.path)
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;

        // Null bytes in the first block are a reliable binary marker.
        let sample = &bytes[..bytes.len().min(512)];
        if sample.contains(&0) {
            return Err(StorageError::Binary(self.path.clone()));
        }

        debug!("Read {} bytes from {:?}", bytes.len(), self.path);
        String::from_utf8(bytes).map_err(|_| StorageError::Binary(self.path.clone()))
    }

    async fn write_text(&self, text: &str) -> Result<(), StorageError> {
        let mut file = fs::File::create(&self.path)
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;
        file.write_all(text.as_bytes())
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;
        file.flush()
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;

        info!("Wrote {} bytes to {:?}", text.len(), self.path);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FsDirectory {
    name: String,
    path: PathBuf,
}

impl FsDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Self { name, path }
    }
}

#[async_trait]
impl DirectoryHandle for FsDirectory {
    fn name(&self) -> &str {
        &self.name
    }

    async fn enumerate(&self) -> Result<Vec<DirEntry>, StorageError> {
        let mut read_dir = fs::read_dir(&self.path)
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;

        let mut entries = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| StorageError::io(&self.path, e))?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            let path = entry.path();
            match entry.file_type().await {
                Ok(kind) if kind.is_dir() => {
                    entries.push(DirEntry::directory(name, Box::new(FsDirectory::new(path))));
                }
                Ok(kind) if kind.is_file() => {
                    entries.push(DirEntry::file(name, Arc::new(FsFile::new(path))));
                }
                Ok(_) => debug!("Skipping special entry {:?}", path),
                Err(e) => warn!("Failed to stat {:?}: {}", path, e),
            }
        }

        Ok(entries)
    }
}

/// Picker that hands out a fixed directory, or reports cancellation when
/// none was configured.
#[derive(Debug, Clone, Default)]
pub struct FsPicker {
    root: Option<PathBuf>,
}

impl FsPicker {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }
}

#[async_trait]
impl DirectoryPicker for FsPicker {
    async fn pick(&self) -> Result<Option<Box<dyn DirectoryHandle>>, StorageError> {
        let Some(root) = &self.root else {
            return Ok(None);
        };

        let metadata = fs::metadata(root)
            .await
            .map_err(|e| StorageError::io(root, e))?;
        if !metadata.is_dir() {
            return Err(StorageError::io(
                root,
                std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
            ));
        }

        Ok(Some(Box::new(FsDirectory::new(root.clone()))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_and_writes_text() {
        let dir = tempfile::tempdir().unwrap();
        let handle = FsFile::new(dir.path().join("notes.md"));

        handle.write_text("# title\n").await.unwrap();
        assert_eq!(handle.read_text().await.unwrap(), "# title\n");
    }

    #[tokio::test]
    async fn text_is_read_whatever_the_extension() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["notes.dat", "build.lib", "cache.db", "blob.bin"] {
            let path = dir.path().join(name);
            std::fs::write(&path, "plain text\n").unwrap();
            assert_eq!(FsFile::new(&path).read_text().await.unwrap(), "plain text\n");
        }
    }

    #[tokio::test]
    async fn refuses_binary_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.txt");
        std::fs::write(&path, [0x41, 0x00, 0x42]).unwrap();

        let err = FsFile::new(&path).read_text().await.unwrap_err();
        assert!(matches!(err, StorageError::Binary(_)));
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsFile::new(dir.path().join("nope.txt"))
            .read_text()
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }

    #[tokio::test]
    async fn picker_without_root_is_cancelled() {
        assert!(FsPicker::default().pick().await.unwrap().is_none());
    }
}
