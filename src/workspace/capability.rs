//! Storage capabilities the session manager is driven through.
//!
//! These mirror what a host environment hands out: a picker that yields a
//! directory, directories that can be enumerated, and file handles that can
//! be read and rewritten without asking the user again.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use super::StorageError;

#[async_trait]
pub trait FileHandle: Send + Sync + fmt::Debug {
    async fn read_text(&self) -> Result<String, StorageError>;

    /// Replaces the whole file with `text`.
    async fn write_text(&self, text: &str) -> Result<(), StorageError>;
}

#[async_trait]
pub trait DirectoryHandle: Send + Sync {
    fn name(&self) -> &str;

    async fn enumerate(&self) -> Result<Vec<DirEntry>, StorageError>;
}

#[async_trait]
pub trait DirectoryPicker: Send + Sync {
    /// `Ok(None)` means the user dismissed the picker.
    async fn pick(&self) -> Result<Option<Box<dyn DirectoryHandle>>, StorageError>;
}

pub enum EntryHandle {
    File(Arc<dyn FileHandle>),
    Directory(Box<dyn DirectoryHandle>),
}

pub struct DirEntry {
    pub name: String,
    pub handle: EntryHandle,
}

impl DirEntry {
    pub fn file(name: impl Into<String>, handle: Arc<dyn FileHandle>) -> Self {
        Self {
            name: name.into(),
            handle: EntryHandle::File(handle),
        }
    }

    pub fn directory(name: impl Into<String>, handle: Box<dyn DirectoryHandle>) -> Self {
        Self {
            name: name.into(),
            handle: EntryHandle::Directory(handle),
        }
    }
}
