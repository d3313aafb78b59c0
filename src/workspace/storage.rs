use log::warn;

use super::handle_cache::HandleCache;
use super::remote::RemoteTransport;
use super::{FileId, StorageError};

/// Where a file's bytes live, selected from the file's origin.
pub enum Storage<'a> {
    Local(&'a HandleCache),
    Remote(&'a dyn RemoteTransport),
}

impl Storage<'_> {
    pub async fn read(&self, id: &FileId) -> Result<String, StorageError> {
        match self {
            Storage::Local(handles) => {
                let handle = handles
                    .get(id)
                    .ok_or_else(|| StorageError::MissingHandle(id.clone()))?;
                handle.read_text().await
            }
            Storage::Remote(remote) => remote.fetch(remote_filename(id)?).await,
        }
    }

    pub async fn write(&self, id: &FileId, text: &str) -> Result<(), StorageError> {
        match self {
            Storage::Local(handles) => {
                let Some(handle) = handles.get(id) else {
                    warn!("No handle found for {}, cannot save to disk", id);
                    return Err(StorageError::MissingHandle(id.clone()));
                };
                handle.write_text(text).await
            }
            Storage::Remote(remote) => remote.push(remote_filename(id)?, text).await,
        }
    }
}

fn remote_filename(id: &FileId) -> Result<&str, StorageError> {
    id.remote_filename()
        .ok_or_else(|| StorageError::NotRemote(id.clone()))
}
