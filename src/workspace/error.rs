use std::path::PathBuf;

use thiserror::Error;

use super::FileId;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("access denied: {0:?}")]
    AccessDenied(PathBuf),

    #[error("{0:?} does not look like a text file")]
    Binary(PathBuf),

    #[error("no file handle cached for {0}")]
    MissingHandle(FileId),

    #[error("{0} is not a remote file")]
    NotRemote(FileId),

    #[error("remote file not found: {0}")]
    NotFound(String),

    #[error("remote transfer failed: {0}")]
    Transfer(String),
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            Self::AccessDenied(path)
        } else {
            Self::Io { path, source }
        }
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transfer(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{0} is not open")]
    NotOpen(FileId),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
