use std::sync::Arc;

use log::{debug, error, info, warn};

use super::capability::DirectoryPicker;
use super::handle_cache::HandleCache;
use super::notifier::{Notice, Notifier};
use super::remote::{FixtureReport, RemoteTransport};
use super::session_state::{OpenFile, SessionState, ViewMode};
use super::storage::Storage;
use super::tree::{FileNode, Language, build_tree};
use super::{FileId, FileOrigin, SessionError, StorageError};

pub const READ_FAILED_PLACEHOLDER: &str = "// Failed to read file";
pub const MISSING_CONTENT_PLACEHOLDER: &str = "// File content not available (Mock or Error)";

/// A save that has captured its content but not yet been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSave {
    pub id: FileId,
    pub origin: FileOrigin,
    pub snapshot: String,
    generation: u64,
}

/// Owns the open tabs of one editor window and routes their I/O.
pub struct SessionManager {
    picker: Box<dyn DirectoryPicker>,
    remote: Arc<dyn RemoteTransport>,
    notifier: Arc<dyn Notifier>,
    state: SessionState,
    /// Bumped by every folder-open.
    generation: u64,
}

impl SessionManager {
    pub fn new(
        picker: Box<dyn DirectoryPicker>,
        remote: Arc<dyn RemoteTransport>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            picker,
            remote,
            notifier,
            state: SessionState::default(),
            generation: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn file_tree(&self) -> &[FileNode] {
        &self.state.file_tree
    }

    pub fn open_files(&self) -> &[OpenFile] {
        &self.state.open_files
    }

    pub fn active_file_id(&self) -> Option<&FileId> {
        self.state.active_file.as_ref()
    }

    pub fn active_file(&self) -> Option<&OpenFile> {
        self.state.active_file.as_ref().and_then(|id| self.state.file(id))
    }

    pub fn file(&self, id: &FileId) -> Option<&OpenFile> {
        self.state.file(id)
    }

    fn storage(&self, origin: FileOrigin) -> Storage<'_> {
        match origin {
            FileOrigin::Local => Storage::Local(&self.state.handles),
            FileOrigin::Remote => Storage::Remote(self.remote.as_ref()),
        }
    }

    /// Replaces the whole session with the folder the picker returns.
    /// Cancellation and access errors are logged and leave the session as
    /// it was.
    pub async fn open_folder(&mut self) {
        let dir = match self.picker.pick().await {
            Ok(Some(dir)) => dir,
            Ok(None) => {
                info!("Folder selection cancelled");
                return;
            }
            Err(e) => {
                error!("Error opening folder: {}", e);
                return;
            }
        };

        let mut handles = HandleCache::new();
        let root_path = dir.name().to_string();
        let root = match build_tree(dir.as_ref(), root_path, &mut handles).await {
            Ok(root) => root,
            Err(e) => {
                error!("Error reading folder {}: {}", dir.name(), e);
                return;
            }
        };

        info!("Opened folder {} with {} files", root.name, handles.len());
        self.generation += 1;
        self.state = SessionState {
            file_tree: vec![root],
            handles,
            ..SessionState::default()
        };
    }

    /// Opens a tree node as a tab, or focuses it when already open.
    pub async fn open_file(&mut self, node: &FileNode) {
        if !node.is_file() {
            return;
        }

        if self.state.file(&node.id).is_some() {
            self.state.active_file = Some(node.id.clone());
            return;
        }

        let cached = self.state.contents.get(&node.id).map(str::to_string);
        let content = match cached {
            Some(content) => content,
            None => self.load_local(&node.id).await,
        };

        let language = node
            .language
            .unwrap_or_else(|| Language::from_filename(&node.name));
        self.push_open(OpenFile::new(
            node.id.clone(),
            node.name.clone(),
            node.path.clone(),
            language,
            FileOrigin::Local,
            content,
        ));
    }

    async fn load_local(&mut self, id: &FileId) -> String {
        let read = self.storage(FileOrigin::Local).read(id).await;
        match read {
            Ok(content) => {
                self.state.contents.insert(id.clone(), content.clone());
                content
            }
            Err(StorageError::MissingHandle(_)) => {
                warn!("No handle for {}", id);
                MISSING_CONTENT_PLACEHOLDER.to_string()
            }
            Err(e) => {
                error!("Failed to read file {}: {}", id, e);
                READ_FAILED_PLACEHOLDER.to_string()
            }
        }
    }

    /// Opens `filename` from the companion server. A failed fetch is
    /// reported and opens nothing.
    pub async fn open_remote_file(&mut self, filename: &str) -> Result<(), SessionError> {
        let id = FileId::remote(filename);

        if self.state.file(&id).is_some() {
            self.state.active_file = Some(id);
            return Ok(());
        }

        let cached = self.state.contents.get(&id).map(str::to_string);
        let content = match cached {
            Some(content) => content,
            None => {
                let fetched = self.storage(FileOrigin::Remote).read(&id).await;
                match fetched {
                    Ok(content) => {
                        self.state.contents.insert(id.clone(), content.clone());
                        content
                    }
                    Err(e) => {
                        error!("Failed to fetch remote file {}: {}", filename, e);
                        self.notifier.notify(Notice::Error(format!(
                            "Failed to fetch remote file {filename}"
                        )));
                        return Err(e.into());
                    }
                }
            }
        };

        self.push_open(OpenFile::new(
            id,
            filename.to_string(),
            format!("/server/{filename}"),
            Language::Json,
            FileOrigin::Remote,
            content,
        ));
        Ok(())
    }

    fn push_open(&mut self, file: OpenFile) {
        debug!("Opening tab {}", file.id);
        self.state.active_file = Some(file.id.clone());
        self.state.open_files.push(file);
    }

    pub fn set_active(&mut self, id: &FileId) {
        if self.state.file(id).is_some() {
            self.state.active_file = Some(id.clone());
        }
    }

    pub fn update_content(&mut self, id: &FileId, content: impl Into<String>) {
        match self.state.file_mut(id) {
            Some(file) => file.set_content(content.into()),
            None => debug!("Ignoring edit to {}, not open", id),
        }
    }

    pub fn set_view_mode(&mut self, id: &FileId, mode: ViewMode) {
        if let Some(file) = self.state.file_mut(id) {
            if file.language.is_structured() {
                file.view_mode = Some(mode);
            } else {
                debug!("{} has no alternate view", id);
            }
        }
    }

    /// Throws away unsaved edits to `id`.
    pub fn revert(&mut self, id: &FileId) {
        if let Some(file) = self.state.file_mut(id) {
            file.revert();
        }
    }

    /// Closes a tab without prompting, discarding unsaved edits. Focus moves
    /// to the left neighbor, or to the right one when the first tab closes.
    pub fn close_tab(&mut self, id: &FileId) {
        let Some(idx) = self.state.position(id) else {
            return;
        };

        if self.state.active_file.as_ref() == Some(id) {
            let files = &self.state.open_files;
            self.state.active_file = if files.len() > 1 {
                let neighbor = if idx > 0 { idx - 1 } else { idx + 1 };
                Some(files[neighbor].id.clone())
            } else {
                None
            };
        }

        let closed = self.state.open_files.remove(idx);
        if closed.is_dirty {
            info!("Discarded unsaved edits to {}", closed.id);
        }
    }

    pub async fn save(&mut self, id: &FileId) -> Result<(), SessionError> {
        let pending = self.begin_save(id)?;
        let outcome = self.persist(&pending).await;
        self.complete_save(pending, outcome)
    }

    /// Captures the buffer as it is now.
    pub fn begin_save(&self, id: &FileId) -> Result<PendingSave, SessionError> {
        let file = self
            .state
            .file(id)
            .ok_or_else(|| SessionError::NotOpen(id.clone()))?;

        Ok(PendingSave {
            id: file.id.clone(),
            origin: file.origin,
            snapshot: file.current_content.clone(),
            generation: self.generation,
        })
    }

    pub async fn persist(&self, pending: &PendingSave) -> Result<(), StorageError> {
        self.storage(pending.origin)
            .write(&pending.id, &pending.snapshot)
            .await
    }

    /// Applies the outcome of a save. On success the captured snapshot
    /// becomes the saved content, so edits made while the save was in
    /// flight keep the file dirty. On failure nothing changes. A save begun
    /// before the last folder-open leaves the new session untouched.
    pub fn complete_save(
        &mut self,
        pending: PendingSave,
        outcome: Result<(), StorageError>,
    ) -> Result<(), SessionError> {
        if let Err(e) = outcome {
            error!("Error saving file {}: {}", pending.id, e);
            self.notifier
                .notify(Notice::Error(format!("Failed to save {}: {}", pending.id, e)));
            return Err(e.into());
        }

        if pending.generation != self.generation {
            info!("Saved {} from a previous folder session", pending.id);
            return Ok(());
        }

        self.state
            .contents
            .insert(pending.id.clone(), pending.snapshot.clone());

        match self.state.file_mut(&pending.id) {
            Some(file) => {
                file.mark_saved(pending.snapshot);
                if file.is_dirty {
                    info!("Saved {}, newer edits still pending", pending.id);
                } else {
                    info!("Saved {}", pending.id);
                }
            }
            None => info!("Saved {} after its tab was closed", pending.id),
        }

        Ok(())
    }

    pub async fn generate_fixture(&self) -> Result<FixtureReport, SessionError> {
        match self.remote.generate_fixture().await {
            Ok(report) => {
                self.notifier.notify(Notice::Info(format!(
                    "Big file generated on server ({})",
                    report.path
                )));
                Ok(report)
            }
            Err(e) => {
                error!("Fixture generation failed: {}", e);
                self.notifier.notify(Notice::Error(
                    "Failed to generate file. Is the server running?".to_string(),
                ));
                Err(e.into())
            }
        }
    }
}
