use super::content_store::ContentStore;
use super::handle_cache::HandleCache;
use super::tree::{FileNode, Language};
use super::{FileId, FileOrigin};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Text,
    Ui,
}

/// One editor tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenFile {
    pub id: FileId,
    pub name: String,
    pub path: String,
    pub language: Language,
    pub origin: FileOrigin,
    pub original_content: String,
    pub current_content: String,
    pub is_dirty: bool,
    pub view_mode: Option<ViewMode>,
}

impl OpenFile {
    pub fn new(
        id: FileId,
        name: String,
        path: String,
        language: Language,
        origin: FileOrigin,
        content: String,
    ) -> Self {
        Self {
            id,
            name,
            path,
            language,
            origin,
            original_content: content.clone(),
            current_content: content,
            is_dirty: false,
            view_mode: language.is_structured().then_some(ViewMode::Text),
        }
    }

    pub fn set_content(&mut self, content: String) {
        self.current_content = content;
        self.refresh_dirty();
    }

    /// Records `saved` as the persisted snapshot. The file stays dirty if
    /// the buffer moved on since `saved` was captured.
    pub fn mark_saved(&mut self, saved: String) {
        self.original_content = saved;
        self.refresh_dirty();
    }

    pub fn revert(&mut self) {
        self.current_content = self.original_content.clone();
        self.refresh_dirty();
    }

    fn refresh_dirty(&mut self) {
        self.is_dirty = self.current_content != self.original_content;
    }
}

pub type OpenFiles = Vec<OpenFile>;

#[derive(Debug, Default)]
pub struct SessionState {
    pub file_tree: Vec<FileNode>,
    pub open_files: OpenFiles,
    pub active_file: Option<FileId>,
    pub contents: ContentStore,
    pub handles: HandleCache,
}

impl SessionState {
    pub fn position(&self, id: &FileId) -> Option<usize> {
        self.open_files.iter().position(|f| &f.id == id)
    }

    pub fn file(&self, id: &FileId) -> Option<&OpenFile> {
        self.open_files.iter().find(|f| &f.id == id)
    }

    pub fn file_mut(&mut self, id: &FileId) -> Option<&mut OpenFile> {
        self.open_files.iter_mut().find(|f| &f.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_file(content: &str) -> OpenFile {
        OpenFile::new(
            FileId::local("p/data.json"),
            "data.json".into(),
            "p/data.json".into(),
            Language::Json,
            FileOrigin::Local,
            content.into(),
        )
    }

    #[test]
    fn new_file_is_clean_with_text_view_for_json() {
        let file = json_file("{}");
        assert!(!file.is_dirty);
        assert_eq!(file.view_mode, Some(ViewMode::Text));
        assert_eq!(file.original_content, file.current_content);
    }

    #[test]
    fn dirty_tracks_byte_equality() {
        let mut file = json_file("{}");
        file.set_content("{ }".into());
        assert!(file.is_dirty);
        file.set_content("{}".into());
        assert!(!file.is_dirty);
    }

    #[test]
    fn revert_restores_saved_content() {
        let mut file = json_file("{}");
        file.set_content("[]".into());
        file.revert();
        assert_eq!(file.current_content, "{}");
        assert!(!file.is_dirty);
    }
}
