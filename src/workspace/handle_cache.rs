use std::collections::HashMap;
use std::sync::Arc;

use super::FileId;
use super::capability::FileHandle;

/// File handles collected during one folder-open.
#[derive(Debug, Default)]
pub struct HandleCache {
    handles: HashMap<FileId, Arc<dyn FileHandle>>,
}

impl HandleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: FileId, handle: Arc<dyn FileHandle>) {
        self.handles.insert(id, handle);
    }

    pub fn get(&self, id: &FileId) -> Option<Arc<dyn FileHandle>> {
        self.handles.get(id).cloned()
    }

    pub fn contains(&self, id: &FileId) -> bool {
        self.handles.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
