use std::collections::HashMap;

use super::FileId;

/// Last loaded or saved text per file, so a closed tab reopens without
/// touching storage again.
#[derive(Debug, Default, Clone)]
pub struct ContentStore {
    contents: HashMap<FileId, String>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &FileId) -> Option<&str> {
        self.contents.get(id).map(String::as_str)
    }

    pub fn insert(&mut self, id: FileId, content: String) {
        self.contents.insert(id, content);
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}
