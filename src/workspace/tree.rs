use std::cmp::Ordering;

use futures_util::future::BoxFuture;
use log::debug;

use super::capability::{DirectoryHandle, EntryHandle};
use super::handle_cache::HandleCache;
use super::{FileId, StorageError};

/// Editor language tag derived from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    TypeScript,
    JavaScript,
    Css,
    Html,
    Json,
    Markdown,
    PlainText,
}

impl Language {
    pub fn from_filename(name: &str) -> Self {
        let ext = name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        match ext {
            "ts" | "tsx" => Self::TypeScript,
            "js" | "jsx" => Self::JavaScript,
            "css" => Self::Css,
            "html" => Self::Html,
            "json" => Self::Json,
            "md" => Self::Markdown,
            _ => Self::PlainText,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::JavaScript => "javascript",
            Self::Css => "css",
            Self::Html => "html",
            Self::Json => "json",
            Self::Markdown => "markdown",
            Self::PlainText => "plaintext",
        }
    }

    /// Structured-data languages can be shown as text or as a form view.
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Json)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Folder,
    File,
}

/// A node of the browsable tree. Rebuilt from scratch on every folder-open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub id: FileId,
    pub name: String,
    pub kind: NodeKind,
    pub path: String,
    pub language: Option<Language>,
    pub children: Option<Vec<FileNode>>,
}

impl FileNode {
    pub fn file(name: &str, path: String) -> Self {
        Self {
            id: FileId::local(path.clone()),
            name: name.to_string(),
            kind: NodeKind::File,
            path,
            language: Some(Language::from_filename(name)),
            children: None,
        }
    }

    pub fn folder(name: &str, path: String, children: Vec<FileNode>) -> Self {
        Self {
            id: FileId::local(path.clone()),
            name: name.to_string(),
            kind: NodeKind::Folder,
            path,
            language: None,
            children: Some(children),
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// Depth-first search by identity.
    pub fn find(&self, id: &FileId) -> Option<&FileNode> {
        if &self.id == id {
            return Some(self);
        }
        self.children
            .iter()
            .flatten()
            .find_map(|child| child.find(id))
    }
}

/// Folders first, then by name.
fn tree_order(a: &FileNode, b: &FileNode) -> Ordering {
    match (a.kind, b.kind) {
        (NodeKind::Folder, NodeKind::File) => Ordering::Less,
        (NodeKind::File, NodeKind::Folder) => Ordering::Greater,
        _ => a.name.cmp(&b.name),
    }
}

/// Walks `dir` recursively, returning its tree and recording a handle for
/// every file into `handles`. Paths are rooted at `path`.
pub fn build_tree<'a>(
    dir: &'a dyn DirectoryHandle,
    path: String,
    handles: &'a mut HandleCache,
) -> BoxFuture<'a, Result<FileNode, StorageError>> {
    Box::pin(async move {
        let mut children = Vec::new();

        for entry in dir.enumerate().await? {
            let entry_path = format!("{}/{}", path, entry.name);
            match entry.handle {
                EntryHandle::Directory(sub) => {
                    children.push(build_tree(sub.as_ref(), entry_path, handles).await?);
                }
                EntryHandle::File(handle) => {
                    let node = FileNode::file(&entry.name, entry_path);
                    handles.insert(node.id.clone(), handle);
                    children.push(node);
                }
            }
        }

        children.sort_by(tree_order);
        debug!("Enumerated {} entries under {}", children.len(), path);

        Ok(FileNode::folder(dir.name(), path, children))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::fs_handle::FsDirectory;

    #[test]
    fn language_from_extension() {
        assert_eq!(Language::from_filename("App.tsx"), Language::TypeScript);
        assert_eq!(Language::from_filename("index.js"), Language::JavaScript);
        assert_eq!(Language::from_filename("data.json"), Language::Json);
        assert_eq!(Language::from_filename("README.md"), Language::Markdown);
        assert_eq!(Language::from_filename("Makefile"), Language::PlainText);
        assert!(Language::Json.is_structured());
        assert!(!Language::Css.is_structured());
    }

    #[tokio::test]
    async fn folders_sort_before_files() {
        let root = tempfile::tempdir().unwrap();
        let project = root.path().join("project");
        std::fs::create_dir_all(project.join("zeta")).unwrap();
        std::fs::create_dir_all(project.join("alpha")).unwrap();
        std::fs::write(project.join("b.ts"), "b").unwrap();
        std::fs::write(project.join("a.json"), "{}").unwrap();
        std::fs::write(project.join("zeta/inner.md"), "# inner").unwrap();

        let mut handles = HandleCache::new();
        let dir = FsDirectory::new(&project);
        let tree = build_tree(&dir, "project".to_string(), &mut handles)
            .await
            .unwrap();

        let names: Vec<_> = tree
            .children
            .as_ref()
            .unwrap()
            .iter()
            .map(|n| n.name.as_str())
            .collect();
        assert_eq!(names, ["alpha", "zeta", "a.json", "b.ts"]);

        assert_eq!(handles.len(), 3);
        let inner = FileId::local("project/zeta/inner.md");
        assert!(handles.contains(&inner));
        let node = tree.find(&inner).unwrap();
        assert_eq!(node.language, Some(Language::Markdown));
        assert!(node.is_file());
    }
}
