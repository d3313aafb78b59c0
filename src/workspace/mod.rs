pub mod capability;
pub mod content_store;
pub mod diff;
pub mod error;
pub mod fs_handle;
pub mod handle_cache;
pub mod identity;
pub mod notifier;
pub mod remote;
pub mod session;
pub mod session_state;
pub mod storage;
pub mod tree;

pub use error::{SessionError, StorageError};
pub use identity::{FileId, FileOrigin};
pub use session::SessionManager;
pub use session_state::*;
pub use tree::{FileNode, Language, NodeKind};
