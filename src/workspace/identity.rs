use std::fmt;

/// Prefix that marks an identity as belonging to the companion file server.
pub const REMOTE_SCHEME: &str = "remote://";

/// Opaque key naming a file within one session.
///
/// Local identities are folder-relative paths (`root/sub/file.txt`) and are
/// only stable for one folder-open. Remote identities carry the
/// [`REMOTE_SCHEME`] prefix followed by the server-side filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(String);

impl FileId {
    pub fn local(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn remote(filename: &str) -> Self {
        Self(format!("{REMOTE_SCHEME}{filename}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Server-side filename for remote identities.
    pub fn remote_filename(&self) -> Option<&str> {
        self.0.strip_prefix(REMOTE_SCHEME)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where an open file is persisted on save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOrigin {
    Local,
    Remote,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_identity_round_trips_filename() {
        let id = FileId::remote("big-data.json");
        assert_eq!(id.as_str(), "remote://big-data.json");
        assert_eq!(id.remote_filename(), Some("big-data.json"));
    }

    #[test]
    fn local_identity_has_no_remote_filename() {
        let id = FileId::local("project/src/main.ts");
        assert_eq!(id.remote_filename(), None);
        assert_eq!(id.to_string(), "project/src/main.ts");
    }
}
