//! Session storage adapters
//!
//! - [`FileTokenStore`]: `session.json` in the PropDesk directory
//! - [`MemoryTokenStore`]: process-local, for tests and `PROPDESK_TOKEN`

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::domain::result::{Error, Result};
use crate::domain::Session;
use crate::ports::TokenStore;

/// Session persisted as JSON on disk.
///
/// The file is re-read on every call; nothing is cached in memory.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(propdesk_dir: &Path) -> Self {
        Self {
            path: propdesk_dir.join("session.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn session(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        let session: Session = serde_json::from_str(&content)
            .map_err(|e| Error::session(format!("Corrupt session file {}: {}", self.path.display(), e)))?;
        Ok(Some(session))
    }

    fn save(&self, session: &Session) -> Result<()> {
        if session.access_token.trim().is_empty() {
            return Err(Error::session("Refusing to store an empty access token"));
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory session store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    session: RwLock<Option<Session>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with a token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            session: RwLock::new(Some(Session::new(token))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn session(&self) -> Result<Option<Session>> {
        self.session
            .read()
            .map(|s| s.clone())
            .map_err(|e| Error::session(format!("Lock poisoned: {}", e)))
    }

    fn save(&self, session: &Session) -> Result<()> {
        let mut guard = self
            .session
            .write()
            .map_err(|e| Error::session(format!("Lock poisoned: {}", e)))?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .session
            .write()
            .map_err(|e| Error::session(format!("Lock poisoned: {}", e)))?;
        *guard = None;
        Ok(())
    }
}
