/*
[INPUT]:  Bearer token strings and a storage directory
[OUTPUT]: The process-wide persisted token slot (memory or file backed)
[POS]:    Auth layer - persistence for the session bearer token
[UPDATE]: When storage format or file naming conventions change
*/

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::warn;

/// Well-known storage key for the bearer token
pub const TOKEN_STORAGE_KEY: &str = "helios_auth_token";

/// The persisted bearer-token slot.
///
/// Clearing is authoritative: once `clear` returns, `read` yields `None`
/// for every holder of the repository.
pub trait SessionRepository: Send + Sync {
    /// False when there is no persistent storage in this context
    fn is_available(&self) -> bool {
        true
    }

    fn read(&self) -> Option<String>;

    fn write(&self, token: &str);

    fn clear(&self);
}

/// Operation recorded by [`InMemorySessionRepository`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryOp {
    Read,
    Write(String),
    Clear,
}

#[derive(Debug, Default)]
struct MemorySlot {
    token: Option<String>,
    ops: Vec<RepositoryOp>,
}

/// Thread-safe in-memory token slot that keeps a log of every call
#[derive(Debug, Clone)]
pub struct InMemorySessionRepository {
    slot: Arc<Mutex<MemorySlot>>,
    available: bool,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(MemorySlot::default())),
            available: true,
        }
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let repo = Self::new();
        repo.lock().token = Some(token.into());
        repo
    }

    /// Models a context without persistent storage
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Current token without recording a read
    pub fn peek(&self) -> Option<String> {
        self.lock().token.clone()
    }

    pub fn ops(&self) -> Vec<RepositoryOp> {
        self.lock().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.lock().ops.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemorySlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn is_available(&self) -> bool {
        self.available
    }

    fn read(&self) -> Option<String> {
        let mut slot = self.lock();
        slot.ops.push(RepositoryOp::Read);
        slot.token.clone()
    }

    fn write(&self, token: &str) {
        let mut slot = self.lock();
        slot.ops.push(RepositoryOp::Write(token.to_string()));
        slot.token = Some(token.to_string());
    }

    fn clear(&self) {
        let mut slot = self.lock();
        slot.ops.push(RepositoryOp::Clear);
        slot.token = None;
    }
}

/// Stores the token as a single file with owner-only permissions
#[derive(Debug, Clone)]
pub struct FileSessionRepository {
    dir: PathBuf,
}

impl FileSessionRepository {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn token_file_path(&self) -> PathBuf {
        self.dir.join(format!("{TOKEN_STORAGE_KEY}.token"))
    }

    fn save(&self, token: &str) -> io::Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        let path = self.token_file_path();
        fs::write(&path, token)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mut perms = fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }
}

impl SessionRepository for FileSessionRepository {
    fn read(&self) -> Option<String> {
        let content = fs::read_to_string(self.token_file_path()).ok()?;
        let token = content.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    fn write(&self, token: &str) {
        if let Err(err) = self.save(token) {
            warn!(path = %self.token_file_path().display(), error = %err, "failed to persist session token");
        }
    }

    fn clear(&self) {
        let path = self.token_file_path();
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to remove session token, truncating");
                let _ = fs::write(&path, "");
            }
        }
    }
}
