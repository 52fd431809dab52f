//! Single-slot storage for the pending authorization.
//!
//! The slot is written when the first phase receives its state from the
//! backend and read back when the identity provider sends the user to the
//! callback. Starting a new flow overwrites whatever an abandoned flow left
//! behind.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use moots_client::OAuth2State;
use parking_lot::Mutex;

use crate::error::{StoreError, StoreResult};

/// Default slot file name within the client data directory.
pub const STATE_FILE: &str = "twitter-auth-state.json";

// ============================================================================
// StateStore Trait
// ============================================================================

/// Storage for at most one pending authorization.
#[async_trait]
pub trait StateStore: Send + Sync + std::fmt::Debug {
    /// Write `state` to the slot, replacing any previous value.
    async fn save(&self, state: &OAuth2State) -> StoreResult<()>;

    /// Read the slot back.
    ///
    /// Fails with [`StoreError::Missing`] when nothing is stored and
    /// [`StoreError::Corrupt`] when the stored value is not a complete state.
    async fn load(&self) -> StoreResult<OAuth2State>;

    /// Read the slot and empty it in one step, so that of two racing callers
    /// only one gets the state. The slot is emptied even when its content
    /// turns out to be corrupt.
    async fn take(&self) -> StoreResult<OAuth2State>;

    /// Empty the slot. Clearing an empty slot is not an error.
    async fn clear(&self) -> StoreResult<()>;

    /// Check whether anything is stored, without validating it.
    fn has_pending(&self) -> bool;
}

/// Parse and validate a raw slot value.
fn decode(raw: &str) -> StoreResult<OAuth2State> {
    if raw.trim().is_empty() {
        return Err(StoreError::Missing);
    }

    let state: OAuth2State =
        serde_json::from_str(raw).map_err(|e| StoreError::Corrupt(e.to_string()))?;

    if !state.is_complete() {
        return Err(StoreError::Corrupt(
            "state or PKCE verifier is empty".to_string(),
        ));
    }

    Ok(state)
}

fn encode(state: &OAuth2State) -> StoreResult<String> {
    serde_json::to_string(state).map_err(|e| StoreError::Corrupt(e.to_string()))
}

// ============================================================================
// FileStateStore
// ============================================================================

/// File-backed store. The slot survives the process exiting between the two
/// phases.
#[derive(Debug)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Store the slot as [`STATE_FILE`] inside `data_dir`.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(STATE_FILE),
        }
    }

    /// Create with a custom slot path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Get the slot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn save(&self, state: &OAuth2State) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let json = encode(state)?;

        // Write then rename so a reader never sees a partial slot.
        let tmp = self.path.with_extension("json.tmp");
        let written = match write_private(&tmp, json.as_bytes()).await {
            Ok(()) => tokio::fs::rename(&tmp, &self.path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(self.io_error(e));
        }

        tracing::debug!(path = %self.path.display(), "pending authorization saved");
        Ok(())
    }

    async fn load(&self) -> StoreResult<OAuth2State> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::Missing);
            }
            Err(e) => return Err(self.io_error(e)),
        };

        decode(&raw)
    }

    async fn take(&self) -> StoreResult<OAuth2State> {
        // Claim the slot by moving it aside; a concurrent taker finds nothing.
        let claimed = self.path.with_extension("json.claimed");
        match tokio::fs::rename(&self.path, &claimed).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::Missing);
            }
            Err(e) => return Err(self.io_error(e)),
        }

        let raw = tokio::fs::read_to_string(&claimed).await;
        if let Err(e) = tokio::fs::remove_file(&claimed).await {
            tracing::warn!(path = %claimed.display(), error = %e, "could not remove claimed slot");
        }

        tracing::debug!(path = %self.path.display(), "pending authorization taken");
        decode(&raw.map_err(|e| self.io_error(e))?)
    }

    async fn clear(&self) -> StoreResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "pending authorization cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn has_pending(&self) -> bool {
        self.path.exists()
    }
}

/// Create `path` readable by the owner only and write `contents` to it.
async fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use tokio::io::AsyncWriteExt;

    // A leftover from an interrupted save may carry looser permissions.
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(contents).await?;
    file.sync_all().await
}

// ============================================================================
// InMemoryStateStore
// ============================================================================

/// In-memory store. Keeps the serialized form so reads go through the same
/// validation as the file store.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    slot: Mutex<Option<String>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the slot with a raw value, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn save(&self, state: &OAuth2State) -> StoreResult<()> {
        let json = encode(state)?;
        *self.slot.lock() = Some(json);
        Ok(())
    }

    async fn load(&self) -> StoreResult<OAuth2State> {
        let raw = self.slot.lock().clone().ok_or(StoreError::Missing)?;
        decode(&raw)
    }

    async fn take(&self) -> StoreResult<OAuth2State> {
        let raw = self.slot.lock().take().ok_or(StoreError::Missing)?;
        decode(&raw)
    }

    async fn clear(&self) -> StoreResult<()> {
        self.slot.lock().take();
        Ok(())
    }

    fn has_pending(&self) -> bool {
        self.slot.lock().is_some()
    }
}

// ============================================================================
// Shared State Store
// ============================================================================

/// Shared store for use across async contexts.
pub type SharedStateStore = Arc<dyn StateStore>;

/// Create a shared file-backed store in `data_dir`.
pub fn create_state_store(data_dir: &Path) -> SharedStateStore {
    Arc::new(FileStateStore::new(data_dir))
}
