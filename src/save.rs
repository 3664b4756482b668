//! # Save Module
//!
//! The persistence seam. The turn wrapper writes through a [`SaveStore`]
//! at clean turn boundaries; anything that can hold a serialized
//! [`GameState`] can implement one.
//!
//! Two reference implementations ship here: a pretty-printed JSON file for
//! real runs and an in-memory slot for tests.

use crate::game::GameState;
use crate::{OvertimeError, OvertimeResult};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Destination for autosaves.
///
/// `load` returns `Ok(None)` when no save exists; corrupt data is an error.
pub trait SaveStore {
    /// Persists the full game state.
    fn save(&mut self, state: &GameState) -> OvertimeResult<()>;

    /// Loads the last saved state, if any.
    fn load(&self) -> OvertimeResult<Option<GameState>>;

    /// Whether a save is present.
    fn exists(&self) -> bool;

    /// Deletes the save. Deleting a missing save is not an error.
    fn clear(&mut self) -> OvertimeResult<()>;
}

/// Saves to a single pretty-printed JSON file.
///
/// # Examples
///
/// ```no_run
/// use overtime::{GameState, JsonFileStore, SaveStore};
///
/// let mut store = JsonFileStore::new("saves/run.json");
/// store.save(&GameState::new(1)).unwrap();
/// assert!(store.exists());
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    pub path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SaveStore for JsonFileStore {
    fn save(&mut self, state: &GameState) -> OvertimeResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, state.save_to_json()?)?;
        Ok(())
    }

    fn load(&self) -> OvertimeResult<Option<GameState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)?;
        Ok(Some(GameState::load_from_json(&json)?))
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn clear(&mut self) -> OvertimeResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// Keeps the save in memory, serialized the same way as the file store.
///
/// Clones share one slot, so a test can hand the store to a game and keep
/// a handle for inspection.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn save(&mut self, state: &GameState) -> OvertimeResult<()> {
        let json = state.save_to_json()?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| OvertimeError::InvalidState("save slot poisoned".to_string()))?;
        *slot = Some(json);
        Ok(())
    }

    fn load(&self) -> OvertimeResult<Option<GameState>> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| OvertimeError::InvalidState("save slot poisoned".to_string()))?;
        match slot.as_deref() {
            Some(json) => Ok(Some(GameState::load_from_json(json)?)),
            None => Ok(None),
        }
    }

    fn exists(&self) -> bool {
        self.slot.lock().map(|slot| slot.is_some()).unwrap_or(false)
    }

    fn clear(&mut self) -> OvertimeResult<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| OvertimeError::InvalidState("save slot poisoned".to_string()))?;
        *slot = None;
        Ok(())
    }
}
