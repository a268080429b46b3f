//! Persisted user-type preference.
//!
//! The app remembers one thing across sessions: whether the user is
//! expecting or caring for a baby. The preference is an explicit store
//! passed to whoever needs it, not ambient global state, with load/save/
//! clear operations over a swappable [`PrefsBackend`].
//!
//! The stored document keeps the original two-field gate: a value and a
//! has-selected flag. `load` reports a user type only when both are set, so
//! a half-written document reads as "not selected yet".

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PrefsError;

// ============================================================================
// UserType
// ============================================================================

/// The two audiences the guidance content addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    /// Expecting a child.
    Expecting,
    /// Caring for an infant.
    Baby,
}

impl UserType {
    /// The stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expecting => "expecting",
            Self::Baby => "baby",
        }
    }

    /// Greeting label shown in the UI.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Expecting => "I'm expecting",
            Self::Baby => "My little one",
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = PrefsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expecting" => Ok(Self::Expecting),
            "baby" => Ok(Self::Baby),
            other => Err(PrefsError::InvalidUserType(other.to_string())),
        }
    }
}

// ============================================================================
// Stored document
// ============================================================================

/// On-disk shape of the preference document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PrefsDocument {
    /// The chosen user type, if any.
    #[serde(default)]
    user_type: Option<UserType>,
    /// Whether the user has made an explicit choice. Kept separate from
    /// `user_type` to mirror the original two-key gate.
    #[serde(default)]
    has_selected: bool,
}

// ============================================================================
// Backend
// ============================================================================

/// Storage seam for the preference document.
///
/// The real backend is a file; tests use [`MemoryBackend`].
pub trait PrefsBackend {
    /// Reads the raw stored document, if one exists.
    ///
    /// # Errors
    ///
    /// Returns a [`PrefsError`] on I/O failure other than "not found".
    fn read(&self) -> Result<Option<String>, PrefsError>;

    /// Writes the raw document, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns a [`PrefsError`] on I/O failure.
    fn write(&mut self, raw: &str) -> Result<(), PrefsError>;

    /// Removes the stored document. Removing a nonexistent document is not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns a [`PrefsError`] on I/O failure.
    fn clear(&mut self) -> Result<(), PrefsError>;
}

/// File-backed preference storage (one small JSON file).
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Creates a backend storing at `path`. Parent directories are created
    /// on first write.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl PrefsBackend for FileBackend {
    fn read(&self) -> Result<Option<String>, PrefsError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, raw: &str) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, raw)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PrefsError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory backend for tests.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    stored: Option<String>,
}

impl PrefsBackend for MemoryBackend {
    fn read(&self) -> Result<Option<String>, PrefsError> {
        Ok(self.stored.clone())
    }

    fn write(&mut self, raw: &str) -> Result<(), PrefsError> {
        self.stored = Some(raw.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PrefsError> {
        self.stored = None;
        Ok(())
    }
}

// ============================================================================
// PreferenceStore
// ============================================================================

/// Load/save/clear interface over a [`PrefsBackend`].
#[derive(Debug)]
pub struct PreferenceStore<B> {
    backend: B,
}

impl<B: PrefsBackend> PreferenceStore<B> {
    /// Wraps a backend.
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Loads the stored preference.
    ///
    /// Returns `Some` only when a document exists, parses, has a user type,
    /// and has the has-selected flag set. A missing or corrupt document
    /// reads as `None` rather than an error: the caller's fallback is the
    /// same either way (ask the user again).
    #[must_use]
    pub fn load(&self) -> Option<UserType> {
        let raw = self.backend.read().ok().flatten()?;
        let doc: PrefsDocument = serde_json::from_str(&raw).ok()?;
        if doc.has_selected { doc.user_type } else { None }
    }

    /// Saves an explicit user choice.
    ///
    /// # Errors
    ///
    /// Returns a [`PrefsError`] if the backend write fails.
    pub fn save(&mut self, user_type: UserType) -> Result<(), PrefsError> {
        let doc = PrefsDocument {
            user_type: Some(user_type),
            has_selected: true,
        };
        let raw = serde_json::to_string_pretty(&doc)?;
        self.backend.write(&raw)
    }

    /// Clears the stored preference.
    ///
    /// # Errors
    ///
    /// Returns a [`PrefsError`] if the backend removal fails.
    pub fn clear(&mut self) -> Result<(), PrefsError> {
        self.backend.clear()
    }
}

impl PreferenceStore<FileBackend> {
    /// Opens a file-backed store at `path`.
    #[must_use]
    pub const fn at(path: PathBuf) -> Self {
        Self::new(FileBackend::new(path))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_on_empty_backend_is_none() {
        let store = PreferenceStore::new(MemoryBackend::default());
        assert_eq!(store.load(), None);
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut store = PreferenceStore::new(MemoryBackend::default());
        store.save(UserType::Expecting).unwrap();
        assert_eq!(store.load(), Some(UserType::Expecting));

        store.save(UserType::Baby).unwrap();
        assert_eq!(store.load(), Some(UserType::Baby));
    }

    #[test]
    fn clear_removes_the_preference() {
        let mut store = PreferenceStore::new(MemoryBackend::default());
        store.save(UserType::Baby).unwrap();
        store.clear().unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn unselected_flag_gates_the_value() {
        let mut backend = MemoryBackend::default();
        backend
            .write(r#"{"user_type": "baby", "has_selected": false}"#)
            .unwrap();
        let store = PreferenceStore::new(backend);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn corrupt_document_loads_as_none() {
        let mut backend = MemoryBackend::default();
        backend.write("{ not json").unwrap();
        let store = PreferenceStore::new(backend);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn file_backend_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut store = PreferenceStore::at(path.clone());
        assert_eq!(store.load(), None);

        store.save(UserType::Expecting).unwrap();
        assert!(path.exists());
        assert_eq!(store.load(), Some(UserType::Expecting));

        store.clear().unwrap();
        assert!(!path.exists());
        assert_eq!(store.load(), None);
    }

    #[test]
    fn file_backend_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/prefs.json");
        let mut store = PreferenceStore::at(path.clone());
        store.save(UserType::Baby).unwrap();
        assert_eq!(store.load(), Some(UserType::Baby));
    }

    #[test]
    fn clearing_a_missing_file_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PreferenceStore::at(dir.path().join("absent.json"));
        store.clear().unwrap();
    }

    #[test]
    fn user_type_parses_from_str() {
        assert_eq!("expecting".parse::<UserType>().unwrap(), UserType::Expecting);
        assert_eq!("baby".parse::<UserType>().unwrap(), UserType::Baby);
        assert!("toddler".parse::<UserType>().is_err());
    }

    #[test]
    fn user_type_labels() {
        assert_eq!(UserType::Expecting.label(), "I'm expecting");
        assert_eq!(UserType::Baby.label(), "My little one");
    }
}
