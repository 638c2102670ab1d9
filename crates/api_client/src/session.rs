//! The active business context.
//!
//! A [`Session`] is handed by reference to every profile-aware call. It owns
//! nothing but a key/value store; the profile id is read from the store at
//! call time so a profile created elsewhere is picked up on the next request.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use models::ProfileId;

/// Storage key holding the active startup profile id.
pub const PROFILE_ID_KEY: &str = "startup_profile_id";

/// String key/value storage backing a session.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        values.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.remove(key);
        Ok(())
    }
}

/// Durable store: a flat JSON object on disk, re-read on every lookup.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serialises read-modify-write cycles within this process
    write_lock: RwLock<()>,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> BTreeMap<String, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                tracing::warn!("cannot read session file {}: {e}", self.path.display());
                return BTreeMap::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(
                "session file {} is not valid JSON, treating as empty: {e}",
                self.path.display()
            );
            BTreeMap::new()
        })
    }

    fn save(&self, values: &BTreeMap<String, String>) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let formatted = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, formatted)
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.write_lock.read().unwrap_or_else(|e| e.into_inner());
        self.load().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let _guard = self.write_lock.write().unwrap_or_else(|e| e.into_inner());
        let mut values = self.load();
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        let _guard = self.write_lock.write().unwrap_or_else(|e| e.into_inner());
        let mut values = self.load();
        if values.remove(key).is_some() {
            self.save(&values)?;
        }
        Ok(())
    }
}

/// Session context passed to every data-access function that needs the
/// active profile.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("profile_id", &self.profile_id())
            .finish()
    }
}

impl Session {
    pub fn new<S: SessionStore + 'static>(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Empty session backed by memory.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Memory-backed session with a fixed profile, for tests and one-off calls.
    pub fn with_profile(profile_id: ProfileId) -> Self {
        let store = MemoryStore::new();
        // MemoryStore::set cannot fail
        let _ = store.set(PROFILE_ID_KEY, &profile_id.to_string());
        Self::new(store)
    }

    /// Session persisted to a JSON file.
    pub fn persistent<P: AsRef<Path>>(path: P) -> Self {
        Self::new(FileStore::new(path))
    }

    /// The active profile id, or `None` when unset or not a number.
    ///
    /// Only the leading integer of the stored value counts, so `"12abc"`
    /// reads as 12.
    pub fn profile_id(&self) -> Option<ProfileId> {
        self.store
            .get(PROFILE_ID_KEY)
            .and_then(|raw| leading_integer(&raw))
    }

    /// Makes `profile_id` the active profile; `None` clears it.
    pub fn set_profile_id(&self, profile_id: Option<ProfileId>) -> io::Result<()> {
        match profile_id {
            Some(id) => {
                self.store.set(PROFILE_ID_KEY, &id.to_string())?;
                tracing::info!(profile_id = id, "active profile set");
            }
            None => {
                self.store.remove(PROFILE_ID_KEY)?;
                tracing::info!("active profile cleared");
            }
        }
        Ok(())
    }

    /// Profile id used to scope reads. Zero counts as no profile.
    pub(crate) fn read_scope(&self) -> Option<ProfileId> {
        self.profile_id().filter(|id| *id != 0)
    }
}

/// Parses an optional sign and the digits that follow it, ignoring leading
/// whitespace and anything after the digits.
fn leading_integer(raw: &str) -> Option<ProfileId> {
    let raw = raw.trim_start();
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let digits = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits == 0 {
        return None;
    }
    let sign_len = raw.len() - unsigned.len();
    raw[..sign_len + digits].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_session_starts_empty() {
        let session = Session::in_memory();
        assert_eq!(session.profile_id(), None);
        assert_eq!(session.read_scope(), None);
    }

    #[test]
    fn test_set_and_clear_profile() {
        let session = Session::in_memory();
        session.set_profile_id(Some(42)).unwrap();
        assert_eq!(session.profile_id(), Some(42));

        session.set_profile_id(None).unwrap();
        assert_eq!(session.profile_id(), None);
    }

    #[test]
    fn test_clones_share_the_store() {
        let session = Session::in_memory();
        let other = session.clone();
        session.set_profile_id(Some(5)).unwrap();
        assert_eq!(other.profile_id(), Some(5));
    }

    #[test]
    fn test_non_numeric_value_reads_as_absent() {
        let store = MemoryStore::new();
        store.set(PROFILE_ID_KEY, "abc").unwrap();
        let session = Session::new(store);
        assert_eq!(session.profile_id(), None);
    }

    #[test]
    fn test_trailing_garbage_keeps_leading_digits() {
        let store = MemoryStore::new();
        store.set(PROFILE_ID_KEY, "12abc").unwrap();
        let session = Session::new(store);
        assert_eq!(session.profile_id(), Some(12));

        assert_eq!(leading_integer(" 7 "), Some(7));
        assert_eq!(leading_integer("-3"), Some(-3));
        assert_eq!(leading_integer("3.9"), Some(3));
        assert_eq!(leading_integer("-"), None);
        assert_eq!(leading_integer(""), None);
    }

    #[test]
    fn test_zero_profile_does_not_scope_reads() {
        let session = Session::with_profile(0);
        assert_eq!(session.profile_id(), Some(0));
        assert_eq!(session.read_scope(), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        Session::persistent(&path).set_profile_id(Some(17)).unwrap();

        let reopened = Session::persistent(&path);
        assert_eq!(reopened.profile_id(), Some(17));

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains(r#""startup_profile_id": "17""#));
    }

    #[test]
    fn test_file_store_sees_external_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let session = Session::persistent(&path);
        assert_eq!(session.profile_id(), None);

        fs::write(&path, r#"{"startup_profile_id":"9"}"#).unwrap();
        assert_eq!(session.profile_id(), Some(9));
    }

    #[test]
    fn test_corrupt_file_reads_as_empty_and_is_replaced_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{ broken").unwrap();

        let session = Session::persistent(&path);
        assert_eq!(session.profile_id(), None);

        session.set_profile_id(Some(3)).unwrap();
        assert_eq!(session.profile_id(), Some(3));
    }

    #[test]
    fn test_file_store_keeps_unrelated_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"theme":"dark"}"#).unwrap();

        let store = FileStore::new(&path);
        store.set(PROFILE_ID_KEY, "4").unwrap();
        store.remove(PROFILE_ID_KEY).unwrap();
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
        assert_eq!(store.get(PROFILE_ID_KEY), None);
    }
}
