//! # Snapshot Store
//!
//! The core never names a storage mechanism. It talks to a
//! [`PersistentStore`], a plain byte-valued key/value capability, and the
//! binary decides what backs it.
//!
//! ```text
//! FileStore    ~/.flashdeck/snapshots/<key>.json  (atomic .tmp + rename)
//! MemoryStore  HashMap, for tests
//! ```
//!
//! Sessions are stored under [`deck_key`], derived from the deck's path set,
//! so opening the same files again finds the same snapshot.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::{debug, info, warn};
use uuid::Uuid;

use crate::core::deck::Deck;
use crate::core::snapshot::{self, Snapshot};

#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "store I/O error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Io(e)
    }
}

pub trait PersistentStore {
    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;

    /// `Ok(None)` when nothing is stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
}

/// Storage key for a deck: a name-based UUID over its sorted path set.
pub fn deck_key(deck: &Deck) -> String {
    let identity = deck.paths().join("\n");
    Uuid::new_v5(&Uuid::NAMESPACE_URL, identity.as_bytes()).to_string()
}

/// Encode the session and `put` it under the deck's key.
pub fn save_snapshot(
    store: &mut dyn PersistentStore,
    snapshot: &Snapshot,
    deck: &Deck,
) -> Result<(), StoreError> {
    let key = deck_key(deck);
    store.put(&key, snapshot::to_json(snapshot).as_bytes())?;
    debug!("Snapshot saved under {key}");
    Ok(())
}

/// Fetch the stored snapshot for `deck`, if any. Unreadable payloads are
/// logged and treated as absent.
pub fn load_snapshot(store: &dyn PersistentStore, deck: &Deck) -> Option<Snapshot> {
    let key = deck_key(deck);
    let bytes = match store.get(&key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return None,
        Err(e) => {
            warn!("Failed to read stored snapshot {key}: {e}");
            return None;
        }
    };
    match snapshot::from_bytes(&bytes) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            warn!("Ignoring stored snapshot {key}: {e}");
            None
        }
    }
}

/// Directory-backed store. One JSON file per key.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens (and creates if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl PersistentStore for FileStore {
    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        atomic_write(&self.path_for(key), bytes)?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Write `bytes` to `path` via `.tmp` + rename so readers never see half a file.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, bytes)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Write `snapshot` as `flashdeck-<timestamp>.json` into `dir` and return the
/// file's path. This is the explicit, user-visible export, separate from the
/// keyed store.
pub fn export_to_file(snapshot: &Snapshot, dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    let path = dir.join(format!("flashdeck-{stamp}.json"));
    atomic_write(&path, snapshot::to_json(snapshot).as_bytes())?;
    info!("Exported snapshot to {}", path.display());
    Ok(path)
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PersistentStore for MemoryStore {
    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scope::ALL_SCOPE;
    use crate::core::session::{Outcome, Session};
    use crate::core::snapshot::{decode, encode};
    use crate::test_support::deck_from;

    #[test]
    fn test_deck_key_depends_only_on_paths() {
        let a = deck_from(&[("a.csv", "1,2"), ("b.csv", "3,4")]);
        let b = deck_from(&[("b.csv", "changed,text"), ("a.csv", "5,6\n7,8")]);
        let c = deck_from(&[("a.csv", "1,2")]);
        assert_eq!(deck_key(&a), deck_key(&b));
        assert_ne!(deck_key(&a), deck_key(&c));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let deck = deck_from(&[("a.csv", "1,2\n3,4")]);
        let mut session = Session::new(&deck, ALL_SCOPE, true, 30);
        session.answer(Outcome::Incorrect);

        let mut store = MemoryStore::new();
        assert!(load_snapshot(&store, &deck).is_none());
        save_snapshot(&mut store, &encode(&session, &deck), &deck).unwrap();
        assert_eq!(store.len(), 1);

        let loaded = load_snapshot(&store, &deck).unwrap();
        assert_eq!(decode(&loaded, &deck).unwrap(), session);
    }

    #[test]
    fn test_garbage_in_store_is_ignored() {
        let deck = deck_from(&[("a.csv", "1,2")]);
        let mut store = MemoryStore::new();
        store.put(&deck_key(&deck), b"{not json").unwrap();
        assert!(load_snapshot(&store, &deck).is_none());
    }

    #[test]
    fn test_file_store_put_get_and_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(tmp.path().join("snaps")).unwrap();
        assert!(store.get("nothing").unwrap().is_none());

        store.put("k1", b"hello").unwrap();
        assert_eq!(store.get("k1").unwrap().as_deref(), Some(&b"hello"[..]));
        store.put("k1", b"again").unwrap();
        assert_eq!(store.get("k1").unwrap().as_deref(), Some(&b"again"[..]));
        assert!(!store.dir().join("k1.tmp").exists());
    }

    #[test]
    fn test_export_writes_readable_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let deck = deck_from(&[("a.csv", "1,2")]);
        let snap = encode(&Session::new(&deck, ALL_SCOPE, true, 30), &deck);

        let path = export_to_file(&snap, &tmp.path().join("out")).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("flashdeck-") && name.ends_with(".json"));

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(snapshot::from_json(&text).unwrap(), snap);
    }

    #[test]
    fn test_file_store_sanitizes_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(tmp.path()).unwrap();
        store.put("../escape", b"x").unwrap();
        assert!(tmp.path().join("___escape.json").exists());
    }
}
