//! # Snapshot Codec
//!
//! Portable, human-readable JSON form of a [`Session`] plus the identity of
//! the deck it was taken from (its sorted, unique path set).
//!
//! ```json
//! {
//!   "paths": ["a.csv", "b/x.csv"],
//!   "sessionIds": ["a.csv::0", "b/x.csv::0"],
//!   "originalOrder": ["a.csv::0", "b/x.csv::0"],
//!   "currentOrder": ["b/x.csv::0", "a.csv::0"],
//!   "currentIndex": 1,
//!   "incorrectIds": ["b/x.csv::0"],
//!   "scope": "__all__",
//!   "isShuffled": true,
//!   "frontFirst": true,
//!   "fontSize": 30,
//!   "finished": false
//! }
//! ```
//!
//! Importing is two steps. [`validate`] compares path sets and refuses a
//! snapshot taken from different files. [`decode`] then builds a new
//! session, keeping only ids the deck still has. A snapshot is never
//! modified by either.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize};

use crate::core::deck::Deck;
use crate::core::session::{DEFAULT_FONT_SIZE, Phase, Session, clamp_font_size};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// Snapshot was taken from a different set of files.
    /// `missing`: in the snapshot, not loaded. `extra`: loaded, not in the snapshot.
    Incompatible {
        missing: Vec<String>,
        extra: Vec<String>,
    },
    /// Payload is not valid snapshot JSON or lacks a required field.
    Corrupt(String),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Incompatible { missing, extra } => {
                write!(f, "snapshot does not match the loaded files")?;
                if !missing.is_empty() {
                    write!(f, "; missing: {}", missing.join(", "))?;
                }
                if !extra.is_empty() {
                    write!(f, "; extra: {}", extra.join(", "))?;
                }
                Ok(())
            }
            SnapshotError::Corrupt(msg) => write!(f, "corrupt snapshot: {msg}"),
        }
    }
}

impl std::error::Error for SnapshotError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub paths: Vec<String>,
    pub session_ids: Vec<String>,
    pub original_order: Vec<String>,
    pub current_order: Vec<String>,
    #[serde(default)]
    pub current_index: usize,
    pub incorrect_ids: Vec<String>,
    pub scope: String,
    #[serde(default)]
    pub is_shuffled: bool,
    #[serde(default = "default_front_first")]
    pub front_first: bool,
    #[serde(default = "default_font_size", deserialize_with = "font_size_any")]
    pub font_size: u32,
    #[serde(default)]
    pub finished: bool,
}

fn default_front_first() -> bool {
    true
}

fn default_font_size() -> u32 {
    DEFAULT_FONT_SIZE
}

/// `fontSize` has been written both as a number and as a numeric string.
fn font_size_any<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .trim_end_matches("px")
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid fontSize {s:?}"))),
    }
}

/// Capture `session` together with the identity of the full `deck`.
pub fn encode(session: &Session, deck: &Deck) -> Snapshot {
    let incorrect_ids = session
        .session_ids()
        .iter()
        .filter(|id| session.incorrect_ids().contains(*id))
        .cloned()
        .collect();

    Snapshot {
        paths: deck.paths(),
        session_ids: session.session_ids().to_vec(),
        original_order: session.original_order().to_vec(),
        current_order: session.current_order().to_vec(),
        current_index: session.current_index(),
        incorrect_ids,
        scope: session.scope().to_string(),
        is_shuffled: session.is_shuffled(),
        front_first: session.front_first(),
        font_size: session.font_size(),
        finished: session.is_finished(),
    }
}

/// Check the snapshot was taken from exactly the files in `deck`.
pub fn validate(snapshot: &Snapshot, deck: &Deck) -> Result<(), SnapshotError> {
    let expected: BTreeSet<&String> = snapshot.paths.iter().collect();
    let current = deck.paths();
    let actual: BTreeSet<&String> = current.iter().collect();

    if expected == actual {
        return Ok(());
    }

    let missing: Vec<String> = expected.difference(&actual).map(|p| p.to_string()).collect();
    let extra: Vec<String> = actual.difference(&expected).map(|p| p.to_string()).collect();
    warn!(
        "Incompatible snapshot: {} missing, {} extra paths",
        missing.len(),
        extra.len()
    );
    Err(SnapshotError::Incompatible { missing, extra })
}

/// Validate, then rebuild a session from `snapshot` against `deck`.
///
/// Ids the deck no longer has are dropped from every list. Orders that no
/// longer cover the session exactly fall back to the session's own order.
pub fn decode(snapshot: &Snapshot, deck: &Deck) -> Result<Session, SnapshotError> {
    validate(snapshot, deck)?;

    let session_ids = retain_known(&snapshot.session_ids, |id| deck.contains(id));
    let members: HashSet<&str> = session_ids.iter().map(String::as_str).collect();

    let original_order = restore_order(&snapshot.original_order, &members)
        .unwrap_or_else(|| session_ids.clone());
    // A current order that fell back is the original order, so not shuffled.
    let (current_order, is_shuffled) = match restore_order(&snapshot.current_order, &members) {
        Some(order) => (order, snapshot.is_shuffled),
        None => {
            warn!("Snapshot current order no longer matches the session, using original order");
            (original_order.clone(), false)
        }
    };

    let incorrect_ids = snapshot
        .incorrect_ids
        .iter()
        .filter(|id| members.contains(id.as_str()))
        .cloned()
        .collect();

    let dropped = snapshot.session_ids.len() - session_ids.len();
    if dropped > 0 {
        debug!("Snapshot import dropped {dropped} ids not present in the deck");
    }

    let last = session_ids.len().saturating_sub(1);
    let phase = if snapshot.finished && !session_ids.is_empty() {
        Phase::Finished
    } else {
        Phase::Active
    };

    Ok(Session {
        scope: snapshot.scope.clone(),
        current_index: snapshot.current_index.min(last),
        session_ids,
        original_order,
        current_order,
        incorrect_ids,
        is_shuffled,
        front_first: snapshot.front_first,
        font_size: clamp_font_size(snapshot.font_size),
        phase,
        flipped: false,
    })
}

/// Keep ids passing `known`, first occurrence only, original order.
fn retain_known(ids: &[String], known: impl Fn(&str) -> bool) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.iter()
        .filter(|id| known(id) && seen.insert(id.as_str()))
        .cloned()
        .collect()
}

/// An order is usable only if it is a permutation of `members`.
fn restore_order(order: &[String], members: &HashSet<&str>) -> Option<Vec<String>> {
    let restored = retain_known(order, |id| members.contains(id));
    (restored.len() == members.len()).then_some(restored)
}

/// Pretty JSON, the export payload format.
pub fn to_json(snapshot: &Snapshot) -> String {
    // Plain strings, bools, and integers: serialization cannot fail.
    serde_json::to_string_pretty(snapshot).unwrap_or_default()
}

pub fn from_json(json: &str) -> Result<Snapshot, SnapshotError> {
    serde_json::from_str(json).map_err(|e| SnapshotError::Corrupt(e.to_string()))
}

pub fn from_bytes(bytes: &[u8]) -> Result<Snapshot, SnapshotError> {
    serde_json::from_slice(bytes).map_err(|e| SnapshotError::Corrupt(e.to_string()))
}
