//! # Text Source
//!
//! Turns what the user selected on the command line into `(path, text)`
//! documents for the deck builder.
//!
//! ```text
//! ~/notes/spanish.csv        → "spanish.csv"
//! ~/notes/lang/  (a folder)  → "lang/es/verbs.csv", "lang/fr.csv", ...
//! ```
//!
//! A chosen file keeps its bare name. A chosen folder contributes every
//! file whose name ends in `.csv` (any case), keyed by its
//! forward-slash path starting at the folder's own name.
//!
//! Reads run concurrently, one task per file, and are joined before anything
//! is built. One failed read fails the whole batch.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use futures::future::join_all;
use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::core::deck::{Deck, DeckError, Document};

/// A file to read and the deck path it will be known by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub fs_path: PathBuf,
    pub path: String,
}

/// True when the file name ends in `.csv`, any case. A file named just
/// `.csv` counts.
pub fn is_csv(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .is_some_and(|name| name.ends_with(".csv"))
}

/// Expand selected files and folders into `.csv` entries.
///
/// Entries whose deck path was already taken by an earlier selection are
/// skipped with a warning, so every card id stays unique.
pub fn collect_entries(inputs: &[PathBuf]) -> Result<Vec<SourceEntry>, DeckError> {
    let mut entries = Vec::new();
    let mut seen = HashSet::new();

    for input in inputs {
        if input.is_dir() {
            let root_name = file_name(input);
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry.map_err(|e| DeckError::ReadFailure {
                    path: input.display().to_string(),
                    message: e.to_string(),
                    failed: 1,
                })?;
                if !entry.file_type().is_file() || !is_csv(entry.path()) {
                    continue;
                }
                let relative = entry.path().strip_prefix(input).unwrap_or(entry.path());
                let path = join_slash(&root_name, relative);
                push_unique(&mut entries, &mut seen, entry.path().to_path_buf(), path);
            }
        } else if is_csv(input) {
            push_unique(&mut entries, &mut seen, input.clone(), file_name(input));
        } else {
            debug!("Skipping non-csv selection {}", input.display());
        }
    }

    debug!("Collected {} csv entries from {} selections", entries.len(), inputs.len());
    Ok(entries)
}

fn push_unique(
    entries: &mut Vec<SourceEntry>,
    seen: &mut HashSet<String>,
    fs_path: PathBuf,
    path: String,
) {
    if seen.insert(path.clone()) {
        entries.push(SourceEntry { fs_path, path });
    } else {
        warn!("Duplicate deck path {path}, skipping {}", fs_path.display());
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn join_slash(root: &str, relative: &Path) -> String {
    let mut parts = Vec::new();
    if !root.is_empty() && root != "." {
        parts.push(root.to_string());
    }
    parts.extend(
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    parts.join("/")
}

/// Read every entry concurrently. All succeed or the batch fails.
pub async fn read_documents(entries: &[SourceEntry]) -> Result<Vec<Document>, DeckError> {
    let reads = entries.iter().map(|entry| async move {
        tokio::fs::read(&entry.fs_path)
            .await
            .map(|bytes| Document::new(&entry.path, String::from_utf8_lossy(&bytes)))
            .map_err(|e| (entry.path.clone(), e))
    });

    let mut documents = Vec::with_capacity(entries.len());
    let mut failures = Vec::new();
    for result in join_all(reads).await {
        match result {
            Ok(doc) => documents.push(doc),
            Err((path, e)) => {
                warn!("Failed to read {path}: {e}");
                failures.push((path, e));
            }
        }
    }

    if let Some((path, e)) = failures.first() {
        return Err(DeckError::ReadFailure {
            path: path.clone(),
            message: e.to_string(),
            failed: failures.len(),
        });
    }
    Ok(documents)
}

/// Collect, read, and build a deck from the selected files and folders.
pub async fn load_deck(inputs: Vec<PathBuf>) -> Result<Deck, DeckError> {
    let entries = tokio::task::spawn_blocking(move || collect_entries(&inputs))
        .await
        .map_err(|e| DeckError::ReadFailure {
            path: "<selection>".to_string(),
            message: e.to_string(),
            failed: 1,
        })??;

    if entries.is_empty() {
        return Err(DeckError::NoInputFiles);
    }

    let documents = read_documents(&entries).await?;
    info!("Read {} documents", documents.len());
    Deck::build(&documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_is_csv_case_insensitive() {
        assert!(is_csv(Path::new("a.csv")));
        assert!(is_csv(Path::new("dir/B.CSV")));
        assert!(!is_csv(Path::new("notes.txt")));
        assert!(!is_csv(Path::new("csv")));
        assert!(!is_csv(Path::new("notes.csv.bak")));
    }

    #[test]
    fn test_bare_dot_csv_name_is_included() {
        assert!(is_csv(Path::new(".csv")));
        assert!(is_csv(Path::new("dir/.CSV")));

        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("deck");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join(".csv"), "q,a").unwrap();

        let entries = collect_entries(&[root]).unwrap();
        let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["deck/.csv"]);
    }

    #[test]
    fn test_folder_entries_use_slash_paths_from_folder_name() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("lang");
        fs::create_dir_all(root.join("es")).unwrap();
        fs::write(root.join("es").join("verbs.csv"), "ser,to be").unwrap();
        fs::write(root.join("fr.CSV"), "etre,to be").unwrap();
        fs::write(root.join("readme.md"), "# hi").unwrap();

        let entries = collect_entries(&[root]).unwrap();
        let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["lang/es/verbs.csv", "lang/fr.CSV"]);
    }

    #[test]
    fn test_single_file_uses_bare_name_and_duplicates_skip() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("one");
        let b = tmp.path().join("two");
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(&b).unwrap();
        fs::write(a.join("deck.csv"), "1,2").unwrap();
        fs::write(b.join("deck.csv"), "3,4").unwrap();

        let entries = collect_entries(&[a.join("deck.csv"), b.join("deck.csv")]).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "deck.csv");
        assert_eq!(entries[0].fs_path, a.join("deck.csv"));
    }

    #[tokio::test]
    async fn test_read_failure_aborts_batch() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("ok.csv"), "1,2").unwrap();
        let entries = vec![
            SourceEntry {
                fs_path: tmp.path().join("ok.csv"),
                path: "ok.csv".to_string(),
            },
            SourceEntry {
                fs_path: tmp.path().join("gone.csv"),
                path: "gone.csv".to_string(),
            },
        ];
        match read_documents(&entries).await {
            Err(DeckError::ReadFailure { path, failed, .. }) => {
                assert_eq!(path, "gone.csv");
                assert_eq!(failed, 1);
            }
            other => panic!("expected read failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_decoded_lossily() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("bin.csv"), b"caf\xe9,coffee").unwrap();
        let entries = collect_entries(&[tmp.path().join("bin.csv")]).unwrap();
        let docs = read_documents(&entries).await.unwrap();
        assert!(docs[0].text.ends_with(",coffee"));
    }

    #[tokio::test]
    async fn test_load_deck_with_no_csv_is_no_input_files() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("notes.txt"), "a,b").unwrap();
        let result = load_deck(vec![tmp.path().to_path_buf()]).await;
        assert_eq!(result, Err(DeckError::NoInputFiles));
    }
}
