//! Atomic JSON persistence: a profile head record, one file per deck, and a
//! trash directory for files nothing references any more.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{Config, Deck, Profile};

/// Head record filename under the store root.
const HEAD_FILE: &str = "profile.json";
/// Deck files live here, one per deck.
const DECKS_DIR: &str = "decks";
/// Unreferenced deck files are moved here, never deleted.
const TRASH_DIR: &str = "trash";

/// Result alias for store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors from reading or writing the store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem failure with the path involved.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A file that should hold JSON could not be encoded or decoded.
    #[error("JSON error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A deck file listed in the head record does not exist.
    #[error("deck file '{0}' not found")]
    MissingDeckFile(String),
    /// The deck path exists but is not a regular file.
    #[error("{} is a directory, not a deck file", .0.display())]
    NotAFile(PathBuf),
    /// A deck without a storage filename cannot be saved.
    #[error("deck '{0}' has no storage filename")]
    UnnamedDeck(String),
}

impl StorageError {
    fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// How loading the profile went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadCategory {
    /// Everything loaded.
    Success,
    /// No save data yet; a fresh profile was created.
    New,
    /// The head record exists but is not valid JSON; starting fresh.
    Corrupt,
    /// The head loaded but some deck files did not.
    Partial,
    /// The head could not be read for another reason; starting fresh.
    Error,
}

/// One deck file that failed to load.
#[derive(Debug)]
pub struct DeckLoadFailure {
    /// Filename as listed in the head record.
    pub filename: String,
    /// What went wrong.
    pub error: StorageError,
}

/// Outcome of [`Store::load_profile`].
#[derive(Debug)]
pub struct LoadStatus {
    pub category: LoadCategory,
    /// Human-readable summary; empty on success.
    pub message: String,
    /// Per-file failures behind a `Partial` load.
    pub failures: Vec<DeckLoadFailure>,
}

impl LoadStatus {
    fn new(category: LoadCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            failures: Vec::new(),
        }
    }
}

/// On-disk shape of the head record. Deck contents live in their own files;
/// the head only lists the filenames, in profile order.
#[derive(Debug, Serialize, Deserialize)]
struct HeadRecord {
    #[serde(default)]
    name: String,
    #[serde(default)]
    config: Config,
    #[serde(default)]
    deck_files: Vec<String>,
}

/// A profile store rooted at one directory.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Open a store at the given root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open the store at the platform data directory.
    pub fn open_default() -> Option<Self> {
        directories::ProjectDirs::from("", "", "study-trainer")
            .map(|dirs| Self::new(dirs.data_dir()))
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path for a deck filename.
    pub fn deck_path(&self, filename: &str) -> PathBuf {
        self.decks_dir().join(filename)
    }

    fn head_path(&self) -> PathBuf {
        self.root.join(HEAD_FILE)
    }

    fn decks_dir(&self) -> PathBuf {
        self.root.join(DECKS_DIR)
    }

    fn trash_dir(&self) -> PathBuf {
        self.root.join(TRASH_DIR)
    }

    /// Save the whole profile.
    ///
    /// Each deck file is written atomically, unreferenced deck files are
    /// moved to the trash directory, and the head record is written last so
    /// it never points at files that are not there yet.
    pub fn save_profile(&self, profile: &Profile) -> StorageResult<()> {
        for deck in &profile.decks {
            if deck.filename.is_empty() {
                return Err(StorageError::UnnamedDeck(deck.name.clone()));
            }
        }

        let decks_dir = self.decks_dir();
        fs::create_dir_all(&decks_dir).map_err(|e| StorageError::io(&decks_dir, e))?;

        let mut written = HashSet::new();
        for deck in &profile.decks {
            self.save_deck(deck)?;
            written.insert(deck.filename.clone());
        }

        self.trash_orphans(&written)?;

        let head = HeadRecord {
            name: profile.name.clone(),
            config: profile.config,
            deck_files: profile.decks.iter().map(|d| d.filename.clone()).collect(),
        };
        write_json_atomic(&self.head_path(), &head)?;

        info!(decks = profile.decks.len(), "profile saved");
        Ok(())
    }

    /// Write one deck's file atomically.
    pub fn save_deck(&self, deck: &Deck) -> StorageResult<()> {
        if deck.filename.is_empty() {
            return Err(StorageError::UnnamedDeck(deck.name.clone()));
        }

        let decks_dir = self.decks_dir();
        fs::create_dir_all(&decks_dir).map_err(|e| StorageError::io(&decks_dir, e))?;

        write_json_atomic(&self.deck_path(&deck.filename), deck)?;
        debug!(deck = %deck.name, file = %deck.filename, "deck written");
        Ok(())
    }

    /// Move deck files that were not part of this save into the trash.
    fn trash_orphans(&self, written: &HashSet<String>) -> StorageResult<()> {
        let decks_dir = self.decks_dir();
        let entries = fs::read_dir(&decks_dir).map_err(|e| StorageError::io(&decks_dir, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| StorageError::io(&decks_dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.ends_with(".json") || written.contains(name) {
                continue;
            }

            let trash_dir = self.trash_dir();
            fs::create_dir_all(&trash_dir).map_err(|e| StorageError::io(&trash_dir, e))?;
            let dest = self.trash_destination(name);
            fs::rename(&path, &dest).map_err(|e| StorageError::io(&path, e))?;
            warn!(file = name, "unreferenced deck file moved to trash");
        }

        Ok(())
    }

    /// Pick a free name in the trash, suffixing on collision.
    fn trash_destination(&self, name: &str) -> PathBuf {
        let direct = self.trash_dir().join(name);
        if !direct.exists() {
            return direct;
        }

        let stem = name.strip_suffix(".json").unwrap_or(name);
        let suffix = Uuid::new_v4().simple().to_string();
        self.trash_dir().join(format!("{stem}-{}.json", &suffix[..8]))
    }

    /// Load the profile, degrading to a fresh one when the head is missing
    /// or unreadable. Deck files load independently; one bad file never
    /// blocks the rest.
    pub fn load_profile(&self) -> (Profile, LoadStatus) {
        let head_path = self.head_path();
        let text = match fs::read_to_string(&head_path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("no save data found, starting fresh");
                return (
                    Profile::default(),
                    LoadStatus::new(LoadCategory::New, "no save data found"),
                );
            }
            Err(e) => {
                warn!(error = %e, "head record unreadable, starting fresh");
                return (
                    Profile::default(),
                    LoadStatus::new(LoadCategory::Error, e.to_string()),
                );
            }
        };

        let head: HeadRecord = match serde_json::from_str(&text) {
            Ok(head) => head,
            Err(e) => {
                warn!(error = %e, "head record corrupt, starting fresh");
                return (
                    Profile::default(),
                    LoadStatus::new(LoadCategory::Corrupt, e.to_string()),
                );
            }
        };

        let mut profile = Profile {
            name: head.name,
            decks: Vec::new(),
            config: head.config,
        };
        let mut failures = Vec::new();

        for filename in head.deck_files {
            match self.load_deck(&filename) {
                Ok(deck) => profile.decks.push(deck),
                Err(error) => {
                    warn!(file = %filename, error = %error, "deck file failed to load");
                    failures.push(DeckLoadFailure { filename, error });
                }
            }
        }

        let status = if failures.is_empty() {
            LoadStatus::new(LoadCategory::Success, "")
        } else {
            let names: Vec<&str> = failures.iter().map(|f| f.filename.as_str()).collect();
            let plural = if failures.len() == 1 { "" } else { "s" };
            LoadStatus {
                message: format!(
                    "failed to load {} deck file{plural}: {}",
                    failures.len(),
                    names.join(", ")
                ),
                category: LoadCategory::Partial,
                failures,
            }
        };

        (profile, status)
    }

    /// Load one deck file, filling in its filename.
    pub fn load_deck(&self, filename: &str) -> StorageResult<Deck> {
        let path = self.deck_path(filename);
        if path.is_dir() {
            return Err(StorageError::NotAFile(path));
        }

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StorageError::MissingDeckFile(filename.to_string()));
            }
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        let mut deck: Deck = serde_json::from_str(&text)
            .map_err(|source| StorageError::Json { path, source })?;
        deck.filename = filename.to_string();
        Ok(deck)
    }
}

/// Serialize to a sibling temp file, then rename over the target, so the
/// target is never observed half-written.
fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> StorageResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, json).map_err(|e| StorageError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| StorageError::io(path, e))?;
    Ok(())
}
