//! Flat-file storage: a pipe-delimited question bank, a one-line save slot and
//! an append-only leaderboard, each in its own text file.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::repository::{
    CheckpointRepository, LeaderboardRepository, QuestionRepository, Storage, StorageError,
};

mod checkpoint_repo;
mod leaderboard_repo;
mod mapping;
mod question_repo;

pub const DEFAULT_QUESTIONS_FILE: &str = "questions.txt";
pub const DEFAULT_SAVE_FILE: &str = "saved_game.txt";
pub const DEFAULT_LEADERBOARD_FILE: &str = "leaderboard.txt";

/// Locations of the three data files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub questions: PathBuf,
    pub save: PathBuf,
    pub leaderboard: PathBuf,
}

impl StoragePaths {
    /// Default file names resolved under `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            questions: dir.join(DEFAULT_QUESTIONS_FILE),
            save: dir.join(DEFAULT_SAVE_FILE),
            leaderboard: dir.join(DEFAULT_LEADERBOARD_FILE),
        }
    }
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self {
            questions: PathBuf::from(DEFAULT_QUESTIONS_FILE),
            save: PathBuf::from(DEFAULT_SAVE_FILE),
            leaderboard: PathBuf::from(DEFAULT_LEADERBOARD_FILE),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileRepository {
    paths: StoragePaths,
}

impl FileRepository {
    #[must_use]
    pub fn new(paths: StoragePaths) -> Self {
        Self { paths }
    }

    #[must_use]
    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }
}

impl Storage {
    /// Build a `Storage` backed by flat files. Nothing is touched on disk until
    /// the first read or write.
    #[must_use]
    pub fn files(paths: StoragePaths) -> Self {
        let repo = FileRepository::new(paths);
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let checkpoints: Arc<dyn CheckpointRepository> = Arc::new(repo.clone());
        let leaderboard: Arc<dyn LeaderboardRepository> = Arc::new(repo);
        Self {
            questions,
            checkpoints,
            leaderboard,
        }
    }
}

/// Reads a whole file; a missing file is `Ok(None)`.
pub(crate) fn read_optional(path: &Path) -> Result<Option<String>, StorageError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StorageError::io("read", path, e)),
    }
}

/// Appends `line` plus a newline, creating the file if needed. If the file does
/// not already end in a newline one is inserted first so records never merge.
pub(crate) fn append_line(path: &Path, line: &str) -> Result<(), StorageError> {
    ensure_parent(path)?;
    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)
        .map_err(|e| StorageError::io("open for appending", path, e))?;

    let mut record = String::with_capacity(line.len() + 2);
    if !ends_with_newline(&mut file).map_err(|e| StorageError::io("read", path, e))? {
        record.push('\n');
    }
    record.push_str(line);
    record.push('\n');

    file.write_all(record.as_bytes())
        .map_err(|e| StorageError::io("append to", path, e))
}

fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0_u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Replaces the file's contents via a temp file and rename.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<(), StorageError> {
    ensure_parent(path)?;
    let temp_path = temp_path_for(path);

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::io("create", &temp_path, e))?;
    file.write_all(contents.as_bytes())
        .map_err(|e| StorageError::io("write", &temp_path, e))?;
    file.sync_all()
        .map_err(|e| StorageError::io("sync", &temp_path, e))?;
    drop(file);

    fs::rename(&temp_path, path).map_err(|e| StorageError::io("replace", path, e))
}

/// `<file name>.trivia.tmp` next to the target, so no configured data file
/// is ever used as scratch space.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".trivia.tmp");
    path.with_file_name(name)
}

fn ensure_parent(path: &Path) -> Result<(), StorageError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| StorageError::io("create directory", parent, e))
        }
        _ => Ok(()),
    }
}
