use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StagingError {
    #[error("Failed to prepare staging directory '{}': {source}", path.display())]
    Directory { path: PathBuf, source: io::Error },

    #[error("Failed to stage '{name}': {source}")]
    Write { name: String, source: io::Error },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A directory that holds uploaded items while a batch is in flight.
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    /// Opens (creating if needed) the staging directory at `dir`.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, StagingError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| StagingError::Directory {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `bytes` to a fresh file in the staging directory.
    ///
    /// The on-disk name is derived from a slug of `original_name` plus a
    /// random component, so client-supplied names never choose the path.
    pub fn stage(&self, original_name: &str, bytes: &[u8]) -> Result<StagedFile, StagingError> {
        let (stem, extension) = split_name(original_name);
        let prefix = format!("{}-", slug_or_default(stem));
        let suffix = extension
            .map(|ext| format!(".{}", slug_or_default(ext)))
            .unwrap_or_default();

        let write_err = |source| StagingError::Write {
            name: original_name.to_string(),
            source,
        };
        let mut file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(&suffix)
            .tempfile_in(&self.dir)
            .map_err(write_err)?;
        file.write_all(bytes).map_err(write_err)?;
        file.flush().map_err(write_err)?;

        log::debug!("Staged '{}' at {}", original_name, file.path().display());
        Ok(StagedFile {
            file,
            len: bytes.len() as u64,
        })
    }

    /// Deletes regular files in the staging directory that were last
    /// modified at least `max_age` ago. Returns the number removed.
    pub fn sweep(&self, max_age: Duration) -> Result<usize, StagingError> {
        sweep_dir(&self.dir, max_age)
    }
}

/// Deletes regular files directly inside `dir` that were last modified at
/// least `max_age` ago. Returns the number removed.
///
/// A missing directory holds nothing to sweep. Files that vanish mid-sweep
/// are ignored.
pub fn sweep_dir(dir: &Path, max_age: Duration) -> Result<usize, StagingError> {
    let now = SystemTime::now();
    let mut removed = 0;

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };
    for entry in entries {
        let entry = entry?;
        let metadata = match entry.metadata() {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => continue,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e.into()),
        };
        let age = now
            .duration_since(metadata.modified()?)
            .unwrap_or(Duration::ZERO);
        if age < max_age {
            continue;
        }
        match fs::remove_file(entry.path()) {
            Ok(()) => {
                log::info!("Removed stale file {}", entry.path().display());
                removed += 1;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(removed)
}

/// A staged item. The file is deleted when the handle is dropped.
#[derive(Debug)]
pub struct StagedFile {
    file: NamedTempFile,
    len: u64,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn read(&self) -> io::Result<Vec<u8>> {
        fs::read(self.file.path())
    }
}

/// Splits the final path component of `name` into stem and extension.
fn split_name(name: &str) -> (&str, Option<&str>) {
    let file_name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => (stem, Some(ext)),
        _ => (file_name, None),
    }
}

fn slug_or_default(s: &str) -> String {
    let slugged = slug::slugify(s);
    if slugged.is_empty() { "item".to_string() } else { slugged }
}
