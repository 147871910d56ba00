//! On-disk weapon records: one pretty-printed JSON file per weapon, named by
//! the weapon's file stem.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::data::weapon::{ModelError, Weapon};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create weapon directory '{path}': {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("'{path}' is not a weapon record: {source}")]
    Model {
        path: String,
        #[source]
        source: ModelError,
    },
    #[error("failed to write '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct WeaponStore {
    dir: PathBuf,
}

impl WeaponStore {
    /// Open a store for reading only; the directory is not created.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Open a store for writing, creating the directory if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::CreateDir {
            path: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{stem}.json"))
    }

    /// Persisted record for `stem`, or `None` when no file exists yet.
    pub fn load_record(&self, stem: &str) -> Result<Option<Map<String, Value>>, StoreError> {
        let path = self.path_for(stem);
        if !path.is_file() {
            return Ok(None);
        }
        read_record(&path).map(Some)
    }

    pub fn save_record(&self, stem: &str, record: &Map<String, Value>) -> Result<PathBuf, StoreError> {
        let path = self.path_for(stem);
        let write_err = |source| StoreError::Write {
            path: path.display().to_string(),
            source,
        };
        let payload = serde_json::to_string_pretty(record)
            .map_err(|err| write_err(std::io::Error::new(std::io::ErrorKind::InvalidData, err)))?;
        fs::write(&path, payload).map_err(write_err)?;
        Ok(path)
    }

    /// Rated weapons (records with an `id`) in file name order. Templates are
    /// skipped before typed parsing. A rated record that fails to read or parse is
    /// logged and left out.
    pub fn load_rated(&self) -> Result<Vec<Weapon>, StoreError> {
        let read_dir_err = |source| StoreError::Read {
            path: self.dir.display().to_string(),
            source,
        };
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(read_dir_err)? {
            let path = entry.map_err(read_dir_err)?.path();
            if path.is_file() && path.extension().map_or(false, |e| e == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut weapons = Vec::with_capacity(paths.len());
        for path in &paths {
            match load_rated_record(path) {
                Ok(Some(weapon)) => weapons.push(weapon),
                Ok(None) => tracing::debug!(path = %path.display(), "no id, skipping template"),
                Err(err) => tracing::warn!(error = %err, "skipping unreadable weapon record"),
            }
        }
        Ok(weapons)
    }
}

fn load_rated_record(path: &Path) -> Result<Option<Weapon>, StoreError> {
    let record = read_record(path)?;
    if !record.contains_key("id") {
        return Ok(None);
    }
    Weapon::from_record(record)
        .map(Some)
        .map_err(|source| StoreError::Model {
            path: path.display().to_string(),
            source,
        })
}

fn read_record(path: &Path) -> Result<Map<String, Value>, StoreError> {
    let raw = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let value: Value = serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::Parse {
            path: path.display().to_string(),
            source: serde::de::Error::custom("expected a JSON object"),
        }),
    }
}
