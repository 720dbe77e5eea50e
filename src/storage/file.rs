use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{ScoreStore, StoreError};

const APP_DIR: &str = "snake_core";
const FILE_NAME: &str = "scores.json";

/// Per-user directory for scores and logs, relative to the working
/// directory when the platform has none
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Scores kept as a flat JSON object on disk, e.g. `{"snake.high_score": 12}`
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/snake_core/scores.json`
    pub fn default_path() -> PathBuf {
        app_data_dir().join(FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, u32>, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(self.io_error(err)),
        };

        serde_json::from_str(&text).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn write_all(&self, values: &BTreeMap<String, u32>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }

        let json = serde_json::to_string_pretty(values)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|err| self.io_error(err))?;
        std::fs::rename(&tmp, &self.path).map_err(|err| self.io_error(err))
    }
}

impl ScoreStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<u32>, StoreError> {
        Ok(self.read_all()?.get(key).copied())
    }

    fn set(&mut self, key: &str, value: u32) -> Result<(), StoreError> {
        // A corrupt file is replaced; one we cannot read at all is left alone
        let mut values = match self.read_all() {
            Ok(values) => values,
            Err(err @ StoreError::Parse { .. }) => {
                tracing::warn!(error = %err, "discarding unreadable score file");
                BTreeMap::new()
            }
            Err(err) => return Err(err),
        };
        values.insert(key.to_string(), value);
        self.write_all(&values)
    }
}
