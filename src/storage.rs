//! Widget list persistence: one JSON file, rewritten whole on every change

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::BoardError;
use crate::state::{AppState, WidgetDescriptor};

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("widget file {path} is corrupted: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize widgets: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Clone, Debug)]
pub struct WidgetStore {
    path: PathBuf,
}

impl WidgetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored list. A missing file is an empty board.
    pub fn load(&self) -> Result<Vec<WidgetDescriptor>, StorageError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(self.io_error(source)),
        };
        if json.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&json).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Write the whole list through a temp file so a crash never leaves a
    /// half-written file behind.
    pub fn save(&self, widgets: &[WidgetDescriptor]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(widgets)?;
        let tmp = self.sibling("tmp");
        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        tracing::debug!(count = widgets.len(), path = %self.path.display(), "saved widgets");
        Ok(())
    }

    /// Save for the effect handler: a failure is logged and comes back as the
    /// error the banner shows.
    pub fn persist(&self, widgets: &[WidgetDescriptor]) -> Result<(), BoardError> {
        self.save(widgets).map_err(|e| {
            tracing::error!(error = %e, "failed to save widgets");
            BoardError::Storage(e.to_string())
        })
    }

    /// Move an unreadable file out of the way so the next save cannot
    /// clobber it. Returns where it went.
    pub fn quarantine(&self) -> Result<PathBuf, StorageError> {
        let target = self.sibling("corrupt");
        fs::rename(&self.path, &target).map_err(|e| self.io_error(e))?;
        tracing::warn!(from = %self.path.display(), to = %target.display(), "quarantined widget file");
        Ok(target)
    }

    fn sibling(&self, extension: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "widgets.json".into());
        name.push(".");
        name.push(extension);
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Startup state from the persisted list.
///
/// A corrupt file is set aside and the board starts empty with the error
/// on the banner. Geolocation is skipped then, so seeding a new widget does
/// not clear that message. Other I/O failures are returned.
pub fn initial_state(store: &WidgetStore, geolocate: bool) -> Result<AppState, StorageError> {
    match store.load() {
        Ok(widgets) => {
            tracing::info!(count = widgets.len(), path = %store.path().display(), "loaded widgets");
            Ok(AppState::new(widgets).with_geolocate(geolocate))
        }
        Err(err @ StorageError::Corrupt { .. }) => {
            tracing::warn!(error = %err, "widget list unreadable, starting empty");
            let message = match store.quarantine() {
                Ok(moved) => format!("{err}; moved to {}", moved.display()),
                Err(quarantine_err) => format!("{err}; {quarantine_err}"),
            };
            let mut state = AppState::new(Vec::new()).with_geolocate(false);
            state.raise_error(BoardError::Storage(message));
            Ok(state)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store() -> (tempfile::TempDir, WidgetStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = WidgetStore::new(dir.path().join("board").join("widgets.json"));
        (dir, store)
    }

    #[test]
    fn missing_file_loads_empty() {
        let (_dir, store) = store();
        assert_eq!(store.load().unwrap(), Vec::new());
    }

    #[test]
    fn save_then_load_keeps_order() {
        let (_dir, store) = store();
        let widgets = vec![
            WidgetDescriptor::new(51.5, -0.12, "London"),
            WidgetDescriptor::new(55.7558, 37.6173, "55.76 | 37.62"),
            WidgetDescriptor::new(51.5, -0.12, "London"),
        ];
        store.save(&widgets).unwrap();
        assert_eq!(store.load().unwrap(), widgets);

        store.save(&widgets[1..]).unwrap();
        assert_eq!(store.load().unwrap(), widgets[1..].to_vec());
    }

    #[test]
    fn file_format_uses_long_keys() {
        let (_dir, store) = store();
        store
            .save(&[WidgetDescriptor::new(1.5, 2.5, "Somewhere")])
            .unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!([{"latitude": 1.5, "longitude": 2.5, "name": "Somewhere"}])
        );
    }

    #[test]
    fn corrupt_file_is_reported_and_quarantined() {
        let (_dir, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "[{not json").unwrap();

        assert!(matches!(store.load(), Err(StorageError::Corrupt { .. })));

        let moved = store.quarantine().unwrap();
        assert!(moved.ends_with("widgets.json.corrupt"));
        assert!(moved.exists());
        assert_eq!(store.load().unwrap(), Vec::new());
    }

    #[test]
    fn startup_loads_saved_widgets() {
        let (_dir, store) = store();
        store
            .save(&[WidgetDescriptor::new(51.5, -0.12, "London")])
            .unwrap();

        let state = initial_state(&store, true).unwrap();

        assert_eq!(state.widgets, vec![WidgetDescriptor::new(51.5, -0.12, "London")]);
        assert!(state.geolocate);
        assert_eq!(state.error, None);
    }

    #[test]
    fn startup_with_corrupt_file_starts_empty_with_banner() {
        let (_dir, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{\"widgets\": oops").unwrap();

        let state = initial_state(&store, true).unwrap();

        assert!(state.widgets.is_empty());
        assert!(!state.geolocate);
        let Some(BoardError::Storage(message)) = &state.error else {
            panic!("expected a storage error, got {:?}", state.error);
        };
        assert!(message.contains("corrupted"), "{message}");
        assert!(message.contains("widgets.json.corrupt"), "{message}");
        assert!(state.shake_ticks_remaining > 0);
        assert!(!store.path().exists());
    }

    #[test]
    fn startup_with_unreadable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the file should be cannot be read as text
        let store = WidgetStore::new(dir.path());

        assert!(matches!(
            initial_state(&store, true),
            Err(StorageError::Io { .. })
        ));
    }

    #[test]
    fn failed_save_becomes_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();
        let store = WidgetStore::new(blocker.join("widgets.json"));

        let err = store
            .persist(&[WidgetDescriptor::new(1.0, 2.0, "Somewhere")])
            .unwrap_err();

        assert!(matches!(err, BoardError::Storage(_)));
        assert_eq!(err.kind(), "Storage error");
        assert!(err.to_string().contains("failed to access"), "{err}");
    }
}
