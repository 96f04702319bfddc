//! Cookie-file persistence.
//!
//! The cookie file is a JSON array of cookie objects at a fixed path. A
//! missing file is the expected empty state on first run, never an error.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use super::SessionCookie;

/// Errors reading or writing the cookie file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O failure other than the file simply not existing.
    #[error("failed to access cookie file {path}: {source}")]
    Io {
        /// Path of the cookie file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The cookie file exists but does not hold a valid cookie array.
    #[error("cookie file {path} is not a valid cookie array: {source}")]
    Malformed {
        /// Path of the cookie file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Loads and saves the session cookie collection at a fixed path.
#[derive(Debug, Clone)]
pub struct CookieStore {
    path: PathBuf,
}

impl CookieStore {
    /// Creates a store over the given cookie file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying cookie file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted cookie collection.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] for read failures other than absence, and
    /// [`StoreError::Malformed`] when the file is not a valid cookie array.
    pub fn load(&self) -> Result<Option<Vec<SessionCookie>>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no cookie file found");
                return Ok(None);
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let cookies: Vec<SessionCookie> =
            serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        info!(path = %self.path.display(), count = cookies.len(), "cookies loaded");
        Ok(Some(cookies))
    }

    /// Writes the cookie collection, overwriting any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the file cannot be written.
    pub fn save(&self, cookies: &[SessionCookie]) -> Result<(), StoreError> {
        let json = serde_json::to_vec(cookies).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), count = cookies.len(), "cookies saved");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_cookies() -> Vec<SessionCookie> {
        vec![
            SessionCookie::new(
                "sessionid".to_string(),
                "abc123".to_string(),
                ".portal.example".to_string(),
                "/".to_string(),
                4_102_444_800.0,
                true,
                true,
                Some("Lax".to_string()),
            ),
            SessionCookie::new(
                "locale".to_string(),
                "es-ES".to_string(),
                "portal.example".to_string(),
                "/app".to_string(),
                -1.0,
                false,
                false,
                None,
            ),
        ]
    }

    #[test]
    fn test_load_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        let store = CookieStore::new(dir.path().join("cookies.json"));
        let loaded = store.load().unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_then_load_round_trips_in_order() {
        let dir = TempDir::new().unwrap();
        let store = CookieStore::new(dir.path().join("cookies.json"));
        let cookies = sample_cookies();

        store.save(&cookies).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, cookies);
        assert_eq!(loaded[0].name, "sessionid");
        assert_eq!(loaded[1].name, "locale");
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let store = CookieStore::new(dir.path().join("cookies.json"));

        store.save(&sample_cookies()).unwrap();
        let replacement = vec![sample_cookies().remove(1)];
        store.save(&replacement).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "locale");
    }

    #[test]
    fn test_load_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cookies.json");
        std::fs::write(&path, "not json").unwrap();

        let store = CookieStore::new(&path);
        let result = store.load();
        assert!(matches!(result, Err(StoreError::Malformed { .. })));
    }

    #[test]
    fn test_save_empty_collection_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = CookieStore::new(dir.path().join("cookies.json"));
        store.save(&[]).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert!(loaded.is_empty());
    }
}
