// Session-scoped key/value store
//
// One JSON document per key inside a per-session directory. The read path
// treats a malformed document as absence so callers never have to care how
// the bytes got corrupted.

use std::path::PathBuf;

use common::errors::SessionError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|source| SessionError::Init {
                path: dir.display().to_string(),
                source,
            })?;
        Ok(Self { dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", escape_key(key)))
    }

    /// Read the value stored under `key`. Absent keys and undecodable
    /// documents both yield `None`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SessionError> {
        let bytes = match fs::read(self.entry_path(key)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SessionError::Io {
                    key: key.to_string(),
                    source,
                })
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                debug!(key, error = %e, "discarding malformed session entry");
                Ok(None)
            }
        }
    }

    /// Serialize `value` and store it under `key`, overwriting silently.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), SessionError> {
        let bytes = serde_json::to_vec(value).map_err(|source| SessionError::Serialize {
            key: key.to_string(),
            source,
        })?;
        fs::write(self.entry_path(key), bytes)
            .await
            .map_err(|source| SessionError::Io {
                key: key.to_string(),
                source,
            })
    }

    /// Delete `key` if present; removing an absent key is a no-op.
    pub async fn remove(&self, key: &str) -> Result<(), SessionError> {
        match fs::remove_file(self.entry_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    /// Remove every entry in the store.
    pub async fn clear(&self) -> Result<(), SessionError> {
        let mut entries = fs::read_dir(&self.dir).await.map_err(SessionError::Clear)?;
        while let Some(entry) = entries.next_entry().await.map_err(SessionError::Clear)? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(&path).await.map_err(SessionError::Clear)?;
            }
        }
        Ok(())
    }
}

/// Keys are arbitrary strings; everything that could escape the store
/// directory is percent-style escaped. Escapes are always six hex digits
/// (enough for any scalar value), so the encoding stays prefix-free and two
/// distinct keys can never land on the same file.
fn escape_key(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c.to_string(),
            other => format!("%{:06x}", other as u32),
        })
        .collect()
}
