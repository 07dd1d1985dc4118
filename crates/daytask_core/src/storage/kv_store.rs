use crate::error::AppError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

const STORE_DIR_ENV_VAR: &str = "DAYTASK_STORE_DIR";

/// Raw persistent key-value storage. Implementations report failures;
/// the `read_json`/`write_json` helpers decide what to do with them.
pub trait KeyValueStore {
    fn read_raw(&self, key: &str) -> Result<Option<String>, AppError>;
    fn write_raw(&self, key: &str, value: &str) -> Result<(), AppError>;
    fn remove_raw(&self, key: &str) -> Result<(), AppError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn read_raw(&self, key: &str) -> Result<Option<String>, AppError> {
        (**self).read_raw(key)
    }

    fn write_raw(&self, key: &str, value: &str) -> Result<(), AppError> {
        (**self).write_raw(key, value)
    }

    fn remove_raw(&self, key: &str) -> Result<(), AppError> {
        (**self).remove_raw(key)
    }
}

/// Reads and deserializes a stored value, failing closed: an absent
/// key, an unreadable store, or corrupt data all yield `default`. The
/// failure is logged and never reaches the caller.
pub fn read_json<S, T>(store: &S, key: &str, default: T) -> T
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    match store.read_raw(key) {
        Ok(Some(content)) => match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = %err, "stored value is not valid JSON, using default");
                default
            }
        },
        Ok(None) => default,
        Err(err) => {
            tracing::warn!(key, error = %err, "store read failed, using default");
            default
        }
    }
}

/// Serializes and stores a value, best-effort: failures are logged and
/// swallowed. The in-memory value stays authoritative either way.
pub fn write_json<S, T>(store: &S, key: &str, value: &T)
where
    S: KeyValueStore + ?Sized,
    T: Serialize,
{
    let content = match serde_json::to_string_pretty(value) {
        Ok(content) => content,
        Err(err) => {
            tracing::warn!(key, error = %err, "failed to serialize value, skipping write");
            return;
        }
    };

    if let Err(err) = store.write_raw(key, &content) {
        tracing::warn!(key, error = %err, "store write failed, keeping in-memory value");
    }
}

/// Best-effort removal of a stored key.
pub fn remove<S: KeyValueStore + ?Sized>(store: &S, key: &str) {
    if let Err(err) = store.remove_raw(key) {
        tracing::warn!(key, error = %err, "store remove failed");
    }
}

/// File-backed store: each key lives in its own JSON file under the
/// store directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolves the store directory from `DAYTASK_STORE_DIR`, falling
    /// back to the platform config directory.
    pub fn open_default() -> Result<Self, AppError> {
        Ok(Self::new(store_dir()?))
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn store_dir() -> Result<PathBuf, AppError> {
    if let Ok(dir) = std::env::var(STORE_DIR_ENV_VAR)
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::storage("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("daytask"))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::storage("HOME is not set"))?;
        Ok(PathBuf::from(home).join(".config").join("daytask"))
    }
}

impl KeyValueStore for JsonFileStore {
    fn read_raw(&self, key: &str) -> Result<Option<String>, AppError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }

        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|err| AppError::storage(format!("{}: {}", path.display(), err)))
    }

    fn write_raw(&self, key: &str, value: &str) -> Result<(), AppError> {
        let path = self.key_path(key);
        std::fs::create_dir_all(&self.dir).map_err(|err| AppError::storage(err.to_string()))?;
        std::fs::write(&path, value)
            .map_err(|err| AppError::storage(format!("{}: {}", path.display(), err)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&path, permissions)
                .map_err(|err| AppError::storage(err.to_string()))?;
        }

        Ok(())
    }

    fn remove_raw(&self, key: &str) -> Result<(), AppError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(());
        }
        std::fs::remove_file(&path)
            .map_err(|err| AppError::storage(format!("{}: {}", path.display(), err)))
    }
}

/// In-memory store for tests and contexts where no persistent store is
/// available. Single-threaded by design, like everything else here.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read_raw(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write_raw(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_raw(&self, key: &str) -> Result<(), AppError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
