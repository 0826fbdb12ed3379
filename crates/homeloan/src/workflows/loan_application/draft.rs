use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;
use tracing::debug;

use super::domain::ApplicationForm;

/// Fixed namespace of the single in-progress application draft.
pub const DRAFT_KEY: &str = "homeloan.application.draft";

/// Persistent key-value storage holding JSON drafts across restarts.
pub trait DraftStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<Value>, DraftStoreError>;
    fn write(&self, key: &str, value: &Value) -> Result<(), DraftStoreError>;
    fn delete(&self, key: &str) -> Result<(), DraftStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DraftStoreError {
    #[error("draft storage io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("draft is not valid json: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("draft storage unavailable: {0}")]
    Unavailable(String),
}

/// JSON snapshot of the aggregate with the email field removed.
pub fn snapshot(form: &ApplicationForm) -> Result<Value, DraftStoreError> {
    let mut value = serde_json::to_value(form)?;
    strip_email(&mut value);
    Ok(value)
}

/// Overlay a stored draft onto `base`: draft keys win, keys absent from the draft keep the
/// base value, and any email carried by the draft is ignored.
pub fn merge_draft(
    base: &ApplicationForm,
    mut draft: Value,
) -> Result<ApplicationForm, DraftStoreError> {
    strip_email(&mut draft);
    let mut merged = serde_json::to_value(base)?;
    overlay(&mut merged, draft);
    Ok(serde_json::from_value(merged)?)
}

fn strip_email(value: &mut Value) {
    if let Some(contact) = value.get_mut("contact").and_then(Value::as_object_mut) {
        contact.remove("email");
    }
}

fn overlay(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                match target.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        overlay(existing, value)
                    }
                    _ => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, source) => *target = source,
    }
}

/// Draft store keeping one `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    root: PathBuf,
}

impl FileDraftStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|ch| {
                if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_') {
                    ch
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{file_name}.json"))
    }
}

impl DraftStore for FileDraftStore {
    fn read(&self, key: &str) -> Result<Option<Value>, DraftStoreError> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, key: &str, value: &Value) -> Result<(), DraftStoreError> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, serde_json::to_vec_pretty(value)?)?;
        fs::rename(&staging, &path)?;
        debug!(path = %path.display(), "draft written");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), DraftStoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Process-local draft store.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryDraftStore {
    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Value>>, DraftStoreError> {
        self.entries
            .lock()
            .map_err(|_| DraftStoreError::Unavailable("draft mutex poisoned".to_string()))
    }
}

impl DraftStore for MemoryDraftStore {
    fn read(&self, key: &str) -> Result<Option<Value>, DraftStoreError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &Value) -> Result<(), DraftStoreError> {
        self.entries()?.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), DraftStoreError> {
        self.entries()?.remove(key);
        Ok(())
    }
}
