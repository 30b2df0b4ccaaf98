//! Single-record document with upsert semantics

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::Result;

/// At-most-one persisted record, overwritten on every `set`
///
/// Backs configuration that has exactly one active value, such as the
/// link-signing settings. There is no delete path; the record only ever
/// goes from absent to present and is then replaced in place.
pub struct SingleDoc<T> {
    path: PathBuf,
    value: RwLock<Option<T>>,
}

impl<T> SingleDoc<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Open a single-record file under `dir`
    pub fn open(dir: &Path, name: &str) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.json", name));

        let value = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            Some(serde_json::from_str(&raw)?)
        } else {
            None
        };

        Ok(Self {
            path,
            value: RwLock::new(value),
        })
    }

    /// Get the current record, if one has ever been set
    pub fn get(&self) -> Option<T> {
        let value = self.value.read().unwrap_or_else(|e| e.into_inner());
        value.clone()
    }

    /// Upsert the record, replacing any previous value
    pub fn set(&self, doc: T) -> Result<()> {
        let mut value = self.value.write().unwrap_or_else(|e| e.into_inner());
        let raw = serde_json::to_string_pretty(&doc)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        *value = Some(doc);
        Ok(())
    }
}
