//! Keyed document collection backed by a single JSON file

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::Result;

/// A collection of documents keyed by id
///
/// The whole collection lives in memory; every mutation rewrites the backing
/// file through a temp-file-then-rename so a crash never leaves a half-written
/// collection behind.
pub struct Collection<T> {
    path: PathBuf,
    items: RwLock<HashMap<String, T>>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Open a collection file under `dir`, creating the directory if needed
    ///
    /// # Arguments
    /// * `dir` - Data directory holding all collection files
    /// * `name` - Collection name; the file becomes `<dir>/<name>.json`
    pub fn open(dir: &Path, name: &str) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.json", name));

        let items = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            items: RwLock::new(items),
        })
    }

    /// Insert or replace a document
    pub fn insert(&self, id: &str, doc: T) -> Result<()> {
        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());
        items.insert(id.to_string(), doc);
        self.persist(&items)
    }

    /// Get a document by id
    pub fn get(&self, id: &str) -> Option<T> {
        let items = self.items.read().unwrap_or_else(|e| e.into_inner());
        items.get(id).cloned()
    }

    /// Find all documents matching a predicate
    pub fn find<F>(&self, pred: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        let items = self.items.read().unwrap_or_else(|e| e.into_inner());
        items.values().filter(|doc| pred(doc)).cloned().collect()
    }

    /// Find the first document matching a predicate
    pub fn find_one<F>(&self, pred: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        let items = self.items.read().unwrap_or_else(|e| e.into_inner());
        items.values().find(|doc| pred(doc)).cloned()
    }

    /// Apply a mutation to a document in place
    ///
    /// # Returns
    /// * `Ok(true)` if the document existed and was updated, `Ok(false)` otherwise
    pub fn modify<F>(&self, id: &str, f: F) -> Result<bool>
    where
        F: FnOnce(&mut T),
    {
        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());
        match items.get_mut(id) {
            Some(doc) => {
                f(doc);
                self.persist(&items)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Apply a mutation to every document matching a predicate
    ///
    /// # Returns
    /// * Number of documents modified
    pub fn modify_all<P, F>(&self, pred: P, f: F) -> Result<usize>
    where
        P: Fn(&T) -> bool,
        F: Fn(&mut T),
    {
        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());
        let mut changed = 0;
        for doc in items.values_mut() {
            if pred(doc) {
                f(doc);
                changed += 1;
            }
        }
        if changed > 0 {
            self.persist(&items)?;
        }
        Ok(changed)
    }

    /// Remove a document by id
    ///
    /// # Returns
    /// * `Ok(true)` if a document was removed
    pub fn remove(&self, id: &str) -> Result<bool> {
        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());
        let removed = items.remove(id).is_some();
        if removed {
            self.persist(&items)?;
        }
        Ok(removed)
    }

    /// Count documents matching a predicate
    pub fn count<F>(&self, pred: F) -> usize
    where
        F: Fn(&T) -> bool,
    {
        let items = self.items.read().unwrap_or_else(|e| e.into_inner());
        items.values().filter(|doc| pred(doc)).count()
    }

    /// Get count of all documents
    pub fn len(&self) -> usize {
        let items = self.items.read().unwrap_or_else(|e| e.into_inner());
        items.len()
    }

    /// Check whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn persist(&self, items: &HashMap<String, T>) -> Result<()> {
        let raw = serde_json::to_string_pretty(items)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Doc {
        id: String,
        value: i64,
    }

    fn doc(id: &str, value: i64) -> Doc {
        Doc {
            id: id.to_string(),
            value,
        }
    }

    #[test]
    fn test_insert_and_get() {
        let dir = tempdir().unwrap();
        let coll: Collection<Doc> = Collection::open(dir.path(), "docs").unwrap();

        coll.insert("a", doc("a", 1)).unwrap();
        assert_eq!(coll.get("a"), Some(doc("a", 1)));
        assert_eq!(coll.get("missing"), None);
        assert_eq!(coll.len(), 1);
    }

    #[test]
    fn test_insert_replaces() {
        let dir = tempdir().unwrap();
        let coll: Collection<Doc> = Collection::open(dir.path(), "docs").unwrap();

        coll.insert("a", doc("a", 1)).unwrap();
        coll.insert("a", doc("a", 2)).unwrap();
        assert_eq!(coll.get("a").unwrap().value, 2);
        assert_eq!(coll.len(), 1);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempdir().unwrap();
        {
            let coll: Collection<Doc> = Collection::open(dir.path(), "docs").unwrap();
            coll.insert("a", doc("a", 1)).unwrap();
            coll.insert("b", doc("b", 2)).unwrap();
        }

        let reopened: Collection<Doc> = Collection::open(dir.path(), "docs").unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.get("b").unwrap().value, 2);
    }

    #[test]
    fn test_find_and_find_one() {
        let dir = tempdir().unwrap();
        let coll: Collection<Doc> = Collection::open(dir.path(), "docs").unwrap();

        coll.insert("a", doc("a", 1)).unwrap();
        coll.insert("b", doc("b", 2)).unwrap();
        coll.insert("c", doc("c", 2)).unwrap();

        let twos = coll.find(|d| d.value == 2);
        assert_eq!(twos.len(), 2);

        assert!(coll.find_one(|d| d.id == "a").is_some());
        assert!(coll.find_one(|d| d.value == 99).is_none());
    }

    #[test]
    fn test_modify() {
        let dir = tempdir().unwrap();
        let coll: Collection<Doc> = Collection::open(dir.path(), "docs").unwrap();

        coll.insert("a", doc("a", 1)).unwrap();
        assert!(coll.modify("a", |d| d.value = 10).unwrap());
        assert_eq!(coll.get("a").unwrap().value, 10);

        assert!(!coll.modify("missing", |d| d.value = 10).unwrap());
    }

    #[test]
    fn test_modify_all() {
        let dir = tempdir().unwrap();
        let coll: Collection<Doc> = Collection::open(dir.path(), "docs").unwrap();

        coll.insert("a", doc("a", 1)).unwrap();
        coll.insert("b", doc("b", 1)).unwrap();
        coll.insert("c", doc("c", 5)).unwrap();

        let changed = coll.modify_all(|d| d.value == 1, |d| d.value = 0).unwrap();
        assert_eq!(changed, 2);
        assert_eq!(coll.count(|d| d.value == 0), 2);
        assert_eq!(coll.get("c").unwrap().value, 5);
    }

    #[test]
    fn test_remove() {
        let dir = tempdir().unwrap();
        let coll: Collection<Doc> = Collection::open(dir.path(), "docs").unwrap();

        coll.insert("a", doc("a", 1)).unwrap();
        assert!(coll.remove("a").unwrap());
        assert!(!coll.remove("a").unwrap());
        assert!(coll.is_empty());
    }

    #[test]
    fn test_open_empty_dir() {
        let dir = tempdir().unwrap();
        let coll: Collection<Doc> = Collection::open(&dir.path().join("nested"), "docs").unwrap();
        assert!(coll.is_empty());
    }
}
