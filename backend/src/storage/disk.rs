use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{validate_key, ContentStore, StorageError};

/// Filesystem-backed store rooted at a base directory.
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    /// Create the store, making the root directory if necessary.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(DiskStore { root })
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

impl ContentStore for DiskStore {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.key_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes)?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.key_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.key_path(key)?.is_file())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let dir = self.key_path(prefix)?;
        let mut keys = Vec::new();
        if dir.is_dir() {
            collect_files(&dir, &self.root, &mut keys)?;
        }
        keys.sort();
        Ok(keys)
    }
}

fn collect_files(dir: &Path, root: &Path, keys: &mut Vec<String>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, root, keys)?;
        } else if let Ok(rel) = path.strip_prefix(root) {
            let key = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            keys.push(key);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (DiskStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path().join("store")).unwrap();
        (store, dir)
    }

    #[test]
    fn put_get_round_trip() {
        let (store, _dir) = temp_store();
        store.put("templates/cert.png", b"image bytes").unwrap();
        assert_eq!(store.get("templates/cert.png").unwrap(), b"image bytes");
    }

    #[test]
    fn put_overwrites_on_same_key() {
        let (store, _dir) = temp_store();
        store.put("templates/cert.png", b"first").unwrap();
        store.put("templates/cert.png", b"second").unwrap();
        assert_eq!(store.get("templates/cert.png").unwrap(), b"second");
    }

    #[test]
    fn get_missing_is_not_found() {
        let (store, _dir) = temp_store();
        assert!(matches!(
            store.get("templates/absent.png"),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn exists_reports_files_only() {
        let (store, _dir) = temp_store();
        store.put("docs/batch/a.json", b"{}").unwrap();
        assert!(store.exists("docs/batch/a.json").unwrap());
        assert!(!store.exists("docs/batch/b.json").unwrap());
        // A directory is not an entry.
        assert!(!store.exists("docs/batch").unwrap());
    }

    #[test]
    fn list_walks_nested_keys_sorted() {
        let (store, _dir) = temp_store();
        store.put("docs/batch/b.html", b"b").unwrap();
        store.put("docs/batch/a.html", b"a").unwrap();
        store.put("docs/batch/sub/c.png", b"c").unwrap();
        store.put("docs/other/d.html", b"d").unwrap();

        let keys = store.list("docs/batch").unwrap();
        assert_eq!(
            keys,
            vec![
                "docs/batch/a.html",
                "docs/batch/b.html",
                "docs/batch/sub/c.png"
            ]
        );
    }

    #[test]
    fn list_missing_prefix_is_empty() {
        let (store, _dir) = temp_store();
        assert!(store.list("docs/none").unwrap().is_empty());
    }

    #[test]
    fn traversal_keys_are_rejected() {
        let (store, dir) = temp_store();
        assert!(matches!(
            store.put("../escape.txt", b"x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            store.get("../../etc/passwd"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(!dir.path().join("escape.txt").exists());
    }
}
