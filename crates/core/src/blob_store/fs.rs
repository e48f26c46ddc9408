//! Filesystem blob store implementation.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::config::FsBlobStoreConfig;

use super::{BlobObject, BlobStore, BlobStoreError};

/// Filesystem-backed blob store rooted at a local directory.
pub struct FsBlobStore {
    config: FsBlobStoreConfig,
}

impl FsBlobStore {
    /// Creates a new filesystem blob store with the given configuration.
    pub fn new(config: FsBlobStoreConfig) -> Self {
        Self { config }
    }

    fn base_url(&self) -> &str {
        self.config.public_base_url.trim_end_matches('/')
    }

    /// Resolve an object path against the root, rejecting anything that
    /// could escape it.
    fn resolve(&self, path: &str) -> Result<PathBuf, BlobStoreError> {
        if path.starts_with('/') {
            return Err(BlobStoreError::InvalidPath(path.to_string()));
        }
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(BlobStoreError::InvalidPath(path.to_string()));
        }

        let relative = Path::new(trimmed);
        for component in relative.components() {
            match component {
                Component::Normal(_) => {}
                _ => return Err(BlobStoreError::InvalidPath(path.to_string())),
            }
        }

        Ok(self.config.root_dir.join(relative))
    }

    /// Recursively collect objects under a directory.
    async fn collect_objects(
        &self,
        dir: &Path,
        objects: &mut Vec<BlobObject>,
    ) -> Result<(), BlobStoreError> {
        let mut stack = vec![dir.to_path_buf()];

        while let Some(current) = stack.pop() {
            let mut entries = fs::read_dir(&current)
                .await
                .map_err(|e| BlobStoreError::io(&current.display().to_string(), e))?;

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| BlobStoreError::io(&current.display().to_string(), e))?
            {
                let entry_path = entry.path();
                let meta = entry
                    .metadata()
                    .await
                    .map_err(|e| BlobStoreError::io(&entry_path.display().to_string(), e))?;

                if meta.is_dir() {
                    stack.push(entry_path);
                    continue;
                }

                let relative = entry_path
                    .strip_prefix(&self.config.root_dir)
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
                    .unwrap_or_else(|_| entry_path.to_string_lossy().to_string());

                let modified_at: DateTime<Utc> = meta
                    .modified()
                    .map(DateTime::from)
                    .unwrap_or_else(|_| Utc::now());

                objects.push(BlobObject {
                    path: relative,
                    size_bytes: meta.len(),
                    modified_at,
                });
            }
        }

        objects.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(())
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    fn name(&self) -> &str {
        "fs"
    }

    async fn put(
        &self,
        path: &str,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<(), BlobStoreError> {
        let target = self.resolve(path)?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| BlobStoreError::io(path, e))?;
        }

        // Write to a sibling temp file, then rename. Readers never see a
        // half-written object.
        let tmp = target.with_extension("tmp-upload");
        let mut file = fs::File::create(&tmp)
            .await
            .map_err(|e| BlobStoreError::io(path, e))?;
        file.write_all(bytes)
            .await
            .map_err(|e| BlobStoreError::io(path, e))?;
        file.flush()
            .await
            .map_err(|e| BlobStoreError::io(path, e))?;
        drop(file);

        fs::rename(&tmp, &target)
            .await
            .map_err(|e| BlobStoreError::io(path, e))?;

        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<BlobObject>, BlobStoreError> {
        let dir = self.resolve(prefix)?;

        let mut objects = Vec::new();
        if dir.is_dir() {
            self.collect_objects(&dir, &mut objects).await?;
        }
        Ok(objects)
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<u64, BlobStoreError> {
        let dir = self.resolve(prefix)?;

        if !dir.is_dir() {
            return Ok(0);
        }

        let mut objects = Vec::new();
        self.collect_objects(&dir, &mut objects).await?;

        fs::remove_dir_all(&dir)
            .await
            .map_err(|e| BlobStoreError::io(prefix, e))?;

        Ok(objects.len() as u64)
    }

    fn object_url(&self, path: &str) -> String {
        let encoded: Vec<String> = path
            .trim_matches('/')
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}/{}", self.base_url(), encoded.join("/"))
    }

    fn folder_url(&self, prefix: &str) -> String {
        format!("{}/{}/", self.base_url(), prefix.trim_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store(temp: &TempDir) -> FsBlobStore {
        FsBlobStore::new(FsBlobStoreConfig {
            root_dir: temp.path().to_path_buf(),
            public_base_url: "http://localhost:8080/blobs".to_string(),
        })
    }

    #[tokio::test]
    async fn test_put_and_list() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);

        store
            .put("recordings/abc123/audio.mp3", b"mp3-bytes", "audio/mpeg")
            .await
            .unwrap();
        store
            .put(
                "recordings/abc123/screenshot_0s.jpg",
                b"jpg-bytes",
                "image/jpeg",
            )
            .await
            .unwrap();

        let objects = store.list("recordings/abc123/").await.unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].path, "recordings/abc123/audio.mp3");
        assert_eq!(objects[0].size_bytes, 9);
        assert_eq!(objects[1].path, "recordings/abc123/screenshot_0s.jpg");
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);

        store
            .put("recordings/a/audio.mp3", b"first", "audio/mpeg")
            .await
            .unwrap();
        store
            .put("recordings/a/audio.mp3", b"second-longer", "audio/mpeg")
            .await
            .unwrap();

        let objects = store.list("recordings/a").await.unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].size_bytes, 13);
    }

    #[tokio::test]
    async fn test_list_missing_prefix_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);

        let objects = store.list("recordings/nonexistent/").await.unwrap();
        assert!(objects.is_empty());
    }

    #[tokio::test]
    async fn test_delete_prefix() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);

        store
            .put("recordings/abc123/audio.mp3", b"a", "audio/mpeg")
            .await
            .unwrap();
        store
            .put("recordings/abc123/screenshot_0s.jpg", b"b", "image/jpeg")
            .await
            .unwrap();
        store
            .put("recordings/other/audio.mp3", b"c", "audio/mpeg")
            .await
            .unwrap();

        let removed = store.delete_prefix("recordings/abc123/").await.unwrap();
        assert_eq!(removed, 2);

        assert!(store.list("recordings/abc123/").await.unwrap().is_empty());
        assert_eq!(store.list("recordings/other/").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_prefix_removes_nothing() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);

        let removed = store.delete_prefix("recordings/nonexistent/").await.unwrap();
        assert_eq!(removed, 0);
    }

    #[tokio::test]
    async fn test_rejects_escaping_paths() {
        let temp = TempDir::new().unwrap();
        let store = create_test_store(&temp);

        let result = store.put("../outside.txt", b"x", "text/plain").await;
        assert!(matches!(result, Err(BlobStoreError::InvalidPath(_))));

        let result = store.put("/etc/passwd", b"x", "text/plain").await;
        assert!(matches!(result, Err(BlobStoreError::InvalidPath(_))));

        let result = store.list("recordings/../..").await;
        assert!(matches!(result, Err(BlobStoreError::InvalidPath(_))));
    }

    #[test]
    fn test_urls() {
        let store = FsBlobStore::new(FsBlobStoreConfig {
            root_dir: PathBuf::from("blobs"),
            public_base_url: "http://localhost:8080/blobs/".to_string(),
        });

        assert_eq!(
            store.folder_url("recordings/abc123/"),
            "http://localhost:8080/blobs/recordings/abc123/"
        );
        assert_eq!(
            store.object_url("recordings/abc123/screenshot 1.jpg"),
            "http://localhost:8080/blobs/recordings/abc123/screenshot%201.jpg"
        );
    }
}
