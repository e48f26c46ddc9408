//! Mock blob store for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::blob_store::{BlobObject, BlobStore, BlobStoreError};

/// Mock in-memory implementation of the BlobStore trait.
#[derive(Default)]
pub struct MockBlobStore {
    base_url: String,
    objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
    fail_deletes: Mutex<bool>,
}

impl MockBlobStore {
    /// Create a new mock blob store serving URLs under `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            objects: Mutex::new(HashMap::new()),
            fail_deletes: Mutex::new(false),
        }
    }

    /// Make every `delete_prefix` call fail.
    pub fn set_fail_deletes(&self, fail: bool) {
        *self.fail_deletes.lock().unwrap() = fail;
    }

    /// Bytes stored at a path, if any.
    pub fn object(&self, path: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(path)
            .map(|(bytes, _)| bytes.clone())
    }

    /// Content type recorded for a path, if any.
    pub fn content_type(&self, path: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(path)
            .map(|(_, ct)| ct.clone())
    }

    /// Total number of stored objects.
    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl BlobStore for MockBlobStore {
    fn name(&self) -> &str {
        "mock"
    }

    async fn put(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), BlobStoreError> {
        self.objects.lock().unwrap().insert(
            path.trim_matches('/').to_string(),
            (bytes.to_vec(), content_type.to_string()),
        );
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<BlobObject>, BlobStoreError> {
        let prefix = prefix.trim_matches('/');
        let objects = self.objects.lock().unwrap();

        let mut listed: Vec<BlobObject> = objects
            .iter()
            .filter(|(path, _)| path.starts_with(prefix))
            .map(|(path, (bytes, _))| BlobObject {
                path: path.clone(),
                size_bytes: bytes.len() as u64,
                modified_at: Utc::now(),
            })
            .collect();
        listed.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(listed)
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<u64, BlobStoreError> {
        if *self.fail_deletes.lock().unwrap() {
            return Err(BlobStoreError::Io {
                path: prefix.to_string(),
                source: std::io::Error::other("injected failure"),
            });
        }

        let prefix = prefix.trim_matches('/').to_string();
        let mut objects = self.objects.lock().unwrap();
        let before = objects.len();
        objects.retain(|path, _| !path.starts_with(&prefix));
        Ok((before - objects.len()) as u64)
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_matches('/'))
    }

    fn folder_url(&self, prefix: &str) -> String {
        format!("{}/{}/", self.base_url, prefix.trim_matches('/'))
    }
}
