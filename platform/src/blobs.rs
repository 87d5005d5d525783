//! Client for the platform's blob storage.
//!
//! Uploaded binaries live outside the datastore; entities only hold the
//! blob key and a serving URL. Upload URLs point at the application
//! route that accepts the multipart POST, and serving URLs resolve
//! through the application's blob route.

use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Clone)]
pub struct Blob {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub struct BlobStore {
    inner: RwLock<Table>,
}

struct Table {
    blobs: HashMap<String, Blob>,
    next_serial: u64,
}

impl BlobStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Table {
                blobs: HashMap::new(),
                next_serial: 1,
            }),
        }
    }

    /// Where a multipart upload form should POST to land in this store.
    pub fn create_upload_url(&self, success_path: &str) -> String {
        success_path.to_string()
    }

    pub fn save(&self, content_type: &str, bytes: Vec<u8>) -> String {
        let mut table = self.inner.write().unwrap();

        let blob_key = format!("blob-{}", table.next_serial);
        table.next_serial += 1;

        table.blobs.insert(
            blob_key.clone(),
            Blob {
                content_type: content_type.to_string(),
                bytes,
            },
        );

        blob_key
    }

    pub fn serving_url(&self, blob_key: &str) -> String {
        format!("/blob/{blob_key}")
    }

    pub fn get(&self, blob_key: &str) -> Option<Blob> {
        let table = self.inner.read().unwrap();
        table.blobs.get(blob_key).cloned()
    }

    pub fn delete(&self, blob_key: &str) -> bool {
        let mut table = self.inner.write().unwrap();
        table.blobs.remove(blob_key).is_some()
    }
}

impl Default for BlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_serve() {
        let blobs = BlobStore::new();
        let key = blobs.save("image/png", vec![1, 2, 3]);

        assert_eq!(blobs.serving_url(&key), format!("/blob/{key}"));
        let blob = blobs.get(&key).unwrap();
        assert_eq!(blob.content_type, "image/png");
        assert_eq!(blob.bytes, vec![1, 2, 3]);
    }

    #[test]
    fn delete_removes_the_blob() {
        let blobs = BlobStore::new();
        let key = blobs.save("image/gif", vec![0]);

        assert!(blobs.delete(&key));
        assert!(!blobs.delete(&key));
        assert!(blobs.get(&key).is_none());
    }
}
