//! In-memory doubles for the service protocols.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::client::{PackageApi, StorageClient};
use crate::core::{ObjectMeta, Package};
use crate::errors::PackageError;

/// A storage service that keeps uploads in memory.
#[derive(Debug)]
pub struct InMemoryStorage {
    base_url: String,
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    uploads: Mutex<Vec<String>>,
    fail_with: Mutex<Option<String>>,
}

impl InMemoryStorage {
    /// Creates an empty store whose URLs start with `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            blobs: Mutex::new(HashMap::new()),
            uploads: Mutex::new(Vec::new()),
            fail_with: Mutex::new(None),
        }
    }

    /// Makes every following upload fail with a 500 carrying `body`.
    pub fn fail_uploads(&self, body: impl Into<String>) {
        *self.fail_with.lock() = Some(body.into());
    }

    /// Returns the stored bytes for an id.
    #[must_use]
    pub fn blob(&self, id: &str) -> Option<Vec<u8>> {
        self.blobs.lock().get(id).cloned()
    }

    /// Returns the file names uploaded so far, in order.
    #[must_use]
    pub fn uploaded_files(&self) -> Vec<String> {
        self.uploads.lock().clone()
    }
}

#[async_trait]
impl StorageClient for InMemoryStorage {
    async fn upload(&self, file_name: &str, content: Vec<u8>) -> Result<String, PackageError> {
        if let Some(body) = self.fail_with.lock().clone() {
            return Err(PackageError::api(format!("upload file {file_name}"), 500, body));
        }
        let mut uploads = self.uploads.lock();
        let id = format!("blob-{}", uploads.len() + 1);
        uploads.push(file_name.to_string());
        self.blobs.lock().insert(id.clone(), content);
        Ok(id)
    }

    fn archive_url(&self, id: &str) -> String {
        format!("{}/v1/archive?id={id}", self.base_url.trim_end_matches('/'))
    }
}

/// A package API that records submissions and serves them back.
#[derive(Debug, Default)]
pub struct RecordingPackageApi {
    packages: Mutex<Vec<Package>>,
    fail_with: Mutex<Option<(u16, String)>>,
}

impl RecordingPackageApi {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following call fail with the given status and body.
    pub fn fail_with(&self, status: u16, body: impl Into<String>) {
        *self.fail_with.lock() = Some((status, body.into()));
    }

    /// Returns the packages created so far.
    #[must_use]
    pub fn created(&self) -> Vec<Package> {
        self.packages.lock().clone()
    }

    /// Returns the number of packages created.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.packages.lock().len()
    }

    fn check(&self, action: &str) -> Result<(), PackageError> {
        match self.fail_with.lock().clone() {
            Some((status, body)) => Err(PackageError::api(action, status, body)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PackageApi for RecordingPackageApi {
    async fn package_create(&self, package: &Package) -> Result<ObjectMeta, PackageError> {
        self.check("create package")?;
        let mut packages = self.packages.lock();
        let mut metadata = package.metadata.clone();
        metadata.uid = Some(format!("uid-{}", packages.len() + 1));
        metadata.resource_version = Some("1".to_string());
        packages.push(Package {
            metadata: metadata.clone(),
            ..package.clone()
        });
        Ok(metadata)
    }

    async fn package_get(&self, metadata: &ObjectMeta) -> Result<Package, PackageError> {
        self.check("get package")?;
        self.packages
            .lock()
            .iter()
            .find(|p| p.metadata.name == metadata.name && p.metadata.namespace == metadata.namespace)
            .cloned()
            .ok_or_else(|| {
                PackageError::api("get package", 404, format!("package {} not found", metadata.name))
            })
    }

    async fn package_list(&self) -> Result<Vec<Package>, PackageError> {
        self.check("list packages")?;
        Ok(self.created())
    }

    async fn package_delete(&self, metadata: &ObjectMeta) -> Result<(), PackageError> {
        self.check("delete package")?;
        let mut packages = self.packages.lock();
        let before = packages.len();
        packages.retain(|p| {
            !(p.metadata.name == metadata.name && p.metadata.namespace == metadata.namespace)
        });
        if packages.len() == before {
            return Err(PackageError::api(
                "delete package",
                404,
                format!("package {} not found", metadata.name),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BuildStatus, EnvironmentReference, PackageSpec};

    #[tokio::test]
    async fn test_in_memory_storage_round_trip() {
        let storage = InMemoryStorage::new("http://store/");
        let id = storage.upload("a.zip", vec![1, 2, 3]).await.unwrap();

        assert_eq!(storage.blob(&id), Some(vec![1, 2, 3]));
        assert_eq!(storage.archive_url(&id), "http://store/v1/archive?id=blob-1");
        assert_eq!(storage.uploaded_files(), vec!["a.zip".to_string()]);
    }

    #[tokio::test]
    async fn test_recording_api_lifecycle() {
        let api = RecordingPackageApi::new();
        let pkg = Package::new(
            ObjectMeta::new("p", "default"),
            PackageSpec::new(EnvironmentReference::new("default", "go")),
            BuildStatus::Succeeded,
        );

        let meta = api.package_create(&pkg).await.unwrap();
        assert_eq!(meta.uid.as_deref(), Some("uid-1"));
        assert_eq!(api.package_get(&meta).await.unwrap().metadata.name, "p");
        assert_eq!(api.package_list().await.unwrap().len(), 1);

        api.package_delete(&meta).await.unwrap();
        assert!(api.package_get(&meta).await.is_err());
        assert!(api.package_delete(&meta).await.is_err());
    }

    #[tokio::test]
    async fn test_recording_api_failure_mode() {
        let api = RecordingPackageApi::new();
        api.fail_with(503, "unavailable");
        let err = api.package_list().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to list packages: HTTP 503: unavailable");
    }
}
