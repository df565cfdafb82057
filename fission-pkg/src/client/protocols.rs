//! Protocol traits for the remote services.
//!
//! These traits define the seams between package orchestration and the
//! network, allowing the HTTP clients to be swapped for in-memory doubles.

use async_trait::async_trait;

use crate::core::{ObjectMeta, Package};
use crate::errors::PackageError;

/// Protocol for the control-plane package API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PackageApi: Send + Sync {
    /// Stores a new package and returns the identity assigned by the server.
    async fn package_create(&self, package: &Package) -> Result<ObjectMeta, PackageError>;

    /// Fetches a package by name and namespace.
    async fn package_get(&self, metadata: &ObjectMeta) -> Result<Package, PackageError>;

    /// Lists all packages.
    async fn package_list(&self) -> Result<Vec<Package>, PackageError>;

    /// Deletes a package by name and namespace.
    async fn package_delete(&self, metadata: &ObjectMeta) -> Result<(), PackageError>;
}

/// Protocol for the blob storage service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Uploads `content` under `file_name` and returns the storage identifier.
    async fn upload(&self, file_name: &str, content: Vec<u8>) -> Result<String, PackageError>;

    /// Derives the retrieval URL for a storage identifier.
    fn archive_url(&self, id: &str) -> String;
}
