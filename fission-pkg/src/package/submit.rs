//! Package creation: archives, build status and submission.

use std::path::{Path, PathBuf};

use super::builder::ArchiveBuilder;
use crate::client::PackageApi;
use crate::core::{
    BuildStatus, EnvironmentReference, ObjectMeta, Package, PackageSpec, DEFAULT_NAMESPACE,
};
use crate::errors::PackageError;
use crate::utils::generate_package_name;

/// Notice shown when a deployment archive may be replaced by a source build.
pub const DEPLOYMENT_OVERWRITE_NOTICE: &str =
    "Deployment may be overwritten by builder manager after source package compilation";

/// Parameters for creating a package.
#[derive(Debug, Clone, Default)]
pub struct CreatePackageRequest {
    /// Name of the environment the package runs in.
    pub environment: String,
    /// Namespace for the package and environment reference.
    pub namespace: String,
    /// Source file to be built by the builder.
    pub source: Option<PathBuf>,
    /// Deployment file, runnable as-is.
    pub deployment: Option<PathBuf>,
    /// Custom build command.
    pub build_command: Option<String>,
    /// Free-text description.
    pub description: String,
}

impl CreatePackageRequest {
    /// Creates a request for `environment` in the default namespace.
    #[must_use]
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            ..Self::default()
        }
    }

    /// Sets the namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the source file; empty paths are ignored.
    #[must_use]
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = non_empty_path(path.into());
        self
    }

    /// Sets the deployment file; empty paths are ignored.
    #[must_use]
    pub fn with_deployment(mut self, path: impl Into<PathBuf>) -> Self {
        self.deployment = non_empty_path(path.into());
        self
    }

    /// Sets the build command; empty commands are ignored.
    #[must_use]
    pub fn with_build_command(mut self, command: impl Into<String>) -> Self {
        let command = command.into();
        self.build_command = (!command.is_empty()).then_some(command);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether a source build may later replace the deployment archive,
    /// i.e. both a source and a deployment file are given.
    #[must_use]
    pub fn deployment_may_be_overwritten(&self) -> bool {
        self.deployment_path().is_some() && self.source_path().is_some()
    }

    fn source_path(&self) -> Option<&Path> {
        self.source.as_deref().filter(|p| !p.as_os_str().is_empty())
    }

    fn deployment_path(&self) -> Option<&Path> {
        self.deployment.as_deref().filter(|p| !p.as_os_str().is_empty())
    }
}

fn non_empty_path(path: PathBuf) -> Option<PathBuf> {
    (!path.as_os_str().is_empty()).then_some(path)
}

/// Outcome of a successful package creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSubmission {
    /// Identity returned by the control plane.
    pub metadata: ObjectMeta,
    /// Build status the package was submitted with.
    pub build_status: BuildStatus,
    /// Whether a pending source build may later replace the deployment archive.
    pub deployment_may_be_overwritten: bool,
}

/// Builds the archives named in `request`, decides the build status and
/// submits the package.
///
/// The deployment archive is built before the source archive. A package with
/// a source archive is submitted as pending, otherwise as succeeded. Nothing
/// is cleaned up if submission fails after an upload.
pub async fn create_package(
    api: &dyn PackageApi,
    builder: &ArchiveBuilder<'_>,
    request: &CreatePackageRequest,
) -> Result<PackageSubmission, PackageError> {
    let namespace = if request.namespace.is_empty() {
        DEFAULT_NAMESPACE
    } else {
        request.namespace.as_str()
    };

    let mut spec = PackageSpec::new(EnvironmentReference::new(namespace, &request.environment))
        .with_description(request.description.clone());

    let both_given = request.deployment_may_be_overwritten();

    if let Some(path) = request.deployment_path() {
        spec = spec.with_deployment(builder.build(path).await?);
        if both_given {
            tracing::info!("{DEPLOYMENT_OVERWRITE_NOTICE}");
        }
    }
    if let Some(path) = request.source_path() {
        spec = spec.with_source(builder.build(path).await?);
    }
    if let Some(command) = &request.build_command {
        spec = spec.with_build_command(command.clone());
    }

    let build_status = BuildStatus::initial(spec.source.is_some());
    let package = Package::new(
        ObjectMeta::new(generate_package_name(), namespace),
        spec,
        build_status,
    );

    let metadata = api.package_create(&package).await?;
    tracing::info!(
        package = %metadata.name,
        namespace = %metadata.namespace,
        environment = %request.environment,
        %build_status,
        "Package created"
    );

    Ok(PackageSubmission {
        metadata,
        build_status,
        deployment_may_be_overwritten: both_given,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MockPackageApi, MockStorageClient};
    use crate::core::{Archive, ArchiveKind, Checksum};
    use crate::testing::{InMemoryStorage, RecordingPackageApi};
    use pretty_assertions::assert_eq;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_hello_literal_deployment_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "hello.txt", b"hello-fission");
        let storage = InMemoryStorage::new("http://s");
        let api = RecordingPackageApi::new();
        let builder = ArchiveBuilder::new(&storage);

        let request = CreatePackageRequest::new("nodejs")
            .with_deployment(&path)
            .with_description("hello");
        let submission = create_package(&api, &builder, &request).await.unwrap();

        assert_eq!(submission.build_status, BuildStatus::Succeeded);
        assert!(!submission.deployment_may_be_overwritten);

        let created = api.created();
        assert_eq!(created.len(), 1);
        let pkg = &created[0];
        assert_eq!(pkg.status.build_status, BuildStatus::Succeeded);
        assert_eq!(pkg.spec.deployment, Some(Archive::literal(b"hello-fission".to_vec())));
        assert_eq!(pkg.spec.source, None);
        assert_eq!(pkg.spec.environment, EnvironmentReference::new("default", "nodejs"));
        assert_eq!(pkg.spec.description, "hello");
        assert_eq!(pkg.metadata.name, submission.metadata.name);
        assert_eq!(pkg.metadata.name, pkg.metadata.name.to_lowercase());
        assert!(storage.uploaded_files().is_empty());
    }

    #[tokio::test]
    async fn test_source_makes_build_pending() {
        let dir = tempfile::tempdir().unwrap();
        let src = write_file(&dir, "src.zip", b"package main");
        let storage = InMemoryStorage::new("http://s");
        let api = RecordingPackageApi::new();
        let builder = ArchiveBuilder::new(&storage);

        let request = CreatePackageRequest::new("go")
            .with_source(&src)
            .with_build_command("./build.sh");
        let submission = create_package(&api, &builder, &request).await.unwrap();

        assert_eq!(submission.build_status, BuildStatus::Pending);
        let pkg = &api.created()[0];
        assert_eq!(pkg.status.build_status, BuildStatus::Pending);
        assert_eq!(pkg.spec.build_command.as_deref(), Some("./build.sh"));
        assert!(pkg.spec.deployment.is_none());
    }

    #[tokio::test]
    async fn test_source_and_deployment_flags_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let src = write_file(&dir, "src.zip", b"source-bytes");
        let deploy = write_file(&dir, "deploy.zip", b"deploy-bytes");
        let storage = InMemoryStorage::new("http://s");
        let api = RecordingPackageApi::new();
        let builder = ArchiveBuilder::new(&storage).with_literal_size_limit(4);

        let request = CreatePackageRequest::new("python")
            .with_source(&src)
            .with_deployment(&deploy);
        let submission = create_package(&api, &builder, &request).await.unwrap();

        assert!(request.deployment_may_be_overwritten());
        assert!(submission.deployment_may_be_overwritten);
        assert_eq!(submission.build_status, BuildStatus::Pending);
        // Deployment is uploaded before source.
        assert_eq!(
            storage.uploaded_files(),
            vec!["deploy.zip".to_string(), "src.zip".to_string()]
        );

        let pkg = &api.created()[0];
        let (_, checksum) = pkg.spec.source.as_ref().unwrap().url_ref().unwrap();
        assert_eq!(checksum, &Checksum::sha256(b"source-bytes"));
        assert_eq!(pkg.spec.deployment.as_ref().unwrap().kind(), ArchiveKind::Url);
    }

    #[tokio::test]
    async fn test_empty_paths_are_absent() {
        let storage = InMemoryStorage::new("http://s");
        let api = RecordingPackageApi::new();
        let builder = ArchiveBuilder::new(&storage);

        let request = CreatePackageRequest::new("nodejs")
            .with_source("")
            .with_deployment("")
            .with_build_command("");
        let submission = create_package(&api, &builder, &request).await.unwrap();

        assert!(!request.deployment_may_be_overwritten());
        assert_eq!(submission.build_status, BuildStatus::Succeeded);
        let pkg = &api.created()[0];
        assert!(!pkg.spec.has_archive());
        assert!(pkg.spec.build_command.is_none());
    }

    #[tokio::test]
    async fn test_custom_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "f.js", b"module.exports = 1");
        let storage = InMemoryStorage::new("http://s");
        let api = RecordingPackageApi::new();
        let builder = ArchiveBuilder::new(&storage);

        let request = CreatePackageRequest::new("nodejs")
            .with_namespace("fission-function")
            .with_deployment(&path);
        let submission = create_package(&api, &builder, &request).await.unwrap();

        assert_eq!(submission.metadata.namespace, "fission-function");
        assert_eq!(api.created()[0].spec.environment.namespace, "fission-function");
    }

    #[tokio::test]
    async fn test_archive_failure_skips_submission() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MockStorageClient::new();
        let mut api = MockPackageApi::new();
        api.expect_package_create().never();
        let builder = ArchiveBuilder::new(&storage);

        let request =
            CreatePackageRequest::new("nodejs").with_deployment(dir.path().join("nope.js"));
        let err = create_package(&api, &builder, &request).await.unwrap_err();

        assert!(matches!(err, PackageError::Io { action: "stat", .. }));
    }

    #[tokio::test]
    async fn test_submission_error_after_upload() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "big.zip", b"0123456789");
        let storage = InMemoryStorage::new("http://s");
        let mut api = MockPackageApi::new();
        api.expect_package_create()
            .withf(|pkg| pkg.status.build_status == BuildStatus::Succeeded)
            .times(1)
            .returning(|_| Err(PackageError::api("create package", 500, "etcd unavailable")));
        let builder = ArchiveBuilder::new(&storage).with_literal_size_limit(1);

        let request = CreatePackageRequest::new("nodejs").with_deployment(&path);
        let err = create_package(&api, &builder, &request).await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to create package: HTTP 500: etcd unavailable");
        // The uploaded blob is left behind.
        assert_eq!(storage.uploaded_files(), vec!["big.zip".to_string()]);
    }
}
