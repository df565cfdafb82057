//! # fission-pkg
//!
//! Client helpers for registering deployable packages with a Fission
//! control plane.
//!
//! The crate covers the client side of package creation:
//!
//! - **Archives**: small files are embedded inline, large files are uploaded
//!   to the storage service and referenced by URL with a SHA-256 checksum
//! - **Packages**: environment reference, source/deployment archives, build
//!   command and an initial build status
//! - **Clients**: reqwest-backed control-plane and storage clients behind
//!   swappable traits
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fission_pkg::prelude::*;
//!
//! let config = ClientConfig::resolve(Some("controller.fission:8888"));
//! let controller = resolve_client(&config)?;
//! let storage = controller.storage_client()?;
//! let builder = ArchiveBuilder::new(&storage);
//!
//! let request = CreatePackageRequest::new("nodejs").with_deployment("hello.js");
//! let submission = create_package(&controller, &builder, &request).await?;
//! println!("package '{}' created", submission.metadata.name);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod client;
pub mod config;
pub mod core;
pub mod errors;
pub mod package;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::client::{
        resolve_client, ControllerClient, PackageApi, StorageClient, StorageServiceClient,
    };
    pub use crate::config::{normalize_server_url, ClientConfig, SERVER_URL_ENV};
    pub use crate::core::{
        Archive, ArchiveKind, BuildStatus, Checksum, EnvironmentReference, ObjectMeta, Package,
        PackageSpec, ARCHIVE_LITERAL_SIZE_LIMIT,
    };
    pub use crate::errors::PackageError;
    pub use crate::package::{
        create_package, ArchiveBuilder, CreatePackageRequest, PackageSubmission,
    };
}
