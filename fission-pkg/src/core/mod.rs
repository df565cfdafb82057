//! Core domain model types for fission-pkg.
//!
//! This module contains the records exchanged with the control plane:
//! - Archive descriptors and checksums
//! - Package specs, statuses and object metadata

mod archive;
mod package;

pub use archive::{Archive, ArchiveKind, Checksum, ChecksumKind, ARCHIVE_LITERAL_SIZE_LIMIT};
pub use package::{
    BuildStatus, EnvironmentReference, ObjectMeta, Package, PackageSpec, PackageStatus,
    DEFAULT_NAMESPACE,
};
