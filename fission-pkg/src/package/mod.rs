//! Package creation workflow.
//!
//! Local files become [`Archive`](crate::core::Archive)s through the
//! [`ArchiveBuilder`], which are assembled into a package and submitted with
//! [`create_package`].

mod builder;
mod submit;

pub use builder::ArchiveBuilder;
pub use submit::{
    create_package, CreatePackageRequest, PackageSubmission, DEPLOYMENT_OVERWRITE_NOTICE,
};
