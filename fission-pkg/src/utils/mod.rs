//! Utility functions for naming.

mod naming;

pub use naming::generate_package_name;
