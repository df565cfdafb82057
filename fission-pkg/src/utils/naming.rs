//! Package name generation.

use uuid::Uuid;

/// Generates a new package name from a random UUID v4.
///
/// Names are lowercase so they are valid object names on the control plane.
/// No collision check is made against existing packages.
#[must_use]
pub fn generate_package_name() -> String {
    Uuid::new_v4().hyphenated().to_string().to_lowercase()
}
