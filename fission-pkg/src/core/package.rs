//! Package records exchanged with the control plane.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::archive::{deserialize_optional_archive, Archive};

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Build state of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    /// Waiting for the builder to compile the source archive.
    Pending,
    /// The builder is compiling the source archive.
    Running,
    /// The deployment archive is ready to run.
    Succeeded,
    /// The build failed; see the build log.
    Failed,
    /// No status reported.
    #[default]
    #[serde(other)]
    None,
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
            Self::None => write!(f, "none"),
        }
    }
}

impl BuildStatus {
    /// Returns the initial status for a package: pending when a source
    /// archive must still be built, succeeded otherwise.
    #[must_use]
    pub fn initial(has_source: bool) -> Self {
        if has_source {
            Self::Pending
        } else {
            Self::Succeeded
        }
    }

    /// Returns true once the builder can no longer change the status.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Reference to the environment a package runs in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentReference {
    /// Environment namespace.
    pub namespace: String,
    /// Environment name.
    pub name: String,
}

impl EnvironmentReference {
    /// Creates a reference in the given namespace.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

/// What a package contains and how it is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSpec {
    /// The environment the package targets.
    pub environment: EnvironmentReference,
    /// Source archive to be compiled by the builder.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_archive"
    )]
    pub source: Option<Archive>,
    /// Deployment archive, runnable as-is.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_archive"
    )]
    pub deployment: Option<Archive>,
    /// Custom build command for the builder.
    #[serde(
        rename = "buildcmd",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_non_empty"
    )]
    pub build_command: Option<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}

impl PackageSpec {
    /// Creates a spec with no archives.
    #[must_use]
    pub fn new(environment: EnvironmentReference) -> Self {
        Self {
            environment,
            source: None,
            deployment: None,
            build_command: None,
            description: String::new(),
        }
    }

    /// Sets the source archive.
    #[must_use]
    pub fn with_source(mut self, archive: Archive) -> Self {
        self.source = Some(archive);
        self
    }

    /// Sets the deployment archive.
    #[must_use]
    pub fn with_deployment(mut self, archive: Archive) -> Self {
        self.deployment = Some(archive);
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

    /// Whether the spec carries any archive at all.
    #[must_use]
    pub fn has_archive(&self) -> bool {
        self.source.is_some() || self.deployment.is_some()
    }
}

/// Build progress reported by the control plane.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageStatus {
    /// Current build status.
    #[serde(rename = "buildstatus", default)]
    pub build_status: BuildStatus,
    /// Builder output, if any.
    #[serde(rename = "buildlog", default, skip_serializing_if = "String::is_empty")]
    pub build_log: String,
}

/// Identity of a stored object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Object name.
    pub name: String,
    /// Object namespace.
    #[serde(default)]
    pub namespace: String,
    /// Server-side version, used for optimistic updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    /// Server-assigned unique id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// When the server stored the object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
}

impl ObjectMeta {
    /// Creates metadata with a name and namespace.
    #[must_use]
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Self::default()
        }
    }
}

/// A package record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Identity.
    pub metadata: ObjectMeta,
    /// Contents.
    pub spec: PackageSpec,
    /// Build state.
    #[serde(default)]
    pub status: PackageStatus,
}

impl Package {
    /// Creates a package with the given initial build status.
    #[must_use]
    pub fn new(metadata: ObjectMeta, spec: PackageSpec, build_status: BuildStatus) -> Self {
        Self {
            metadata,
            spec,
            status: PackageStatus {
                build_status,
                build_log: String::new(),
            },
        }
    }
}

fn deserialize_non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
