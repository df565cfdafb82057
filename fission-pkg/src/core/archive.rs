//! Archive descriptors: inline literal content or a checksummed URL.

use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::errors::PackageError;

/// Files strictly smaller than this many bytes are embedded in the package.
pub const ARCHIVE_LITERAL_SIZE_LIMIT: u64 = 256 * 1024;

/// The kind of archive representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveKind {
    /// Content embedded in the package record.
    Literal,
    /// Content held by the storage service and referenced by URL.
    Url,
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal => write!(f, "literal"),
            Self::Url => write!(f, "url"),
        }
    }
}

/// Hash algorithm used for a [`Checksum`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumKind {
    /// SHA-256, hex encoded.
    #[default]
    Sha256,
}

/// A content checksum recorded next to a URL archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksum {
    /// The hash algorithm.
    #[serde(rename = "type")]
    pub kind: ChecksumKind,
    /// Lowercase hex digest.
    pub sum: String,
}

impl Checksum {
    /// Computes the SHA-256 checksum of `bytes`.
    #[must_use]
    pub fn sha256(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self {
            kind: ChecksumKind::Sha256,
            sum: hex::encode(hasher.finalize()),
        }
    }

    /// Checks `bytes` against the recorded digest.
    pub fn verify(&self, bytes: &[u8]) -> Result<(), PackageError> {
        let actual = match self.kind {
            ChecksumKind::Sha256 => Self::sha256(bytes),
        };
        if actual.sum.eq_ignore_ascii_case(&self.sum) {
            Ok(())
        } else {
            Err(PackageError::InvalidArchive(format!(
                "checksum mismatch: expected {}, got {}",
                self.sum, actual.sum
            )))
        }
    }
}

/// A description of package content.
///
/// Exactly one representation is populated. Serialized with the control
/// plane's field names: `type`, `literal` (base64), `url` and `checksum`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireArchive", into = "WireArchive")]
pub enum Archive {
    /// Inline file content.
    Literal(Vec<u8>),
    /// Content stored elsewhere, addressed by URL.
    Url {
        /// Where the content can be fetched.
        url: String,
        /// Digest of the stored bytes.
        checksum: Checksum,
    },
}

impl Archive {
    /// Creates a literal archive.
    #[must_use]
    pub fn literal(content: impl Into<Vec<u8>>) -> Self {
        Self::Literal(content.into())
    }

    /// Creates a URL archive.
    #[must_use]
    pub fn url(url: impl Into<String>, checksum: Checksum) -> Self {
        Self::Url {
            url: url.into(),
            checksum,
        }
    }

    /// Returns the representation kind.
    #[must_use]
    pub fn kind(&self) -> ArchiveKind {
        match self {
            Self::Literal(_) => ArchiveKind::Literal,
            Self::Url { .. } => ArchiveKind::Url,
        }
    }

    /// Returns the embedded bytes for literal archives.
    #[must_use]
    pub fn literal_content(&self) -> Option<&[u8]> {
        match self {
            Self::Literal(content) => Some(content),
            Self::Url { .. } => None,
        }
    }

    /// Returns the URL and checksum for URL archives.
    #[must_use]
    pub fn url_ref(&self) -> Option<(&str, &Checksum)> {
        match self {
            Self::Literal(_) => None,
            Self::Url { url, checksum } => Some((url, checksum)),
        }
    }
}

/// On-the-wire archive shape. The control plane sends a zero-valued object
/// (empty `type`) for an absent archive.
#[derive(Debug, Default, Serialize, Deserialize)]
struct WireArchive {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "literal_base64")]
    literal: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    checksum: Option<WireChecksum>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct WireChecksum {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    sum: String,
}

impl WireArchive {
    fn is_empty(&self) -> bool {
        self.kind.is_empty()
    }
}

impl From<Archive> for WireArchive {
    fn from(archive: Archive) -> Self {
        match archive {
            Archive::Literal(content) => Self {
                kind: ArchiveKind::Literal.to_string(),
                literal: Some(content),
                ..Self::default()
            },
            Archive::Url { url, checksum } => Self {
                kind: ArchiveKind::Url.to_string(),
                url,
                checksum: Some(WireChecksum {
                    kind: "sha256".to_string(),
                    sum: checksum.sum,
                }),
                ..Self::default()
            },
        }
    }
}

impl TryFrom<WireArchive> for Archive {
    type Error = PackageError;

    fn try_from(wire: WireArchive) -> Result<Self, Self::Error> {
        match wire.kind.as_str() {
            "literal" => wire.literal.map(Self::Literal).ok_or_else(|| {
                PackageError::InvalidArchive("literal archive without content".to_string())
            }),
            "url" => {
                if wire.url.is_empty() {
                    return Err(PackageError::InvalidArchive(
                        "url archive without url".to_string(),
                    ));
                }
                let checksum = match wire.checksum {
                    Some(c) if c.kind.is_empty() || c.kind == "sha256" => Checksum {
                        kind: ChecksumKind::Sha256,
                        sum: c.sum,
                    },
                    Some(c) => {
                        return Err(PackageError::InvalidArchive(format!(
                            "unsupported checksum type '{}'",
                            c.kind
                        )))
                    }
                    None => {
                        return Err(PackageError::InvalidArchive(
                            "url archive without checksum".to_string(),
                        ))
                    }
                };
                Ok(Self::Url {
                    url: wire.url,
                    checksum,
                })
            }
            other => Err(PackageError::InvalidArchive(format!(
                "unknown archive type '{other}'"
            ))),
        }
    }
}

/// Deserializes an optional archive, mapping a zero-valued object to `None`.
pub(crate) fn deserialize_optional_archive<'de, D>(
    deserializer: D,
) -> Result<Option<Archive>, D::Error>
where
    D: Deserializer<'de>,
{
    let wire = Option::<WireArchive>::deserialize(deserializer)?;
    match wire {
        Some(wire) if !wire.is_empty() => Archive::try_from(wire)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

mod literal_base64 {
    use super::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|encoded| STANDARD.decode(encoded).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sha256_known_digest() {
        let checksum = Checksum::sha256(b"hello-fission");
        assert_eq!(checksum.kind, ChecksumKind::Sha256);
        assert_eq!(checksum.sum.len(), 64);
        assert_eq!(
            Checksum::sha256(b"").sum,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_checksum_verify() {
        let checksum = Checksum::sha256(b"payload");
        assert!(checksum.verify(b"payload").is_ok());

        let err = checksum.verify(b"tampered").unwrap_err();
        assert!(err.to_string().contains("checksum mismatch"));
    }

    #[test]
    fn test_literal_wire_form() {
        let archive = Archive::literal(b"hello-fission".to_vec());
        let json = serde_json::to_value(&archive).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"type": "literal", "literal": "aGVsbG8tZmlzc2lvbg=="})
        );
        let decoded: Archive = serde_json::from_value(json).unwrap();
        assert_eq!(decoded.literal_content(), Some(&b"hello-fission"[..]));
    }

    #[test]
    fn test_url_wire_form() {
        let archive = Archive::url(
            "http://controller/proxy/storage/v1/archive?id=abc",
            Checksum::sha256(b"big"),
        );
        let json = serde_json::to_value(&archive).unwrap();

        assert_eq!(json["type"], "url");
        assert_eq!(json["checksum"]["type"], "sha256");
        assert!(json.get("literal").is_none());
        assert_eq!(archive.kind(), ArchiveKind::Url);
    }

    #[test]
    fn test_rejects_malformed_archives() {
        let no_content = serde_json::json!({"type": "literal"});
        assert!(serde_json::from_value::<Archive>(no_content).is_err());

        let no_url = serde_json::json!({"type": "url", "checksum": {"type": "sha256", "sum": "00"}});
        assert!(serde_json::from_value::<Archive>(no_url).is_err());

        let bad_checksum = serde_json::json!({
            "type": "url",
            "url": "http://x",
            "checksum": {"type": "md5", "sum": "00"}
        });
        assert!(serde_json::from_value::<Archive>(bad_checksum).is_err());

        let unknown = serde_json::json!({"type": "tarball"});
        assert!(serde_json::from_value::<Archive>(unknown).is_err());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ArchiveKind::Literal.to_string(), "literal");
        assert_eq!(ArchiveKind::Url.to_string(), "url");
    }
}
