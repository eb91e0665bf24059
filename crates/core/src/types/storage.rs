//! Where an uploaded file's bytes live.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Storage strategy that produced a file reference.
///
/// The two strategies are mutually exclusive for a single upload and the
/// retrieval side never mixes them within one lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// Uploaded to Shopify Files; only the platform id and URL are kept.
    #[default]
    Shopify,
    /// Held in this process' blob store; lost on restart.
    Memory,
}

impl StorageKind {
    /// Stable label written into draft-order attributes and API responses.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Shopify => "shopify",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageKind {
    type Err = String;

    /// Accepts the current labels plus the `platform` and `local` spellings
    /// found on quotes created by earlier releases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shopify" | "platform" => Ok(Self::Shopify),
            "memory" | "local" => Ok(Self::Memory),
            other => Err(format!("unknown storage kind: {other}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(StorageKind::Shopify.as_str(), "shopify");
        assert_eq!(StorageKind::Memory.to_string(), "memory");
    }

    #[test]
    fn test_parse_legacy_labels() {
        assert_eq!("local".parse::<StorageKind>().unwrap(), StorageKind::Memory);
        assert_eq!(
            "Platform".parse::<StorageKind>().unwrap(),
            StorageKind::Shopify
        );
        assert!("s3".parse::<StorageKind>().is_err());
    }

    #[test]
    fn test_serde() {
        assert_eq!(
            serde_json::to_string(&StorageKind::Memory).unwrap(),
            "\"memory\""
        );
    }
}
