//! Application-level file identifiers.
//!
//! Every upload, whatever storage strategy handled it, is handed back to the
//! caller under a generated id of the form `file_<unix-millis>_<suffix>`.
//! Uniqueness is probabilistic: two ids collide only when they share a
//! millisecond and a nine character random suffix. The id is advisory and
//! must never be used as an access token.

use core::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Prefix shared by every generated file id.
pub const FILE_ID_PREFIX: &str = "file_";

/// Length of the random suffix.
const SUFFIX_LEN: usize = 9;

/// Errors that can occur when parsing a [`FileId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FileIdError {
    /// The input does not start with `file_`.
    #[error("file id must start with `file_`")]
    MissingPrefix,
    /// The timestamp segment is missing or not numeric.
    #[error("file id timestamp must be numeric")]
    InvalidTimestamp,
    /// The random suffix is missing or contains unexpected characters.
    #[error("file id suffix must be lowercase alphanumeric")]
    InvalidSuffix,
}

/// A generated application file id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    /// Generate a new id from the wall clock and the thread-local RNG.
    #[must_use]
    pub fn generate() -> Self {
        Self::generate_at(chrono::Utc::now().timestamp_millis(), &mut rand::rng())
    }

    /// Generate an id for a given timestamp using the supplied RNG.
    #[must_use]
    pub fn generate_at<R: Rng>(unix_millis: i64, rng: &mut R) -> Self {
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| char::from_digit(rng.random_range(0..36), 36).unwrap_or('0'))
            .collect();
        Self(format!("{FILE_ID_PREFIX}{unix_millis}_{suffix}"))
    }

    /// Parse a previously generated id.
    ///
    /// # Errors
    ///
    /// Returns an error when the input does not follow the
    /// `file_<digits>_<lowercase alphanumerics>` layout.
    pub fn parse(s: &str) -> Result<Self, FileIdError> {
        let rest = s
            .strip_prefix(FILE_ID_PREFIX)
            .ok_or(FileIdError::MissingPrefix)?;
        let (millis, suffix) = rest.split_once('_').ok_or(FileIdError::InvalidTimestamp)?;

        if millis.is_empty() || !millis.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FileIdError::InvalidTimestamp);
        }
        if suffix.is_empty()
            || !suffix
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
        {
            return Err(FileIdError::InvalidSuffix);
        }

        Ok(Self(s.to_owned()))
    }

    /// Whether a raw lookup key was produced by this generator's naming scheme.
    ///
    /// Only the prefix is checked, so ids minted by older releases with a
    /// different suffix length still count.
    #[must_use]
    pub fn looks_generated(raw: &str) -> bool {
        raw.starts_with(FILE_ID_PREFIX)
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the id and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FileId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_generate_layout() {
        let id = FileId::generate();
        let parsed = FileId::parse(id.as_str()).unwrap();
        assert_eq!(parsed, id);

        let suffix = id.as_str().rsplit('_').next().unwrap();
        assert_eq!(suffix.len(), SUFFIX_LEN);
    }

    #[test]
    fn test_generate_at_embeds_timestamp() {
        let mut rng = StdRng::seed_from_u64(7);
        let id = FileId::generate_at(1_700_000_000_123, &mut rng);
        assert!(id.as_str().starts_with("file_1700000000123_"));
    }

    #[test]
    fn test_same_millisecond_different_suffix() {
        let mut rng = StdRng::seed_from_u64(42);
        let a = FileId::generate_at(1, &mut rng);
        let b = FileId::generate_at(1, &mut rng);
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(
            FileId::parse("upload_1_abc"),
            Err(FileIdError::MissingPrefix)
        );
        assert_eq!(
            FileId::parse("file_abc_def"),
            Err(FileIdError::InvalidTimestamp)
        );
        assert_eq!(FileId::parse("file_123"), Err(FileIdError::InvalidTimestamp));
        assert_eq!(
            FileId::parse("file_123_ABC"),
            Err(FileIdError::InvalidSuffix)
        );
        assert_eq!(FileId::parse("file_123_"), Err(FileIdError::InvalidSuffix));
    }

    #[test]
    fn test_looks_generated() {
        assert!(FileId::looks_generated("file_1_x"));
        assert!(!FileId::looks_generated("gid://shopify/Metaobject/1"));
    }

    #[test]
    fn test_serde_transparent() {
        let id = FileId::parse("file_1_abc").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"file_1_abc\"");
    }
}
