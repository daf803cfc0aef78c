//! Recorded SHA-256 digests of release archives.
//!
//! Digests are kept in their canonical spelling: 64 lowercase hex digits.

use super::error::{DescriptorError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

const HEX_DIGITS: usize = 64;

/// A SHA-256 digest in canonical lowercase hex.
///
/// ```
/// use speechly_installer::descriptor::sha256_digest::Sha256Digest;
///
/// let zeros = Sha256Digest::from_bytes(&[0; 32]);
/// assert_eq!(zeros.as_str(), "0".repeat(64));
/// assert!(Sha256Digest::try_from("ABC").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Encode raw hash output.
    #[must_use]
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self(hex::encode(bytes))
    }

    /// The hex digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `first6...last4`, short enough for a progress line.
    #[must_use]
    pub fn abbreviated(&self) -> String {
        let head = self.0.get(..6).unwrap_or_default();
        let tail = self.0.get(HEX_DIGITS - 4..).unwrap_or_default();
        format!("{head}...{tail}")
    }

    fn parse(text: String) -> Result<Self> {
        let invalid = |reason: String| DescriptorError::InvalidSha256Digest { reason };
        if text.len() != HEX_DIGITS {
            return Err(invalid(format!(
                "expected {HEX_DIGITS} hex characters, got {}",
                text.len()
            )));
        }
        match text.chars().find(|c| !matches!(c, '0'..='9' | 'a'..='f')) {
            None => Ok(Self(text)),
            Some(c) if c.is_ascii_hexdigit() => {
                Err(invalid("digest must be lowercase".to_owned()))
            }
            Some(c) => Err(invalid(format!("non-hex character '{c}'"))),
        }
    }
}

impl TryFrom<String> for Sha256Digest {
    type Error = DescriptorError;

    fn try_from(text: String) -> Result<Self> {
        Self::parse(text)
    }
}

impl TryFrom<&str> for Sha256Digest {
    type Error = DescriptorError;

    fn try_from(text: &str) -> Result<Self> {
        Self::parse(text.to_owned())
    }
}

impl From<Sha256Digest> for String {
    fn from(digest: Sha256Digest) -> Self {
        digest.0
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
