//! HTTP(S) URL newtype for homepages and archive downloads.
//!
//! Values must parse as absolute URLs with an `http` or `https` scheme and
//! contain no whitespace. The text is kept as written so a rendered formula
//! repeats it exactly; archive URLs must also end in a file name, which
//! [`ReleaseUrl::file_name`] exposes.

use super::error::{DescriptorError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated absolute `http`/`https` URL.
///
/// # Examples
///
/// ```
/// use speechly_installer::descriptor::url::ReleaseUrl;
///
/// let url = ReleaseUrl::try_from("https://example.test/v1/tool_1.0_Linux_x86_64.tar.gz")
///     .expect("valid URL");
/// assert_eq!(url.file_name(), Some("tool_1.0_Linux_x86_64.tar.gz"));
/// assert!(ReleaseUrl::try_from("https://example.test:port/a.tgz").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReleaseUrl {
    raw: String,
    parsed: ::url::Url,
}

impl ReleaseUrl {
    /// Return the URL as written in the descriptor.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Return the last path segment, ignoring any query or fragment.
    ///
    /// Returns `None` when the path is empty or ends in `/`.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.parsed
            .path_segments()?
            .next_back()
            .filter(|segment| !segment.is_empty())
    }

    fn parse(raw: String) -> Result<Self> {
        if raw.chars().any(char::is_whitespace) {
            return Err(invalid(&raw, &"contains whitespace"));
        }
        let parsed = ::url::Url::parse(&raw).map_err(|err| invalid(&raw, &err))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(&raw, &"scheme must be http or https"));
        }
        if parsed.host().is_none() {
            return Err(invalid(&raw, &"missing host"));
        }
        Ok(Self { raw, parsed })
    }
}

fn invalid(value: &str, reason: &dyn fmt::Display) -> DescriptorError {
    DescriptorError::InvalidUrl {
        value: value.to_owned(),
        reason: reason.to_string(),
    }
}

impl TryFrom<&str> for ReleaseUrl {
    type Error = DescriptorError;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value.to_owned())
    }
}

impl TryFrom<String> for ReleaseUrl {
    type Error = DescriptorError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<ReleaseUrl> for String {
    fn from(value: ReleaseUrl) -> Self {
        value.raw
    }
}

impl fmt::Display for ReleaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
