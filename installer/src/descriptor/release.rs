//! The release descriptor: one immutable record per published release.
//!
//! A [`ReleaseDescriptor`] can only be obtained through
//! [`DescriptorBuilder::build`] (directly, or via the TOML parser), which
//! enforces every structural invariant up front. After construction the
//! descriptor is read-only.

use super::error::{DescriptorError, Result};
use super::sha256_digest::Sha256Digest;
use super::url::ReleaseUrl;
use crate::platform::{CpuRequirement, HostPlatform, Os};
use serde::Serialize;
use std::fmt;

/// One downloadable archive and the hosts it serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformEntry {
    os: Os,
    cpu: CpuRequirement,
    url: ReleaseUrl,
    sha256: Sha256Digest,
}

impl PlatformEntry {
    /// Create an entry, checking that the URL names an archive file.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::InvalidUrl`] if the URL has no file name.
    pub fn new(os: Os, cpu: CpuRequirement, url: ReleaseUrl, sha256: Sha256Digest) -> Result<Self> {
        if url.file_name().is_none() {
            return Err(DescriptorError::InvalidUrl {
                value: url.to_string(),
                reason: "download URL must end in an archive file name".to_owned(),
            });
        }
        Ok(Self {
            os,
            cpu,
            url,
            sha256,
        })
    }

    /// The operating system this entry targets.
    #[must_use]
    pub const fn os(&self) -> Os {
        self.os
    }

    /// The CPU requirement of this entry.
    #[must_use]
    pub const fn cpu(&self) -> CpuRequirement {
        self.cpu
    }

    /// The archive download URL.
    #[must_use]
    pub const fn url(&self) -> &ReleaseUrl {
        &self.url
    }

    /// The recorded SHA-256 digest of the archive.
    #[must_use]
    pub const fn sha256(&self) -> &Sha256Digest {
        &self.sha256
    }

    /// The archive file name (last URL segment).
    #[must_use]
    pub fn archive_name(&self) -> &str {
        // Checked non-empty at construction.
        self.url.file_name().unwrap_or_default()
    }

    /// Return whether this entry serves `host`.
    #[must_use]
    pub fn matches(&self, host: HostPlatform) -> bool {
        self.os == host.os && self.cpu.admits(host.cpu)
    }

    /// Human-readable platform label, e.g. `linux/intel`.
    #[must_use]
    pub fn platform_label(&self) -> String {
        format!("{}/{}", self.os, self.cpu)
    }
}

/// A validated, immutable description of one release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseDescriptor {
    name: String,
    desc: String,
    homepage: Option<ReleaseUrl>,
    version: String,
    install_target: String,
    platforms: Vec<PlatformEntry>,
}

impl ReleaseDescriptor {
    /// Start building a descriptor.
    ///
    /// # Examples
    ///
    /// ```
    /// use speechly_installer::descriptor::release::ReleaseDescriptor;
    /// use speechly_installer::platform::{CpuRequirement, Os};
    ///
    /// let descriptor = ReleaseDescriptor::builder("tool", "1.2.3", "tool")
    ///     .entry(
    ///         Os::Linux,
    ///         CpuRequirement::Intel,
    ///         "https://example.test/tool_1.2.3_Linux_x86_64.tar.gz",
    ///         &"a".repeat(64),
    ///     )
    ///     .build()
    ///     .expect("valid descriptor");
    /// assert_eq!(descriptor.platforms().len(), 1);
    /// ```
    #[must_use]
    pub fn builder(name: &str, version: &str, install_target: &str) -> DescriptorBuilder {
        DescriptorBuilder {
            name: name.to_owned(),
            desc: String::new(),
            homepage: None,
            version: version.to_owned(),
            install_target: install_target.to_owned(),
            entries: Vec::new(),
        }
    }

    /// The package identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The package description; may be empty.
    #[must_use]
    pub fn desc(&self) -> &str {
        &self.desc
    }

    /// The project homepage, if recorded.
    #[must_use]
    pub const fn homepage(&self) -> Option<&ReleaseUrl> {
        self.homepage.as_ref()
    }

    /// The release version string.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The file name of the executable placed on the install path.
    #[must_use]
    pub fn install_target(&self) -> &str {
        &self.install_target
    }

    /// All platform entries, in declaration order.
    #[must_use]
    pub fn platforms(&self) -> &[PlatformEntry] {
        &self.platforms
    }

    /// Entries targeting `os`, in declaration order.
    pub fn platforms_for(&self, os: Os) -> impl Iterator<Item = &PlatformEntry> {
        self.platforms.iter().filter(move |entry| entry.os() == os)
    }
}

impl fmt::Display for ReleaseDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// Raw descriptor fields awaiting validation.
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    name: String,
    desc: String,
    homepage: Option<String>,
    version: String,
    install_target: String,
    entries: Vec<RawEntry>,
}

#[derive(Debug, Clone)]
struct RawEntry {
    os: Os,
    cpu: CpuRequirement,
    url: String,
    sha256: String,
}

impl DescriptorBuilder {
    /// Set the description.
    #[must_use]
    pub fn desc(mut self, desc: &str) -> Self {
        desc.clone_into(&mut self.desc);
        self
    }

    /// Set the homepage URL.
    #[must_use]
    pub fn homepage(mut self, homepage: &str) -> Self {
        self.homepage = Some(homepage.to_owned());
        self
    }

    /// Append a platform entry.
    #[must_use]
    pub fn entry(mut self, os: Os, cpu: CpuRequirement, url: &str, sha256: &str) -> Self {
        self.entries.push(RawEntry {
            os,
            cpu,
            url: url.to_owned(),
            sha256: sha256.to_owned(),
        });
        self
    }

    /// Validate all fields and produce the descriptor.
    ///
    /// # Errors
    ///
    /// Returns the first [`DescriptorError`] encountered: malformed name,
    /// version, install target, URL or digest, an empty platform list, or
    /// two entries that could match the same host.
    pub fn build(self) -> Result<ReleaseDescriptor> {
        validate_name(&self.name)?;
        validate_version(&self.version)?;
        validate_install_target(&self.install_target)?;
        let homepage = self.homepage.map(ReleaseUrl::try_from).transpose()?;

        if self.entries.is_empty() {
            return Err(DescriptorError::NoPlatformEntries { name: self.name });
        }

        let mut platforms: Vec<PlatformEntry> = Vec::with_capacity(self.entries.len());
        for raw in self.entries {
            let entry = PlatformEntry::new(
                raw.os,
                raw.cpu,
                ReleaseUrl::try_from(raw.url)?,
                Sha256Digest::try_from(raw.sha256)?,
            )?;
            if let Some(existing) = platforms
                .iter()
                .find(|p| p.os() == entry.os() && p.cpu().overlaps(entry.cpu()))
            {
                return Err(DescriptorError::OverlappingEntries {
                    first: existing.platform_label(),
                    second: entry.platform_label(),
                });
            }
            platforms.push(entry);
        }

        Ok(ReleaseDescriptor {
            name: self.name,
            desc: self.desc,
            homepage,
            version: self.version,
            install_target: self.install_target,
            platforms,
        })
    }
}

fn validate_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| DescriptorError::InvalidName {
        value: name.to_owned(),
        reason: reason.to_owned(),
    };
    let first = name.chars().next().ok_or_else(|| invalid("name is empty"))?;
    if !first.is_ascii_alphabetic() {
        return Err(invalid("name must start with an ASCII letter"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
    {
        return Err(invalid(
            "name may only contain ASCII letters, digits, '-' and '_'",
        ));
    }
    Ok(())
}

fn validate_version(version: &str) -> Result<()> {
    semver::Version::parse(version)
        .map(|_| ())
        .map_err(|e| DescriptorError::InvalidVersion {
            value: version.to_owned(),
            reason: e.to_string(),
        })
}

fn validate_install_target(target: &str) -> Result<()> {
    let invalid = |reason: &str| DescriptorError::InvalidInstallTarget {
        value: target.to_owned(),
        reason: reason.to_owned(),
    };
    if target.is_empty() {
        return Err(invalid("install target is empty"));
    }
    if matches!(target, "." | "..") || target.contains(['/', '\\']) {
        return Err(invalid("install target must be a bare file name"));
    }
    Ok(())
}
