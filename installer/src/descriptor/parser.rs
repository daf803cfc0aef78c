//! TOML descriptor files.
//!
//! A descriptor file carries the same fields as a formula, one
//! `[[platform]]` table per archive. Deserialisation is a two-step affair:
//! `serde` maps the document onto plain structs, then
//! [`DescriptorBuilder::build`](super::release::DescriptorBuilder::build)
//! enforces the invariants.

use super::error::DescriptorError;
use super::release::ReleaseDescriptor;
use crate::platform::{CpuRequirement, Os};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

/// Errors arising from descriptor file loading.
#[derive(Debug, thiserror::Error)]
pub enum DescriptorParseError {
    /// The document is not valid TOML or does not match the schema.
    #[error("descriptor parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The document parsed but a field violates a descriptor invariant.
    #[error("invalid descriptor: {0}")]
    Invalid(#[from] DescriptorError),

    /// The descriptor file could not be read.
    #[error("failed to read descriptor {path}: {source}")]
    Read {
        /// Path of the descriptor file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DescriptorDocument {
    name: String,
    #[serde(default)]
    desc: String,
    homepage: Option<String>,
    version: String,
    install: String,
    #[serde(default, rename = "platform")]
    platforms: Vec<PlatformDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlatformDocument {
    os: Os,
    #[serde(default)]
    cpu: CpuRequirement,
    url: String,
    sha256: String,
}

/// Parse a TOML string into a validated [`ReleaseDescriptor`].
///
/// # Errors
///
/// Returns an error if the TOML is malformed, has unknown keys, or any
/// field fails validation.
///
/// # Examples
///
/// ```
/// use speechly_installer::descriptor::parser::parse_descriptor;
///
/// let toml = r#"
/// name = "tool"
/// version = "1.0.0"
/// install = "tool"
///
/// [[platform]]
/// os = "linux"
/// cpu = "intel"
/// url = "https://example.test/tool_1.0.0_Linux_x86_64.tar.gz"
/// sha256 = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
/// "#;
/// let descriptor = parse_descriptor(toml).expect("valid descriptor");
/// assert_eq!(descriptor.install_target(), "tool");
/// ```
pub fn parse_descriptor(contents: &str) -> Result<ReleaseDescriptor, DescriptorParseError> {
    let document: DescriptorDocument = toml::from_str(contents)?;
    let mut builder = ReleaseDescriptor::builder(&document.name, &document.version, &document.install)
        .desc(&document.desc);
    if let Some(homepage) = document.homepage.as_deref() {
        builder = builder.homepage(homepage);
    }
    for platform in &document.platforms {
        builder = builder.entry(platform.os, platform.cpu, &platform.url, &platform.sha256);
    }
    Ok(builder.build()?)
}

/// Read and parse a descriptor file.
///
/// # Errors
///
/// Returns [`DescriptorParseError::Read`] if the file cannot be read, or
/// any error [`parse_descriptor`] reports.
pub fn load_descriptor(path: &Utf8Path) -> Result<ReleaseDescriptor, DescriptorParseError> {
    let contents = std::fs::read_to_string(path).map_err(|source| DescriptorParseError::Read {
        path: path.to_owned(),
        source,
    })?;
    log::debug!("loaded descriptor from {path}");
    parse_descriptor(&contents)
}
