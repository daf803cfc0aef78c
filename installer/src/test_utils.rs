//! Shared test utilities for the installer crate.
//!
//! Available to unit tests and, through the `test-support` feature, to the
//! behaviour suites under `tests/`.

use crate::artefact::download::{ArtefactDownloader, DownloadError};
use crate::descriptor::error::Result as DescriptorResult;
use crate::descriptor::release::ReleaseDescriptor;
use crate::platform::{CpuRequirement, Os};
use flate2::Compression;
use flate2::write::GzEncoder;
use sha2::{Digest, Sha256};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

/// Lowercase hex SHA-256 of `data`.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    crate::descriptor::sha256_digest::Sha256Digest::from_bytes(&Sha256::digest(data).into())
        .as_str()
        .to_owned()
}

/// Build an in-memory `.tar.gz` holding `files` as `0755` regular files.
///
/// # Errors
///
/// Returns any error raised while appending entries or finishing the stream.
pub fn tar_gz_bytes(files: &[(&str, &[u8])]) -> std::io::Result<Vec<u8>> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (path, contents) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, path, *contents)?;
    }
    builder.into_inner()?.finish()
}

/// Write a `.tar.gz` holding `files` to `path`.
///
/// # Errors
///
/// Returns any error raised while building or writing the archive.
pub fn write_tar_gz(path: &Path, files: &[(&str, &[u8])]) -> std::io::Result<()> {
    std::fs::write(path, tar_gz_bytes(files)?)
}

/// URL of the macOS archive in [`two_platform_release`].
pub const MACOS_ARCHIVE_URL: &str = "https://downloads.example.test/v1.0.0/speechly_1.0.0_macOS_x86_64.tar.gz";

/// URL of the Linux archive in [`two_platform_release`].
pub const LINUX_ARCHIVE_URL: &str = "https://downloads.example.test/v1.0.0/speechly_1.0.0_Linux_x86_64.tar.gz";

/// A `speechly` release with the same platform matrix as the built-in one:
/// macOS for any CPU and Linux for Intel, carrying the given digests.
///
/// # Errors
///
/// Returns a descriptor error if either digest is malformed.
pub fn two_platform_release(macos_sha256: &str, linux_sha256: &str) -> DescriptorResult<ReleaseDescriptor> {
    ReleaseDescriptor::builder("speechly", "1.0.0", "speechly")
        .homepage("https://www.speechly.com/")
        .entry(Os::MacOs, CpuRequirement::Any, MACOS_ARCHIVE_URL, macos_sha256)
        .entry(Os::Linux, CpuRequirement::Intel, LINUX_ARCHIVE_URL, linux_sha256)
        .build()
}

/// Downloader serving fixed bodies from memory and recording every request.
///
/// URLs without a registered body answer with [`DownloadError::NotFound`].
#[derive(Debug, Default)]
pub struct StubDownloader {
    bodies: HashMap<String, Vec<u8>>,
    requests: RefCell<Vec<String>>,
}

impl StubDownloader {
    /// Create a downloader with no registered bodies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    #[must_use]
    pub fn serve(mut self, url: &str, body: Vec<u8>) -> Self {
        self.bodies.insert(url.to_owned(), body);
        self
    }

    /// URLs requested so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl ArtefactDownloader for StubDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<u64, DownloadError> {
        self.requests.borrow_mut().push(url.to_owned());
        let body = self.bodies.get(url).ok_or_else(|| DownloadError::NotFound {
            url: url.to_owned(),
        })?;
        std::fs::write(dest, body)?;
        Ok(body.len() as u64)
    }
}
