//! Error types for the speechly installer.
//!
//! Every variant is terminal: the installer reports it and stops. Messages
//! name the platform, archive or path involved so the user can act on them.

use crate::artefact::download::DownloadError;
use crate::artefact::extraction::ExtractionError;
use crate::descriptor::parser::DescriptorParseError;
use crate::descriptor::sha256_digest::Sha256Digest;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur during the installation process.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// No platform entry serves the host.
    #[error("unsupported platform {host}; this release supports: {supported}")]
    UnsupportedPlatform {
        /// The host platform, e.g. `linux/arm`.
        host: String,
        /// Comma-separated list of platforms with an entry.
        supported: String,
    },

    /// The archive could not be downloaded.
    #[error("download error: {0}")]
    DownloadFailure(#[from] DownloadError),

    /// The downloaded archive does not match the recorded digest.
    #[error("integrity check failed for {archive}: expected sha256 {expected}, got {actual}")]
    ChecksumMismatch {
        /// The archive file name.
        archive: String,
        /// The digest recorded in the descriptor.
        expected: Sha256Digest,
        /// The digest of the downloaded bytes.
        actual: Sha256Digest,
    },

    /// The archive could not be unpacked.
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    /// The archive does not contain the executable to install.
    #[error("{name} not found in {archive}")]
    BinaryNotFound {
        /// The install target that was looked for.
        name: String,
        /// The archive file name.
        archive: String,
    },

    /// Copying the executable into the bin directory failed.
    #[error("failed to install {path}: {source}")]
    InstallIo {
        /// Destination path of the failed write.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The bin directory exists but is not writable.
    #[error("bin directory {path} is not writable: {reason}")]
    TargetNotWritable {
        /// Path to the non-writable directory.
        path: Utf8PathBuf,
        /// Description of the underlying I/O error.
        reason: String,
    },

    /// No bin directory was given and none could be derived.
    #[error("could not determine a bin directory; pass --bin-dir or set {env_var}")]
    BinDirUnavailable {
        /// The environment variable consulted.
        env_var: &'static str,
    },

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Lossy rendering of the path.
        path: String,
    },

    /// The descriptor file could not be loaded.
    #[error(transparent)]
    Descriptor(#[from] DescriptorParseError),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to write output.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_platform_lists_supported_hosts() {
        let err = InstallerError::UnsupportedPlatform {
            host: "linux/arm".to_owned(),
            supported: "macos/any, linux/intel".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("unsupported platform linux/arm"));
        assert!(msg.contains("linux/intel"));
    }

    #[test]
    fn checksum_mismatch_reports_both_digests() {
        let err = InstallerError::ChecksumMismatch {
            archive: "speechly_0.0.2_Linux_x86_64.tar.gz".to_owned(),
            expected: Sha256Digest::try_from("a".repeat(64)).expect("valid"),
            actual: Sha256Digest::try_from("b".repeat(64)).expect("valid"),
        };
        let msg = err.to_string();
        assert!(msg.contains("integrity check failed"));
        assert!(msg.contains(&"a".repeat(64)));
        assert!(msg.contains(&"b".repeat(64)));
    }

    #[test]
    fn download_failure_wraps_source() {
        let err = InstallerError::from(DownloadError::NotFound {
            url: "https://example.test/a.tar.gz".to_owned(),
        });
        assert!(err.to_string().starts_with("download error"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn install_io_preserves_source() {
        let err = InstallerError::InstallIo {
            path: Utf8PathBuf::from("/usr/local/bin/speechly"),
            source: std::io::Error::other("permission denied"),
        };
        assert!(err.to_string().contains("/usr/local/bin/speechly"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
