//! Error types for release descriptor construction and validation.
//!
//! Each variant names the offending value and the constraint it violated,
//! so a malformed descriptor file can be fixed without reading the source.

use thiserror::Error;

/// Errors arising from invalid release descriptor values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// The package name is empty or contains characters a formula class
    /// name cannot carry.
    #[error("invalid package name \"{value}\": {reason}")]
    InvalidName {
        /// The rejected name.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// The version string is not a semantic version.
    #[error("invalid version \"{value}\": {reason}")]
    InvalidVersion {
        /// The rejected version string.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// A homepage or download URL is malformed.
    #[error("invalid URL \"{value}\": {reason}")]
    InvalidUrl {
        /// The rejected URL.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// A SHA-256 digest is not a valid 64-character hex string.
    #[error("invalid SHA-256 digest: {reason}")]
    InvalidSha256Digest {
        /// Description of the validation failure.
        reason: String,
    },

    /// The install target is not a bare file name.
    #[error("invalid install target \"{value}\": {reason}")]
    InvalidInstallTarget {
        /// The rejected install target.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// An operating system name is not recognised.
    #[error("unknown operating system \"{value}\"; expected one of: macos, linux, windows")]
    UnknownOs {
        /// The rejected operating system name.
        value: String,
    },

    /// A CPU name is not recognised.
    #[error("unknown CPU \"{value}\"; expected one of: any, intel, arm")]
    UnknownCpu {
        /// The rejected CPU name.
        value: String,
    },

    /// The descriptor lists no platform entries at all.
    #[error("descriptor for {name} has no platform entries")]
    NoPlatformEntries {
        /// The package name.
        name: String,
    },

    /// Two platform entries could both match the same host.
    #[error("platform entries overlap: {first} and {second}")]
    OverlappingEntries {
        /// The platform of the earlier entry.
        first: String,
        /// The platform of the later entry.
        second: String,
    },
}

/// Result type alias using [`DescriptorError`].
pub type Result<T> = std::result::Result<T, DescriptorError>;
