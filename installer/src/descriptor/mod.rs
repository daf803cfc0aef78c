//! Release descriptor model: the typed form of a package formula.
//!
//! # Sub-modules
//!
//! - [`builtin`] - The speechly release shipped with the installer.
//! - [`error`] - Validation errors for descriptor fields.
//! - [`parser`] - TOML descriptor files.
//! - [`release`] - `ReleaseDescriptor` and `PlatformEntry`.
//! - [`sha256_digest`] - SHA-256 digest newtype (`Sha256Digest`).
//! - [`url`] - HTTP(S) URL newtype (`ReleaseUrl`).

pub mod builtin;
pub mod error;
pub mod parser;
pub mod release;
pub mod sha256_digest;
pub mod url;
