//! Release archive handling: download, verification and extraction.
//!
//! # Sub-modules
//!
//! - [`download`] - Archive download trait and HTTP implementation.
//! - [`extraction`] - Archive extraction with path traversal protection.
//! - [`verification`] - SHA-256 verification and the verification policy.

pub mod download;
pub mod extraction;
pub mod verification;
