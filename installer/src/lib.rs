//! Speechly installer library.
//!
//! This crate installs prebuilt `speechly` release archives: it resolves the
//! archive published for the host platform, downloads it, verifies its
//! SHA-256 digest and places the executable in a bin directory. It is used
//! by the `speechly-installer` CLI binary and can be consumed
//! programmatically for testing or custom installation workflows.
//!
//! # Modules
//!
//! - [`artefact`] - Archive download, verification and extraction
//! - [`cli`] - Command-line argument definitions
//! - [`descriptor`] - Release descriptor model, TOML parser and built-in release
//! - [`dirs`] - Bin directory resolution
//! - [`error`] - Semantic error types
//! - [`formula`] - Homebrew formula rendering
//! - [`output`] - Progress, dry-run and descriptor formatting
//! - [`pipeline`] - Install pipeline orchestration
//! - [`platform`] - Host operating system and CPU vocabulary
//! - [`resolver`] - Platform entry selection
//! - [`stager`] - Atomic placement of the executable

pub mod artefact;
pub mod cli;
pub mod descriptor;
pub mod dirs;
pub mod error;
pub mod formula;
pub mod output;
pub mod pipeline;
pub mod platform;
pub mod resolver;
pub mod stager;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
