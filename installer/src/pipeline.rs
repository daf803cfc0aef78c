//! Install pipeline orchestration.
//!
//! Runs the full install for one host: resolve the platform entry, download
//! its archive into a private temporary directory, verify the SHA-256
//! digest, extract, then stage the executable into the bin directory. The
//! first failure stops the run and nothing is retried. The bin directory is
//! neither created nor written before verification succeeds.

use camino::{Utf8Path, Utf8PathBuf};
use std::io::Write;
use std::path::Path;

use crate::artefact::download::{ArtefactDownloader, HttpDownloader};
use crate::artefact::extraction::{ArtefactExtractor, TarGzExtractor};
use crate::artefact::verification::{VerificationError, verify_checksum};
use crate::descriptor::release::{PlatformEntry, ReleaseDescriptor};
use crate::error::{InstallerError, Result};
use crate::output::write_stderr_line;
use crate::platform::HostPlatform;
use crate::resolver::resolve_entry;
use crate::stager::Stager;

/// Inputs for one install run.
#[derive(Debug, Clone, Copy)]
pub struct InstallConfig<'a> {
    /// The release to install.
    pub descriptor: &'a ReleaseDescriptor,
    /// The host being installed on.
    pub host: HostPlatform,
    /// Directory receiving the executable.
    pub bin_dir: &'a Utf8Path,
    /// When true, suppress progress output.
    pub quiet: bool,
}

/// What a successful install did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    /// Path of the installed executable.
    pub installed_path: Utf8PathBuf,
    /// The platform entry that was installed.
    pub entry: PlatformEntry,
    /// Size of the downloaded archive in bytes.
    pub bytes: u64,
}

/// What an install would do, computed without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    /// The host the plan was resolved for.
    pub host: HostPlatform,
    /// The platform entry that would be installed.
    pub entry: PlatformEntry,
    /// Path the executable would be written to.
    pub destination: Utf8PathBuf,
}

impl InstallPlan {
    /// The archive file name that would be downloaded.
    #[must_use]
    pub fn archive_name(&self) -> &str {
        self.entry.archive_name()
    }
}

/// Resolve what an install would do without touching the network or disk.
///
/// # Errors
///
/// Returns [`InstallerError::UnsupportedPlatform`] if no entry serves the
/// host.
pub fn plan(config: &InstallConfig<'_>) -> Result<InstallPlan> {
    let entry = resolve_entry(config.descriptor, config.host)?;
    let stager = Stager::new(config.bin_dir.to_owned(), config.descriptor.install_target());
    Ok(InstallPlan {
        host: config.host,
        entry: entry.clone(),
        destination: stager.destination(),
    })
}

/// Install using the production HTTP downloader and tar.gz extractor.
///
/// # Errors
///
/// Returns the first error raised by any pipeline step.
pub fn install(config: &InstallConfig<'_>, stderr: &mut dyn Write) -> Result<InstallOutcome> {
    install_with(config, &HttpDownloader, &TarGzExtractor, stderr)
}

/// Testable inner function with injected dependencies.
///
/// The production entry point [`install`] delegates here with real
/// implementations; tests inject mocks.
///
/// # Errors
///
/// Returns [`InstallerError::UnsupportedPlatform`] before any download when
/// the host has no entry, [`InstallerError::DownloadFailure`] if the fetch
/// fails, [`InstallerError::ChecksumMismatch`] if the archive digest
/// differs from the descriptor, and extraction or install errors after
/// that.
pub fn install_with(
    config: &InstallConfig<'_>,
    downloader: &dyn ArtefactDownloader,
    extractor: &dyn ArtefactExtractor,
    stderr: &mut dyn Write,
) -> Result<InstallOutcome> {
    let descriptor = config.descriptor;
    let entry = resolve_entry(descriptor, config.host)?;
    let archive = entry.archive_name();
    let stager = Stager::new(config.bin_dir.to_owned(), descriptor.install_target());

    progress(
        config,
        stderr,
        format_args!("Installing {descriptor} for {}...", config.host),
    );
    stager.prepare()?;

    let temp_dir = tempfile::tempdir()?;
    let archive_path = temp_dir.path().join(archive);

    progress(config, stderr, format_args!("Downloading {archive}..."));
    let bytes = downloader.download(entry.url().as_str(), &archive_path)?;
    log::debug!("fetched {bytes} bytes from {}", entry.url());

    progress(
        config,
        stderr,
        format_args!("Verifying sha256 {}...", entry.sha256().abbreviated()),
    );
    verify_archive(entry, &archive_path)?;

    let extraction_root = temp_dir.path().join("extracted");
    std::fs::create_dir_all(&extraction_root)?;
    progress(config, stderr, format_args!("Extracting {archive}..."));
    let files = extractor.extract(&archive_path, &extraction_root)?;
    log::debug!("extracted {} file(s) from {archive}", files.len());

    let source = stager.locate(&extraction_root, archive)?;
    let installed_path = stager.install(&source)?;

    Ok(InstallOutcome {
        installed_path,
        entry: entry.clone(),
        bytes,
    })
}

fn progress(config: &InstallConfig<'_>, stderr: &mut dyn Write, message: std::fmt::Arguments<'_>) {
    if !config.quiet {
        write_stderr_line(stderr, message);
    }
}

/// Check the downloaded archive against the digest recorded for `entry`.
fn verify_archive(entry: &PlatformEntry, archive_path: &Path) -> Result<()> {
    verify_checksum(entry.sha256(), archive_path).map_err(|e| match e {
        VerificationError::Mismatch { expected, actual } => InstallerError::ChecksumMismatch {
            archive: entry.archive_name().to_owned(),
            expected,
            actual,
        },
        VerificationError::Io(source) => InstallerError::Io(source),
    })
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
