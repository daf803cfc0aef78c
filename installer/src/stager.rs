//! Placing the extracted executable into the bin directory.
//!
//! The executable is copied into a temporary file beside its destination,
//! made executable, then renamed over `<bin_dir>/<install_target>`, so an
//! interrupted install never leaves a half-written binary on the path.

use crate::error::{InstallerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::path::{Path, PathBuf};

/// Handles installation of one executable into a bin directory.
#[derive(Debug, Clone)]
pub struct Stager {
    bin_dir: Utf8PathBuf,
    install_target: String,
}

impl Stager {
    /// Create a new stager for `install_target` in `bin_dir`.
    #[must_use]
    pub fn new(bin_dir: Utf8PathBuf, install_target: &str) -> Self {
        Self {
            bin_dir,
            install_target: install_target.to_owned(),
        }
    }

    /// The full path the executable is installed to.
    #[must_use]
    pub fn destination(&self) -> Utf8PathBuf {
        self.bin_dir.join(&self.install_target)
    }

    /// Check that the executable can be written, without creating anything.
    ///
    /// A missing bin directory is probed through its nearest existing
    /// ancestor; it is only created by [`Stager::install`].
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::TargetNotWritable`] if the bin directory
    /// path is occupied by a file or the probed directory is not writable.
    pub fn prepare(&self) -> Result<()> {
        let not_writable = |reason: String| InstallerError::TargetNotWritable {
            path: self.bin_dir.clone(),
            reason,
        };
        if self.bin_dir.exists() && !self.bin_dir.is_dir() {
            return Err(not_writable("not a directory".to_owned()));
        }
        let probe_dir = self
            .bin_dir
            .ancestors()
            .find(|dir| dir.is_dir())
            .unwrap_or_else(|| Utf8Path::new("."));
        tempfile::NamedTempFile::new_in(probe_dir)
            .map(drop)
            .map_err(|err| not_writable(format!("{probe_dir}: {err}")))
    }

    /// Find the executable inside an extraction directory.
    ///
    /// The executable is looked up at the root first. Archives that wrap
    /// their payload in a single top-level directory are searched one level
    /// down.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::BinaryNotFound`] if the file is absent, or
    /// [`InstallerError::Io`] if the directory cannot be listed.
    pub fn locate(&self, extraction_root: &Path, archive: &str) -> Result<PathBuf> {
        let direct = extraction_root.join(&self.install_target);
        if direct.is_file() {
            return Ok(direct);
        }

        let mut directories = Vec::new();
        for listed in fs::read_dir(extraction_root)? {
            let entry = listed?;
            if entry.file_type()?.is_dir() {
                directories.push(entry.path());
            }
        }
        if let [single] = directories.as_slice() {
            let nested = single.join(&self.install_target);
            if nested.is_file() {
                return Ok(nested);
            }
        }

        Err(InstallerError::BinaryNotFound {
            name: self.install_target.clone(),
            archive: archive.to_owned(),
        })
    }

    /// Install `source` as the executable, replacing any previous copy.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::InstallIo`] if the bin directory cannot be
    /// created or the copy, permission change or final rename fails.
    pub fn install(&self, source: &Path) -> Result<Utf8PathBuf> {
        let dest_path = self.destination();
        let io_error = |err: std::io::Error| InstallerError::InstallIo {
            path: dest_path.clone(),
            source: err,
        };

        fs::create_dir_all(&self.bin_dir).map_err(io_error)?;
        let mut staged = tempfile::NamedTempFile::new_in(&self.bin_dir).map_err(io_error)?;
        let mut input = fs::File::open(source).map_err(io_error)?;
        std::io::copy(&mut input, staged.as_file_mut()).map_err(io_error)?;
        staged.as_file().sync_all().map_err(io_error)?;
        make_executable(staged.path()).map_err(io_error)?;
        staged
            .persist(&dest_path)
            .map_err(|e| io_error(e.error))?;

        log::debug!("installed {} to {dest_path}", source.display());
        Ok(dest_path)
    }
}

/// Set `rwxr-xr-x` on Unix; a no-op elsewhere.
#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    struct Workspace {
        _temp: tempfile::TempDir,
        root: PathBuf,
        bin_dir: Utf8PathBuf,
    }

    #[fixture]
    fn workspace() -> Workspace {
        let temp = tempfile::tempdir().expect("temp dir");
        let root = temp.path().join("extracted");
        fs::create_dir_all(&root).expect("create extraction root");
        let bin_dir =
            Utf8PathBuf::try_from(temp.path().join("bin")).expect("temp dir is UTF-8");
        Workspace {
            _temp: temp,
            root,
            bin_dir,
        }
    }

    #[rstest]
    fn destination_joins_bin_dir_and_target(workspace: Workspace) {
        let stager = Stager::new(workspace.bin_dir.clone(), "speechly");
        assert_eq!(stager.destination(), workspace.bin_dir.join("speechly"));
    }

    #[rstest]
    fn locate_finds_binary_at_root(workspace: Workspace) {
        fs::write(workspace.root.join("speechly"), b"bin").expect("write");
        fs::write(workspace.root.join("README.md"), b"docs").expect("write");
        let stager = Stager::new(workspace.bin_dir.clone(), "speechly");
        let found = stager.locate(&workspace.root, "a.tar.gz").expect("found");
        assert_eq!(found, workspace.root.join("speechly"));
    }

    #[rstest]
    fn locate_descends_into_single_directory(workspace: Workspace) {
        let nested = workspace.root.join("speechly_0.0.2");
        fs::create_dir_all(&nested).expect("mkdir");
        fs::write(nested.join("speechly"), b"bin").expect("write");
        let stager = Stager::new(workspace.bin_dir.clone(), "speechly");
        let found = stager.locate(&workspace.root, "a.tar.gz").expect("found");
        assert_eq!(found, nested.join("speechly"));
    }

    #[rstest]
    fn locate_reports_missing_binary(workspace: Workspace) {
        fs::write(workspace.root.join("other"), b"bin").expect("write");
        let stager = Stager::new(workspace.bin_dir.clone(), "speechly");
        let err = stager
            .locate(&workspace.root, "speechly_0.0.2_Linux_x86_64.tar.gz")
            .expect_err("missing");
        assert!(matches!(
            err,
            InstallerError::BinaryNotFound { ref name, .. } if name == "speechly"
        ));
    }

    #[rstest]
    fn install_creates_then_overwrites(workspace: Workspace) {
        let stager = Stager::new(workspace.bin_dir.clone(), "speechly");
        stager.prepare().expect("prepare");

        let source = workspace.root.join("speechly");
        fs::write(&source, b"first").expect("write");
        let installed = stager.install(&source).expect("install");
        assert_eq!(fs::read(&installed).expect("read"), b"first");

        fs::write(&source, b"second").expect("write");
        stager.install(&source).expect("reinstall");
        assert_eq!(fs::read(&installed).expect("read"), b"second");

        let entries = fs::read_dir(&workspace.bin_dir).expect("list").count();
        assert_eq!(entries, 1, "only the executable should remain");
    }

    #[cfg(unix)]
    #[rstest]
    fn install_marks_binary_executable(workspace: Workspace) {
        use std::os::unix::fs::PermissionsExt;

        let stager = Stager::new(workspace.bin_dir.clone(), "speechly");
        stager.prepare().expect("prepare");
        let source = workspace.root.join("speechly");
        fs::write(&source, b"bin").expect("write");

        let installed = stager.install(&source).expect("install");
        let mode = fs::metadata(&installed).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[rstest]
    fn prepare_fails_when_bin_dir_is_a_file(workspace: Workspace) {
        fs::write(&workspace.bin_dir, b"occupied").expect("write");
        let stager = Stager::new(workspace.bin_dir.clone(), "speechly");
        assert!(matches!(
            stager.prepare(),
            Err(InstallerError::TargetNotWritable { .. })
        ));
    }

    #[rstest]
    fn prepare_does_not_create_missing_bin_dir(workspace: Workspace) {
        let bin_dir = workspace.bin_dir.join("nested");
        let stager = Stager::new(bin_dir.clone(), "speechly");
        stager.prepare().expect("ancestor is writable");
        assert!(!workspace.bin_dir.exists());
        assert!(!bin_dir.exists());
    }

    #[rstest]
    fn install_creates_missing_bin_dir(workspace: Workspace) {
        let stager = Stager::new(workspace.bin_dir.join("nested"), "speechly");
        let source = workspace.root.join("speechly");
        fs::write(&source, b"bin").expect("write");

        let installed = stager.install(&source).expect("install");
        assert_eq!(installed, workspace.bin_dir.join("nested/speechly"));
        assert_eq!(fs::read(&installed).expect("read"), b"bin");
    }
}
